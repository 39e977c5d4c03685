// SPDX-License-Identifier: MIT OR Apache-2.0
//! Home page: welcome text, feature cards and quick tips.

use super::{card, PageContext};
use deepdata_core::Route;
use egui::RichText;

const FEATURES: [Route; 5] = [
    Route::DataCollect,
    Route::DataProcess,
    Route::DataAnalysis,
    Route::AiAssistant,
    Route::KnowledgeBase,
];

const TIPS: [&str; 3] = ["quickTip1", "quickTip2", "quickTip3"];

const CARD_WIDTH: f32 = 260.0;

pub(super) fn ui(ui: &mut egui::Ui, page: &PageContext<'_>) {
    let tr = page.tr;
    let colors = page.colors;

    ui.heading(RichText::new(tr.t("welcomeMessage")).size(26.0).strong());
    ui.label(RichText::new(tr.t("dashboardDescription")).color(colors.text_secondary));

    ui.add_space(24.0);
    ui.label(RichText::new(tr.t("features")).size(18.0).strong());
    ui.add_space(8.0);

    ui.horizontal_wrapped(|ui| {
        ui.spacing_mut().item_spacing = egui::vec2(12.0, 12.0);
        for route in FEATURES {
            ui.allocate_ui(egui::vec2(CARD_WIDTH, 150.0), |ui| {
                card(ui, colors, |ui| {
                    ui.set_width(CARD_WIDTH - 32.0);
                    ui.label(RichText::new(format!("{}  {}", route.icon(), tr.t(route.label_key()))).size(16.0).strong());
                    if let Some(key) = route.description_key() {
                        ui.add_space(4.0);
                        ui.label(RichText::new(tr.t(key)).size(12.0).color(colors.text_secondary));
                    }
                    ui.add_space(8.0);
                    if ui.button(format!("{} →", tr.t("explore"))).clicked() {
                        page.navigator.navigate(route);
                    }
                });
            });
        }
    });

    ui.add_space(24.0);
    card(ui, colors, |ui| {
        ui.set_width(ui.available_width());
        ui.label(RichText::new(format!("💡 {}", tr.t("quickTips"))).size(16.0).strong());
        ui.add_space(4.0);
        for key in TIPS {
            ui.label(format!("•  {}", tr.t(key)));
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_cards_cover_feature_pages() {
        for route in FEATURES {
            assert!(route.description_key().is_some(), "{route:?} has no description");
        }
        assert!(!FEATURES.contains(&Route::Home));
        assert!(!FEATURES.contains(&Route::Settings));
    }
}

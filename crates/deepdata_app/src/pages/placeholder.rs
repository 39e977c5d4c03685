// SPDX-License-Identifier: MIT OR Apache-2.0
//! Feature pages that are not built yet.

use super::PageContext;
use deepdata_core::Route;
use egui::RichText;

pub(super) fn ui(ui: &mut egui::Ui, route: Route, page: &PageContext<'_>) {
    let tr = page.tr;

    ui.heading(RichText::new(format!("{}  {}", route.icon(), tr.t(route.label_key()))).size(24.0));
    if let Some(key) = route.description_key() {
        ui.add_space(4.0);
        ui.label(RichText::new(tr.t(key)).color(page.colors.text_secondary));
    }

    ui.add_space(48.0);
    ui.vertical_centered(|ui| {
        ui.label(RichText::new("🚧").size(40.0));
        ui.add_space(8.0);
        ui.label(RichText::new(tr.t("pageUnderConstruction")).size(16.0).color(page.colors.text_secondary));
    });
}

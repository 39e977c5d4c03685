// SPDX-License-Identifier: MIT OR Apache-2.0
//! Settings page: theme, language and debug mode.

use super::{card, PageContext, SettingsChange};
use crate::theme::ThemeMode;
use deepdata_core::{DebugFlagStore, Language, SubscriptionGuard};
use egui::RichText;
use std::cell::Cell;
use std::rc::Rc;

/// Settings page state. The debug toggle mirrors the flag store through its
/// change event.
pub struct SettingsPage {
    debug_enabled: Rc<Cell<bool>>,
    _subscription: SubscriptionGuard,
}

impl SettingsPage {
    /// Page following `debug`
    pub fn new(debug: &DebugFlagStore) -> Self {
        let debug_enabled = Rc::new(Cell::new(debug.debug_mode()));
        let subscription = {
            let debug_enabled = debug_enabled.clone();
            debug.subscribe(move |event| debug_enabled.set(event.enabled)).guard()
        };

        Self {
            debug_enabled,
            _subscription: subscription,
        }
    }

    /// Debug flag as last broadcast
    pub fn debug_enabled(&self) -> bool {
        self.debug_enabled.get()
    }

    pub(super) fn ui(&mut self, ui: &mut egui::Ui, page: &PageContext<'_>) -> Option<SettingsChange> {
        let tr = page.tr;
        let colors = page.colors;
        let mut change = None;

        ui.heading(RichText::new(tr.t("settings")).size(24.0));
        ui.label(RichText::new(tr.t("settingsDesc")).color(colors.text_secondary));
        ui.add_space(16.0);

        card(ui, colors, |ui| {
            ui.set_width(ui.available_width());
            ui.label(RichText::new(tr.t("appearance")).size(16.0).strong());
            ui.add_space(8.0);

            ui.horizontal(|ui| {
                ui.label(tr.t("theme"));
                for mode in ThemeMode::ALL {
                    if ui.selectable_label(page.theme == mode, tr.t(mode.label_key())).clicked() && page.theme != mode {
                        change = Some(SettingsChange::Theme(mode));
                    }
                }
            });

            ui.add_space(4.0);
            ui.horizontal(|ui| {
                ui.label(tr.t("language"));
                let current = tr.language();
                egui::ComboBox::from_id_salt("settings_language")
                    .selected_text(format!("{} {}", current.prefix(), current.native_name()))
                    .show_ui(ui, |ui| {
                        for language in Language::ALL {
                            let label = format!("{} {}", language.prefix(), language.native_name());
                            if ui.selectable_label(current == language, label).clicked() && current != language {
                                change = Some(SettingsChange::Language(language));
                            }
                        }
                    })
                    .response
                    .on_hover_text(tr.t("selectLanguage"));
            });
        });

        ui.add_space(12.0);

        card(ui, colors, |ui| {
            ui.set_width(ui.available_width());
            ui.label(RichText::new(tr.t("developer")).size(16.0).strong());
            ui.add_space(8.0);

            let mut enabled = self.debug_enabled();
            if ui.checkbox(&mut enabled, tr.t("debugMode")).changed() {
                change = Some(SettingsChange::DebugMode(enabled));
            }
            ui.label(RichText::new(tr.t("debugModeDesc")).size(12.0).color(colors.text_secondary));
        });

        change
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deepdata_core::{DebugTimings, HarmlessErrorFilter, MemoryPrefStore};

    #[test]
    fn test_mirror_follows_flag_changes() {
        let store = DebugFlagStore::new(
            Rc::new(MemoryPrefStore::new()),
            HarmlessErrorFilter::default(),
            DebugTimings::default(),
        );
        let page = SettingsPage::new(&store);
        assert!(!page.debug_enabled());

        store.set_debug_mode(true);
        assert!(page.debug_enabled());

        store.set_debug_mode(false);
        assert!(!page.debug_enabled());
    }

    #[test]
    fn test_dropped_page_unsubscribes() {
        let store = DebugFlagStore::new(
            Rc::new(MemoryPrefStore::new()),
            HarmlessErrorFilter::default(),
            DebugTimings::default(),
        );
        let page = SettingsPage::new(&store);
        drop(page);

        store.set_debug_mode(true);
        assert!(store.debug_mode());
    }
}

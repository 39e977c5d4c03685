// SPDX-License-Identifier: MIT OR Apache-2.0
//! Pages shown in the central area, one per route.

mod data_analysis;
mod home;
mod placeholder;
mod settings;

use data_analysis::DataAnalysisPage;
use settings::SettingsPage;

use crate::theme::{ShellColors, ThemeMode};
use deepdata_core::{DebugFlagStore, Language, Navigator, Route, Translator};

/// A preference changed on the settings page, applied by the shell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsChange {
    /// New theme mode
    Theme(ThemeMode),
    /// New interface language
    Language(Language),
    /// New debug flag
    DebugMode(bool),
}

/// Shared inputs of every page
pub struct PageContext<'a> {
    /// Active translator
    pub tr: &'a Translator,
    /// Active colors
    pub colors: &'a ShellColors,
    /// Route handle for in-page links
    pub navigator: &'a Navigator,
    /// Active theme mode
    pub theme: ThemeMode,
}

/// Pages that keep state between frames
pub struct Pages {
    settings: SettingsPage,
    data_analysis: DataAnalysisPage,
}

impl Pages {
    /// Page states, the settings page following `debug`
    pub fn new(debug: &DebugFlagStore) -> Self {
        Self {
            settings: SettingsPage::new(debug),
            data_analysis: DataAnalysisPage::new(),
        }
    }

    /// Draw the page for `route`
    pub fn ui(&mut self, ui: &mut egui::Ui, route: Route, page: &PageContext<'_>) -> Option<SettingsChange> {
        // The canvas scrolls on its own between a fixed toolbar and status bar.
        if route == Route::DataAnalysis {
            self.data_analysis.ui(ui, page);
            return None;
        }

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.add_space(16.0);
                match route {
                    Route::Home => {
                        home::ui(ui, page);
                        None
                    }
                    Route::Settings => self.settings.ui(ui, page),
                    Route::DataCollect
                    | Route::DataProcess
                    | Route::DataAnalysis
                    | Route::AiAssistant
                    | Route::KnowledgeBase => {
                        placeholder::ui(ui, route, page);
                        None
                    }
                }
            })
            .inner
    }
}

/// Framed card used by the home, settings and canvas list pages
fn card<R>(ui: &mut egui::Ui, colors: &ShellColors, add_contents: impl FnOnce(&mut egui::Ui) -> R) -> R {
    egui::Frame::none()
        .fill(colors.bg_secondary)
        .stroke(egui::Stroke::new(1.0, colors.border))
        .rounding(8.0)
        .inner_margin(egui::Margin::same(16.0))
        .show(ui, add_contents)
        .inner
}

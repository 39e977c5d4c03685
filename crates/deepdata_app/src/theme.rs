// SPDX-License-Identifier: MIT OR Apache-2.0
//! Dark and light shell themes.

use deepdata_core::prefs::THEME_KEY;
use deepdata_core::PrefStore;
use egui::{Color32, Rounding, Stroke, Visuals};
use std::rc::Rc;

/// Theme mode selectable in settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeMode {
    /// Dark theme (default)
    #[default]
    Dark,
    /// Light theme
    Light,
}

impl ThemeMode {
    /// All modes in menu order
    pub const ALL: [ThemeMode; 2] = [ThemeMode::Dark, ThemeMode::Light];

    /// Value stored in preferences
    pub fn code(self) -> &'static str {
        match self {
            ThemeMode::Dark => "dark",
            ThemeMode::Light => "light",
        }
    }

    /// Parse a stored value
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "dark" => Some(ThemeMode::Dark),
            "light" => Some(ThemeMode::Light),
            _ => None,
        }
    }

    /// Translation key of the mode's name
    pub fn label_key(self) -> &'static str {
        match self {
            ThemeMode::Dark => "themeDark",
            ThemeMode::Light => "themeLight",
        }
    }
}

/// Colors used by the shell's custom widgets
#[derive(Debug, Clone, PartialEq)]
pub struct ShellColors {
    /// Central area background
    pub bg_primary: Color32,
    /// Title bar, sidebar and footer background
    pub bg_secondary: Color32,
    /// Cards and inputs
    pub bg_tertiary: Color32,
    /// Primary text
    pub text_primary: Color32,
    /// Hints and secondary labels
    pub text_secondary: Color32,
    /// Accent for highlights
    pub accent: Color32,
    /// Translucent accent for active backgrounds
    pub accent_muted: Color32,
    /// Borders and separators
    pub border: Color32,
    /// Hover fill of the close button
    pub danger: Color32,
    /// Backdrop behind modal surfaces
    pub backdrop: Color32,
}

impl ShellColors {
    /// Dark palette
    pub fn dark() -> Self {
        Self {
            bg_primary: Color32::from_rgb(24, 24, 27),
            bg_secondary: Color32::from_rgb(32, 32, 36),
            bg_tertiary: Color32::from_rgb(44, 44, 50),
            text_primary: Color32::from_rgb(228, 228, 231),
            text_secondary: Color32::from_rgb(150, 150, 160),
            accent: Color32::from_rgb(99, 102, 241),
            accent_muted: Color32::from_rgba_unmultiplied(99, 102, 241, 60),
            border: Color32::from_rgb(58, 58, 64),
            danger: Color32::from_rgb(220, 38, 38),
            backdrop: Color32::from_rgba_unmultiplied(0, 0, 0, 140),
        }
    }

    /// Light palette
    pub fn light() -> Self {
        Self {
            bg_primary: Color32::from_rgb(250, 250, 250),
            bg_secondary: Color32::from_rgb(241, 241, 244),
            bg_tertiary: Color32::from_rgb(228, 228, 234),
            text_primary: Color32::from_rgb(24, 24, 27),
            text_secondary: Color32::from_rgb(100, 100, 112),
            accent: Color32::from_rgb(79, 70, 229),
            accent_muted: Color32::from_rgba_unmultiplied(79, 70, 229, 40),
            border: Color32::from_rgb(210, 210, 218),
            danger: Color32::from_rgb(220, 38, 38),
            backdrop: Color32::from_rgba_unmultiplied(0, 0, 0, 80),
        }
    }
}

/// Active theme
#[derive(Debug, Clone, PartialEq)]
pub struct ShellTheme {
    /// Selected mode
    pub mode: ThemeMode,
    /// Colors of the mode
    pub colors: ShellColors,
    /// Corner radius of windows and widgets
    pub rounding: f32,
}

impl Default for ShellTheme {
    fn default() -> Self {
        Self::new(ThemeMode::Dark)
    }
}

impl ShellTheme {
    /// Theme for `mode`
    pub fn new(mode: ThemeMode) -> Self {
        let colors = match mode {
            ThemeMode::Dark => ShellColors::dark(),
            ThemeMode::Light => ShellColors::light(),
        };
        Self {
            mode,
            colors,
            rounding: 6.0,
        }
    }

    /// Switch mode
    pub fn set_mode(&mut self, mode: ThemeMode) {
        *self = Self::new(mode);
    }

    /// egui visuals for this theme
    pub fn to_egui_visuals(&self) -> Visuals {
        let colors = &self.colors;
        let mut visuals = match self.mode {
            ThemeMode::Dark => Visuals::dark(),
            ThemeMode::Light => Visuals::light(),
        };

        visuals.window_fill = colors.bg_secondary;
        visuals.window_stroke = Stroke::new(1.0, colors.border);
        visuals.window_rounding = Rounding::same(self.rounding + 2.0);
        visuals.panel_fill = colors.bg_primary;

        for widget in [
            &mut visuals.widgets.noninteractive,
            &mut visuals.widgets.inactive,
            &mut visuals.widgets.hovered,
            &mut visuals.widgets.active,
            &mut visuals.widgets.open,
        ] {
            widget.rounding = Rounding::same(self.rounding);
        }

        visuals.widgets.noninteractive.bg_stroke = Stroke::new(1.0, colors.border);
        visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, colors.text_primary);
        visuals.widgets.inactive.bg_fill = colors.bg_tertiary;
        visuals.widgets.inactive.weak_bg_fill = colors.bg_tertiary;
        visuals.widgets.hovered.bg_stroke = Stroke::new(1.0, colors.accent);

        visuals.selection.bg_fill = colors.accent_muted;
        visuals.selection.stroke = Stroke::new(1.0, colors.accent);
        visuals.hyperlink_color = colors.accent;
        visuals.extreme_bg_color = colors.bg_primary;
        visuals.faint_bg_color = colors.bg_tertiary;

        visuals
    }

    /// Apply to an egui context
    pub fn apply(&self, ctx: &egui::Context) {
        ctx.set_visuals(self.to_egui_visuals());
        ctx.style_mut(|style| {
            style.spacing.item_spacing = egui::vec2(8.0, 6.0);
            style.spacing.button_padding = egui::vec2(10.0, 4.0);
        });
    }
}

/// Persists the theme mode under the `theme` key
pub struct ThemeStore {
    prefs: Rc<dyn PrefStore>,
}

impl ThemeStore {
    /// Store over `prefs`
    pub fn new(prefs: Rc<dyn PrefStore>) -> Self {
        Self { prefs }
    }

    /// Saved mode; dark when missing, unknown or unreadable
    pub fn load(&self) -> ThemeMode {
        match self.prefs.get(THEME_KEY) {
            Ok(Some(code)) => ThemeMode::from_code(&code).unwrap_or_default(),
            Ok(None) => ThemeMode::default(),
            Err(e) => {
                tracing::warn!("Failed to read theme preference: {}", e);
                ThemeMode::default()
            }
        }
    }

    /// Save the mode; failures are logged
    pub fn save(&self, mode: ThemeMode) {
        if let Err(e) = self.prefs.set(THEME_KEY, mode.code()) {
            tracing::warn!("Failed to save theme preference: {}", e);
        }
    }
}

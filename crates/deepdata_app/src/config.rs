// SPDX-License-Identifier: MIT OR Apache-2.0
//! Shell configuration loaded from `config.ron`.

use deepdata_core::filter::DEFAULT_PATTERNS;
use deepdata_core::route::Route;
use deepdata_core::DebugTimings;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid RON for [`ShellConfig`]
    #[error("Failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

/// Result type for configuration loading
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Window geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title
    pub title: String,
    /// Initial inner width (logical pixels)
    pub width: f64,
    /// Initial inner height (logical pixels)
    pub height: f64,
    /// Minimum inner width
    pub min_width: f64,
    /// Minimum inner height
    pub min_height: f64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "DeepData".to_string(),
            width: 1280.0,
            height: 800.0,
            min_width: 800.0,
            min_height: 600.0,
        }
    }
}

/// Command palette settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteConfig {
    /// Active style duration of the search button after a click
    pub feedback_ms: u64,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self { feedback_ms: 200 }
    }
}

/// Debug mode settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Delay before developer tools close after debug mode is turned off
    pub hide_delay_ms: u64,
    /// Delay before developer tools open at startup when debug mode is on
    pub startup_show_delay_ms: u64,
    /// Regular expressions of error messages to downgrade while debugging
    pub harmless_error_patterns: Vec<String>,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            hide_delay_ms: 1500,
            startup_show_delay_ms: 1000,
            harmless_error_patterns: DEFAULT_PATTERNS.iter().map(|p| (*p).to_string()).collect(),
        }
    }
}

impl DebugConfig {
    /// Delays as used by the debug flag store
    pub fn timings(&self) -> DebugTimings {
        DebugTimings {
            hide_delay: Duration::from_millis(self.hide_delay_ms),
            startup_show_delay: Duration::from_millis(self.startup_show_delay_ms),
        }
    }
}

/// Font settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    /// Font files tried in order for CJK glyphs; the first readable one wins
    pub cjk_candidates: Vec<PathBuf>,
}

impl Default for FontConfig {
    fn default() -> Self {
        let candidates: &[&str] = if cfg!(target_os = "windows") {
            &["C:\\Windows\\Fonts\\msyh.ttc", "C:\\Windows\\Fonts\\simhei.ttf"]
        } else if cfg!(target_os = "macos") {
            &["/System/Library/Fonts/PingFang.ttc", "/System/Library/Fonts/STHeiti Medium.ttc"]
        } else {
            &[
                "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
                "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
                "/usr/share/fonts/google-noto-cjk/NotoSansCJK-Regular.ttc",
                "/usr/share/fonts/truetype/wqy/wqy-microhei.ttc",
            ]
        };
        Self {
            cjk_candidates: candidates.iter().map(PathBuf::from).collect(),
        }
    }
}

/// Complete shell configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Window geometry
    pub window: WindowConfig,
    /// Route shown at startup
    pub initial_route: Route,
    /// Command palette settings
    pub palette: PaletteConfig,
    /// Debug mode settings
    pub debug: DebugConfig,
    /// Font settings
    pub fonts: FontConfig,
}

impl ShellConfig {
    /// File name inside the config directory
    pub const FILE_NAME: &'static str = "config.ron";

    /// Parse a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration text. Missing fields take their defaults.
    pub fn parse(content: &str) -> Result<Self> {
        Ok(ron::from_str(content)?)
    }

    /// Load `config.ron` from `dir`. A missing file yields the defaults and
    /// a broken one is reported and replaced by the defaults.
    pub fn load_or_default(dir: Option<&Path>) -> Self {
        let Some(dir) = dir else {
            return Self::default();
        };

        let path = dir.join(Self::FILE_NAME);
        match Self::load(&path) {
            Ok(config) => {
                tracing::info!("Loaded config from {}", path.display());
                config
            }
            Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No config at {}, using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                tracing::warn!("Ignoring config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Press feedback duration of the search button
    pub fn palette_feedback(&self) -> Duration {
        Duration::from_millis(self.palette.feedback_ms)
    }
}

/// Platform config directory (`com.DeepData.DeepData`)
pub fn config_dir() -> Option<PathBuf> {
    ProjectDirs::from("com", "DeepData", "DeepData").map(|dirs| dirs.config_dir().to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ShellConfig::default();
        assert_eq!(config.initial_route, Route::AiAssistant);
        assert_eq!(config.palette_feedback(), Duration::from_millis(200));
        assert_eq!(config.debug.timings(), DebugTimings::default());
        assert_eq!(config.debug.harmless_error_patterns.len(), DEFAULT_PATTERNS.len());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let config = ShellConfig::parse("(initial_route: Settings, debug: (hide_delay_ms: 500))").unwrap();

        assert_eq!(config.initial_route, Route::Settings);
        assert_eq!(config.debug.hide_delay_ms, 500);
        assert_eq!(config.debug.startup_show_delay_ms, 1000);
        assert_eq!(config.window, WindowConfig::default());
    }

    #[test]
    fn test_round_trip() {
        let mut config = ShellConfig::default();
        config.debug.harmless_error_patterns = vec!["(?i)noise".to_string()];
        config.window.width = 1024.0;

        let text = ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::default()).unwrap();
        assert_eq!(ShellConfig::parse(&text).unwrap(), config);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        assert!(matches!(ShellConfig::parse("(initial_route: 42"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_dir_uses_defaults() {
        let dir = std::env::temp_dir().join(format!("deepdata_config_missing_{}", std::process::id()));
        assert_eq!(ShellConfig::load_or_default(Some(&dir)), ShellConfig::default());
        assert_eq!(ShellConfig::load_or_default(None), ShellConfig::default());
    }
}

// SPDX-License-Identifier: MIT OR Apache-2.0
//! `DeepData` - desktop shell of the AI data assistant
//!
//! The shell provides:
//! - A frameless window with its own title bar and footer
//! - Sidebar navigation between the feature pages
//! - A command palette opened from the title bar or with Cmd/Ctrl+K
//! - Theme, language and debug mode settings persisted across runs
//! - Developer tools with a log console while debug mode is on
//!
//! ## Architecture
//!
//! Non-visual state lives in `deepdata_core`. This crate owns the window,
//! the wgpu renderer and the egui surfaces, and wires them to the core
//! through shared handles created once at startup.

mod app;
mod chrome;
mod config;
mod fonts;
mod pages;
mod palette;
mod panels;
mod theme;
mod window;

use app::ShellApp;
use config::ShellConfig;
use deepdata_core::{FilePrefStore, HarmlessErrorFilter, MemoryPrefStore, PrefStore};
use panels::console::{HarmlessEventFilter, TracingBridge};
use std::path::Path;
use std::rc::Rc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

const DEFAULT_LOG_FILTER: &str = "deepdata_app=debug,deepdata_core=debug,wgpu=warn,naga=warn";

fn open_prefs(dir: Option<&Path>) -> Rc<dyn PrefStore> {
    let Some(dir) = dir else {
        tracing::warn!("No config directory available, preferences will not persist");
        return Rc::new(MemoryPrefStore::new());
    };

    if let Err(e) = std::fs::create_dir_all(dir) {
        tracing::warn!("Failed to create {}: {}, preferences will not persist", dir.display(), e);
        return Rc::new(MemoryPrefStore::new());
    }

    let store = FilePrefStore::in_dir(dir);
    tracing::debug!("Preferences at {}", store.path().display());
    Rc::new(store)
}

fn main() {
    // The layers need the filter before the config is read; patterns are
    // replaced once it is.
    let filter = HarmlessErrorFilter::default();
    let (bridge_layer, tracing_rx) = TracingBridge::new(filter.clone());

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_filter(HarmlessEventFilter::new(filter.clone())))
        .with(bridge_layer)
        .init();

    tracing::info!("Starting DeepData v{}", env!("CARGO_PKG_VERSION"));

    let dir = config::config_dir();
    let config = ShellConfig::load_or_default(dir.as_deref());
    filter.set_patterns(&config.debug.harmless_error_patterns);

    let prefs = open_prefs(dir.as_deref());

    if let Err(e) = ShellApp::new(config, prefs, filter, Some(tracing_rx)).run() {
        tracing::error!("Shell crashed: {e}");
        std::process::exit(1);
    }
}

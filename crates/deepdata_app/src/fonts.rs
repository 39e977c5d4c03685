// SPDX-License-Identifier: MIT OR Apache-2.0
//! CJK fallback font.

use std::path::{Path, PathBuf};
use std::sync::Arc;

const CJK_FONT_NAME: &str = "cjk_fallback";

/// Read the first readable candidate
pub fn load_first(candidates: &[PathBuf]) -> Option<(&Path, Vec<u8>)> {
    candidates.iter().find_map(|path| match std::fs::read(path) {
        Ok(bytes) => Some((path.as_path(), bytes)),
        Err(e) => {
            tracing::trace!("CJK font candidate {} unavailable: {}", path.display(), e);
            None
        }
    })
}

/// Install a CJK fallback after egui's default fonts.
///
/// Returns `false` when no candidate could be read; Chinese labels then
/// render as replacement boxes.
pub fn install_cjk_fallback(ctx: &egui::Context, candidates: &[PathBuf]) -> bool {
    let Some((path, bytes)) = load_first(candidates) else {
        tracing::warn!("No CJK font found among {} candidates", candidates.len());
        return false;
    };

    ctx.set_fonts(cjk_definitions(bytes));

    tracing::info!("Using CJK font {}", path.display());
    true
}

/// egui's default fonts with `bytes` appended as last fallback of both families
fn cjk_definitions(bytes: Vec<u8>) -> egui::FontDefinitions {
    let mut fonts = egui::FontDefinitions::default();
    fonts
        .font_data
        .insert(CJK_FONT_NAME.to_owned(), Arc::new(egui::FontData::from_owned(bytes)));
    for family in [egui::FontFamily::Proportional, egui::FontFamily::Monospace] {
        fonts.families.entry(family).or_default().push(CJK_FONT_NAME.to_owned());
    }
    fonts
}

// SPDX-License-Identifier: MIT OR Apache-2.0
//! Frameless window chrome: title bar and footer.

use crate::theme::ShellColors;
use crate::window::{WindowCommand, WindowCommands};
use chrono::Datelike;
use deepdata_core::route::icons;
use deepdata_core::trigger::chord_hint;
use deepdata_core::{Translator, TriggerButton};
use egui::{Align, Color32, Layout, RichText, Sense, Stroke};
use std::time::Instant;

/// Title bar height (logical pixels)
pub const TITLE_BAR_HEIGHT: f32 = 36.0;

const FOOTER_HEIGHT: f32 = 24.0;

/// Draw the title bar: drag region, title, search trigger and window buttons
pub fn title_bar(
    ctx: &egui::Context,
    title: &str,
    tr: &Translator,
    colors: &ShellColors,
    trigger: &mut TriggerButton,
    now: Instant,
    commands: &mut WindowCommands,
) {
    egui::TopBottomPanel::top("title_bar")
        .exact_height(TITLE_BAR_HEIGHT)
        .frame(
            egui::Frame::none()
                .fill(colors.bg_secondary)
                .inner_margin(egui::Margin::symmetric(10.0, 0.0))
                .stroke(Stroke::new(1.0, colors.border)),
        )
        .show(ctx, |ui| {
            // Background drag region; widgets added afterwards sit on top of it.
            let drag = ui.interact(ui.max_rect(), egui::Id::new("title_bar_drag"), Sense::click_and_drag());
            if drag.double_clicked() {
                commands.push(WindowCommand::ToggleMaximize);
            } else if drag.drag_started() {
                commands.push(WindowCommand::StartDrag);
            }

            ui.horizontal_centered(|ui| {
                ui.label(RichText::new(title).strong().size(14.0).color(colors.text_primary));

                let search_width = 280.0_f32.min(ui.available_width() * 0.4);
                ui.add_space(((ui.available_width() - search_width) / 2.0 - 120.0).max(8.0));
                search_trigger(ui, tr, colors, trigger, now, search_width);

                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    window_buttons(ui, tr, colors, commands);
                });
            });
        });
}

fn search_trigger(
    ui: &mut egui::Ui,
    tr: &Translator,
    colors: &ShellColors,
    trigger: &mut TriggerButton,
    now: Instant,
    width: f32,
) {
    let active = trigger.is_active(now);
    let (fill, stroke) = if active {
        (colors.accent_muted, Stroke::new(1.0, colors.accent))
    } else {
        (colors.bg_tertiary, Stroke::new(1.0, colors.border))
    };

    let text = RichText::new(format!(
        "{}  {}    {}",
        icons::SEARCH,
        tr.t("searchPlaceholder"),
        chord_hint(cfg!(target_os = "macos"))
    ))
    .size(12.0)
    .color(colors.text_secondary);

    let response = ui
        .add(egui::Button::new(text).fill(fill).stroke(stroke).min_size(egui::vec2(width, 24.0)))
        .on_hover_text(tr.t("openCommandPalette"));

    if response.clicked() {
        trigger.press(now);
    }
}

fn window_buttons(ui: &mut egui::Ui, tr: &Translator, colors: &ShellColors, commands: &mut WindowCommands) {
    let size = egui::vec2(32.0, 24.0);

    // Right to left: close, maximize, minimize
    ui.scope(|ui| {
        let hovered = &mut ui.visuals_mut().widgets.hovered;
        hovered.weak_bg_fill = colors.danger;
        hovered.bg_fill = colors.danger;
        hovered.fg_stroke = Stroke::new(1.0, Color32::WHITE);

        if ui
            .add(egui::Button::new("🗙").frame(true).fill(Color32::TRANSPARENT).min_size(size))
            .on_hover_text(tr.t("close"))
            .clicked()
        {
            commands.push(WindowCommand::Close);
        }
    });

    if ui
        .add(egui::Button::new("🗖").fill(Color32::TRANSPARENT).min_size(size))
        .on_hover_text(tr.t("maximize"))
        .clicked()
    {
        commands.push(WindowCommand::ToggleMaximize);
    }

    if ui
        .add(egui::Button::new("🗕").fill(Color32::TRANSPARENT).min_size(size))
        .on_hover_text(tr.t("minimize"))
        .clicked()
    {
        commands.push(WindowCommand::Minimize);
    }
}

/// Footer text, e.g. `© 2026 DeepData AI 数据助手`
pub fn copyright(year: i32, tr: &Translator) -> String {
    format!("© {} DeepData {}", year, tr.t("aiDataAssistant"))
}

/// Draw the footer
pub fn footer(ctx: &egui::Context, tr: &Translator, colors: &ShellColors) {
    egui::TopBottomPanel::bottom("footer")
        .exact_height(FOOTER_HEIGHT)
        .frame(
            egui::Frame::none()
                .fill(colors.bg_secondary)
                .inner_margin(egui::Margin::symmetric(12.0, 0.0)),
        )
        .show(ctx, |ui| {
            ui.horizontal_centered(|ui| {
                let year = chrono::Local::now().year();
                ui.label(RichText::new(copyright(year, tr)).size(11.0).color(colors.text_secondary));
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    ui.label(
                        RichText::new("Powered by egui + wgpu")
                            .size(11.0)
                            .color(colors.text_secondary),
                    );
                });
            });
        });
}

// SPDX-License-Identifier: MIT OR Apache-2.0
//! Command palette modal.

use crate::theme::ShellColors;
use deepdata_core::trigger::TOGGLE_SHORTCUT;
use deepdata_core::{CommandEntry, CommandRegistry, PaletteHost, Translator};
use egui::{Key, Modifiers, Sense};

const WIDTH: f32 = 520.0;
const MAX_LIST_HEIGHT: f32 = 360.0;

/// Keys the palette reacts to, consumed before the filter field sees them
#[derive(Debug, Default, Clone, Copy)]
struct PaletteKeys {
    up: bool,
    down: bool,
    enter: bool,
    escape: bool,
}

impl PaletteKeys {
    fn consume(ctx: &egui::Context) -> Self {
        ctx.input_mut(|i| Self {
            up: i.consume_key(Modifiers::NONE, Key::ArrowUp),
            down: i.consume_key(Modifiers::NONE, Key::ArrowDown),
            enter: i.consume_key(Modifiers::NONE, Key::Enter),
            escape: i.consume_key(Modifiers::NONE, Key::Escape),
        })
    }
}

/// The palette surface: host state plus the registry it lists
pub struct PaletteView {
    host: PaletteHost,
    registry: CommandRegistry,
}

impl PaletteView {
    /// View over `host` listing `registry`
    pub fn new(host: PaletteHost, registry: CommandRegistry) -> Self {
        Self { host, registry }
    }

    /// Start following the bus and accepting the chord
    pub fn mount(&mut self) {
        self.host.mount();
    }

    /// Stop following the bus
    pub fn unmount(&mut self) {
        self.host.unmount();
    }

    /// Consume the toggle chord from this frame's input and toggle the bus.
    /// Does nothing while unmounted.
    pub fn handle_chord(&self, ctx: &egui::Context) -> bool {
        if !self.host.is_mounted() {
            return false;
        }
        if ctx.input_mut(|i| i.consume_shortcut(&TOGGLE_SHORTCUT)) {
            tracing::debug!("Command palette chord");
            return self.host.handle_chord();
        }
        false
    }

    /// Draw the palette if open
    pub fn ui(&mut self, ctx: &egui::Context, tr: &Translator, colors: &ShellColors) {
        self.host.sync();
        if !self.host.state.is_open() {
            return;
        }

        let just_opened = self.host.state.just_opened();
        let keys = PaletteKeys::consume(ctx);

        let screen = ctx.screen_rect();
        let backdrop = egui::Area::new(egui::Id::new("palette_backdrop"))
            .order(egui::Order::Middle)
            .fixed_pos(screen.min)
            .show(ctx, |ui| {
                ui.painter().rect_filled(screen, 0.0, colors.backdrop);
                ui.allocate_rect(screen, Sense::click())
            })
            .inner;

        let mut chosen: Option<&'static str> = None;
        let registry = &self.registry;
        let state = &mut self.host.state;

        egui::Window::new("command_palette")
            .id(egui::Id::new("command_palette"))
            .order(egui::Order::Foreground)
            .title_bar(false)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_TOP, [0.0, 96.0])
            .min_width(WIDTH)
            .max_width(WIDTH)
            .show(ctx, |ui| {
                let response = ui.add(
                    egui::TextEdit::singleline(&mut state.query)
                        .hint_text(tr.t("commandPalettePlaceholder"))
                        .desired_width(f32::INFINITY)
                        .margin(egui::vec2(8.0, 6.0)),
                );
                if state.take_focus_request() {
                    response.request_focus();
                }
                if response.changed() {
                    state.query_changed();
                }

                let matches = registry.filter(&state.query, |key| tr.t(key));
                let visible = matches.len();

                if keys.down {
                    state.select_next(visible);
                }
                if keys.up {
                    state.select_previous();
                }
                state.clamp(visible);
                let moved = keys.up || keys.down;

                if keys.enter {
                    chosen = matches.get(state.selected()).map(|entry| entry.id);
                }

                ui.separator();

                if matches.is_empty() {
                    ui.add_space(12.0);
                    ui.vertical_centered(|ui| {
                        ui.label(egui::RichText::new(tr.t("noResultsFound")).color(colors.text_secondary));
                    });
                    ui.add_space(12.0);
                    return;
                }

                egui::ScrollArea::vertical().max_height(MAX_LIST_HEIGHT).show(ui, |ui| {
                    let mut index = 0;
                    for group in &matches.groups {
                        ui.add_space(4.0);
                        ui.label(
                            egui::RichText::new(tr.t(group.heading_key))
                                .size(11.0)
                                .color(colors.text_secondary),
                        );

                        for entry in &group.entries {
                            let selected = index == state.selected();
                            let response = ui.add(PaletteItem {
                                entry,
                                label: tr.t(entry.label_key),
                                selected,
                            });

                            if response.clicked() {
                                chosen = Some(entry.id);
                            }
                            if response.hovered() && ui.input(|i| i.pointer.is_moving()) {
                                state.select(index);
                            }
                            if selected && moved {
                                response.scroll_to_me(None);
                            }
                            index += 1;
                        }
                    }
                });
            });

        if let Some(entry) = chosen.and_then(|id| self.registry.get(id)) {
            self.host.run(entry);
        } else if keys.escape {
            tracing::debug!("Command palette dismissed with Escape");
            self.host.dismiss();
        } else if backdrop.clicked() && !just_opened {
            tracing::debug!("Command palette dismissed by outside click");
            self.host.dismiss();
        }
    }
}

/// One palette row: icon, label and shortcut hint
struct PaletteItem<'a> {
    entry: &'a CommandEntry,
    label: &'a str,
    selected: bool,
}

impl egui::Widget for PaletteItem<'_> {
    fn ui(self, ui: &mut egui::Ui) -> egui::Response {
        let desired_size = egui::vec2(ui.available_width(), 32.0);
        let (rect, response) = ui.allocate_exact_size(desired_size, Sense::click());

        if ui.is_rect_visible(rect) {
            let visuals = ui.style().interact(&response);

            let bg_color = if self.selected {
                ui.style().visuals.selection.bg_fill
            } else if response.hovered() {
                ui.style().visuals.widgets.hovered.bg_fill
            } else {
                egui::Color32::TRANSPARENT
            };
            ui.painter().rect_filled(rect, 4.0, bg_color);

            let text_color = if self.selected {
                ui.style().visuals.selection.stroke.color
            } else {
                visuals.text_color()
            };
            let hint_color = ui.style().visuals.weak_text_color();

            ui.painter().text(
                egui::pos2(rect.left() + 10.0, rect.center().y),
                egui::Align2::LEFT_CENTER,
                self.entry.icon,
                egui::FontId::proportional(14.0),
                text_color,
            );

            ui.painter().text(
                egui::pos2(rect.left() + 36.0, rect.center().y),
                egui::Align2::LEFT_CENTER,
                self.label,
                egui::FontId::proportional(13.0),
                text_color,
            );

            if let Some(shortcut) = self.entry.shortcut {
                ui.painter().text(
                    egui::pos2(rect.right() - 10.0, rect.center().y),
                    egui::Align2::RIGHT_CENTER,
                    shortcut,
                    egui::FontId::monospace(11.0),
                    hint_color,
                );
            }
        }

        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deepdata_core::{Language, Navigator, PaletteBus, Route};

    fn key_event(key: Key, modifiers: Modifiers) -> egui::Event {
        egui::Event::Key {
            key,
            physical_key: None,
            pressed: true,
            repeat: false,
            modifiers,
        }
    }

    fn frame(ctx: &egui::Context, view: &mut PaletteView, events: Vec<egui::Event>) {
        let input = egui::RawInput {
            events,
            ..Default::default()
        };
        let tr = Translator::new(Language::En);
        let colors = ShellColors::dark();
        let _ = ctx.run(input, |ctx| {
            view.handle_chord(ctx);
            view.ui(ctx, &tr, &colors);
        });
    }

    fn mounted_view(bus: &PaletteBus, navigator: &Navigator) -> PaletteView {
        let mut view = PaletteView::new(PaletteHost::new(bus.clone()), CommandRegistry::build(navigator));
        view.mount();
        view
    }

    #[test]
    fn test_chord_toggles_only_while_mounted() {
        let ctx = egui::Context::default();
        let bus = PaletteBus::new();
        let navigator = Navigator::new(Route::Home);
        let mut view = mounted_view(&bus, &navigator);

        frame(&ctx, &mut view, vec![key_event(Key::K, Modifiers::COMMAND)]);
        assert!(bus.is_open());

        view.unmount();
        frame(&ctx, &mut view, vec![key_event(Key::K, Modifiers::COMMAND)]);
        assert!(bus.is_open());
    }

    #[test]
    fn test_escape_closes() {
        let ctx = egui::Context::default();
        let bus = PaletteBus::new();
        let navigator = Navigator::new(Route::Home);
        let mut view = mounted_view(&bus, &navigator);

        bus.set_open(true);
        frame(&ctx, &mut view, Vec::new());
        frame(&ctx, &mut view, vec![key_event(Key::Escape, Modifiers::NONE)]);
        assert!(!bus.is_open());
    }

    #[test]
    fn test_enter_runs_selected_entry_after_closing() {
        let ctx = egui::Context::default();
        let bus = PaletteBus::new();
        let navigator = Navigator::new(Route::Home);
        let mut view = mounted_view(&bus, &navigator);

        bus.set_open(true);
        frame(&ctx, &mut view, Vec::new());
        frame(
            &ctx,
            &mut view,
            vec![
                key_event(Key::ArrowDown, Modifiers::NONE),
                key_event(Key::Enter, Modifiers::NONE),
            ],
        );

        assert!(!bus.is_open());
        assert_eq!(navigator.current(), Route::DataProcess);
    }
}

// SPDX-License-Identifier: MIT OR Apache-2.0
//! Developer tools window: log console and egui inspection.

use super::ConsolePanel;
use deepdata_core::{DevToolsHost, Translator};
use std::cell::Cell;
use std::rc::Rc;

/// Visibility of the developer tools, shared with the debug flag store
#[derive(Debug, Default)]
pub struct DevTools {
    visible: Cell<bool>,
    focus_requested: Cell<bool>,
}

impl DevTools {
    /// Hidden tools
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the window is shown
    pub fn is_visible(&self) -> bool {
        self.visible.get()
    }

    fn take_focus_request(&self) -> bool {
        self.focus_requested.replace(false)
    }
}

impl DevToolsHost for DevTools {
    fn show_dev_tools(&self) {
        if self.visible.replace(true) {
            tracing::debug!("Developer tools already open, refocusing");
        } else {
            tracing::debug!("Developer tools opened");
        }
        self.focus_requested.set(true);
    }

    fn hide_dev_tools(&self) {
        if self.visible.replace(false) {
            tracing::debug!("Developer tools closed");
        }
        self.focus_requested.set(false);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Console,
    Inspection,
    Memory,
}

impl Tab {
    const ALL: [Tab; 3] = [Tab::Console, Tab::Inspection, Tab::Memory];

    fn name(self) -> &'static str {
        match self {
            Tab::Console => "Console",
            Tab::Inspection => "Inspection",
            Tab::Memory => "Memory",
        }
    }
}

/// Floating developer tools window
pub struct DevToolsWindow {
    state: Rc<DevTools>,
    console: ConsolePanel,
    tab: Tab,
}

impl DevToolsWindow {
    const ID: &'static str = "dev_tools";

    /// Window driven by `state`, showing `console`
    pub fn new(state: Rc<DevTools>, console: ConsolePanel) -> Self {
        Self {
            state,
            console,
            tab: Tab::Console,
        }
    }

    /// Draw the window if visible. Log events are drained either way.
    pub fn ui(&mut self, ctx: &egui::Context, tr: &Translator) {
        self.console.poll_tracing_events();

        if !self.state.is_visible() {
            return;
        }

        let id = egui::Id::new(Self::ID);
        if self.state.take_focus_request() {
            ctx.move_to_top(egui::LayerId::new(egui::Order::Middle, id));
        }

        let mut open = true;
        egui::Window::new(tr.t("devTools"))
            .id(id)
            .open(&mut open)
            .default_size([720.0, 420.0])
            .min_width(420.0)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    for tab in Tab::ALL {
                        ui.selectable_value(&mut self.tab, tab, tab.name());
                    }
                });
                ui.separator();

                match self.tab {
                    Tab::Console => self.console.ui(ui),
                    Tab::Inspection => {
                        egui::ScrollArea::vertical().show(ui, |ui| ctx.inspection_ui(ui));
                    }
                    Tab::Memory => {
                        egui::ScrollArea::vertical().show(ui, |ui| ctx.memory_ui(ui));
                    }
                }
            });

        if !open {
            self.state.hide_dev_tools();
        }
    }
}

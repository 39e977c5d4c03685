// SPDX-License-Identifier: MIT OR Apache-2.0
//! Navigation sidebar.

use crate::theme::ShellColors;
use deepdata_core::{NavItem, Navigator, Route, Translator};
use std::collections::HashSet;

/// Sidebar tree with per-item expanded flags
pub struct Sidebar {
    items: Vec<NavItem>,
    expanded: HashSet<Route>,
}

impl Sidebar {
    /// Sidebar over `items`. Items with children start expanded.
    pub fn new(items: Vec<NavItem>) -> Self {
        let mut expanded = HashSet::new();
        collect_parents(&items, &mut expanded);
        Self { items, expanded }
    }

    /// Whether `route`'s children are shown
    pub fn is_expanded(&self, route: Route) -> bool {
        self.expanded.contains(&route)
    }

    /// Flip `route`'s expanded flag
    pub fn toggle_expanded(&mut self, route: Route) {
        if !self.expanded.remove(&route) {
            self.expanded.insert(route);
        }
    }

    /// Draw the header and the tree. The entry matching the navigator's
    /// route is highlighted.
    pub fn ui(&mut self, ui: &mut egui::Ui, navigator: &Navigator, tr: &Translator, colors: &ShellColors) {
        header_ui(ui, tr, colors);
        ui.separator();
        ui.add_space(8.0);
        let items = std::mem::take(&mut self.items);
        for item in &items {
            self.item_ui(ui, item, 0, navigator, tr, colors);
        }
        self.items = items;
    }

    fn item_ui(
        &mut self,
        ui: &mut egui::Ui,
        item: &NavItem,
        depth: usize,
        navigator: &Navigator,
        tr: &Translator,
        colors: &ShellColors,
    ) {
        let active = navigator.is_active(item.route);
        let has_children = !item.children.is_empty();

        ui.horizontal(|ui| {
            ui.add_space(depth as f32 * 14.0);

            let text = egui::RichText::new(format!("{}  {}", item.icon, tr.t(item.label_key))).size(14.0);
            let text = if active {
                text.color(colors.accent).strong()
            } else {
                text.color(colors.text_primary)
            };

            let width = ui.available_width() - if has_children { 24.0 } else { 0.0 };
            let response = ui.add_sized([width.max(0.0), 32.0], egui::SelectableLabel::new(active, text));
            if response.clicked() {
                navigator.navigate(item.route);
            }

            if has_children {
                let arrow = if self.is_expanded(item.route) { "⏷" } else { "⏵" };
                if ui.small_button(arrow).clicked() {
                    self.toggle_expanded(item.route);
                }
            }
        });

        if has_children && self.is_expanded(item.route) {
            for child in &item.children {
                self.item_ui(ui, child, depth + 1, navigator, tr, colors);
            }
        }
    }
}

fn header_ui(ui: &mut egui::Ui, tr: &Translator, colors: &ShellColors) {
    ui.add_space(12.0);
    ui.horizontal(|ui| {
        ui.add_space(8.0);
        ui.vertical(|ui| {
            ui.label(egui::RichText::new(tr.t("appName")).size(20.0).strong().color(colors.accent));
            ui.label(egui::RichText::new(tr.t("aiDataAssistant")).size(12.0).color(colors.text_secondary));
        });
    });
    ui.add_space(8.0);
}

fn collect_parents(items: &[NavItem], out: &mut HashSet<Route>) {
    for item in items {
        if !item.children.is_empty() {
            out.insert(item.route);
            collect_parents(&item.children, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parents_start_expanded() {
        let tree = vec![
            NavItem::leaf(Route::Home),
            NavItem::leaf(Route::DataCollect).with_children(vec![NavItem::leaf(Route::DataProcess)]),
        ];
        let sidebar = Sidebar::new(tree);

        assert!(sidebar.is_expanded(Route::DataCollect));
        assert!(!sidebar.is_expanded(Route::Home));
    }

    #[test]
    fn test_toggle_expanded() {
        let mut sidebar = Sidebar::new(NavItem::tree());
        sidebar.toggle_expanded(Route::Settings);
        assert!(sidebar.is_expanded(Route::Settings));
        sidebar.toggle_expanded(Route::Settings);
        assert!(!sidebar.is_expanded(Route::Settings));
    }

    fn collect_text(shape: &egui::Shape, out: &mut Vec<String>) {
        match shape {
            egui::Shape::Text(text) => out.push(text.galley.text().to_owned()),
            egui::Shape::Vec(shapes) => shapes.iter().for_each(|shape| collect_text(shape, out)),
            _ => {}
        }
    }

    #[test]
    fn test_header_draws_product_name() {
        let ctx = egui::Context::default();
        let tr = Translator::new(deepdata_core::Language::En);
        let colors = ShellColors::dark();
        let navigator = Navigator::new(Route::Home);
        let mut sidebar = Sidebar::new(NavItem::tree());

        let output = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| sidebar.ui(ui, &navigator, &tr, &colors));
        });

        let mut texts = Vec::new();
        for clipped in &output.shapes {
            collect_text(&clipped.shape, &mut texts);
        }
        let header = texts.iter().position(|t| t == "DeepData").unwrap();
        let subtitle = texts.iter().position(|t| t == "AI Data Assistant").unwrap();
        assert!(header < subtitle);
        assert!(texts.iter().any(|t| t.ends_with(tr.t("settings"))));
    }
}

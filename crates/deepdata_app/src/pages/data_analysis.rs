// SPDX-License-Identifier: MIT OR Apache-2.0
//! Data analysis page: a canvas of chart, text, data and image elements.
//!
//! Drawing collects [`CanvasAction`]s; they are applied to the canvas once
//! the frame's widgets are done with it.

use super::PageContext;
use crate::theme::ShellColors;
use deepdata_core::{Canvas, CanvasElement, CanvasLayout, CanvasView, ChartType, ElementKind, Translator};
use egui::{Align2, FontId, RichText, Sense, Stroke, Vec2};

const GRID_SPACING: f32 = 20.0;
const HEADER_HEIGHT: f32 = 32.0;
const CANVAS_MARGIN: f32 = 50.0;

/// A change requested by the page's widgets
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) enum CanvasAction {
    /// Add an element
    Add(ElementKind),
    /// Switch layout
    Layout(CanvasLayout),
    /// Switch presentation
    View(CanvasView),
    /// Show or hide the background grid
    ToggleGrid,
    /// Change a chart element's type
    Chart(u64, ChartType),
    /// Drag an element
    Move(u64, Vec2),
    /// Remove an element
    Remove(u64),
}

/// Page state
#[derive(Debug, Default)]
pub(super) struct DataAnalysisPage {
    canvas: Canvas,
}

impl DataAnalysisPage {
    /// Page with an empty canvas
    pub(super) fn new() -> Self {
        Self::default()
    }

    /// Apply one widget request
    pub(super) fn apply(&mut self, action: CanvasAction) {
        match action {
            CanvasAction::Add(kind) => {
                self.canvas.add(kind);
            }
            CanvasAction::Layout(layout) => self.canvas.change_layout(layout),
            CanvasAction::View(view) => self.canvas.set_view(view),
            CanvasAction::ToggleGrid => self.canvas.toggle_grid(),
            CanvasAction::Chart(id, chart) => {
                self.canvas.set_chart_type(id, chart);
            }
            CanvasAction::Move(id, delta) => {
                self.canvas.move_by(id, delta);
            }
            CanvasAction::Remove(id) => {
                self.canvas.remove(id);
            }
        }
    }

    pub(super) fn ui(&mut self, ui: &mut egui::Ui, page: &PageContext<'_>) {
        let tr = page.tr;
        let colors = page.colors;
        let mut actions = Vec::new();

        egui::TopBottomPanel::top("canvas_toolbar")
            .frame(egui::Frame::none().inner_margin(egui::Margin::symmetric(0.0, 8.0)))
            .show_inside(ui, |ui| toolbar_ui(ui, &self.canvas, tr, &mut actions));

        egui::TopBottomPanel::bottom("canvas_status")
            .frame(egui::Frame::none().inner_margin(egui::Margin::symmetric(0.0, 6.0)))
            .show_inside(ui, |ui| status_ui(ui, &self.canvas, tr, colors, &mut actions));

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show_inside(ui, |ui| {
                egui::ScrollArea::both().auto_shrink([false, false]).show(ui, |ui| {
                    if self.canvas.is_empty() {
                        empty_ui(ui, tr, colors, &mut actions);
                    } else {
                        match self.canvas.view() {
                            CanvasView::Grid => surface_ui(ui, &self.canvas, tr, colors, &mut actions),
                            CanvasView::List => list_ui(ui, &self.canvas, tr, colors, &mut actions),
                        }
                    }
                });
            });

        for action in actions {
            self.apply(action);
        }
    }
}

fn toolbar_ui(ui: &mut egui::Ui, canvas: &Canvas, tr: &Translator, actions: &mut Vec<CanvasAction>) {
    ui.horizontal(|ui| {
        for kind in ElementKind::ALL {
            if ui.button(RichText::new(kind.icon()).size(16.0)).on_hover_text(tr.t(kind.add_key())).clicked() {
                actions.push(CanvasAction::Add(kind));
            }
        }

        ui.separator();

        for layout in CanvasLayout::ALL {
            let selected = canvas.layout() == layout;
            if ui
                .selectable_label(selected, RichText::new(layout.icon()).size(16.0))
                .on_hover_text(tr.t(layout.label_key()))
                .clicked()
            {
                actions.push(CanvasAction::Layout(layout));
            }
        }

        ui.separator();

        for view in [CanvasView::Grid, CanvasView::List] {
            if ui.selectable_label(canvas.view() == view, tr.t(view.label_key())).clicked() && canvas.view() != view {
                actions.push(CanvasAction::View(view));
            }
        }

        ui.separator();

        egui::ComboBox::from_id_salt("canvas_layout")
            .selected_text(tr.t(canvas.layout().label_key()))
            .show_ui(ui, |ui| {
                for layout in CanvasLayout::ALL {
                    if ui.selectable_label(canvas.layout() == layout, tr.t(layout.label_key())).clicked() {
                        actions.push(CanvasAction::Layout(layout));
                    }
                }
            })
            .response
            .on_hover_text(tr.t("selectLayout"));
    });
}

fn status_ui(
    ui: &mut egui::Ui,
    canvas: &Canvas,
    tr: &Translator,
    colors: &ShellColors,
    actions: &mut Vec<CanvasAction>,
) {
    ui.horizontal(|ui| {
        let grid_label = if canvas.grid_visible() { tr.t("hideGrid") } else { tr.t("showGrid") };
        if ui
            .selectable_label(canvas.grid_visible(), RichText::new(grid_label).size(12.0))
            .clicked()
        {
            actions.push(CanvasAction::ToggleGrid);
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.label(
                RichText::new(status_text(canvas, tr))
                    .size(12.0)
                    .color(colors.text_secondary),
            );
        });
    });
}

/// Element count and presentation, as shown in the status bar
fn status_text(canvas: &Canvas, tr: &Translator) -> String {
    format!("{} {} | {}", canvas.len(), tr.t("elements"), tr.t(canvas.view().label_key()))
}

fn empty_ui(ui: &mut egui::Ui, tr: &Translator, colors: &ShellColors, actions: &mut Vec<CanvasAction>) {
    ui.add_space(64.0);
    ui.vertical_centered(|ui| {
        ui.label(RichText::new(ElementKind::Chart.icon()).size(56.0).color(colors.accent));
        ui.add_space(12.0);
        ui.label(RichText::new(tr.t("canvas")).size(28.0).strong());
        ui.label(RichText::new(tr.t("dataCreationSpace")).color(colors.text_secondary));
        ui.add_space(24.0);
        ui.label(RichText::new(tr.t("dragAndDrop")).size(12.0).color(colors.text_secondary));
        ui.add_space(8.0);
        if ui.button(format!("+  {}", tr.t("addVisualization"))).clicked() {
            actions.push(CanvasAction::Add(ElementKind::Chart));
        }
    });
}

fn surface_ui(
    ui: &mut egui::Ui,
    canvas: &Canvas,
    tr: &Translator,
    colors: &ShellColors,
    actions: &mut Vec<CanvasAction>,
) {
    let size = (canvas.extent() + Vec2::splat(CANVAS_MARGIN)).max(ui.clip_rect().size());
    let (surface, painter) = ui.allocate_painter(size, Sense::hover());
    let origin = surface.rect.min.to_vec2();

    if canvas.grid_visible() {
        let stroke = Stroke::new(1.0, colors.border.gamma_multiply(0.4));
        let rect = surface.rect;
        let mut x = rect.left();
        while x <= rect.right() {
            painter.line_segment([egui::pos2(x, rect.top()), egui::pos2(x, rect.bottom())], stroke);
            x += GRID_SPACING;
        }
        let mut y = rect.top();
        while y <= rect.bottom() {
            painter.line_segment([egui::pos2(rect.left(), y), egui::pos2(rect.right(), y)], stroke);
            y += GRID_SPACING;
        }
    }

    for element in canvas.elements() {
        element_ui(ui, &painter, element, origin, canvas.is_draggable(), tr, colors, actions);
    }
}

fn element_ui(
    ui: &mut egui::Ui,
    painter: &egui::Painter,
    element: &CanvasElement,
    origin: Vec2,
    draggable: bool,
    tr: &Translator,
    colors: &ShellColors,
    actions: &mut Vec<CanvasAction>,
) {
    let rect = element.rect().translate(origin);
    let header = egui::Rect::from_min_size(rect.min, egui::vec2(rect.width(), HEADER_HEIGHT));
    let body = egui::Rect::from_min_max(egui::pos2(rect.left(), header.bottom()), rect.max);

    let sense = if draggable { Sense::drag() } else { Sense::hover() };
    let grip = ui.interact(header, ui.id().with(("canvas_element", element.id)), sense);
    if grip.dragged() {
        actions.push(CanvasAction::Move(element.id, grip.drag_delta()));
    }
    let outline = if grip.dragged() { colors.accent } else { colors.border };

    painter.rect(rect, 6.0, colors.bg_secondary, Stroke::new(1.0, outline));
    painter.line_segment([header.left_bottom(), header.right_bottom()], Stroke::new(1.0, colors.border));
    painter.text(
        header.left_center() + egui::vec2(10.0, 0.0),
        Align2::LEFT_CENTER,
        format!("⠿  {}", tr.t(element.kind.title_key())),
        FontId::proportional(13.0),
        colors.text_primary,
    );

    let mut button_right = header.right() - 6.0;
    let mut header_button = |text: &str, selected: bool, hover: &str| {
        let button_rect = egui::Rect::from_center_size(
            egui::pos2(button_right - 12.0, header.center().y),
            egui::vec2(24.0, 22.0),
        );
        button_right -= 26.0;
        ui.put(button_rect, egui::SelectableLabel::new(selected, text))
            .on_hover_text(hover)
            .clicked()
    };

    if header_button("✖", false, tr.t("removeElement")) {
        actions.push(CanvasAction::Remove(element.id));
    }
    if let Some(current) = element.chart {
        for chart in ChartType::ALL.into_iter().rev() {
            if header_button(chart.icon(), current == chart, tr.t(chart.label_key())) && current != chart {
                actions.push(CanvasAction::Chart(element.id, chart));
            }
        }
    }

    let icon = element.chart.map_or_else(|| element.kind.icon(), ChartType::icon);
    painter.text(
        body.center() - egui::vec2(0.0, 10.0),
        Align2::CENTER_CENTER,
        icon,
        FontId::proportional(40.0),
        colors.accent.gamma_multiply(0.6),
    );
    painter.text(
        body.center() + egui::vec2(0.0, 30.0),
        Align2::CENTER_CENTER,
        tr.t(element.kind.hint_key()),
        FontId::proportional(11.0),
        colors.text_secondary,
    );
}

fn list_ui(
    ui: &mut egui::Ui,
    canvas: &Canvas,
    tr: &Translator,
    colors: &ShellColors,
    actions: &mut Vec<CanvasAction>,
) {
    for element in canvas.elements() {
        super::card(ui, colors, |ui| {
            ui.set_width(ui.available_width());
            ui.horizontal(|ui| {
                ui.label(RichText::new(element.kind.icon()).size(20.0));
                ui.vertical(|ui| {
                    ui.label(RichText::new(tr.t(element.kind.title_key())).strong());
                    ui.label(RichText::new(tr.t(element.kind.kind_key())).size(11.0).color(colors.text_secondary));
                });

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button(tr.t("removeElement")).clicked() {
                        actions.push(CanvasAction::Remove(element.id));
                    }
                    if let Some(current) = element.chart {
                        egui::ComboBox::from_id_salt(("canvas_chart", element.id))
                            .selected_text(tr.t(current.label_key()))
                            .show_ui(ui, |ui| {
                                for chart in ChartType::ALL {
                                    if ui.selectable_label(current == chart, tr.t(chart.label_key())).clicked()
                                        && current != chart
                                    {
                                        actions.push(CanvasAction::Chart(element.id, chart));
                                    }
                                }
                            });
                    }
                });
            });
        });
        ui.add_space(8.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::ThemeMode;
    use deepdata_core::{Language, Navigator, Route};

    fn collect_text(shape: &egui::Shape, out: &mut Vec<String>) {
        match shape {
            egui::Shape::Text(text) => out.push(text.galley.text().to_owned()),
            egui::Shape::Vec(shapes) => shapes.iter().for_each(|shape| collect_text(shape, out)),
            _ => {}
        }
    }

    fn frame_texts(page: &mut DataAnalysisPage) -> Vec<String> {
        let ctx = egui::Context::default();
        let tr = Translator::new(Language::En);
        let colors = ShellColors::dark();
        let navigator = Navigator::new(Route::DataAnalysis);
        let context = PageContext {
            tr: &tr,
            colors: &colors,
            navigator: &navigator,
            theme: ThemeMode::Dark,
        };

        let output = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| page.ui(ui, &context));
        });

        let mut texts = Vec::new();
        for clipped in &output.shapes {
            collect_text(&clipped.shape, &mut texts);
        }
        texts
    }

    #[test]
    fn test_actions_drive_canvas() {
        let mut page = DataAnalysisPage::new();
        page.apply(CanvasAction::Add(ElementKind::Chart));
        page.apply(CanvasAction::Add(ElementKind::Data));
        let chart = page.canvas.elements()[0].id;

        page.apply(CanvasAction::Chart(chart, ChartType::Line));
        page.apply(CanvasAction::Layout(CanvasLayout::Rows));
        page.apply(CanvasAction::Move(chart, egui::vec2(10.0, 0.0)));
        assert_eq!(page.canvas.get(chart).unwrap().position, egui::pos2(50.0, 50.0));

        page.apply(CanvasAction::Layout(CanvasLayout::Free));
        page.apply(CanvasAction::Move(chart, egui::vec2(10.0, 0.0)));
        assert_eq!(page.canvas.get(chart).unwrap().position, egui::pos2(60.0, 50.0));
        assert_eq!(page.canvas.get(chart).unwrap().chart, Some(ChartType::Line));

        page.apply(CanvasAction::ToggleGrid);
        page.apply(CanvasAction::View(CanvasView::List));
        page.apply(CanvasAction::Remove(chart));
        assert!(!page.canvas.grid_visible());
        assert_eq!(page.canvas.view(), CanvasView::List);
        assert_eq!(page.canvas.len(), 1);
    }

    #[test]
    fn test_status_text() {
        let tr = Translator::new(Language::En);
        let mut canvas = Canvas::new();
        canvas.add(ElementKind::Text);
        canvas.add(ElementKind::Image);
        assert_eq!(status_text(&canvas, &tr), "2 elements | Grid view");

        canvas.set_view(CanvasView::List);
        assert_eq!(status_text(&canvas, &tr), "2 elements | List view");
    }

    #[test]
    fn test_empty_canvas_offers_first_visualization() {
        let mut page = DataAnalysisPage::new();
        let texts = frame_texts(&mut page);

        assert!(texts.iter().any(|t| t == "Canvas"));
        assert!(texts.iter().any(|t| t == "Create interactive data stories"));
        assert!(texts.iter().any(|t| t.ends_with("Add Visualization")));
        assert!(texts.iter().any(|t| t == "0 elements | Grid view"));
    }

    #[test]
    fn test_surface_and_list_show_elements() {
        let mut page = DataAnalysisPage::new();
        page.apply(CanvasAction::Add(ElementKind::Chart));
        page.apply(CanvasAction::Add(ElementKind::Data));

        let texts = frame_texts(&mut page);
        assert!(texts.iter().any(|t| t.ends_with("Visualization")));
        assert!(texts.iter().any(|t| t == "Click to import data"));
        assert!(texts.iter().any(|t| t == "2 elements | Grid view"));

        page.apply(CanvasAction::View(CanvasView::List));
        let texts = frame_texts(&mut page);
        assert!(texts.iter().any(|t| t == "Chart element"));
        assert!(texts.iter().any(|t| t == "Data element"));
    }
}

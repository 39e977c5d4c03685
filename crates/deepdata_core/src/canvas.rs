// SPDX-License-Identifier: MIT OR Apache-2.0
//! Element canvas of the data analysis page.
//!
//! A [`Canvas`] holds placed elements in insertion order. Switching to one of
//! the arranged layouts repositions every element once; elements added later
//! keep the default placement until the next switch. Only the free layout lets
//! elements be moved by hand.

use egui::{pos2, vec2, Pos2, Rect, Vec2};

/// Where new elements are placed
pub const DEFAULT_POSITION: Pos2 = pos2(100.0, 100.0);
/// Size of new elements
pub const DEFAULT_SIZE: Vec2 = vec2(300.0, 200.0);

const LAYOUT_ORIGIN: Pos2 = pos2(50.0, 50.0);
const LAYOUT_GAP: f32 = 20.0;
const GRID_COLUMNS: usize = 2;
const ROWS_WIDTH: f32 = 800.0;
const COLUMNS_HEIGHT: f32 = 600.0;

/// What an element shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// Chart visualization
    Chart,
    /// Free text
    Text,
    /// Data table
    Data,
    /// Image
    Image,
}

impl ElementKind {
    /// All kinds, in toolbar order
    pub const ALL: [ElementKind; 4] = [ElementKind::Chart, ElementKind::Text, ElementKind::Data, ElementKind::Image];

    /// Translation key of the element title
    pub fn title_key(self) -> &'static str {
        match self {
            ElementKind::Chart => "visualization",
            ElementKind::Text => "text",
            ElementKind::Data => "data",
            ElementKind::Image => "image",
        }
    }

    /// Translation key of the toolbar action adding this kind
    pub fn add_key(self) -> &'static str {
        match self {
            ElementKind::Chart => "addVisualization",
            ElementKind::Text => "addText",
            ElementKind::Data => "addData",
            ElementKind::Image => "addImage",
        }
    }

    /// Translation key of the kind's description in the list view
    pub fn kind_key(self) -> &'static str {
        match self {
            ElementKind::Chart => "chartElement",
            ElementKind::Text => "textElement",
            ElementKind::Data => "dataElement",
            ElementKind::Image => "imageElement",
        }
    }

    /// Translation key of the hint shown inside an element's body
    pub fn hint_key(self) -> &'static str {
        match self {
            ElementKind::Chart => "dragAndDrop",
            ElementKind::Text => "textPlaceholder",
            ElementKind::Data => "importDataHint",
            ElementKind::Image => "addImageHint",
        }
    }

    /// Icon glyph
    pub fn icon(self) -> &'static str {
        match self {
            ElementKind::Chart => "\u{1f4ca}",
            ElementKind::Text => "\u{1f4dd}",
            ElementKind::Data => "\u{1f4cb}",
            ElementKind::Image => "\u{1f5bc}",
        }
    }
}

/// Chart rendering of a chart element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChartType {
    /// Bars
    #[default]
    Bar,
    /// Line
    Line,
    /// Pie
    Pie,
}

impl ChartType {
    /// All chart types
    pub const ALL: [ChartType; 3] = [ChartType::Bar, ChartType::Line, ChartType::Pie];

    /// Translation key of the name
    pub fn label_key(self) -> &'static str {
        match self {
            ChartType::Bar => "barChart",
            ChartType::Line => "lineChart",
            ChartType::Pie => "pieChart",
        }
    }

    /// Icon glyph
    pub fn icon(self) -> &'static str {
        match self {
            ChartType::Bar => "\u{1f4ca}",
            ChartType::Line => "\u{1f4c8}",
            ChartType::Pie => "\u{25d4}",
        }
    }
}

/// Arrangement of the elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CanvasLayout {
    /// Two columns, rows as needed
    #[default]
    Grid,
    /// One element per row at full width
    Rows,
    /// One element per column at full height
    Columns,
    /// Positions set by hand
    Free,
}

impl CanvasLayout {
    /// All layouts, in toolbar order
    pub const ALL: [CanvasLayout; 4] =
        [CanvasLayout::Grid, CanvasLayout::Rows, CanvasLayout::Columns, CanvasLayout::Free];

    /// Translation key of the name
    pub fn label_key(self) -> &'static str {
        match self {
            CanvasLayout::Grid => "gridLayout",
            CanvasLayout::Rows => "rowsLayout",
            CanvasLayout::Columns => "columnsLayout",
            CanvasLayout::Free => "freeLayout",
        }
    }

    /// Icon glyph
    pub fn icon(self) -> &'static str {
        match self {
            CanvasLayout::Grid => "\u{229e}",
            CanvasLayout::Rows => "\u{2630}",
            CanvasLayout::Columns => "\u{2161}",
            CanvasLayout::Free => "\u{2725}",
        }
    }
}

/// How the elements are presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CanvasView {
    /// Placed on the canvas surface
    #[default]
    Grid,
    /// One card per element
    List,
}

impl CanvasView {
    /// Translation key of the name
    pub fn label_key(self) -> &'static str {
        match self {
            CanvasView::Grid => "gridView",
            CanvasView::List => "listView",
        }
    }
}

/// An element placed on the canvas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasElement {
    /// Unique within its canvas
    pub id: u64,
    /// Content kind
    pub kind: ElementKind,
    /// Top-left corner, in canvas coordinates
    pub position: Pos2,
    /// Extent
    pub size: Vec2,
    /// Chart type, for chart elements only
    pub chart: Option<ChartType>,
}

impl CanvasElement {
    /// Bounds in canvas coordinates
    pub fn rect(&self) -> Rect {
        Rect::from_min_size(self.position, self.size)
    }
}

/// Elements with their layout and view settings
#[derive(Debug, Clone)]
pub struct Canvas {
    elements: Vec<CanvasElement>,
    next_id: u64,
    layout: CanvasLayout,
    view: CanvasView,
    grid_visible: bool,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            elements: Vec::new(),
            next_id: 1,
            layout: CanvasLayout::default(),
            view: CanvasView::default(),
            grid_visible: true,
        }
    }
}

impl Canvas {
    /// Empty canvas in the grid layout with the background grid shown
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an element of `kind` at the default placement and return its id.
    /// Chart elements start as bar charts.
    pub fn add(&mut self, kind: ElementKind) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.elements.push(CanvasElement {
            id,
            kind,
            position: DEFAULT_POSITION,
            size: DEFAULT_SIZE,
            chart: (kind == ElementKind::Chart).then_some(ChartType::Bar),
        });
        tracing::debug!(id, ?kind, elements = self.elements.len(), "canvas element added");
        id
    }

    /// Remove an element. Returns `false` for an unknown id.
    pub fn remove(&mut self, id: u64) -> bool {
        let before = self.elements.len();
        self.elements.retain(|element| element.id != id);
        let removed = self.elements.len() != before;
        if removed {
            tracing::debug!(id, "canvas element removed");
        }
        removed
    }

    /// Element by id
    pub fn get(&self, id: u64) -> Option<&CanvasElement> {
        self.elements.iter().find(|element| element.id == id)
    }

    /// Elements in insertion order
    pub fn elements(&self) -> &[CanvasElement] {
        &self.elements
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether the canvas has no element
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Current layout
    pub fn layout(&self) -> CanvasLayout {
        self.layout
    }

    /// Switch to `layout` and arrange the elements for it.
    ///
    /// Grid places two per row, rows stack them at a fixed width and columns
    /// line them up at a fixed height, all from the same origin with the same
    /// gap. Free leaves every element where it is.
    pub fn change_layout(&mut self, layout: CanvasLayout) {
        self.layout = layout;
        tracing::debug!(?layout, elements = self.elements.len(), "canvas layout changed");

        match layout {
            CanvasLayout::Grid => {
                for (index, element) in self.elements.iter_mut().enumerate() {
                    let col = (index % GRID_COLUMNS) as f32;
                    let row = (index / GRID_COLUMNS) as f32;
                    element.position = LAYOUT_ORIGIN
                        + vec2(col * (element.size.x + LAYOUT_GAP), row * (element.size.y + LAYOUT_GAP));
                }
            }
            CanvasLayout::Rows => {
                for (index, element) in self.elements.iter_mut().enumerate() {
                    element.position = LAYOUT_ORIGIN + vec2(0.0, index as f32 * (element.size.y + LAYOUT_GAP));
                    element.size.x = ROWS_WIDTH;
                }
            }
            CanvasLayout::Columns => {
                for (index, element) in self.elements.iter_mut().enumerate() {
                    element.position = LAYOUT_ORIGIN + vec2(index as f32 * (element.size.x + LAYOUT_GAP), 0.0);
                    element.size.y = COLUMNS_HEIGHT;
                }
            }
            CanvasLayout::Free => {}
        }
    }

    /// Set the chart type of a chart element. Returns `false` if `id` is
    /// unknown or not a chart.
    pub fn set_chart_type(&mut self, id: u64, chart: ChartType) -> bool {
        match self.elements.iter_mut().find(|element| element.id == id) {
            Some(element) if element.kind == ElementKind::Chart => {
                element.chart = Some(chart);
                true
            }
            _ => false,
        }
    }

    /// Move an element by `delta`. Only the free layout allows it; returns
    /// whether the element moved.
    pub fn move_by(&mut self, id: u64, delta: Vec2) -> bool {
        if self.layout != CanvasLayout::Free {
            return false;
        }
        match self.elements.iter_mut().find(|element| element.id == id) {
            Some(element) => {
                element.position += delta;
                true
            }
            None => false,
        }
    }

    /// Whether elements can be dragged
    pub fn is_draggable(&self) -> bool {
        self.layout == CanvasLayout::Free
    }

    /// Presentation
    pub fn view(&self) -> CanvasView {
        self.view
    }

    /// Switch the presentation
    pub fn set_view(&mut self, view: CanvasView) {
        self.view = view;
    }

    /// Whether the background grid is drawn
    pub fn grid_visible(&self) -> bool {
        self.grid_visible
    }

    /// Show or hide the background grid
    pub fn toggle_grid(&mut self) {
        self.grid_visible = !self.grid_visible;
    }

    /// Smallest size containing every element from the canvas origin
    pub fn extent(&self) -> Vec2 {
        self.elements
            .iter()
            .fold(Vec2::ZERO, |extent, element| extent.max(element.rect().max.to_vec2()))
    }
}

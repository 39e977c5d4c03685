// SPDX-License-Identifier: MIT OR Apache-2.0
//! Log console shown in the developer tools.
//!
//! [`TracingBridge`] is a `tracing_subscriber` layer that forwards every
//! event to the console over a channel. While the harmless-error filter is
//! active, matching `ERROR` events arrive as `DEBUG` entries marked
//! `[filtered]`. [`HarmlessEventFilter`] keeps those errors out of other
//! layers, such as the terminal output.

use deepdata_core::HarmlessErrorFilter;
use std::collections::VecDeque;
use std::sync::mpsc;

/// Console severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// Trace
    Trace,
    /// Debug
    Debug,
    /// Info
    Info,
    /// Warning
    Warn,
    /// Error
    Error,
}

impl LogLevel {
    /// All levels, most verbose first
    pub const ALL: [LogLevel; 5] = [LogLevel::Trace, LogLevel::Debug, LogLevel::Info, LogLevel::Warn, LogLevel::Error];

    fn from_tracing(level: tracing::Level) -> Self {
        match level {
            tracing::Level::TRACE => Self::Trace,
            tracing::Level::DEBUG => Self::Debug,
            tracing::Level::INFO => Self::Info,
            tracing::Level::WARN => Self::Warn,
            tracing::Level::ERROR => Self::Error,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Trace => "TRACE",
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        }
    }

    fn short_name(self) -> &'static str {
        match self {
            Self::Trace => "T",
            Self::Debug => "D",
            Self::Info => "I",
            Self::Warn => "W",
            Self::Error => "E",
        }
    }

    fn color(self) -> egui::Color32 {
        match self {
            Self::Trace => egui::Color32::from_rgb(110, 110, 110),
            Self::Debug => egui::Color32::from_rgb(150, 150, 150),
            Self::Info => egui::Color32::from_rgb(120, 180, 250),
            Self::Warn => egui::Color32::from_rgb(255, 200, 80),
            Self::Error => egui::Color32::from_rgb(255, 100, 100),
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// An event captured by [`TracingBridge`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingEvent {
    /// Level after filtering
    pub level: LogLevel,
    /// Formatted message and fields
    pub message: String,
    /// Module path of the event
    pub target: String,
    /// Whether the harmless-error filter downgraded it
    pub filtered: bool,
}

/// Downgrade a harmless error; everything else passes through unchanged.
fn classify(level: LogLevel, message: String, filter: &HarmlessErrorFilter) -> (LogLevel, String, bool) {
    if level == LogLevel::Error && filter.is_harmless(&message) {
        (LogLevel::Debug, format!("[filtered] {message}"), true)
    } else {
        (level, message, false)
    }
}

/// Layer forwarding events to the console.
pub struct TracingBridge {
    sender: mpsc::Sender<TracingEvent>,
    filter: HarmlessErrorFilter,
}

impl TracingBridge {
    /// Create the layer and the receiving end for the console
    pub fn new(filter: HarmlessErrorFilter) -> (Self, mpsc::Receiver<TracingEvent>) {
        let (sender, receiver) = mpsc::channel();
        (Self { sender, filter }, receiver)
    }
}

impl<S> tracing_subscriber::Layer<S> for TracingBridge
where
    S: tracing::Subscriber,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let meta = event.metadata();

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        let message = visitor.finish();

        let (level, message, filtered) = classify(LogLevel::from_tracing(*meta.level()), message, &self.filter);

        // The console may already be gone during shutdown.
        let _ = self.sender.send(TracingEvent {
            level,
            message,
            target: meta.target().to_string(),
            filtered,
        });
    }
}

/// Per-layer filter dropping errors the harmless-error filter matches.
///
/// Levels cannot be rewritten on the way to a formatting layer, so matched
/// errors are dropped there; the console still shows them downgraded.
pub struct HarmlessEventFilter {
    filter: HarmlessErrorFilter,
}

impl HarmlessEventFilter {
    /// Follow `filter`, including later pattern and activity changes
    pub fn new(filter: HarmlessErrorFilter) -> Self {
        Self { filter }
    }
}

impl<S> tracing_subscriber::layer::Filter<S> for HarmlessEventFilter
where
    S: tracing::Subscriber,
{
    fn enabled(&self, _meta: &tracing::Metadata<'_>, _cx: &tracing_subscriber::layer::Context<'_, S>) -> bool {
        true
    }

    fn event_enabled(&self, event: &tracing::Event<'_>, _cx: &tracing_subscriber::layer::Context<'_, S>) -> bool {
        if *event.metadata().level() != tracing::Level::ERROR || !self.filter.is_active() {
            return true;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        !self.filter.is_harmless(&visitor.finish())
    }
}

/// Collects the `message` field followed by the other fields
#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: Vec<String>,
}

impl MessageVisitor {
    fn push(&mut self, name: &str, value: String) {
        if name == "message" {
            self.message = value;
        } else {
            self.fields.push(format!("{name}={value}"));
        }
    }

    fn finish(self) -> String {
        match (self.message.is_empty(), self.fields.is_empty()) {
            (true, true) => "(empty)".to_string(),
            (true, false) => self.fields.join(" "),
            (false, true) => self.message,
            (false, false) => format!("{} {}", self.message, self.fields.join(" ")),
        }
    }
}

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.push(field.name(), format!("{value:?}"));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.push(field.name(), value.to_string());
    }
}

/// A console line
#[derive(Debug, Clone)]
pub struct LogEntry {
    /// Severity
    pub level: LogLevel,
    /// Text, prefixed with the target
    pub message: String,
    /// Local wall-clock time of the last occurrence
    pub timestamp: String,
    /// Number of collapsed identical occurrences
    pub count: u32,
}

/// Console state and view
pub struct ConsolePanel {
    tracing_rx: Option<mpsc::Receiver<TracingEvent>>,
    /// Entries, oldest first
    pub entries: VecDeque<LogEntry>,
    /// Maximum number of kept entries
    pub max_entries: usize,
    /// Case-insensitive search text
    pub search: String,
    /// Keep the view scrolled to the newest entry
    pub auto_scroll: bool,
    /// Show timestamps
    pub show_timestamps: bool,
    /// Merge consecutive identical entries
    pub collapse_duplicates: bool,
    shown: [bool; 5],
    counts: [usize; 5],
    filtered: usize,
}

impl Default for ConsolePanel {
    fn default() -> Self {
        Self::with_tracing_receiver(None)
    }
}

impl ConsolePanel {
    /// Console fed by `tracing_rx`
    pub fn with_tracing_receiver(tracing_rx: Option<mpsc::Receiver<TracingEvent>>) -> Self {
        Self {
            tracing_rx,
            entries: VecDeque::new(),
            max_entries: 1000,
            search: String::new(),
            auto_scroll: true,
            show_timestamps: true,
            collapse_duplicates: true,
            shown: [false, true, true, true, true],
            counts: [0; 5],
            filtered: 0,
        }
    }

    /// Append an entry
    pub fn log(&mut self, level: LogLevel, message: impl Into<String>) {
        let message = message.into();
        let timestamp = chrono::Local::now().format("%H:%M:%S").to_string();
        self.counts[level.index()] += 1;

        if self.collapse_duplicates {
            if let Some(last) = self.entries.back_mut() {
                if last.level == level && last.message == message {
                    last.count += 1;
                    last.timestamp = timestamp;
                    return;
                }
            }
        }

        self.entries.push_back(LogEntry {
            level,
            message,
            timestamp,
            count: 1,
        });

        while self.entries.len() > self.max_entries {
            self.entries.pop_front();
        }
    }

    /// Remove every entry
    pub fn clear(&mut self) {
        self.entries.clear();
        self.counts = [0; 5];
        self.filtered = 0;
    }

    /// Number of events seen at `level` since the last clear
    pub fn count(&self, level: LogLevel) -> usize {
        self.counts[level.index()]
    }

    /// Drain pending events from the bridge
    pub fn poll_tracing_events(&mut self) {
        let Some(rx) = &self.tracing_rx else {
            return;
        };

        let events: Vec<TracingEvent> = rx.try_iter().collect();
        for event in events {
            if event.filtered {
                self.filtered += 1;
            }
            self.log(event.level, format!("[{}] {}", event.target, event.message));
        }
    }

    fn visible_entries(&self) -> impl Iterator<Item = &LogEntry> {
        let needle = self.search.to_lowercase();
        self.entries.iter().filter(move |entry| {
            self.shown[entry.level.index()] && (needle.is_empty() || entry.message.to_lowercase().contains(&needle))
        })
    }

    /// Draw the console
    pub fn ui(&mut self, ui: &mut egui::Ui) {
        self.poll_tracing_events();

        ui.horizontal(|ui| {
            if ui.button("Clear").on_hover_text("Clear all logs").clicked() {
                self.clear();
            }

            ui.separator();

            for level in LogLevel::ALL {
                let shown = self.shown[level.index()];
                let text = format!("{} {}", level.short_name(), self.count(level));
                let color = if shown { level.color() } else { egui::Color32::GRAY };
                if ui
                    .add(egui::Button::new(egui::RichText::new(text).color(color).monospace()))
                    .on_hover_text(format!("{} messages", level.name()))
                    .clicked()
                {
                    self.shown[level.index()] = !shown;
                }
            }

            if self.filtered > 0 {
                ui.label(egui::RichText::new(format!("{} filtered", self.filtered)).weak())
                    .on_hover_text("Harmless errors downgraded to debug");
            }

            ui.separator();

            ui.add(egui::TextEdit::singleline(&mut self.search).hint_text("Search...").desired_width(150.0));
            if !self.search.is_empty() && ui.button("x").on_hover_text("Clear search").clicked() {
                self.search.clear();
            }

            ui.menu_button("Options", |ui| {
                ui.checkbox(&mut self.auto_scroll, "Auto-scroll");
                ui.checkbox(&mut self.show_timestamps, "Show timestamps");
                ui.checkbox(&mut self.collapse_duplicates, "Collapse duplicates");
            });
        });

        ui.separator();

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .stick_to_bottom(self.auto_scroll)
            .show(ui, |ui| {
                for entry in self.visible_entries() {
                    let row = ui.horizontal(|ui| {
                        if self.show_timestamps {
                            ui.label(
                                egui::RichText::new(&entry.timestamp)
                                    .monospace()
                                    .size(11.0)
                                    .color(egui::Color32::from_rgb(110, 110, 110)),
                            );
                        }
                        ui.label(
                            egui::RichText::new(format!("[{}]", entry.level.short_name()))
                                .monospace()
                                .size(11.0)
                                .color(entry.level.color()),
                        );
                        if entry.count > 1 {
                            ui.label(
                                egui::RichText::new(format!("({})", entry.count))
                                    .monospace()
                                    .size(10.0)
                                    .color(egui::Color32::from_rgb(150, 150, 200)),
                            );
                        }
                        ui.label(egui::RichText::new(&entry.message).monospace().size(12.0).color(entry.level.color()));
                    });

                    row.response.context_menu(|ui| {
                        if ui.button("Copy message").clicked() {
                            ui.output_mut(|o| o.copied_text = entry.message.clone());
                            ui.close_menu();
                        }
                    });
                }
            });
    }
}

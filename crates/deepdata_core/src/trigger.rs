// SPDX-License-Identifier: MIT OR Apache-2.0
//! Palette triggers: the global key chord and the title-bar button.

use crate::bus::PaletteBus;
use crate::emitter::SubscriptionGuard;
use crate::timer::DelayedAction;
use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// How long the button keeps its active style after a press
pub const DEFAULT_FEEDBACK: Duration = Duration::from_millis(200);

/// The palette chord: Cmd+K on macOS, Ctrl+K elsewhere
pub const TOGGLE_SHORTCUT: egui::KeyboardShortcut = egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::K);

/// Whether a key press is the palette chord
pub fn is_toggle_chord(modifiers: egui::Modifiers, key: egui::Key) -> bool {
    key == egui::Key::K && modifiers.command && !modifiers.alt && !modifiers.shift
}

/// Hint shown next to the search button
pub fn chord_hint(mac: bool) -> &'static str {
    if mac {
        "⌘K"
    } else {
        "Ctrl+K"
    }
}

/// Title-bar button state.
///
/// The button is active while its press feedback lasts or while the palette
/// is open, whichever is longer.
pub struct TriggerButton {
    bus: PaletteBus,
    feedback: Duration,
    pulse: DelayedAction,
    open: Rc<Cell<bool>>,
    _subscription: SubscriptionGuard,
}

impl TriggerButton {
    /// Button driving `bus`
    pub fn new(bus: PaletteBus, feedback: Duration) -> Self {
        let open = Rc::new(Cell::new(bus.is_open()));
        let subscription = {
            let open = open.clone();
            let weak = bus.downgrade();
            bus.subscribe(move || open.set(weak.is_open())).guard()
        };

        Self {
            bus,
            feedback,
            pulse: DelayedAction::idle(),
            open,
            _subscription: subscription,
        }
    }

    /// The button was clicked at `now`
    pub fn press(&mut self, now: Instant) {
        self.bus.toggle();
        self.pulse.arm(now, self.feedback);
    }

    /// Whether to draw the active style at `now`
    pub fn is_active(&self, now: Instant) -> bool {
        self.pulse.deadline().is_some_and(|deadline| now < deadline) || self.open.get()
    }

    /// Expire the press feedback
    pub fn tick(&mut self, now: Instant) {
        self.pulse.fire_if_due(now);
    }

    /// Pending feedback deadline, for scheduling a repaint
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pulse.deadline()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chord_matching() {
        assert!(is_toggle_chord(egui::Modifiers::COMMAND, egui::Key::K));
        assert!(!is_toggle_chord(egui::Modifiers::NONE, egui::Key::K));
        assert!(!is_toggle_chord(egui::Modifiers::COMMAND, egui::Key::J));
        assert!(!is_toggle_chord(egui::Modifiers::COMMAND | egui::Modifiers::SHIFT, egui::Key::K));
        assert_eq!(TOGGLE_SHORTCUT.logical_key, egui::Key::K);
    }

    #[test]
    fn test_chord_hint() {
        assert_eq!(chord_hint(true), "⌘K");
        assert_eq!(chord_hint(false), "Ctrl+K");
    }

    #[test]
    fn test_feedback_outlasts_quick_close() {
        let bus = PaletteBus::new();
        let mut button = TriggerButton::new(bus.clone(), DEFAULT_FEEDBACK);
        let start = Instant::now();

        button.press(start);
        assert!(bus.is_open());
        bus.set_open(false);

        assert!(button.is_active(start + Duration::from_millis(150)));
        button.tick(start + Duration::from_millis(200));
        assert!(!button.is_active(start + Duration::from_millis(200)));
        assert_eq!(button.next_deadline(), None);
    }

    #[test]
    fn test_active_while_open() {
        let bus = PaletteBus::new();
        let mut button = TriggerButton::new(bus.clone(), DEFAULT_FEEDBACK);
        let start = Instant::now();

        button.press(start);
        button.tick(start + Duration::from_secs(1));
        assert!(button.is_active(start + Duration::from_secs(1)));

        bus.toggle();
        assert!(!button.is_active(start + Duration::from_secs(1)));
    }

    #[test]
    fn test_reflects_chord_opened_palette() {
        let bus = PaletteBus::new();
        let button = TriggerButton::new(bus.clone(), DEFAULT_FEEDBACK);

        bus.toggle();
        assert!(button.is_active(Instant::now()));
    }

    #[test]
    fn test_drop_unsubscribes() {
        let bus = PaletteBus::new();
        let button = TriggerButton::new(bus.clone(), DEFAULT_FEEDBACK);
        assert_eq!(bus.listener_count(), 1);
        drop(button);
        assert_eq!(bus.listener_count(), 0);
    }
}

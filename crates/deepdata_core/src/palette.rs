// SPDX-License-Identifier: MIT OR Apache-2.0
//! Command palette state machine and host.
//!
//! The palette follows the bus: it is `Open` while the bus flag is set and
//! `Closed` otherwise. [`PaletteHost`] owns the bus subscription for as long
//! as the view hosting the palette is mounted; the global chord is only
//! honoured while mounted.

use crate::bus::PaletteBus;
use crate::commands::CommandEntry;
use crate::emitter::SubscriptionGuard;
use std::cell::Cell;
use std::rc::Rc;

/// Visible state of the palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PalettePhase {
    /// Not shown
    #[default]
    Closed,
    /// Shown and accepting input
    Open,
}

/// Per-view palette state: filter text, selection and focus requests.
#[derive(Debug, Default)]
pub struct PaletteState {
    phase: PalettePhase,
    /// Filter text typed by the user
    pub query: String,
    selected: usize,
    focus_requested: bool,
    opened_this_frame: bool,
}

impl PaletteState {
    /// Closed palette
    pub fn new() -> Self {
        Self::default()
    }

    /// Follow the bus flag. Returns `true` on a transition.
    ///
    /// Opening clears the filter, selects the first entry and requests focus
    /// for the filter field.
    pub fn sync(&mut self, bus_open: bool) -> bool {
        self.opened_this_frame = false;

        match (self.phase, bus_open) {
            (PalettePhase::Closed, true) => {
                self.phase = PalettePhase::Open;
                self.query.clear();
                self.selected = 0;
                self.focus_requested = true;
                self.opened_this_frame = true;
                true
            }
            (PalettePhase::Open, false) => {
                self.phase = PalettePhase::Closed;
                self.focus_requested = false;
                true
            }
            _ => false,
        }
    }

    /// Current phase
    pub fn phase(&self) -> PalettePhase {
        self.phase
    }

    /// Whether the palette is shown
    pub fn is_open(&self) -> bool {
        self.phase == PalettePhase::Open
    }

    /// Whether the last [`sync`](Self::sync) opened the palette. Outside
    /// clicks on that frame belong to whatever opened it.
    pub fn just_opened(&self) -> bool {
        self.opened_this_frame
    }

    /// Consume a pending focus request for the filter field
    pub fn take_focus_request(&mut self) -> bool {
        std::mem::take(&mut self.focus_requested)
    }

    /// Index of the selected entry among the visible ones
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Select an entry directly (pointer hover)
    pub fn select(&mut self, index: usize) {
        self.selected = index;
    }

    /// Move the selection down, stopping at the last visible entry
    pub fn select_next(&mut self, visible: usize) {
        if self.selected + 1 < visible {
            self.selected += 1;
        }
    }

    /// Move the selection up, stopping at the first entry
    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Keep the selection inside `visible` entries
    pub fn clamp(&mut self, visible: usize) {
        if visible == 0 {
            self.selected = 0;
        } else if self.selected >= visible {
            self.selected = visible - 1;
        }
    }

    /// The filter text changed: restart from the first entry
    pub fn query_changed(&mut self) {
        self.selected = 0;
    }
}

/// Close the palette, then run `entry`'s action once.
pub fn run_command(bus: &PaletteBus, entry: &CommandEntry) {
    bus.set_open(false);
    tracing::debug!(command = entry.id, "Running command");
    entry.invoke();
}

/// Mount point of the palette.
///
/// While mounted it mirrors the bus flag through a subscription and accepts
/// the global toggle chord.
pub struct PaletteHost {
    bus: PaletteBus,
    mirror: Rc<Cell<bool>>,
    subscription: Option<SubscriptionGuard>,
    /// Palette state driven by the mirrored flag
    pub state: PaletteState,
}

impl PaletteHost {
    /// Unmounted host for `bus`
    pub fn new(bus: PaletteBus) -> Self {
        Self {
            bus,
            mirror: Rc::new(Cell::new(false)),
            subscription: None,
            state: PaletteState::new(),
        }
    }

    /// Subscribe to the bus. Mounting twice is a no-op.
    pub fn mount(&mut self) {
        if self.subscription.is_some() {
            return;
        }

        self.mirror.set(self.bus.is_open());
        let mirror = self.mirror.clone();
        let bus = self.bus.downgrade();
        self.subscription = Some(self.bus.subscribe(move || mirror.set(bus.is_open())).guard());
        tracing::debug!("Command palette host mounted");
    }

    /// Drop the bus subscription
    pub fn unmount(&mut self) {
        if self.subscription.take().is_some() {
            tracing::debug!("Command palette host unmounted");
        }
    }

    /// Whether the host is mounted
    pub fn is_mounted(&self) -> bool {
        self.subscription.is_some()
    }

    /// Handle the global toggle chord. Returns `true` if it was honoured.
    pub fn handle_chord(&self) -> bool {
        if !self.is_mounted() {
            return false;
        }
        self.bus.toggle();
        true
    }

    /// Bring the palette state in line with the last notification
    pub fn sync(&mut self) -> bool {
        let open = self.is_mounted() && self.mirror.get();
        self.state.sync(open)
    }

    /// Close the palette through the bus
    pub fn dismiss(&self) {
        self.bus.set_open(false);
    }

    /// Run an entry: close first, then act
    pub fn run(&self, entry: &CommandEntry) {
        run_command(&self.bus, entry);
    }

    /// The bus this host follows
    pub fn bus(&self) -> &PaletteBus {
        &self.bus
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opening_resets_filter_and_focus() {
        let mut state = PaletteState::new();
        state.query.push_str("old");
        state.select(3);

        assert!(state.sync(true));
        assert!(state.is_open());
        assert!(state.query.is_empty());
        assert_eq!(state.selected(), 0);
        assert!(state.just_opened());
        assert!(state.take_focus_request());
        assert!(!state.take_focus_request());

        assert!(!state.sync(true));
        assert!(!state.just_opened());

        assert!(state.sync(false));
        assert_eq!(state.phase(), PalettePhase::Closed);
    }

    #[test]
    fn test_selection_stays_in_bounds() {
        let mut state = PaletteState::new();
        state.sync(true);

        state.select_previous();
        assert_eq!(state.selected(), 0);

        for _ in 0..10 {
            state.select_next(3);
        }
        assert_eq!(state.selected(), 2);

        state.clamp(1);
        assert_eq!(state.selected(), 0);

        state.select(5);
        state.clamp(0);
        assert_eq!(state.selected(), 0);
    }

    #[test]
    fn test_run_command_closes_before_action() {
        let bus = PaletteBus::new();
        bus.set_open(true);

        let runs = Rc::new(Cell::new(0));
        let open_during_action = Rc::new(Cell::new(None));
        let entry = {
            let runs = runs.clone();
            let open_during_action = open_during_action.clone();
            let bus = bus.clone();
            CommandEntry::new("test", "", "test", move || {
                runs.set(runs.get() + 1);
                open_during_action.set(Some(bus.is_open()));
            })
        };

        run_command(&bus, &entry);

        assert!(!bus.is_open());
        assert_eq!(runs.get(), 1);
        assert_eq!(open_during_action.get(), Some(false));
    }

    #[test]
    fn test_host_follows_bus_while_mounted() {
        let bus = PaletteBus::new();
        let mut host = PaletteHost::new(bus.clone());

        bus.toggle();
        assert!(!host.sync());

        host.mount();
        assert!(host.sync());
        assert!(host.state.is_open());

        bus.toggle();
        assert!(host.sync());
        assert!(!host.state.is_open());
    }

    #[test]
    fn test_chord_only_while_mounted() {
        let bus = PaletteBus::new();
        let mut host = PaletteHost::new(bus.clone());

        assert!(!host.handle_chord());
        assert!(!bus.is_open());

        host.mount();
        host.mount();
        assert_eq!(bus.listener_count(), 1);
        assert!(host.handle_chord());
        assert!(bus.is_open());

        host.unmount();
        assert_eq!(bus.listener_count(), 0);
        assert!(!host.handle_chord());
        assert!(bus.is_open());
    }

    #[test]
    fn test_dropping_host_unsubscribes() {
        let bus = PaletteBus::new();
        {
            let mut host = PaletteHost::new(bus.clone());
            host.mount();
            assert_eq!(bus.listener_count(), 1);
        }
        assert_eq!(bus.listener_count(), 0);
    }

    #[test]
    fn test_host_run_closes_bus() {
        let bus = PaletteBus::new();
        let mut host = PaletteHost::new(bus.clone());
        host.mount();
        bus.set_open(true);
        host.sync();

        let ran = Rc::new(Cell::new(false));
        let entry = {
            let ran = ran.clone();
            CommandEntry::new("test", "", "test", move || ran.set(true))
        };
        host.run(&entry);

        assert!(ran.get());
        assert!(host.sync());
        assert!(!host.state.is_open());
    }
}

// SPDX-License-Identifier: MIT OR Apache-2.0
//! Broadcast bus for the command palette's open flag.
//!
//! The bus is owned by the shell root and cloned into every surface that
//! opens, closes or reflects the palette. Notification is pull-based:
//! listeners take no arguments and read [`PaletteBus::is_open`].

use crate::emitter::{ListenerSet, PassSummary, Subscription};
use std::cell::Cell;
use std::rc::{Rc, Weak};

struct BusInner {
    open: Cell<bool>,
    listeners: ListenerSet<dyn Fn()>,
}

/// Shared handle to the palette open flag and its listeners.
#[derive(Clone)]
pub struct PaletteBus {
    inner: Rc<BusInner>,
}

impl Default for PaletteBus {
    fn default() -> Self {
        Self::new()
    }
}

impl PaletteBus {
    /// Create a closed bus with no listeners
    pub fn new() -> Self {
        Self {
            inner: Rc::new(BusInner {
                open: Cell::new(false),
                listeners: ListenerSet::new("palette-bus"),
            }),
        }
    }

    /// Current value of the open flag
    pub fn is_open(&self) -> bool {
        self.inner.open.get()
    }

    /// Flip the flag and notify.
    pub fn toggle(&self) {
        let open = !self.inner.open.get();
        self.inner.open.set(open);
        tracing::debug!(open, "command palette toggled");
        self.notify();
    }

    /// Set the flag. Does nothing, and notifies nobody, if it already has
    /// that value.
    pub fn set_open(&self, open: bool) {
        if self.inner.open.get() == open {
            return;
        }
        self.inner.open.set(open);
        tracing::debug!(open, "command palette state set");
        self.notify();
    }

    /// Register a listener
    pub fn subscribe(&self, listener: impl Fn() + 'static) -> Subscription {
        let listener: Rc<dyn Fn()> = Rc::new(listener);
        self.inner.listeners.insert(listener)
    }

    /// Register a shared listener. The same `Rc` occupies one slot however
    /// often it is subscribed.
    pub fn subscribe_shared(&self, listener: Rc<dyn Fn()>) -> Subscription {
        self.inner.listeners.insert(listener)
    }

    /// Call every registered listener. Panicking listeners are logged and
    /// skipped.
    pub fn notify(&self) -> PassSummary {
        let summary = self.inner.listeners.for_each(|listener| listener());
        if summary.panicked > 0 {
            tracing::warn!(
                completed = summary.completed,
                panicked = summary.panicked,
                "some palette listeners failed"
            );
        }
        summary
    }

    /// Number of registered listeners
    pub fn listener_count(&self) -> usize {
        self.inner.listeners.len()
    }

    /// Non-owning handle, for listeners that need to read the bus back
    pub fn downgrade(&self) -> WeakPaletteBus {
        WeakPaletteBus {
            inner: Rc::downgrade(&self.inner),
        }
    }
}

impl std::fmt::Debug for PaletteBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaletteBus")
            .field("open", &self.is_open())
            .field("listeners", &self.listener_count())
            .finish()
    }
}

/// Weak counterpart of [`PaletteBus`]
#[derive(Clone)]
pub struct WeakPaletteBus {
    inner: Weak<BusInner>,
}

impl WeakPaletteBus {
    /// Upgrade to a strong handle if the bus is still alive
    pub fn upgrade(&self) -> Option<PaletteBus> {
        self.inner.upgrade().map(|inner| PaletteBus { inner })
    }

    /// Open flag, or `false` once the bus is gone
    pub fn is_open(&self) -> bool {
        self.upgrade().is_some_and(|bus| bus.is_open())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn counter(bus: &PaletteBus) -> (Rc<Cell<u32>>, Subscription) {
        let count = Rc::new(Cell::new(0));
        let sub = {
            let count = count.clone();
            bus.subscribe(move || count.set(count.get() + 1))
        };
        (count, sub)
    }

    #[test]
    fn test_two_toggles_notify_twice() {
        let bus = PaletteBus::new();
        let (count, _sub) = counter(&bus);

        assert!(!bus.is_open());
        bus.toggle();
        assert!(bus.is_open());
        assert_eq!(count.get(), 1);

        bus.toggle();
        assert!(!bus.is_open());
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn test_set_open_same_value_is_silent() {
        let bus = PaletteBus::new();
        let (count, _sub) = counter(&bus);

        bus.set_open(false);
        assert_eq!(count.get(), 0);

        bus.set_open(true);
        bus.set_open(true);
        assert!(bus.is_open());
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_mixed_sequence_matches_fold() {
        enum Op {
            Toggle,
            Set(bool),
        }
        let ops = [
            Op::Toggle,
            Op::Set(true),
            Op::Set(false),
            Op::Toggle,
            Op::Toggle,
            Op::Set(false),
            Op::Toggle,
        ];

        let bus = PaletteBus::new();
        let (count, _sub) = counter(&bus);
        let mut expected = false;
        let mut expected_notifications = 0;

        for op in ops {
            match op {
                Op::Toggle => {
                    bus.toggle();
                    expected = !expected;
                    expected_notifications += 1;
                }
                Op::Set(value) => {
                    bus.set_open(value);
                    if value != expected {
                        expected = value;
                        expected_notifications += 1;
                    }
                }
            }
            assert_eq!(bus.is_open(), expected);
        }
        assert_eq!(count.get(), expected_notifications);
    }

    #[test]
    fn test_self_unsubscribing_listener_runs_once() {
        let bus = PaletteBus::new();
        let a_calls = Rc::new(Cell::new(0));
        let a_handle: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

        let a = {
            let calls = a_calls.clone();
            let handle = a_handle.clone();
            bus.subscribe(move || {
                calls.set(calls.get() + 1);
                if let Some(sub) = handle.borrow().as_ref() {
                    sub.unsubscribe();
                }
            })
        };
        *a_handle.borrow_mut() = Some(a);
        let (b_calls, _b) = counter(&bus);

        bus.toggle();
        bus.toggle();

        assert_eq!(a_calls.get(), 1);
        assert_eq!(b_calls.get(), 2);
    }

    #[test]
    fn test_notify_reaches_current_subscribers_after_churn() {
        let bus = PaletteBus::new();
        let subs: Vec<_> = (0..5).map(|_| counter(&bus)).collect();

        subs[1].1.unsubscribe();
        subs[3].1.unsubscribe();
        subs[3].1.unsubscribe();
        bus.notify();

        let counts: Vec<u32> = subs.iter().map(|(count, _)| count.get()).collect();
        assert_eq!(counts, vec![1, 0, 1, 0, 1]);
        assert_eq!(bus.listener_count(), 3);
    }

    #[test]
    fn test_unsubscribing_a_later_listener_is_not_a_failure() {
        let bus = PaletteBus::new();
        let victim: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

        let _first = {
            let victim = victim.clone();
            bus.subscribe(move || {
                if let Some(sub) = victim.borrow().as_ref() {
                    sub.unsubscribe();
                }
            })
        };
        let (later_calls, later) = counter(&bus);
        *victim.borrow_mut() = Some(later);

        let summary = bus.notify();

        assert_eq!(summary, PassSummary { completed: 1, panicked: 0 });
        assert_eq!(later_calls.get(), 0);
        assert_eq!(bus.listener_count(), 1);
    }

    #[test]
    fn test_panicking_listener_is_isolated() {
        let bus = PaletteBus::new();
        let _bad = bus.subscribe(|| panic!("subscriber failure"));
        let (count, _good) = counter(&bus);

        bus.toggle();

        assert!(bus.is_open());
        assert_eq!(count.get(), 1);
        assert_eq!(bus.notify().panicked, 1);
    }

    #[test]
    fn test_listener_pulls_state() {
        let bus = PaletteBus::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let _sub = {
            let seen = seen.clone();
            let weak = bus.downgrade();
            bus.subscribe(move || seen.borrow_mut().push(weak.is_open()))
        };

        bus.toggle();
        bus.set_open(false);

        assert_eq!(*seen.borrow(), vec![true, false]);
    }

    #[test]
    fn test_shared_listener_occupies_one_slot() {
        let bus = PaletteBus::new();
        let count = Rc::new(Cell::new(0));
        let listener: Rc<dyn Fn()> = {
            let count = count.clone();
            Rc::new(move || count.set(count.get() + 1))
        };

        let _a = bus.subscribe_shared(listener.clone());
        let _b = bus.subscribe_shared(listener);
        bus.toggle();

        assert_eq!(bus.listener_count(), 1);
        assert_eq!(count.get(), 1);
    }
}

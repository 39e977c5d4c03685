// SPDX-License-Identifier: MIT OR Apache-2.0
//! Single-threaded listener sets and typed emitters.
//!
//! A [`ListenerSet`] holds shared callbacks keyed by insertion order. Calling
//! listeners works on a snapshot of ids, so a listener may subscribe or
//! unsubscribe anything (itself included) while being called. A listener that
//! panics is caught and logged; the remaining listeners still run.

use indexmap::IndexMap;
use std::any::Any;
use std::cell::{Cell, RefCell};
use std::panic::{self, AssertUnwindSafe};
use std::rc::{Rc, Weak};

struct Slots<F: ?Sized> {
    next_id: Cell<u64>,
    entries: RefCell<IndexMap<u64, Rc<F>>>,
}

/// Ordered set of shared listeners of type `F` (usually a `dyn Fn(..)`).
pub struct ListenerSet<F: ?Sized> {
    name: &'static str,
    slots: Rc<Slots<F>>,
}

impl<F: ?Sized + 'static> ListenerSet<F> {
    /// Create an empty set. `name` only shows up in logs.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            slots: Rc::new(Slots {
                next_id: Cell::new(0),
                entries: RefCell::new(IndexMap::new()),
            }),
        }
    }

    /// Add a listener.
    ///
    /// Inserting the same `Rc` twice keeps a single slot; both returned
    /// handles refer to it.
    pub fn insert(&self, listener: Rc<F>) -> Subscription {
        let mut entries = self.slots.entries.borrow_mut();

        if let Some((&id, _)) = entries.iter().find(|(_, existing)| Rc::ptr_eq(*existing, &listener)) {
            return self.handle(id);
        }

        let id = self.slots.next_id.get();
        self.slots.next_id.set(id + 1);
        entries.insert(id, listener);
        tracing::trace!(set = self.name, listeners = entries.len(), "listener added");
        drop(entries);

        self.handle(id)
    }

    fn handle(&self, id: u64) -> Subscription {
        let slots: Weak<Slots<F>> = Rc::downgrade(&self.slots);
        let name = self.name;
        Subscription {
            remove: Rc::new(move || {
                let Some(slots) = slots.upgrade() else {
                    return false;
                };
                let removed = slots.entries.borrow_mut().shift_remove(&id).is_some();
                if removed {
                    tracing::trace!(set = name, "listener removed");
                }
                removed
            }),
        }
    }

    /// Number of registered listeners
    pub fn len(&self) -> usize {
        self.slots.entries.borrow().len()
    }

    /// Whether no listener is registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Call `invoke` once per listener registered at the start of the pass.
    ///
    /// Listeners removed during the pass are skipped if they have not run
    /// yet; skipping is not a failure.
    pub fn for_each(&self, mut invoke: impl FnMut(&F)) -> PassSummary {
        let ids: Vec<u64> = self.slots.entries.borrow().keys().copied().collect();
        let mut summary = PassSummary::default();

        for id in ids {
            let Some(listener) = self.slots.entries.borrow().get(&id).cloned() else {
                continue;
            };

            match panic::catch_unwind(AssertUnwindSafe(|| invoke(&listener))) {
                Ok(()) => summary.completed += 1,
                Err(payload) => {
                    summary.panicked += 1;
                    tracing::error!(
                        set = self.name,
                        "listener panicked: {}",
                        panic_message(payload.as_ref())
                    );
                }
            }
        }

        summary
    }
}

/// Outcome of one pass over a [`ListenerSet`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassSummary {
    /// Listeners that returned normally
    pub completed: usize,
    /// Listeners that panicked
    pub panicked: usize,
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "non-string panic payload"
    }
}

/// Handle returned by a subscription.
///
/// Dropping the handle keeps the listener registered; call
/// [`Subscription::unsubscribe`] or turn it into a [`SubscriptionGuard`].
#[derive(Clone)]
#[must_use = "keep the handle to be able to unsubscribe"]
pub struct Subscription {
    remove: Rc<dyn Fn() -> bool>,
}

impl Subscription {
    /// Remove the listener. Calling this more than once is a no-op.
    ///
    /// Returns `true` if this call removed it.
    pub fn unsubscribe(&self) -> bool {
        (self.remove)()
    }

    /// Unsubscribe automatically when the returned guard is dropped
    pub fn guard(self) -> SubscriptionGuard {
        SubscriptionGuard(self)
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}

/// Unsubscribes on drop
#[derive(Debug)]
pub struct SubscriptionGuard(Subscription);

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        self.0.unsubscribe();
    }
}

/// Emitter of typed events to `Fn(&E)` listeners.
pub struct Emitter<E: 'static> {
    listeners: ListenerSet<dyn Fn(&E)>,
}

impl<E: 'static> Emitter<E> {
    /// Create an emitter. `name` only shows up in logs.
    pub fn new(name: &'static str) -> Self {
        Self {
            listeners: ListenerSet::new(name),
        }
    }

    /// Register a listener
    pub fn subscribe(&self, listener: impl Fn(&E) + 'static) -> Subscription {
        let listener: Rc<dyn Fn(&E)> = Rc::new(listener);
        self.listeners.insert(listener)
    }

    /// Register an already shared listener (deduplicated by pointer)
    pub fn subscribe_shared(&self, listener: Rc<dyn Fn(&E)>) -> Subscription {
        self.listeners.insert(listener)
    }

    /// Deliver `event` to every listener
    pub fn emit(&self, event: &E) -> PassSummary {
        self.listeners.for_each(|listener| listener(event))
    }

    /// Number of listeners
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_reaches_all_listeners() {
        let emitter = Emitter::<u32>::new("test");
        let total = Rc::new(Cell::new(0));

        let _a = {
            let total = total.clone();
            emitter.subscribe(move |v| total.set(total.get() + v))
        };
        let _b = {
            let total = total.clone();
            emitter.subscribe(move |v| total.set(total.get() + v * 10))
        };

        assert_eq!(emitter.emit(&2).completed, 2);
        assert_eq!(total.get(), 22);
    }

    #[test]
    fn test_shared_listener_is_deduplicated() {
        let set = ListenerSet::<dyn Fn()>::new("test");
        let calls = Rc::new(Cell::new(0));
        let listener: Rc<dyn Fn()> = {
            let calls = calls.clone();
            Rc::new(move || calls.set(calls.get() + 1))
        };

        let first = set.insert(listener.clone());
        let second = set.insert(listener);
        assert_eq!(set.len(), 1);

        set.for_each(|f| f());
        assert_eq!(calls.get(), 1);

        assert!(second.unsubscribe());
        assert!(!first.unsubscribe());
        assert!(set.is_empty());
    }

    #[test]
    fn test_unsubscribe_twice_is_safe() {
        let emitter = Emitter::<()>::new("test");
        let sub = emitter.subscribe(|_| {});
        assert!(sub.unsubscribe());
        assert!(!sub.unsubscribe());
        assert_eq!(emitter.listener_count(), 0);
    }

    #[test]
    fn test_guard_unsubscribes_on_drop() {
        let emitter = Emitter::<()>::new("test");
        {
            let _guard = emitter.subscribe(|_| {}).guard();
            assert_eq!(emitter.listener_count(), 1);
        }
        assert_eq!(emitter.listener_count(), 0);
    }

    #[test]
    fn test_panicking_listener_does_not_stop_others() {
        let emitter = Emitter::<()>::new("test");
        let reached = Rc::new(Cell::new(false));

        let _bad = emitter.subscribe(|_| panic!("listener failure"));
        let _good = {
            let reached = reached.clone();
            emitter.subscribe(move |_| reached.set(true))
        };

        let summary = emitter.emit(&());
        assert_eq!(summary, PassSummary { completed: 1, panicked: 1 });
        assert!(reached.get());
    }

    #[test]
    fn test_listener_removed_mid_pass_is_skipped() {
        let set = Rc::new(ListenerSet::<dyn Fn()>::new("test"));
        let second_calls = Rc::new(Cell::new(0));
        let victim: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

        let _first = {
            let victim = victim.clone();
            set.insert(Rc::new(move || {
                if let Some(sub) = victim.borrow().as_ref() {
                    sub.unsubscribe();
                }
            }))
        };
        let second = {
            let calls = second_calls.clone();
            set.insert(Rc::new(move || calls.set(calls.get() + 1)))
        };
        *victim.borrow_mut() = Some(second);

        assert_eq!(set.for_each(|f| f()), PassSummary { completed: 1, panicked: 0 });
        assert_eq!(second_calls.get(), 0);
    }

    #[test]
    fn test_listener_added_mid_pass_runs_next_time() {
        let set = Rc::new(ListenerSet::<dyn Fn()>::new("test"));
        let late_calls = Rc::new(Cell::new(0));
        let added = Rc::new(Cell::new(false));

        let _adder = {
            let weak = Rc::downgrade(&set);
            let late_calls = late_calls.clone();
            let added = added.clone();
            set.insert(Rc::new(move || {
                if added.replace(true) {
                    return;
                }
                if let Some(set) = weak.upgrade() {
                    let late_calls = late_calls.clone();
                    let _late = set.insert(Rc::new(move || late_calls.set(late_calls.get() + 1)));
                }
            }))
        };

        set.for_each(|f| f());
        assert_eq!(late_calls.get(), 0);
        assert_eq!(set.len(), 2);

        set.for_each(|f| f());
        assert_eq!(late_calls.get(), 1);
    }
}

// SPDX-License-Identifier: MIT OR Apache-2.0
//! Debug mode flag.
//!
//! The flag lives in the preference store and is re-read on every access.
//! Changing it broadcasts [`DebugModeChanged`], switches the harmless-error
//! filter and drives the developer tools host: enabling shows the tools at
//! once, disabling hides them after a delay that a re-enable cancels.

use crate::emitter::{Emitter, Subscription};
use crate::filter::HarmlessErrorFilter;
use crate::prefs::{read_flag, PrefStore, DEBUG_MODE_KEY};
use crate::timer::{earliest, DelayedAction};
use std::cell::Cell;
use std::fmt::Display;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Host of the developer tools window.
///
/// Both calls must be safe to repeat: showing shown tools refocuses them.
pub trait DevToolsHost {
    /// Show (or refocus) the developer tools
    fn show_dev_tools(&self);

    /// Hide the developer tools
    fn hide_dev_tools(&self);
}

/// Broadcast whenever the debug flag is set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebugModeChanged {
    /// New value of the flag
    pub enabled: bool,
}

/// Delays applied to the developer tools host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebugTimings {
    /// Delay between disabling debug mode and hiding the tools
    pub hide_delay: Duration,
    /// Delay between startup and showing the tools when debug mode is on
    pub startup_show_delay: Duration,
}

impl Default for DebugTimings {
    fn default() -> Self {
        Self {
            hide_delay: Duration::from_millis(1500),
            startup_show_delay: Duration::from_millis(1000),
        }
    }
}

/// Persisted debug flag with change notification.
pub struct DebugFlagStore {
    prefs: Rc<dyn PrefStore>,
    host: Option<Rc<dyn DevToolsHost>>,
    filter: HarmlessErrorFilter,
    changed: Emitter<DebugModeChanged>,
    timings: DebugTimings,
    pending_hide: Cell<DelayedAction>,
    pending_show: Cell<DelayedAction>,
}

impl DebugFlagStore {
    /// Create a store over `prefs`
    pub fn new(prefs: Rc<dyn PrefStore>, filter: HarmlessErrorFilter, timings: DebugTimings) -> Self {
        Self {
            prefs,
            host: None,
            filter,
            changed: Emitter::new("debug-mode"),
            timings,
            pending_hide: Cell::new(DelayedAction::idle()),
            pending_show: Cell::new(DelayedAction::idle()),
        }
    }

    /// Attach the developer tools host
    pub fn with_host(mut self, host: Rc<dyn DevToolsHost>) -> Self {
        self.host = Some(host);
        self
    }

    /// Current flag, read from the store. Read failures count as off.
    pub fn debug_mode(&self) -> bool {
        read_flag(self.prefs.as_ref(), DEBUG_MODE_KEY)
    }

    /// Set the flag now
    pub fn set_debug_mode(&self, enabled: bool) {
        self.set_debug_mode_at(enabled, Instant::now());
    }

    /// Set the flag, with `now` as the reference for deferred host calls
    pub fn set_debug_mode_at(&self, enabled: bool, now: Instant) {
        let value = if enabled { "true" } else { "false" };
        if let Err(e) = self.prefs.set(DEBUG_MODE_KEY, value) {
            tracing::warn!("Failed to persist debug mode: {}", e);
        }

        self.changed.emit(&DebugModeChanged { enabled });
        self.filter.set_active(enabled);

        if enabled {
            tracing::info!("Debug mode enabled");
            self.debug_log("harmless-error filter active");
        } else {
            tracing::info!("Debug mode disabled");
        }

        let Some(host) = &self.host else {
            return;
        };

        if enabled {
            self.update(&self.pending_hide, DelayedAction::cancel);
            host.show_dev_tools();
        } else {
            self.update(&self.pending_show, DelayedAction::cancel);
            let delay = self.timings.hide_delay;
            self.update(&self.pending_hide, |action| action.arm(now, delay));
        }
    }

    /// Apply startup state now
    pub fn init(&self) {
        self.init_at(Instant::now());
    }

    /// Apply startup state: when the flag is on, activate the filter and
    /// schedule showing the developer tools.
    pub fn init_at(&self, now: Instant) {
        let enabled = self.debug_mode();
        self.filter.set_active(enabled);
        if !enabled {
            return;
        }

        tracing::info!("Debug mode is on at startup");
        if self.host.is_some() {
            let delay = self.timings.startup_show_delay;
            self.update(&self.pending_show, |action| action.arm(now, delay));
        }
    }

    /// Run deferred host calls that are due
    pub fn tick(&self, now: Instant) {
        let Some(host) = &self.host else {
            return;
        };

        if self.update(&self.pending_hide, |action| action.fire_if_due(now)) && !self.debug_mode() {
            tracing::debug!("Hiding developer tools");
            host.hide_dev_tools();
        }

        if self.update(&self.pending_show, |action| action.fire_if_due(now)) && self.debug_mode() {
            tracing::debug!("Showing developer tools after startup delay");
            host.show_dev_tools();
        }
    }

    /// Earliest pending deadline, for scheduling a repaint
    pub fn next_deadline(&self) -> Option<Instant> {
        earliest(self.pending_hide.get().deadline(), self.pending_show.get().deadline())
    }

    /// Whether a hide is scheduled
    pub fn hide_pending(&self) -> bool {
        self.pending_hide.get().is_armed()
    }

    /// Listen for flag changes
    pub fn subscribe(&self, listener: impl Fn(&DebugModeChanged) + 'static) -> Subscription {
        self.changed.subscribe(listener)
    }

    /// Shared filter switched by this store
    pub fn filter(&self) -> &HarmlessErrorFilter {
        &self.filter
    }

    /// Log at debug level if debug mode is on
    pub fn debug_log(&self, message: impl Display) {
        if self.debug_mode() {
            tracing::debug!(target: "deepdata::debug", "[DEBUG] {}", message);
        }
    }

    /// Log at warn level if debug mode is on
    pub fn debug_warn(&self, message: impl Display) {
        if self.debug_mode() {
            tracing::warn!(target: "deepdata::debug", "[DEBUG] {}", message);
        }
    }

    /// Log at error level if debug mode is on
    pub fn debug_error(&self, message: impl Display) {
        if self.debug_mode() {
            tracing::error!(target: "deepdata::debug", "[DEBUG] {}", message);
        }
    }

    fn update<R>(&self, cell: &Cell<DelayedAction>, f: impl FnOnce(&mut DelayedAction) -> R) -> R {
        let mut action = cell.get();
        let result = f(&mut action);
        cell.set(action);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefs::MemoryPrefStore;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingHost {
        calls: RefCell<Vec<&'static str>>,
    }

    impl DevToolsHost for RecordingHost {
        fn show_dev_tools(&self) {
            self.calls.borrow_mut().push("show");
        }

        fn hide_dev_tools(&self) {
            self.calls.borrow_mut().push("hide");
        }
    }

    fn store() -> (DebugFlagStore, Rc<MemoryPrefStore>, Rc<RecordingHost>) {
        let prefs = Rc::new(MemoryPrefStore::new());
        let host = Rc::new(RecordingHost::default());
        let store = DebugFlagStore::new(prefs.clone(), HarmlessErrorFilter::default(), DebugTimings::default())
            .with_host(host.clone());
        (store, prefs, host)
    }

    fn hides(host: &RecordingHost) -> usize {
        host.calls.borrow().iter().filter(|call| **call == "hide").count()
    }

    #[test]
    fn test_enable_persists_and_shows() {
        let (store, prefs, host) = store();
        assert!(!store.debug_mode());

        store.set_debug_mode_at(true, Instant::now());

        assert!(store.debug_mode());
        assert_eq!(prefs.get(DEBUG_MODE_KEY).unwrap().as_deref(), Some("true"));
        assert_eq!(*host.calls.borrow(), vec!["show"]);
        assert!(store.filter().is_active());
    }

    #[test]
    fn test_quick_reenable_never_hides() {
        let (store, _prefs, host) = store();
        let start = Instant::now();

        store.set_debug_mode_at(true, start);
        store.set_debug_mode_at(false, start + Duration::from_millis(100));
        store.tick(start + Duration::from_millis(800));
        store.set_debug_mode_at(true, start + Duration::from_millis(900));
        store.tick(start + Duration::from_millis(1700));
        store.tick(start + Duration::from_secs(5));

        assert_eq!(hides(&host), 0);
        assert!(!store.hide_pending());
    }

    #[test]
    fn test_disable_hides_once_after_delay() {
        let (store, _prefs, host) = store();
        let start = Instant::now();

        store.set_debug_mode_at(true, start);
        store.set_debug_mode_at(false, start);
        store.tick(start + Duration::from_millis(1499));
        assert_eq!(hides(&host), 0);

        store.tick(start + Duration::from_millis(1500));
        store.tick(start + Duration::from_secs(3));
        assert_eq!(hides(&host), 1);
        assert!(!store.filter().is_active());
    }

    #[test]
    fn test_external_reenable_is_rechecked() {
        let (store, prefs, host) = store();
        let start = Instant::now();

        store.set_debug_mode_at(false, start);
        prefs.set(DEBUG_MODE_KEY, "true").unwrap();
        store.tick(start + Duration::from_secs(2));

        assert_eq!(hides(&host), 0);
    }

    #[test]
    fn test_change_is_broadcast() {
        let (store, _prefs, _host) = store();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let _sub = {
            let seen = seen.clone();
            store.subscribe(move |event| seen.borrow_mut().push(event.enabled))
        };

        store.set_debug_mode(true);
        store.set_debug_mode(false);

        assert_eq!(*seen.borrow(), vec![true, false]);
    }

    #[test]
    fn test_read_failure_means_off() {
        let (store, prefs, _host) = store();
        store.set_debug_mode(true);
        prefs.set_unavailable(true);
        assert!(!store.debug_mode());
    }

    #[test]
    fn test_write_failure_still_notifies() {
        let (store, prefs, host) = store();
        prefs.set_unavailable(true);
        let seen = Rc::new(Cell::new(None));
        let _sub = {
            let seen = seen.clone();
            store.subscribe(move |event| seen.set(Some(event.enabled)))
        };

        store.set_debug_mode_at(true, Instant::now());

        assert_eq!(seen.get(), Some(true));
        assert_eq!(*host.calls.borrow(), vec!["show"]);
    }

    #[test]
    fn test_init_schedules_show_when_enabled() {
        let (store, prefs, host) = store();
        prefs.set(DEBUG_MODE_KEY, "true").unwrap();
        let start = Instant::now();

        store.init_at(start);
        assert!(store.filter().is_active());
        assert_eq!(store.next_deadline(), Some(start + Duration::from_millis(1000)));

        store.tick(start + Duration::from_millis(999));
        assert!(host.calls.borrow().is_empty());

        store.tick(start + Duration::from_millis(1000));
        assert_eq!(*host.calls.borrow(), vec!["show"]);
    }

    #[test]
    fn test_disable_cancels_startup_show() {
        let (store, prefs, host) = store();
        prefs.set(DEBUG_MODE_KEY, "true").unwrap();
        let start = Instant::now();

        store.init_at(start);
        store.set_debug_mode_at(false, start + Duration::from_millis(200));
        store.tick(start + Duration::from_secs(5));

        assert_eq!(*host.calls.borrow(), vec!["hide"]);
    }

    #[test]
    fn test_init_when_disabled_does_nothing() {
        let (store, _prefs, host) = store();
        store.init_at(Instant::now());
        assert_eq!(store.next_deadline(), None);
        assert!(host.calls.borrow().is_empty());
        assert!(!store.filter().is_active());
    }

    mod capture {
        use parking_lot::Mutex;
        use std::sync::Arc;
        use tracing::field::{Field, Visit};
        use tracing_subscriber::layer::{Context, Layer};

        pub type Records = Arc<Mutex<Vec<(tracing::Level, String)>>>;

        /// Records events logged under the debug target
        pub struct DebugTargetCapture(pub Records);

        struct Message(String);

        impl Visit for Message {
            fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
                if field.name() == "message" {
                    self.0 = format!("{value:?}");
                }
            }
        }

        impl<S: tracing::Subscriber> Layer<S> for DebugTargetCapture {
            fn on_event(&self, event: &tracing::Event<'_>, _cx: Context<'_, S>) {
                let meta = event.metadata();
                if meta.target() != "deepdata::debug" {
                    return;
                }
                let mut message = Message(String::new());
                event.record(&mut message);
                self.0.lock().push((*meta.level(), message.0));
            }
        }
    }

    #[test]
    fn test_debug_helpers_follow_flag() {
        use tracing_subscriber::layer::SubscriberExt;

        let records = capture::Records::default();
        let subscriber = tracing_subscriber::registry().with(capture::DebugTargetCapture(records.clone()));
        let (store, prefs, _) = store();

        tracing::subscriber::with_default(subscriber, || {
            store.debug_log("quiet log");
            store.debug_warn("quiet warn");
            store.debug_error("quiet error");
            assert!(records.lock().is_empty());

            prefs.set(DEBUG_MODE_KEY, "true").unwrap();
            store.debug_log("loud log");
            store.debug_warn("loud warn");
            store.debug_error("loud error");
        });

        let records = records.lock();
        assert_eq!(
            *records,
            vec![
                (tracing::Level::DEBUG, "[DEBUG] loud log".to_owned()),
                (tracing::Level::WARN, "[DEBUG] loud warn".to_owned()),
                (tracing::Level::ERROR, "[DEBUG] loud error".to_owned()),
            ]
        );
    }
}

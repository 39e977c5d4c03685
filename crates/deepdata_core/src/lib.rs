// SPDX-License-Identifier: MIT OR Apache-2.0
//! Core of the `DeepData` shell.
//!
//! This crate holds everything the shell does that is not drawing:
//! - Typed listener sets and the command palette broadcast bus
//! - The command registry and palette state machine
//! - Keyboard trigger and button feedback for the palette
//! - Preference storage, debug mode and the harmless-error filter
//! - Languages, translations and routes
//! - The element canvas of the data analysis page
//!
//! ## Architecture
//!
//! All state here is single-threaded (`Rc`/`Cell`) and owned by the
//! application root, which passes handles down to the surfaces that need
//! them. Deferred work is expressed as [`timer::DelayedAction`] deadlines that
//! the frame loop polls with an explicit `Instant`.

pub mod bus;
pub mod canvas;
pub mod commands;
pub mod debug;
pub mod emitter;
pub mod filter;
pub mod i18n;
pub mod palette;
pub mod prefs;
pub mod route;
pub mod timer;
pub mod trigger;

pub use bus::{PaletteBus, WeakPaletteBus};
pub use canvas::{Canvas, CanvasElement, CanvasLayout, CanvasView, ChartType, ElementKind};
pub use commands::{CommandEntry, CommandGroup, CommandMatches, CommandRegistry};
pub use debug::{DebugFlagStore, DebugModeChanged, DebugTimings, DevToolsHost};
pub use emitter::{Emitter, ListenerSet, PassSummary, Subscription, SubscriptionGuard};
pub use filter::HarmlessErrorFilter;
pub use i18n::{Language, LanguageStore, Translator};
pub use palette::{run_command, PaletteHost, PalettePhase, PaletteState};
pub use prefs::{FilePrefStore, MemoryPrefStore, PrefError, PrefStore};
pub use route::{NavItem, Navigator, Route};
pub use timer::DelayedAction;
pub use trigger::TriggerButton;

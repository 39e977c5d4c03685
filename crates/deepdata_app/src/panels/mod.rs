// SPDX-License-Identifier: MIT OR Apache-2.0
//! Shell panels.

pub mod console;
mod dev_tools;
mod sidebar;

pub use console::ConsolePanel;
pub use dev_tools::{DevTools, DevToolsWindow};
pub use sidebar::Sidebar;

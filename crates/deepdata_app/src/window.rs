// SPDX-License-Identifier: MIT OR Apache-2.0
//! Window controls requested by the custom title bar.

use winit::event_loop::ActiveEventLoop;
use winit::window::Window;

/// Action on the native window, queued during a frame and applied after it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowCommand {
    /// Minimize to the taskbar
    Minimize,
    /// Maximize, or restore if already maximized
    ToggleMaximize,
    /// Quit the application
    Close,
    /// Begin an OS-driven window move
    StartDrag,
}

impl WindowCommand {
    /// Apply to `window`
    pub fn apply(self, window: &Window, event_loop: &ActiveEventLoop) {
        match self {
            WindowCommand::Minimize => window.set_minimized(true),
            WindowCommand::ToggleMaximize => window.set_maximized(!window.is_maximized()),
            WindowCommand::Close => {
                tracing::info!("Close requested from title bar, exiting...");
                event_loop.exit();
            }
            WindowCommand::StartDrag => {
                if let Err(e) = window.drag_window() {
                    tracing::error!("Failed to start window drag: {}", e);
                }
            }
        }
    }
}

/// Commands collected while drawing one frame
#[derive(Debug, Default)]
pub struct WindowCommands {
    queue: Vec<WindowCommand>,
}

impl WindowCommands {
    /// Queue a command
    pub fn push(&mut self, command: WindowCommand) {
        tracing::trace!(?command, "window command queued");
        self.queue.push(command);
    }

    /// Take all queued commands in order
    pub fn drain(&mut self) -> impl Iterator<Item = WindowCommand> + '_ {
        self.queue.drain(..)
    }
}

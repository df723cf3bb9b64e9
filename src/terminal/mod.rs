//! Terminal management with RAII cleanup.
//!
//! ```no_run
//! use panechat::terminal::{setup_panic_hook, TerminalManager};
//!
//! fn main() -> color_eyre::Result<()> {
//!     setup_panic_hook();
//!     let mut manager = TerminalManager::new()?;
//!     manager.terminal().draw(|_frame| {})?;
//!     // restored when `manager` is dropped
//!     Ok(())
//! }
//! ```

mod setup;

pub use setup::{
    emergency_restore, enter_tui_mode, leave_tui_mode, pop_keyboard_enhancements,
    push_keyboard_enhancements, setup_panic_hook,
};

use color_eyre::Result;
use crossterm::terminal::enable_raw_mode;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};

/// Restores the terminal when dropped.
struct TerminalGuard {
    keyboard_enhanced: bool,
    cleaned_up: bool,
}

impl TerminalGuard {
    fn cleanup(&mut self) {
        if self.cleaned_up {
            return;
        }
        self.cleaned_up = true;

        let mut stdout = io::stdout();
        if self.keyboard_enhanced {
            pop_keyboard_enhancements(&mut stdout);
        }
        leave_tui_mode(&mut stdout);
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        self.cleanup();
    }
}

/// Owns the ratatui terminal for the lifetime of the chat screen.
///
/// Creating it enables raw mode, the alternate screen, mouse capture and
/// (where supported) keyboard enhancements; dropping it undoes all of that.
pub struct TerminalManager {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    guard: TerminalGuard,
}

impl TerminalManager {
    pub fn new() -> Result<Self> {
        enable_raw_mode()?;

        let mut stdout = io::stdout();
        if let Err(e) = enter_tui_mode(&mut stdout) {
            leave_tui_mode(&mut stdout);
            return Err(e.into());
        }
        let keyboard_enhanced = push_keyboard_enhancements(&mut stdout);
        let guard = TerminalGuard {
            keyboard_enhanced,
            cleaned_up: false,
        };

        let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        terminal.clear()?;

        Ok(Self { terminal, guard })
    }

    pub fn terminal(&mut self) -> &mut Terminal<CrosstermBackend<Stdout>> {
        &mut self.terminal
    }

    /// Whether Ctrl+Shift chords can be told apart.
    pub fn keyboard_enhanced(&self) -> bool {
        self.guard.keyboard_enhanced
    }

    /// Restore now instead of on drop.
    pub fn restore(&mut self) -> Result<()> {
        self.guard.cleanup();
        self.terminal.show_cursor()?;
        Ok(())
    }
}

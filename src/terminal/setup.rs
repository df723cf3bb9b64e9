//! Entering and leaving TUI mode.
//!
//! All restore paths ignore errors: they run from `Drop` and from the panic
//! hook, where there is nobody left to report to.

use crossterm::{
    cursor::Show,
    event::{
        DisableMouseCapture, EnableMouseCapture, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{disable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::io::{self, Write};
use std::panic;

/// Alternate screen plus mouse capture (pane clicks).
pub fn enter_tui_mode<W: Write>(writer: &mut W) -> io::Result<()> {
    execute!(writer, EnterAlternateScreen, EnableMouseCapture)
}

/// Ask the terminal to report Ctrl+Shift chords and `Ctrl+[` unambiguously.
///
/// Returns `false` on terminals without the Kitty keyboard protocol; the
/// chat then runs with whatever chords the terminal can express.
pub fn push_keyboard_enhancements<W: Write>(writer: &mut W) -> bool {
    execute!(
        writer,
        PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES)
    )
    .is_ok()
}

pub fn pop_keyboard_enhancements<W: Write>(writer: &mut W) -> bool {
    execute!(writer, PopKeyboardEnhancementFlags).is_ok()
}

/// Undo [`enter_tui_mode`] and raw mode. Safe to call more than once.
pub fn leave_tui_mode<W: Write>(writer: &mut W) {
    let _ = disable_raw_mode();
    let _ = execute!(writer, DisableMouseCapture, LeaveAlternateScreen);

    // Kitty-protocol terminals need the flag reset after leaving the
    // alternate screen.
    let _ = write!(writer, "\x1b[=0u");
    let _ = writer.flush();
    let _ = execute!(writer, Show);
}

/// Best-effort restore of stdout.
pub fn emergency_restore() {
    let mut stdout = io::stdout();
    pop_keyboard_enhancements(&mut stdout);
    leave_tui_mode(&mut stdout);
}

/// Restore the terminal before the previous panic hook prints.
///
/// Install before creating a [`TerminalManager`](super::TerminalManager).
pub fn setup_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        emergency_restore();
        original_hook(panic_info);
    }));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leave_tui_mode_writes_reset() {
        let mut buffer = Vec::new();
        leave_tui_mode(&mut buffer);
        let written = String::from_utf8_lossy(&buffer);
        assert!(written.contains("\x1b[=0u"));
    }

    #[test]
    fn test_keyboard_flags_round_trip_on_buffer() {
        let mut buffer = Vec::new();
        assert!(push_keyboard_enhancements(&mut buffer));
        assert!(pop_keyboard_enhancements(&mut buffer));
        assert!(!buffer.is_empty());
    }
}

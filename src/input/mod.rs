//! Keyboard input handling.
//!
//! ```text
//! KeyEvent -> ShortcutRouter::dispatch(ctx) -> Command -> ChatApp::execute_command
//! ```
//!
//! - [`command`] - [`ShortcutAction`] and [`Command`]
//! - [`context`] - [`ShortcutContext`], re-derived from the app per key
//! - [`keybindings`] - the default binding table
//! - [`registry`] - [`ShortcutRouter`]

pub mod command;
pub mod context;
pub mod keybindings;
pub mod registry;

pub use command::{Command, ShortcutAction};
pub use context::{ModalType, ShortcutContext};
pub use keybindings::{Enablement, KeyCombo, KeybindingConfig, ShortcutBinding};
pub use registry::ShortcutRouter;

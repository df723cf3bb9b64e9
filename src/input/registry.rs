//! Routing of key events to shortcuts and commands.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::debug;

use super::command::{Command, ShortcutAction};
use super::context::ShortcutContext;
use super::keybindings::{KeyCombo, KeybindingConfig, ShortcutBinding};

/// Maps key events to commands.
///
/// Holds nothing but the binding table; every decision is made against the
/// [`ShortcutContext`] passed in. Priority:
/// 1. Global bindings (Ctrl+C)
/// 2. Modal bindings, which swallow every other key while a modal is open
/// 3. Chat shortcuts; a disabled shortcut is swallowed
/// 4. Composer bindings and plain character input
#[derive(Debug, Clone)]
pub struct ShortcutRouter {
    config: KeybindingConfig,
}

impl Default for ShortcutRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl ShortcutRouter {
    pub fn new() -> Self {
        Self {
            config: KeybindingConfig::new(),
        }
    }

    pub fn with_config(config: KeybindingConfig) -> Self {
        Self { config }
    }

    /// Every shortcut with its enablement under `ctx`.
    pub fn bindings(&self, ctx: &ShortcutContext) -> Vec<(ShortcutBinding, bool)> {
        self.config
            .shortcuts
            .iter()
            .map(|binding| (*binding, binding.enabled_when.is_enabled(ctx)))
            .collect()
    }

    /// The shortcut a key triggers, `None` when unbound or disabled.
    pub fn route(&self, key: &KeyEvent, ctx: &ShortcutContext) -> Option<ShortcutAction> {
        let combo = KeyCombo::from_event(key);
        let binding = self.config.get_shortcut(&combo)?;
        if binding.enabled_when.is_enabled(ctx) {
            Some(binding.action)
        } else {
            debug!("Shortcut {:?} disabled, swallowing", binding.action);
            None
        }
    }

    /// Full dispatch of a key event.
    ///
    /// Returns `None` for keys nothing cares about.
    pub fn dispatch(&self, key: &KeyEvent, ctx: &ShortcutContext) -> Option<Command> {
        let combo = KeyCombo::from_event(key);

        if let Some(cmd) = self.config.get_global(&combo) {
            return Some(cmd.clone());
        }

        if ctx.is_modal_active() {
            return Some(
                self.config
                    .get_modal(ctx.modal, &combo)
                    .cloned()
                    .unwrap_or(Command::Noop),
            );
        }

        if self.config.get_shortcut(&combo).is_some() {
            return Some(match self.route(key, ctx) {
                Some(action) => Command::Shortcut(action),
                None => Command::Noop,
            });
        }

        if let Some(cmd) = self.config.get_composer(&combo) {
            return Some(cmd.clone());
        }

        match key.code {
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SUPER) =>
            {
                Some(Command::InsertChar(c))
            }
            _ => None,
        }
    }
}

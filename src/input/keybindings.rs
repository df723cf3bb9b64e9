//! Default keybindings.
//!
//! Chat shortcuts carry an [`Enablement`] predicate; the remaining bindings
//! (modal answers, composer editing, pane handling) are plain lookups.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

use super::command::{Command, ShortcutAction};
use super::context::{ModalType, ShortcutContext};

/// Represents a key combination (key code + modifiers).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyCombo {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyCombo {
    pub const fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub const fn ctrl(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::CONTROL)
    }

    pub const fn shift(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::SHIFT)
    }

    /// Control and Shift held together.
    pub const fn ctrl_shift(code: KeyCode) -> Self {
        Self::new(
            code,
            KeyModifiers::CONTROL.union(KeyModifiers::SHIFT),
        )
    }

    /// Normalized combo for a terminal key event.
    ///
    /// Terminals disagree on whether Shift+letter arrives upper- or
    /// lower-case; with Shift held the letter is always lowered so
    /// `Ctrl+Shift+Z` matches either report.
    pub fn from_event(key: &KeyEvent) -> Self {
        let code = match key.code {
            KeyCode::Char(c) if key.modifiers.contains(KeyModifiers::SHIFT) => {
                KeyCode::Char(c.to_ascii_lowercase())
            }
            code => code,
        };
        Self::new(code, key.modifiers)
    }
}

/// When a chat shortcut may fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Enablement {
    Always,
    /// A conversation is focused and has messages
    FocusedNotEmpty,
    /// A conversation is focused
    FocusedPresent,
    /// The new-conversation button is not disabled
    NewButtonEnabled,
}

impl Enablement {
    pub fn is_enabled(&self, ctx: &ShortcutContext) -> bool {
        match self {
            Enablement::Always => true,
            Enablement::FocusedNotEmpty => ctx.focused_conversation_present && !ctx.focused_is_empty,
            Enablement::FocusedPresent => ctx.focused_conversation_present,
            Enablement::NewButtonEnabled => !ctx.disable_new_button(),
        }
    }
}

/// One row of the shortcut table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShortcutBinding {
    pub combo: KeyCombo,
    pub action: ShortcutAction,
    pub enabled_when: Enablement,
}

/// Keybinding configuration for the application.
#[derive(Debug, Clone)]
pub struct KeybindingConfig {
    /// Chat shortcuts, in display order
    pub shortcuts: Vec<ShortcutBinding>,
    /// Always active
    pub global: HashMap<KeyCombo, Command>,
    /// Active while a modal of that type is open
    pub modal: HashMap<ModalType, HashMap<KeyCombo, Command>>,
    /// Active when no modal is open
    pub composer: HashMap<KeyCombo, Command>,
}

impl Default for KeybindingConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl KeybindingConfig {
    pub fn new() -> Self {
        let mut config = Self {
            shortcuts: Vec::new(),
            global: HashMap::new(),
            modal: HashMap::new(),
            composer: HashMap::new(),
        };

        config.setup_shortcuts();
        config.setup_global_bindings();
        config.setup_modal_bindings();
        config.setup_composer_bindings();

        config
    }

    fn setup_shortcuts(&mut self) {
        use Enablement::*;
        use ShortcutAction::*;

        let table = [
            (KeyCombo::ctrl_shift(KeyCode::Char('z')), RegenerateLast, FocusedNotEmpty),
            (KeyCombo::ctrl_shift(KeyCode::Char('b')), BeamLast, FocusedNotEmpty),
            (KeyCombo::ctrl(KeyCode::Char('o')), OpenConversationFile, Always),
            (KeyCombo::ctrl(KeyCode::Char('s')), SaveConversation, Always),
            (KeyCombo::ctrl_shift(KeyCode::Char('n')), NewConversation, NewButtonEnabled),
            (KeyCombo::ctrl_shift(KeyCode::Char('x')), ClearConversation, FocusedNotEmpty),
            (KeyCombo::ctrl_shift(KeyCode::Char('d')), DeleteConversation, FocusedPresent),
            (KeyCombo::ctrl(KeyCode::Char('[')), HistoryBack, Always),
            (KeyCombo::ctrl(KeyCode::Char(']')), HistoryForward, Always),
            (KeyCombo::ctrl_shift(KeyCode::Char('o')), OpenChatLlmOptions, Always),
        ];

        self.shortcuts = table
            .into_iter()
            .map(|(combo, action, enabled_when)| ShortcutBinding {
                combo,
                action,
                enabled_when,
            })
            .collect();
    }

    fn setup_global_bindings(&mut self) {
        // Ctrl+C: Quit
        self.global
            .insert(KeyCombo::ctrl(KeyCode::Char('c')), Command::Quit);
    }

    fn setup_modal_bindings(&mut self) {
        let mut confirmation = HashMap::new();
        confirmation.insert(KeyCombo::plain(KeyCode::Enter), Command::ConfirmPositive);
        confirmation.insert(KeyCombo::plain(KeyCode::Char('y')), Command::ConfirmPositive);
        confirmation.insert(KeyCombo::plain(KeyCode::Esc), Command::ConfirmNegative);
        confirmation.insert(KeyCombo::plain(KeyCode::Char('n')), Command::ConfirmNegative);
        self.modal.insert(ModalType::Confirmation, confirmation);

        let mut surface = HashMap::new();
        surface.insert(KeyCombo::plain(KeyCode::Esc), Command::CloseModal);
        surface.insert(KeyCombo::plain(KeyCode::Enter), Command::CloseModal);
        self.modal.insert(ModalType::Surface, surface);
    }

    fn setup_composer_bindings(&mut self) {
        self.composer
            .insert(KeyCombo::plain(KeyCode::Enter), Command::SubmitComposer);
        self.composer
            .insert(KeyCombo::plain(KeyCode::Backspace), Command::Backspace);
        self.composer
            .insert(KeyCombo::plain(KeyCode::Tab), Command::CycleFocus);

        // Ctrl+T: split, Ctrl+W: close pane
        self.composer
            .insert(KeyCombo::ctrl(KeyCode::Char('t')), Command::SplitPane);
        self.composer
            .insert(KeyCombo::ctrl(KeyCode::Char('w')), Command::ClosePane);

        // Ctrl+G: multicast toggle
        self.composer
            .insert(KeyCombo::ctrl(KeyCode::Char('g')), Command::ToggleMulticast);
    }

    pub fn get_shortcut(&self, combo: &KeyCombo) -> Option<&ShortcutBinding> {
        self.shortcuts.iter().find(|binding| &binding.combo == combo)
    }

    pub fn get_global(&self, combo: &KeyCombo) -> Option<&Command> {
        self.global.get(combo)
    }

    pub fn get_modal(&self, modal: ModalType, combo: &KeyCombo) -> Option<&Command> {
        self.modal.get(&modal).and_then(|bindings| bindings.get(combo))
    }

    pub fn get_composer(&self, combo: &KeyCombo) -> Option<&Command> {
        self.composer.get(combo)
    }
}

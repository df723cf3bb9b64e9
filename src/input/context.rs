//! Input context for deciding which commands are available.
//!
//! Re-derived from the app every time a key is routed; holds no state of
//! its own.

/// The kind of modal currently covering the panes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ModalType {
    /// No modal dialog is active
    #[default]
    None,
    /// A clear/delete confirmation is pending
    Confirmation,
    /// An informational surface (model setup, preferences, diagram, ...)
    Surface,
}

/// Snapshot of the state shortcut enablement depends on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShortcutContext {
    /// The focused pane is bound to an existing conversation
    pub focused_conversation_present: bool,
    /// The focused conversation has no messages (true when none is bound)
    pub focused_is_empty: bool,
    /// Two or more panes are open
    pub is_multi_pane: bool,
    pub modal: ModalType,
}

impl ShortcutContext {
    pub fn new() -> Self {
        Self {
            focused_is_empty: true,
            ..Self::default()
        }
    }

    pub fn with_focused(mut self, present: bool, is_empty: bool) -> Self {
        self.focused_conversation_present = present;
        self.focused_is_empty = is_empty;
        self
    }

    pub fn with_multi_pane(mut self, is_multi_pane: bool) -> Self {
        self.is_multi_pane = is_multi_pane;
        self
    }

    pub fn with_modal(mut self, modal: ModalType) -> Self {
        self.modal = modal;
        self
    }

    /// A new conversation is pointless when the only pane already shows an
    /// empty one.
    pub fn disable_new_button(&self) -> bool {
        self.focused_is_empty && !self.is_multi_pane
    }

    pub fn is_modal_active(&self) -> bool {
        self.modal != ModalType::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_button_gating() {
        let single_empty = ShortcutContext::new().with_focused(true, true);
        assert!(single_empty.disable_new_button());

        let multi_empty = single_empty.clone().with_multi_pane(true);
        assert!(!multi_empty.disable_new_button());

        let single_busy = ShortcutContext::new().with_focused(true, false);
        assert!(!single_busy.disable_new_button());
    }

    #[test]
    fn test_default_context_has_no_modal() {
        let ctx = ShortcutContext::new();
        assert!(!ctx.is_modal_active());
        assert!(ctx.focused_is_empty);
        assert!(ctx.with_modal(ModalType::Confirmation).is_modal_active());
    }
}

//! Commands triggered by keyboard input.
//!
//! [`ShortcutAction`] is the fixed set of chat shortcuts with contextual
//! enablement. [`Command`] is everything the terminal front end can do,
//! shortcuts included.

/// Chat shortcuts routed by the [`ShortcutRouter`](super::ShortcutRouter).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShortcutAction {
    /// Drop the trailing assistant reply and generate again
    RegenerateLast,
    /// Open a beam on the last message
    BeamLast,
    /// Import conversations from a file
    OpenConversationFile,
    /// Export the focused conversation
    SaveConversation,
    /// New (or recycled) conversation in the focused pane
    NewConversation,
    /// Ask to clear the focused conversation
    ClearConversation,
    /// Ask to delete the focused conversation
    DeleteConversation,
    /// Focused pane to the previous conversation
    HistoryBack,
    /// Focused pane to the next conversation
    HistoryForward,
    /// Options of the configured chat model
    OpenChatLlmOptions,
}

impl ShortcutAction {
    /// Short label for help lines.
    pub fn label(&self) -> &'static str {
        match self {
            ShortcutAction::RegenerateLast => "Retry",
            ShortcutAction::BeamLast => "Beam",
            ShortcutAction::OpenConversationFile => "Open",
            ShortcutAction::SaveConversation => "Save",
            ShortcutAction::NewConversation => "New",
            ShortcutAction::ClearConversation => "Clear",
            ShortcutAction::DeleteConversation => "Delete",
            ShortcutAction::HistoryBack => "Previous",
            ShortcutAction::HistoryForward => "Next",
            ShortcutAction::OpenChatLlmOptions => "Model options",
        }
    }
}

/// Anything the front end can do in response to a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// A chat shortcut
    Shortcut(ShortcutAction),

    // Application
    Quit,
    /// Key consumed without effect (e.g. a disabled shortcut)
    Noop,

    // Panes
    CycleFocus,
    /// Open the focused conversation again in a new pane
    SplitPane,
    ClosePane,
    ToggleMulticast,

    // Composer
    InsertChar(char),
    Backspace,
    SubmitComposer,

    // Modals
    ConfirmPositive,
    ConfirmNegative,
    CloseModal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_are_distinct() {
        let all = [
            ShortcutAction::RegenerateLast,
            ShortcutAction::BeamLast,
            ShortcutAction::OpenConversationFile,
            ShortcutAction::SaveConversation,
            ShortcutAction::NewConversation,
            ShortcutAction::ClearConversation,
            ShortcutAction::DeleteConversation,
            ShortcutAction::HistoryBack,
            ShortcutAction::HistoryForward,
            ShortcutAction::OpenChatLlmOptions,
        ];
        let mut labels: Vec<_> = all.iter().map(ShortcutAction::label).collect();
        labels.sort();
        labels.dedup();
        assert_eq!(labels.len(), all.len());
    }
}

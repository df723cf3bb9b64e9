//! Remedial UI effects for failed execution outcomes.

use crate::notifications::Notice;
use crate::traits::ExecuteOutcome;

pub const NO_PERSONA_MESSAGE: &str = "No persona selected.";
pub const NO_CONVERSATION_MESSAGE: &str = "No active conversation.";
pub const NO_HISTORY_MESSAGE: &str = "No conversation history.";

/// Notice key of the missing-persona notice.
pub const NO_PERSONA_KEY: &str = "chat-no-persona";
/// Notice key shared by the missing-conversation and empty-history notices.
pub const NO_CONVERSATION_KEY: &str = "chat-no-conversation";

/// Tabs of the preferences surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PreferencesTab {
    Chat,
    Voice,
    Draw,
    Tools,
}

/// A presentation-level side effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEffect {
    /// Open the model/service setup surface
    OpenModelsSetup,
    /// Open preferences on a tab
    OpenPreferences(PreferencesTab),
    /// Open the options dialog of a chat model
    OpenLlmOptions(String),
    /// Show a transient notice
    Notice(Notice),
}

/// The single effect a given outcome produces; `None` for success.
pub fn effect_for_outcome(outcome: ExecuteOutcome) -> Option<UiEffect> {
    match outcome {
        ExecuteOutcome::Success => None,
        ExecuteOutcome::NoChatLlm => Some(UiEffect::OpenModelsSetup),
        ExecuteOutcome::TextToImageUnconfigured => {
            Some(UiEffect::OpenPreferences(PreferencesTab::Draw))
        }
        ExecuteOutcome::NoPersona => Some(UiEffect::Notice(
            Notice::issue(NO_PERSONA_MESSAGE).with_key(NO_PERSONA_KEY),
        )),
        ExecuteOutcome::NoConversation => Some(UiEffect::Notice(
            Notice::issue(NO_CONVERSATION_MESSAGE).with_key(NO_CONVERSATION_KEY),
        )),
        ExecuteOutcome::NoLastMessage => Some(UiEffect::Notice(
            Notice::issue(NO_HISTORY_MESSAGE).with_key(NO_CONVERSATION_KEY),
        )),
    }
}

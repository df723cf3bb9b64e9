use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{ConversationId, PurposeId};
use super::message::Message;

/// Title shown for a conversation that has none yet.
pub const CHAT_NOVEL_TITLE: &str = "Chat";

/// Fallback used by title notices when the focused conversation is untitled.
pub const NEW_CHAT_TITLE: &str = "New Chat";

/// Purpose assigned to conversations created without an explicit one.
pub const DEFAULT_PURPOSE: &str = "generic";

/// Snapshot of a conversation as held by the registry.
///
/// The orchestration layer only ever reads snapshots; all mutation goes
/// through a [`ConversationHandler`](crate::traits::ConversationHandler).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Conversation {
    pub id: ConversationId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default = "default_purpose")]
    pub system_purpose_id: PurposeId,
    /// Developer-mode conversations get extra composer affordances
    #[serde(default)]
    pub is_developer: bool,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

fn default_purpose() -> PurposeId {
    PurposeId::from(DEFAULT_PURPOSE)
}

impl Conversation {
    /// Create an empty conversation with the given purpose.
    pub fn new(system_purpose_id: Option<PurposeId>) -> Self {
        let now = Utc::now();
        Self {
            id: ConversationId::new(),
            title: None,
            messages: Vec::new(),
            system_purpose_id: system_purpose_id.unwrap_or_else(default_purpose),
            is_developer: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_messages(mut self, messages: Vec<Message>) -> Self {
        self.messages = messages;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Title for display, falling back to [`CHAT_NOVEL_TITLE`].
    pub fn display_title(&self) -> &str {
        match self.title.as_deref() {
            Some(title) if !title.trim().is_empty() => title,
            _ => CHAT_NOVEL_TITLE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MessageRole;

    #[test]
    fn test_new_conversation_is_empty_with_default_purpose() {
        let conversation = Conversation::new(None);
        assert!(conversation.is_empty());
        assert_eq!(conversation.system_purpose_id.as_str(), DEFAULT_PURPOSE);
    }

    #[test]
    fn test_display_title_falls_back() {
        let untitled = Conversation::new(None);
        assert_eq!(untitled.display_title(), CHAT_NOVEL_TITLE);

        let blank = Conversation::new(None).with_title("   ");
        assert_eq!(blank.display_title(), CHAT_NOVEL_TITLE);

        let titled = Conversation::new(None).with_title("Rust questions");
        assert_eq!(titled.display_title(), "Rust questions");
    }

    #[test]
    fn test_deserialize_minimal_conversation() {
        let json = r#"{"id": 7, "messages": []}"#;
        let conversation: Conversation = serde_json::from_str(json).unwrap();
        assert_eq!(conversation.id.as_str(), "7");
        assert_eq!(conversation.system_purpose_id.as_str(), DEFAULT_PURPOSE);
        assert!(conversation.title.is_none());
    }

    #[test]
    fn test_last_message() {
        let conversation = Conversation::new(None).with_messages(vec![
            Message::text(MessageRole::User, "q"),
            Message::text(MessageRole::Assistant, "a"),
        ]);
        assert_eq!(conversation.last_message().unwrap().role, MessageRole::Assistant);
    }
}

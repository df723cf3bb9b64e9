//! Conversation registry abstraction.
//!
//! The registry owns conversations. The orchestration layer reads snapshots
//! through [`ConversationStore`] and mutates a conversation only through the
//! [`ConversationHandler`] the store hands out for it.

use std::sync::Arc;

use crate::models::{Conversation, ConversationId, Message, MessageId, PurposeId};

/// Direction of a history move in the registry's recency ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HistoryDirection {
    /// Towards older conversations
    Back,
    /// Towards newer conversations
    Forward,
}

impl HistoryDirection {
    pub fn reverse(self) -> Self {
        match self {
            HistoryDirection::Back => HistoryDirection::Forward,
            HistoryDirection::Forward => HistoryDirection::Back,
        }
    }
}

/// Mutation surface of a single conversation.
pub trait ConversationHandler: Send + Sync {
    /// Id of the conversation this handler mutates.
    fn conversation_id(&self) -> &ConversationId;

    /// Append a message at the end of the history.
    fn message_append(&self, message: Message);

    /// Truncate the history relative to `message_id`.
    ///
    /// An `offset` of 0 keeps the message, -1 drops it as well.
    fn history_truncate_to(&self, message_id: &MessageId, offset: isize);

    /// Remove every message.
    fn history_clear(&self);

    /// Open the beam (multi-candidate generation) for this conversation.
    ///
    /// `history` is the context, `seeds` are existing candidates to start from,
    /// `anchor` is the message the chosen candidate will replace.
    fn beam_invoke(&self, history: Vec<Message>, seeds: Vec<Message>, anchor: Option<MessageId>);

    /// Whether the beam is currently open for this conversation.
    fn is_beam_open(&self) -> bool;
}

/// The conversation registry.
///
/// Implementations must be safe to call from spawned tasks; all methods take
/// `&self`.
pub trait ConversationStore: Send + Sync {
    /// Snapshot of a conversation, `None` if it does not exist (anymore).
    fn conversation(&self, id: &ConversationId) -> Option<Conversation>;

    /// Handler for a conversation, `None` if it does not exist.
    fn handler(&self, id: &ConversationId) -> Option<Arc<dyn ConversationHandler>>;

    /// All conversation ids in stack order (newest first).
    fn conversation_ids(&self) -> Vec<ConversationId>;

    /// Delete conversations and return the id that should be focused next.
    ///
    /// The store decides the replacement policy and creates a fresh
    /// conversation (with `fallback_purpose`) when none remain.
    fn delete_conversations(
        &self,
        ids: &[ConversationId],
        fallback_purpose: Option<PurposeId>,
    ) -> ConversationId;

    /// Clone `source` up to and including `message_id` (whole history when
    /// `None`). Returns the new id, or `None` if the source does not exist.
    fn branch_conversation(
        &self,
        source: &ConversationId,
        message_id: Option<&MessageId>,
    ) -> Option<ConversationId>;

    /// Create a new empty conversation at the top of the stack.
    fn prepend_new_conversation(&self, purpose: Option<PurposeId>) -> ConversationId;

    /// Neighbour of `from` in the recency ordering.
    ///
    /// `None` when there is no conversation in that direction.
    fn neighbor(&self, from: &ConversationId, direction: HistoryDirection)
        -> Option<ConversationId>;

    /// Zero-based position of a conversation in the stack.
    fn position(&self, id: &ConversationId) -> Option<usize> {
        self.conversation_ids().iter().position(|candidate| candidate == id)
    }

    fn has_conversations(&self) -> bool {
        !self.conversation_ids().is_empty()
    }
}

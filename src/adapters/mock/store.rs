//! In-memory conversation registry.
//!
//! Backs both the test suites and the demo binary. Conversations live in a
//! single stack (newest first) behind an `Arc<Mutex<..>>`, and every handler
//! shares that state.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use tracing::debug;

use crate::models::{Conversation, ConversationId, Message, MessageId, PurposeId};
use crate::traits::{ConversationHandler, ConversationStore, HistoryDirection};

/// Arguments of the last `beam_invoke` on a conversation.
#[derive(Debug, Clone, PartialEq)]
pub struct BeamInvocation {
    pub history: Vec<Message>,
    pub seeds: Vec<Message>,
    pub anchor: Option<MessageId>,
}

#[derive(Debug, Default)]
struct StoreState {
    /// Stack order, newest first
    conversations: Vec<Conversation>,
    beams: HashMap<ConversationId, BeamInvocation>,
    open_beams: Vec<ConversationId>,
    delete_calls: Vec<Vec<ConversationId>>,
    appends: usize,
}

impl StoreState {
    fn index_of(&self, id: &ConversationId) -> Option<usize> {
        self.conversations.iter().position(|c| &c.id == id)
    }

    fn get_mut(&mut self, id: &ConversationId) -> Option<&mut Conversation> {
        self.conversations.iter_mut().find(|c| &c.id == id)
    }
}

fn lock(state: &Mutex<StoreState>) -> MutexGuard<'_, StoreState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// In-memory [`ConversationStore`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryConversationStore {
    state: Arc<Mutex<StoreState>>,
}

impl InMemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a conversation on top of the stack.
    pub fn insert(&self, conversation: Conversation) -> ConversationId {
        let id = conversation.id.clone();
        lock(&self.state).conversations.insert(0, conversation);
        id
    }

    /// Push an empty conversation with a title.
    pub fn insert_titled(&self, title: &str) -> ConversationId {
        self.insert(Conversation::new(None).with_title(title))
    }

    /// Push a conversation holding `messages`.
    pub fn insert_with_messages(&self, messages: Vec<Message>) -> ConversationId {
        self.insert(Conversation::new(None).with_messages(messages))
    }

    pub fn len(&self) -> usize {
        lock(&self.state).conversations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn messages(&self, id: &ConversationId) -> Vec<Message> {
        self.conversation(id).map(|c| c.messages).unwrap_or_default()
    }

    /// Total number of `message_append` calls across all handlers.
    pub fn append_count(&self) -> usize {
        lock(&self.state).appends
    }

    /// Every id list passed to `delete_conversations`, in call order.
    pub fn delete_calls(&self) -> Vec<Vec<ConversationId>> {
        lock(&self.state).delete_calls.clone()
    }

    pub fn last_beam(&self, id: &ConversationId) -> Option<BeamInvocation> {
        lock(&self.state).beams.get(id).cloned()
    }

    pub fn close_beam(&self, id: &ConversationId) {
        lock(&self.state).open_beams.retain(|open| open != id);
    }

    /// Remove a conversation behind the orchestration layer's back.
    pub fn remove_silently(&self, id: &ConversationId) {
        lock(&self.state).conversations.retain(|c| &c.id != id);
    }
}

impl ConversationStore for InMemoryConversationStore {
    fn conversation(&self, id: &ConversationId) -> Option<Conversation> {
        let state = lock(&self.state);
        state.index_of(id).map(|idx| state.conversations[idx].clone())
    }

    fn handler(&self, id: &ConversationId) -> Option<Arc<dyn ConversationHandler>> {
        lock(&self.state).index_of(id)?;
        Some(Arc::new(InMemoryHandler {
            conversation_id: id.clone(),
            state: Arc::clone(&self.state),
        }))
    }

    fn conversation_ids(&self) -> Vec<ConversationId> {
        lock(&self.state)
            .conversations
            .iter()
            .map(|c| c.id.clone())
            .collect()
    }

    fn delete_conversations(
        &self,
        ids: &[ConversationId],
        fallback_purpose: Option<PurposeId>,
    ) -> ConversationId {
        let mut state = lock(&self.state);
        state.delete_calls.push(ids.to_vec());
        state.conversations.retain(|c| !ids.contains(&c.id));
        if state.conversations.is_empty() {
            debug!("Registry emptied by delete, creating a fresh conversation");
            state.conversations.push(Conversation::new(fallback_purpose));
        }
        state.conversations[0].id.clone()
    }

    fn branch_conversation(
        &self,
        source: &ConversationId,
        message_id: Option<&MessageId>,
    ) -> Option<ConversationId> {
        let mut state = lock(&self.state);
        let original = state.conversations[state.index_of(source)?].clone();

        let keep = match message_id {
            Some(message_id) => original
                .messages
                .iter()
                .position(|m| &m.id == message_id)
                .map(|idx| idx + 1)
                .unwrap_or(original.messages.len()),
            None => original.messages.len(),
        };

        let mut branch = Conversation::new(Some(original.system_purpose_id.clone()))
            .with_messages(original.messages[..keep].to_vec());
        branch.title = original.title.clone();
        branch.is_developer = original.is_developer;
        let id = branch.id.clone();
        state.conversations.insert(0, branch);
        Some(id)
    }

    fn prepend_new_conversation(&self, purpose: Option<PurposeId>) -> ConversationId {
        let conversation = Conversation::new(purpose);
        let id = conversation.id.clone();
        lock(&self.state).conversations.insert(0, conversation);
        id
    }

    fn neighbor(
        &self,
        from: &ConversationId,
        direction: HistoryDirection,
    ) -> Option<ConversationId> {
        let state = lock(&self.state);
        let idx = state.index_of(from)?;
        let target = match direction {
            HistoryDirection::Back => idx.checked_add(1)?,
            HistoryDirection::Forward => idx.checked_sub(1)?,
        };
        state.conversations.get(target).map(|c| c.id.clone())
    }
}

/// Handler mutating one conversation of an [`InMemoryConversationStore`].
#[derive(Debug)]
pub struct InMemoryHandler {
    conversation_id: ConversationId,
    state: Arc<Mutex<StoreState>>,
}

impl ConversationHandler for InMemoryHandler {
    fn conversation_id(&self) -> &ConversationId {
        &self.conversation_id
    }

    fn message_append(&self, message: Message) {
        let mut state = lock(&self.state);
        state.appends += 1;
        if let Some(conversation) = state.get_mut(&self.conversation_id) {
            conversation.messages.push(message);
            conversation.updated_at = Utc::now();
        }
    }

    fn history_truncate_to(&self, message_id: &MessageId, offset: isize) {
        let mut state = lock(&self.state);
        if let Some(conversation) = state.get_mut(&self.conversation_id) {
            if let Some(idx) = conversation.messages.iter().position(|m| &m.id == message_id) {
                let keep = (idx as isize + 1 + offset).max(0) as usize;
                conversation.messages.truncate(keep);
                conversation.updated_at = Utc::now();
            }
        }
    }

    fn history_clear(&self) {
        let mut state = lock(&self.state);
        if let Some(conversation) = state.get_mut(&self.conversation_id) {
            conversation.messages.clear();
            conversation.updated_at = Utc::now();
        }
    }

    fn beam_invoke(&self, history: Vec<Message>, seeds: Vec<Message>, anchor: Option<MessageId>) {
        let mut state = lock(&self.state);
        state.beams.insert(
            self.conversation_id.clone(),
            BeamInvocation {
                history,
                seeds,
                anchor,
            },
        );
        if !state.open_beams.contains(&self.conversation_id) {
            state.open_beams.push(self.conversation_id.clone());
        }
    }

    fn is_beam_open(&self) -> bool {
        lock(&self.state).open_beams.contains(&self.conversation_id)
    }
}

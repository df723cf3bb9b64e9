//! Demo execution engine that echoes the last user message.
//!
//! Stands in for a real generation backend in the terminal binary.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::models::{ConversationId, Message, MessageRole};
use crate::traits::{ConversationStore, ExecuteMode, ExecuteOutcome, ExecutionEngine};

/// Echo engine over a conversation registry.
///
/// # Example
///
/// ```ignore
/// use panechat::adapters::EchoEngine;
///
/// let engine = EchoEngine::new(store.clone(), Some("echo-1".to_string()));
/// let outcome = engine.execute(ExecuteMode::GenerateContent, &id, "demo").await;
/// ```
pub struct EchoEngine {
    store: Arc<dyn ConversationStore>,
    chat_llm: Option<String>,
    delay: Duration,
}

impl EchoEngine {
    pub fn new(store: Arc<dyn ConversationStore>, chat_llm: Option<String>) -> Self {
        Self {
            store,
            chat_llm,
            delay: Duration::from_millis(250),
        }
    }

    /// Simulated generation latency.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    fn reply_to(llm: &str, last: &Message) -> String {
        format!("[{}] {}", llm, last.text_content())
    }
}

#[async_trait]
impl ExecutionEngine for EchoEngine {
    async fn execute(
        &self,
        mode: ExecuteMode,
        conversation_id: &ConversationId,
        caller: &str,
    ) -> ExecuteOutcome {
        let Some(llm) = self.chat_llm.as_deref() else {
            return ExecuteOutcome::NoChatLlm;
        };
        let Some(conversation) = self.store.conversation(conversation_id) else {
            return ExecuteOutcome::NoConversation;
        };

        match mode {
            ExecuteMode::AppendUser => ExecuteOutcome::Success,
            ExecuteMode::GenerateImage => ExecuteOutcome::TextToImageUnconfigured,
            ExecuteMode::GenerateContent | ExecuteMode::BeamContent | ExecuteMode::ReactContent => {
                let Some(last) = conversation.last_message() else {
                    return ExecuteOutcome::NoLastMessage;
                };
                let reply = Self::reply_to(llm, last);

                tokio::time::sleep(self.delay).await;

                match self.store.handler(conversation_id) {
                    Some(handler) => {
                        debug!("{} echoing into {}", caller, conversation_id);
                        handler.message_append(Message::text(MessageRole::Assistant, reply));
                        ExecuteOutcome::Success
                    }
                    // deleted while "generating"
                    None => ExecuteOutcome::NoConversation,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::InMemoryConversationStore;

    fn engine(store: &InMemoryConversationStore, llm: Option<&str>) -> EchoEngine {
        EchoEngine::new(Arc::new(store.clone()), llm.map(str::to_string))
            .with_delay(Duration::ZERO)
    }

    #[tokio::test]
    async fn test_echoes_last_message() {
        let store = InMemoryConversationStore::new();
        let id = store.insert_with_messages(vec![Message::text(MessageRole::User, "ping")]);

        let outcome = engine(&store, Some("echo-1"))
            .execute(ExecuteMode::GenerateContent, &id, "test")
            .await;

        assert_eq!(outcome, ExecuteOutcome::Success);
        let messages = store.messages(&id);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].role, MessageRole::Assistant);
        assert_eq!(messages[1].text_content(), "[echo-1] ping");
    }

    #[tokio::test]
    async fn test_failure_outcomes() {
        let store = InMemoryConversationStore::new();
        let empty = store.insert_titled("empty");

        assert_eq!(
            engine(&store, None)
                .execute(ExecuteMode::GenerateContent, &empty, "test")
                .await,
            ExecuteOutcome::NoChatLlm
        );
        assert_eq!(
            engine(&store, Some("e"))
                .execute(ExecuteMode::GenerateContent, &empty, "test")
                .await,
            ExecuteOutcome::NoLastMessage
        );
        assert_eq!(
            engine(&store, Some("e"))
                .execute(ExecuteMode::GenerateContent, &ConversationId::from("x"), "test")
                .await,
            ExecuteOutcome::NoConversation
        );
        assert_eq!(
            engine(&store, Some("e"))
                .execute(ExecuteMode::GenerateImage, &empty, "test")
                .await,
            ExecuteOutcome::TextToImageUnconfigured
        );
    }
}

//! Composer bridge: delivers one composed message to one or many
//! conversations.
//!
//! With multicast on and more than one distinct conversation open, the
//! message goes to every open conversation; otherwise only to the target.
//! Each recipient gets its own deep copy of the fragments, the user message
//! is appended synchronously, and generation is then spawned per
//! conversation without waiting for it.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::execution::{ExecutionDispatcher, CALLER_COMPOSER};
use crate::models::{
    duplicate_fragments, ConversationId, Fragment, Message, MessageMetadata, MessageRole,
};
use crate::traits::{ConversationStore, ExecuteMode};

/// Conversations a composed message is delivered to.
///
/// The target always comes first and the result holds no duplicates.
pub fn multicast_targets(
    target: &ConversationId,
    open_ids: &[ConversationId],
    multicast: bool,
) -> Vec<ConversationId> {
    let mut distinct_open: Vec<&ConversationId> = Vec::with_capacity(open_ids.len());
    for id in open_ids {
        if !distinct_open.contains(&id) {
            distinct_open.push(id);
        }
    }

    let mut targets = vec![target.clone()];
    if multicast && distinct_open.len() > 1 {
        for id in distinct_open {
            if !targets.contains(id) {
                targets.push(id.clone());
            }
        }
    }
    targets
}

/// A generation request started for one recipient.
#[derive(Debug)]
pub struct Delivery {
    pub conversation_id: ConversationId,
    pub generation: JoinHandle<bool>,
}

/// Bridges the composer to the registry and the dispatcher.
#[derive(Clone)]
pub struct MulticastComposerBridge {
    store: Arc<dyn ConversationStore>,
    dispatcher: ExecutionDispatcher,
}

impl MulticastComposerBridge {
    pub fn new(store: Arc<dyn ConversationStore>, dispatcher: ExecutionDispatcher) -> Self {
        Self { store, dispatcher }
    }

    /// Append the composed message to every target and start generation.
    ///
    /// Targets that no longer exist are skipped. Returns one [`Delivery`] per
    /// recipient, in target order; empty when nothing was delivered.
    pub fn fan_out(
        &self,
        conversation_id: &ConversationId,
        mode: ExecuteMode,
        fragments: &[Fragment],
        metadata: Option<&MessageMetadata>,
        open_ids: &[ConversationId],
        multicast: bool,
    ) -> Vec<Delivery> {
        let targets = multicast_targets(conversation_id, open_ids, multicast);

        let resolved: Vec<_> = targets
            .into_iter()
            .filter_map(|id| match self.store.handler(&id) {
                Some(handler) => Some((id, handler)),
                None => {
                    debug!("Composer target {} no longer exists, skipping", id);
                    None
                }
            })
            .collect();

        if resolved.is_empty() {
            info!("Composer had no live target for {}", conversation_id);
            return Vec::new();
        }

        if resolved.len() > 1 {
            debug!("Multicasting {} to {} conversations", mode, resolved.len());
        }

        resolved
            .into_iter()
            .map(|(id, handler)| {
                let mut message =
                    Message::from_fragments(MessageRole::User, duplicate_fragments(fragments));
                if let Some(metadata) = metadata.filter(|m| !m.is_empty()) {
                    message = message.with_metadata(metadata.duplicate());
                }
                handler.message_append(message);

                let generation = self.dispatcher.spawn(mode, id.clone(), CALLER_COMPOSER);
                Delivery {
                    conversation_id: id,
                    generation,
                }
            })
            .collect()
    }

    /// Same as [`fan_out`](Self::fan_out), dropping the generation handles.
    ///
    /// Returns `true` once all appends were issued, `false` if no target
    /// resolved.
    pub fn dispatch(
        &self,
        conversation_id: &ConversationId,
        mode: ExecuteMode,
        fragments: &[Fragment],
        metadata: Option<&MessageMetadata>,
        open_ids: &[ConversationId],
        multicast: bool,
    ) -> bool {
        !self
            .fan_out(conversation_id, mode, fragments, metadata, open_ids, multicast)
            .is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{InMemoryConversationStore, MockExecutionEngine};
    use crate::models::ReferenceItem;
    use tokio::sync::mpsc;

    fn ids(names: &[&str]) -> Vec<ConversationId> {
        names.iter().map(|n| ConversationId::from(*n)).collect()
    }

    #[test]
    fn test_targets_without_multicast() {
        let target = ConversationId::from("a");
        assert_eq!(multicast_targets(&target, &ids(&["a", "b"]), false), ids(&["a"]));
    }

    #[test]
    fn test_targets_need_two_distinct_open() {
        let target = ConversationId::from("a");
        assert_eq!(multicast_targets(&target, &ids(&["a", "a"]), true), ids(&["a"]));
        assert_eq!(
            multicast_targets(&target, &ids(&["b", "a", "b", "c"]), true),
            ids(&["a", "b", "c"])
        );
    }

    fn bridge(
        store: &InMemoryConversationStore,
        engine: &MockExecutionEngine,
    ) -> MulticastComposerBridge {
        let (tx, _rx) = mpsc::unbounded_channel();
        let dispatcher = ExecutionDispatcher::new(Arc::new(engine.clone()), tx);
        MulticastComposerBridge::new(Arc::new(store.clone()), dispatcher)
    }

    #[tokio::test]
    async fn test_fan_out_copies_fragments_per_recipient() {
        let store = InMemoryConversationStore::new();
        let engine = MockExecutionEngine::new();
        let a = store.insert_titled("a");
        let b = store.insert_titled("b");
        let fragments = vec![Fragment::text("hello")];
        let metadata = MessageMetadata {
            in_reference_to: vec![ReferenceItem {
                quote: "earlier".to_string(),
                source_message_id: None,
            }],
        };

        let deliveries = bridge(&store, &engine).fan_out(
            &a,
            ExecuteMode::GenerateContent,
            &fragments,
            Some(&metadata),
            &[a.clone(), b.clone()],
            true,
        );
        for delivery in deliveries {
            assert!(delivery.generation.await.unwrap());
        }

        let in_a = store.messages(&a);
        let in_b = store.messages(&b);
        assert_eq!(in_a.len(), 1);
        assert_eq!(in_b.len(), 1);
        assert_eq!(in_a[0].text_content(), "hello");
        assert_ne!(in_a[0].fragments[0].fragment_id(), fragments[0].fragment_id());
        assert_ne!(in_a[0].fragments[0].fragment_id(), in_b[0].fragments[0].fragment_id());
        assert_eq!(in_b[0].metadata.as_ref(), Some(&metadata));
        assert_eq!(engine.called_ids(), vec![a, b]);
    }

    #[tokio::test]
    async fn test_dispatch_skips_missing_targets() {
        let store = InMemoryConversationStore::new();
        let engine = MockExecutionEngine::new();
        let live = store.insert_titled("live");
        let gone = ConversationId::from("gone");

        let delivered = bridge(&store, &engine).dispatch(
            &gone,
            ExecuteMode::GenerateContent,
            &[Fragment::text("hi")],
            None,
            &[gone.clone(), live.clone()],
            true,
        );

        assert!(delivered);
        assert_eq!(store.messages(&live).len(), 1);
    }

    #[tokio::test]
    async fn test_dispatch_with_nothing_resolved() {
        let store = InMemoryConversationStore::new();
        let engine = MockExecutionEngine::new();
        let gone = ConversationId::from("gone");

        let delivered = bridge(&store, &engine).dispatch(
            &gone,
            ExecuteMode::GenerateContent,
            &[Fragment::text("hi")],
            None,
            &[],
            false,
        );

        assert!(!delivered);
        assert_eq!(store.append_count(), 0);
        assert_eq!(engine.call_count(), 0);
    }
}

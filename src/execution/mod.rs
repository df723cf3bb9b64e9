//! Execution dispatcher.
//!
//! Wraps the [`ExecutionEngine`] with a uniform outcome contract: every call
//! produces exactly one [`ExecuteOutcome`](crate::traits::ExecuteOutcome),
//! maps it to at most one remedial [`UiEffect`], and reports both to the app
//! over the message channel. The app applies the effect after checking the
//! conversation still exists.

mod effects;

pub use effects::{
    effect_for_outcome, PreferencesTab, UiEffect, NO_CONVERSATION_KEY, NO_CONVERSATION_MESSAGE,
    NO_HISTORY_MESSAGE, NO_PERSONA_KEY, NO_PERSONA_MESSAGE,
};

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::app::AppMessage;
use crate::models::ConversationId;
use crate::traits::{ExecuteMode, ExecutionEngine};

/// Caller label for composer submissions.
pub const CALLER_COMPOSER: &str = "chat-composer-action";
/// Caller label for the regenerate-last shortcut.
pub const CALLER_REGENERATE: &str = "chat-regenerate-last";
/// Caller label for re-running the whole history.
pub const CALLER_EXECUTE_HISTORY: &str = "chat-execute-history";
/// Caller label for image generation from message text.
pub const CALLER_IMAGINE: &str = "chat-imagine-from-text";

/// Runs generation requests and routes their outcomes back to the app.
#[derive(Clone)]
pub struct ExecutionDispatcher {
    engine: Arc<dyn ExecutionEngine>,
    message_tx: mpsc::UnboundedSender<AppMessage>,
}

impl ExecutionDispatcher {
    pub fn new(
        engine: Arc<dyn ExecutionEngine>,
        message_tx: mpsc::UnboundedSender<AppMessage>,
    ) -> Self {
        Self { engine, message_tx }
    }

    /// Run `mode` on a conversation and resolve the outcome.
    ///
    /// Returns `true` only on success. Never fails: every non-success outcome
    /// is turned into its effect and reported as
    /// [`AppMessage::ExecutionResolved`].
    pub async fn run_and_resolve(
        &self,
        mode: ExecuteMode,
        conversation_id: &ConversationId,
        caller: &str,
    ) -> bool {
        let outcome = self.engine.execute(mode, conversation_id, caller).await;
        let effect = effect_for_outcome(outcome);

        if outcome.is_success() {
            debug!("{} {} on {} succeeded", caller, mode, conversation_id);
        } else {
            info!(
                "{} {} on {} resolved with {}",
                caller,
                mode,
                conversation_id,
                outcome.code()
            );
        }

        let message = AppMessage::ExecutionResolved {
            conversation_id: conversation_id.clone(),
            mode,
            caller: caller.to_string(),
            outcome,
            effect,
        };
        if self.message_tx.send(message).is_err() {
            debug!("App channel closed, dropping outcome for {}", conversation_id);
        }

        outcome.is_success()
    }

    /// Fire-and-forget form of [`run_and_resolve`](Self::run_and_resolve).
    ///
    /// The handle may be dropped; the outcome still reaches the app.
    pub fn spawn(
        &self,
        mode: ExecuteMode,
        conversation_id: ConversationId,
        caller: &'static str,
    ) -> JoinHandle<bool> {
        let dispatcher = self.clone();
        tokio::spawn(async move {
            dispatcher
                .run_and_resolve(mode, &conversation_id, caller)
                .await
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::MockExecutionEngine;
    use crate::traits::ExecuteOutcome;

    fn dispatcher(
        engine: &MockExecutionEngine,
    ) -> (ExecutionDispatcher, mpsc::UnboundedReceiver<AppMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (ExecutionDispatcher::new(Arc::new(engine.clone()), tx), rx)
    }

    #[tokio::test]
    async fn test_success_reports_without_effect() {
        let engine = MockExecutionEngine::new();
        let (dispatcher, mut rx) = dispatcher(&engine);
        let id = ConversationId::from("c1");

        let ok = dispatcher
            .run_and_resolve(ExecuteMode::GenerateContent, &id, CALLER_COMPOSER)
            .await;

        assert!(ok);
        match rx.recv().await {
            Some(AppMessage::ExecutionResolved {
                conversation_id,
                outcome,
                effect,
                caller,
                ..
            }) => {
                assert_eq!(conversation_id, id);
                assert_eq!(outcome, ExecuteOutcome::Success);
                assert_eq!(effect, None);
                assert_eq!(caller, CALLER_COMPOSER);
            }
            other => panic!("unexpected message: {:?}", other),
        }
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_failure_reports_exactly_one_effect() {
        let engine = MockExecutionEngine::with_default(ExecuteOutcome::NoChatLlm);
        let (dispatcher, mut rx) = dispatcher(&engine);

        let ok = dispatcher
            .run_and_resolve(ExecuteMode::GenerateContent, &ConversationId::from("c1"), "test")
            .await;

        assert!(!ok);
        match rx.recv().await {
            Some(AppMessage::ExecutionResolved { effect, .. }) => {
                assert_eq!(effect, Some(UiEffect::OpenModelsSetup));
            }
            other => panic!("unexpected message: {:?}", other),
        }
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_closed_channel_does_not_fail() {
        let engine = MockExecutionEngine::new();
        let (dispatcher, rx) = dispatcher(&engine);
        drop(rx);

        assert!(
            dispatcher
                .run_and_resolve(ExecuteMode::AppendUser, &ConversationId::from("c1"), "test")
                .await
        );
    }

    #[tokio::test]
    async fn test_spawn_passes_mode_and_caller() {
        let engine = MockExecutionEngine::new();
        let (dispatcher, _rx) = dispatcher(&engine);

        let handle = dispatcher.spawn(
            ExecuteMode::GenerateImage,
            ConversationId::from("c2"),
            CALLER_IMAGINE,
        );
        assert!(handle.await.unwrap());

        let calls = engine.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].mode, ExecuteMode::GenerateImage);
        assert_eq!(calls[0].caller, CALLER_IMAGINE);
    }
}

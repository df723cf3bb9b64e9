//! Execution engine abstraction.
//!
//! The engine performs the actual generation (LLM calls, image generation,
//! beams). The orchestration layer passes the mode through opaquely and only
//! interprets the closed [`ExecuteOutcome`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::ConversationId;

/// What the engine should do with a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExecuteMode {
    /// Generate the next assistant message from the history
    GenerateContent,
    /// Open a beam on the last message
    BeamContent,
    /// Only append the user message, no generation
    AppendUser,
    /// Generate an image from the last user message
    GenerateImage,
    /// Run a reaction/follow-up on the content
    ReactContent,
}

impl ExecuteMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecuteMode::GenerateContent => "generate-content",
            ExecuteMode::BeamContent => "beam-content",
            ExecuteMode::AppendUser => "append-user",
            ExecuteMode::GenerateImage => "generate-image",
            ExecuteMode::ReactContent => "react-content",
        }
    }
}

impl fmt::Display for ExecuteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Closed result of one execution request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExecuteOutcome {
    Success,
    /// No chat model is configured
    NoChatLlm,
    /// Image generation was requested but no text-to-image service is set up
    TextToImageUnconfigured,
    /// The conversation has no persona
    NoPersona,
    /// The conversation is not active (or does not exist)
    NoConversation,
    /// There is no message to act on
    NoLastMessage,
}

impl ExecuteOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ExecuteOutcome::Success)
    }

    /// Short code for logging.
    pub fn code(&self) -> &'static str {
        match self {
            ExecuteOutcome::Success => "ok",
            ExecuteOutcome::NoChatLlm => "err-no-chatllm",
            ExecuteOutcome::TextToImageUnconfigured => "err-t2i-unconfigured",
            ExecuteOutcome::NoPersona => "err-no-persona",
            ExecuteOutcome::NoConversation => "err-no-conversation",
            ExecuteOutcome::NoLastMessage => "err-no-last-message",
        }
    }
}

/// The external generation engine.
///
/// Never fails with an error: every failure is one of the closed outcomes.
#[async_trait]
pub trait ExecutionEngine: Send + Sync {
    /// Run `mode` on a conversation. `caller` is a label used for logging.
    async fn execute(
        &self,
        mode: ExecuteMode,
        conversation_id: &ConversationId,
        caller: &str,
    ) -> ExecuteOutcome;
}

//! AppMessage enum for async communication within the application.

use crate::error::{ChatError, ErrorContext};
use crate::execution::UiEffect;
use crate::models::ConversationId;
use crate::traits::{ExecuteMode, ExecuteOutcome, ImportOutcome};

/// Why a background collaborator task did not complete.
///
/// A cloneable digest of a [`ChatError`] so it can travel over the channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskFailure {
    /// The user dismissed the dialog; reported silently
    Cancelled,
    Failed {
        code: &'static str,
        message: String,
    },
}

impl TaskFailure {
    /// Wrap a collaborator error with its context, log it and digest it.
    pub fn report(err: impl Into<ChatError>, context: ErrorContext) -> Self {
        let err = err.into().with_context(context);
        if !err.is_cancelled() {
            tracing::warn!(
                "{} [{}]: {} ({})",
                err.context().map(ErrorContext::to_log_string).unwrap_or_default(),
                err.error_code(),
                err,
                err.recovery_hint()
            );
        }
        TaskFailure::from(&err)
    }
}

impl From<&ChatError> for TaskFailure {
    fn from(err: &ChatError) -> Self {
        if err.is_cancelled() {
            TaskFailure::Cancelled
        } else {
            TaskFailure::Failed {
                code: err.error_code(),
                message: err.user_message(),
            }
        }
    }
}

impl From<ChatError> for TaskFailure {
    fn from(err: ChatError) -> Self {
        TaskFailure::from(&err)
    }
}

/// Messages received from background tasks.
#[derive(Debug, Clone)]
pub enum AppMessage {
    /// A generation request finished; `effect` is applied only if the
    /// conversation still exists
    ExecutionResolved {
        conversation_id: ConversationId,
        mode: ExecuteMode,
        caller: String,
        outcome: ExecuteOutcome,
        effect: Option<UiEffect>,
    },
    /// A conversation export finished
    ConversationSaved {
        conversation_id: ConversationId,
        result: Result<(), TaskFailure>,
    },
    /// A conversation import finished
    ConversationsOpened(Result<ImportOutcome, TaskFailure>),
    /// Text-to-speech finished
    SpeechFinished(Result<(), TaskFailure>),
}

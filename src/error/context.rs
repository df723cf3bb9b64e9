//! Context attached to errors for debugging.

use chrono::{DateTime, Utc};

use crate::models::ConversationId;

/// Where and when an error happened.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorContext {
    /// Operation that failed, e.g. `save_conversation_file`.
    pub operation: String,

    /// Conversation the operation targeted, if any.
    pub conversation_id: Option<ConversationId>,

    pub timestamp: DateTime<Utc>,

    /// Component the error originated from.
    pub component: Option<String>,
}

impl ErrorContext {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            conversation_id: None,
            timestamp: Utc::now(),
            component: None,
        }
    }

    pub fn with_conversation_id(mut self, conversation_id: &ConversationId) -> Self {
        self.conversation_id = Some(conversation_id.clone());
        self
    }

    pub fn with_component(mut self, component: impl Into<String>) -> Self {
        self.component = Some(component.into());
        self
    }

    /// Formatted context string suitable for logging.
    pub fn to_log_string(&self) -> String {
        let mut parts = vec![format!("operation={}", self.operation)];

        if let Some(ref conversation_id) = self.conversation_id {
            parts.push(format!("conversation_id={}", conversation_id));
        }

        if let Some(ref component) = self.component {
            parts.push(format!("component={}", component));
        }

        parts.push(format!("timestamp={}", self.timestamp.to_rfc3339()));

        parts.join(" ")
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new("unknown")
    }
}

impl std::fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.operation)?;

        if let Some(ref conversation_id) = self.conversation_id {
            write!(f, " conversation={}", conversation_id)?;
        }

        Ok(())
    }
}

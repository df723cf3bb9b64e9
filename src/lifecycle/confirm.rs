//! Two-phase confirmation for destructive actions.

use tracing::debug;

use crate::models::ConversationId;

/// Holds at most one pending request; a newer request displaces the older.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationSlot<T> {
    pending: Option<T>,
}

impl<T> Default for ConfirmationSlot<T> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<T: std::fmt::Debug> ConfirmationSlot<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a request, returning the one it displaced.
    pub fn request(&mut self, value: T) -> Option<T> {
        let displaced = self.pending.replace(value);
        if let Some(ref old) = displaced {
            debug!("Pending confirmation {:?} displaced by a newer request", old);
        }
        displaced
    }

    /// Take the pending request, leaving the slot empty.
    pub fn take(&mut self) -> Option<T> {
        self.pending.take()
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn pending(&self) -> Option<&T> {
        self.pending.as_ref()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// A destructive intent waiting for the user's answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationRequest {
    Clear(ConversationId),
    Delete(Vec<ConversationId>),
}

/// Text shown by the confirmation dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationPrompt {
    pub text: String,
    pub positive_label: String,
}

impl ConfirmationRequest {
    pub fn prompt(&self) -> ConfirmationPrompt {
        match self {
            ConfirmationRequest::Clear(_) => ConfirmationPrompt {
                text: "Are you sure you want to discard all messages?".to_string(),
                positive_label: "Clear conversation".to_string(),
            },
            ConfirmationRequest::Delete(ids) if ids.len() == 1 => ConfirmationPrompt {
                text: "Are you absolutely sure you want to delete this conversation? \
                       This action cannot be undone."
                    .to_string(),
                positive_label: "Delete conversation".to_string(),
            },
            ConfirmationRequest::Delete(ids) => ConfirmationPrompt {
                text: "Are you absolutely sure you want to delete these conversations? \
                       This action cannot be undone."
                    .to_string(),
                positive_label: format!("Yes, delete all {} conversations", ids.len()),
            },
        }
    }
}

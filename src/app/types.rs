//! Type definitions for the application state.
//!
//! - [`Modal`] - the single presentation surface covering the panes
//! - [`DiagramConfig`] - input of the diagram surface
//! - [`TradeConfig`] - import/export dialog parameters

use crate::execution::PreferencesTab;
use crate::models::{ConversationId, MessageId};

/// Text to extract a diagram from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramConfig {
    pub conversation_id: ConversationId,
    /// Message the text was taken from, if any
    pub message_id: Option<MessageId>,
    pub text: String,
}

/// Direction of the conversation file dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TradeConfig {
    Import,
    Export {
        conversation_id: Option<ConversationId>,
        export_all: bool,
    },
}

/// Surface shown over the panes. At most one is open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modal {
    ModelsSetup,
    Preferences(PreferencesTab),
    /// Options of a chat model, by model id
    LlmOptions(String),
    Diagram(DiagramConfig),
    Flatten(ConversationId),
    Trade(TradeConfig),
}

impl Modal {
    pub fn title(&self) -> &'static str {
        match self {
            Modal::ModelsSetup => "Configure models",
            Modal::Preferences(_) => "Preferences",
            Modal::LlmOptions(_) => "Model options",
            Modal::Diagram(_) => "Diagram",
            Modal::Flatten(_) => "Flatten conversation",
            Modal::Trade(TradeConfig::Import) => "Import conversations",
            Modal::Trade(TradeConfig::Export { .. }) => "Export conversation",
        }
    }
}

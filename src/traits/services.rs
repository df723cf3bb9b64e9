//! Secondary collaborators: folders, asset sweeping, file trade, speech and
//! prompt imagining.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Conversation, ConversationId, Folder, FolderId};

/// Folder registry.
pub trait FolderStore: Send + Sync {
    /// Register a conversation into a folder. Unknown folders are ignored.
    fn add_conversation_to_folder(&self, folder_id: &FolderId, conversation_id: &ConversationId);

    fn folders(&self) -> Vec<Folder>;
}

/// Asset sweep errors.
#[derive(Debug, Clone, Error)]
pub enum AssetError {
    #[error("asset store unavailable: {0}")]
    Unavailable(String),

    #[error("asset sweep failed: {0}")]
    SweepFailed(String),
}

/// Sweeps stored assets (images) no longer referenced by any conversation.
#[async_trait]
pub trait AssetCollector: Send + Sync {
    /// Returns the number of assets removed.
    async fn collect_garbage(&self) -> Result<usize, AssetError>;
}

/// File encodings supported for conversation export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Markdown,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Markdown => "md",
        }
    }
}

/// Result of importing conversations from a file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportOutcome {
    /// Ids of all imported conversations, in file order
    pub imported: Vec<ConversationId>,
    /// The conversation to activate (the most recent one imported)
    pub activate_conversation_id: Option<ConversationId>,
}

/// Conversation file import/export errors.
#[derive(Debug, Error)]
pub enum TradeError {
    /// The user dismissed the file dialog
    #[error("operation cancelled")]
    Cancelled,

    #[error("file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid conversation file: {0}")]
    Format(#[from] serde_json::Error),

    #[error("unsupported export format: {0}")]
    Unsupported(String),
}

impl TradeError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, TradeError::Cancelled)
    }
}

/// Conversation file import/export.
#[async_trait]
pub trait ConversationTrade: Send + Sync {
    async fn save_conversation(
        &self,
        conversation: &Conversation,
        format: ExportFormat,
    ) -> Result<(), TradeError>;

    /// Import conversations chosen by the user.
    async fn open_conversations(&self) -> Result<ImportOutcome, TradeError>;
}

/// Text-to-speech errors.
#[derive(Debug, Clone, Error)]
pub enum SpeechError {
    #[error("speech is not configured")]
    NotConfigured,

    #[error("speech synthesis failed: {0}")]
    Failed(String),
}

/// Text-to-speech backend.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn speak(&self, text: &str) -> Result<(), SpeechError>;
}

/// Turns free text into an image-generation prompt.
#[async_trait]
pub trait PromptImaginer: Send + Sync {
    /// `None` when no prompt could be produced.
    async fn imagine_prompt(&self, text: &str, conversation_id: &ConversationId) -> Option<String>;
}

//! Trait abstractions for the collaborators of the orchestration layer.
//!
//! Everything behind these traits is external: the registry owns and persists
//! conversations, the engine generates, the services do I/O. Production code
//! injects real implementations; tests use [`crate::adapters::mock`].
//!
//! # Traits
//!
//! - [`ConversationStore`] / [`ConversationHandler`] - conversation registry
//! - [`ExecutionEngine`] - generation engine
//! - [`FolderStore`] - folder registry
//! - [`AssetCollector`] - unreferenced asset sweep
//! - [`ConversationTrade`] - file import/export
//! - [`SpeechSynthesizer`] - text-to-speech
//! - [`PromptImaginer`] - text to image-prompt

pub mod execution;
pub mod services;
pub mod store;

pub use execution::{ExecuteMode, ExecuteOutcome, ExecutionEngine};
pub use services::{
    AssetCollector, AssetError, ConversationTrade, ExportFormat, FolderStore, ImportOutcome,
    PromptImaginer, SpeechError, SpeechSynthesizer, TradeError,
};
pub use store::{ConversationHandler, ConversationStore, HistoryDirection};

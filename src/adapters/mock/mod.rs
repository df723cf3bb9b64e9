//! Mock implementations for testing.
//!
//! This module provides in-memory implementations of all collaborator
//! traits, enabling tests of the orchestration layer without a real
//! registry, engine or file system.
//!
//! # Available Mocks
//!
//! - [`InMemoryConversationStore`] - conversation registry (also used by the binary)
//! - [`MockExecutionEngine`] - scripted generation outcomes
//! - [`InMemoryFolders`], [`MockAssetCollector`], [`MockTrade`],
//!   [`MockSpeech`], [`MockImaginer`] - secondary services

pub mod engine;
pub mod services;
pub mod store;

pub use engine::{ExecuteCall, MockExecutionEngine};
pub use services::{
    InMemoryFolders, MockAssetCollector, MockImaginer, MockSpeech, MockTrade, TradeScript,
};
pub use store::{BeamInvocation, InMemoryConversationStore, InMemoryHandler};

//! Concrete implementations of trait abstractions.
//!
//! # Adapters
//!
//! - [`EchoEngine`] - demo generation engine echoing the last message
//! - [`JsonFileTrade`] - conversation import/export on the local file system
//!
//! # Mock Implementations
//!
//! The [`mock`] submodule provides in-memory doubles for every collaborator
//! trait. [`mock::InMemoryConversationStore`] doubles as the registry of the
//! terminal binary.

pub mod echo_engine;
pub mod json_trade;
pub mod mock;

pub use echo_engine::EchoEngine;
pub use json_trade::{render_markdown, ImportSink, JsonFileTrade};
pub use mock::InMemoryConversationStore;

//! Common test utilities for integration tests.
//!
//! [`TestApp`] wires a [`ChatApp`] to an in-memory registry and a scripted
//! engine, keeping handles on both so tests can inspect what happened.

#![allow(dead_code)]

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};

use panechat::adapters::mock::{InMemoryConversationStore, MockExecutionEngine};
use panechat::app::ChatApp;
use panechat::models::{ConversationId, Message, MessageRole};
use panechat::startup::ChatConfig;

pub struct TestApp {
    pub store: InMemoryConversationStore,
    pub engine: MockExecutionEngine,
    pub app: ChatApp,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(ChatConfig::default())
    }

    pub fn with_config(config: ChatConfig) -> Self {
        let store = InMemoryConversationStore::new();
        let engine = MockExecutionEngine::new();
        let app = ChatApp::new(config, Arc::new(store.clone()), Arc::new(engine.clone()));
        Self { store, engine, app }
    }

    /// Conversation with one user message, so it is never recycled.
    pub fn seed(&self, text: &str) -> ConversationId {
        self.store
            .insert_with_messages(vec![Message::text(MessageRole::User, text)])
    }

    pub fn seed_empty(&self, title: &str) -> ConversationId {
        self.store.insert_titled(title)
    }

    /// Let spawned generation tasks run and handle their outcomes.
    pub async fn settle(&mut self) -> usize {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        self.app.drain_messages()
    }
}

pub fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
    KeyEvent {
        code,
        modifiers,
        kind: KeyEventKind::Press,
        state: KeyEventState::NONE,
    }
}

pub fn key(c: char) -> KeyEvent {
    press(KeyCode::Char(c), KeyModifiers::NONE)
}

pub fn ctrl(c: char) -> KeyEvent {
    press(KeyCode::Char(c), KeyModifiers::CONTROL)
}

pub fn ctrl_shift(c: char) -> KeyEvent {
    press(KeyCode::Char(c), KeyModifiers::CONTROL | KeyModifiers::SHIFT)
}

pub fn type_text(app: &mut ChatApp, text: &str) {
    for c in text.chars() {
        app.handle_key_event(key(c));
    }
}

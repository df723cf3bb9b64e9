//! Key and command handling for the ChatApp.

use crossterm::event::{KeyEvent, KeyEventKind};
use tracing::{debug, info};

use super::ChatApp;
use crate::input::{Command, ShortcutAction};
use crate::lifecycle::ConfirmationRequest;
use crate::models::Fragment;
use crate::traits::{ExecuteMode, HistoryDirection};

impl ChatApp {
    /// Route a key event and execute the resulting command.
    ///
    /// Returns `true` if the key was consumed.
    pub fn handle_key_event(&mut self, key: KeyEvent) -> bool {
        if key.kind == KeyEventKind::Release {
            return false;
        }
        let ctx = self.shortcut_context();
        match self.router().dispatch(&key, &ctx) {
            Some(cmd) => self.execute_command(cmd),
            None => false,
        }
    }

    /// Executes a command produced by the router.
    ///
    /// Returns `true` if the command was handled.
    pub fn execute_command(&mut self, cmd: Command) -> bool {
        debug!("execute_command: {:?}", cmd);
        match cmd {
            Command::Shortcut(action) => self.execute_shortcut(action),
            Command::Quit => {
                info!("Quit requested");
                self.should_quit = true;
                true
            }
            Command::Noop => true,
            Command::CycleFocus => {
                self.cycle_focus();
                true
            }
            Command::SplitPane => {
                let conversation_id = self.focused_conversation_id().cloned();
                self.panes.open_in_split_pane(conversation_id).is_some()
            }
            Command::ClosePane => match self.panes.focused_pane_index() {
                Some(idx) => self.remove_pane(idx),
                None => false,
            },
            Command::ToggleMulticast => {
                let Some(enabled) = self.composer_multicast_state() else {
                    return false;
                };
                self.set_composer_multicast(!enabled);
                true
            }
            Command::InsertChar(c) => {
                if !self.is_composer_visible() {
                    return false;
                }
                self.composer_text.push(c);
                true
            }
            Command::Backspace => self.is_composer_visible() && self.composer_text.pop().is_some(),
            Command::SubmitComposer => self.submit_composer(),
            Command::ConfirmPositive => self.confirm_pending(),
            Command::ConfirmNegative => self.cancel_pending(),
            Command::CloseModal => {
                self.close_modal();
                true
            }
        }
    }

    /// Run a chat shortcut. Enablement is checked by the router.
    pub fn execute_shortcut(&mut self, action: ShortcutAction) -> bool {
        info!("Shortcut: {}", action.label());
        match action {
            ShortcutAction::RegenerateLast => self.regenerate_last_in_focused_pane().is_some(),
            ShortcutAction::BeamLast => self.beam_last_in_focused_pane(),
            ShortcutAction::OpenConversationFile => self.open_conversation_file().is_some(),
            ShortcutAction::SaveConversation => match self.focused_conversation_id().cloned() {
                Some(id) => self.save_conversation_file(&id).is_some(),
                None => false,
            },
            ShortcutAction::NewConversation => {
                self.new_conversation_in_focused_pane(false);
                true
            }
            ShortcutAction::ClearConversation => {
                if self.focused_is_empty() {
                    return false;
                }
                match self.focused_conversation_id().cloned() {
                    Some(id) => {
                        self.request_clear(id);
                        true
                    }
                    None => false,
                }
            }
            ShortcutAction::DeleteConversation => match self.focused_conversation_id().cloned() {
                Some(id) => self.delete_conversations(vec![id], false).is_pending(),
                None => false,
            },
            ShortcutAction::HistoryBack => self.navigate_history(HistoryDirection::Back),
            ShortcutAction::HistoryForward => self.navigate_history(HistoryDirection::Forward),
            ShortcutAction::OpenChatLlmOptions => {
                self.open_chat_llm_options();
                self.modal.is_some()
            }
        }
    }

    /// Send the composer text to the focused conversation (or every open
    /// one while multicasting) and clear the composer.
    pub fn submit_composer(&mut self) -> bool {
        if !self.is_composer_visible() {
            debug!("Composer hidden while beaming, ignoring submit");
            return false;
        }
        let text = self.composer_text.trim().to_string();
        if text.is_empty() {
            return false;
        }
        let Some(target) = self.focused_conversation_id().cloned() else {
            debug!("No focused conversation, keeping composer text");
            return false;
        };

        let sent = self.handle_composer_action(
            &target,
            ExecuteMode::GenerateContent,
            &[Fragment::text(text)],
            None,
        );
        if sent {
            self.composer_text.clear();
        }
        sent
    }

    /// Answer the shown confirmation positively.
    fn confirm_pending(&mut self) -> bool {
        match self.lifecycle.pending_confirmation() {
            Some(ConfirmationRequest::Clear(_)) => self.confirm_clear().is_some(),
            Some(ConfirmationRequest::Delete(_)) => {
                !self.confirm_delete().deleted().is_empty()
            }
            None => false,
        }
    }

    fn cancel_pending(&mut self) -> bool {
        match self.lifecycle.pending_confirmation() {
            Some(ConfirmationRequest::Clear(_)) => {
                self.cancel_clear();
                true
            }
            Some(ConfirmationRequest::Delete(_)) => {
                self.cancel_delete();
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{InMemoryConversationStore, MockExecutionEngine};
    use crate::input::ModalType;
    use crate::models::{Message, MessageRole};
    use crate::startup::ChatConfig;
    use crate::traits::ConversationStore;
    use crossterm::event::{KeyCode, KeyEventState, KeyModifiers};
    use std::sync::Arc;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn ctrl_shift(c: char) -> KeyEvent {
        press(KeyCode::Char(c), KeyModifiers::CONTROL | KeyModifiers::SHIFT)
    }

    fn setup() -> (InMemoryConversationStore, MockExecutionEngine, ChatApp) {
        let store = InMemoryConversationStore::new();
        let engine = MockExecutionEngine::new();
        let app = ChatApp::new(
            ChatConfig::default(),
            Arc::new(store.clone()),
            Arc::new(engine.clone()),
        );
        (store, engine, app)
    }

    #[test]
    fn test_typing_and_backspace() {
        let (_store, _engine, mut app) = setup();
        app.handle_key_event(press(KeyCode::Char('h'), KeyModifiers::NONE));
        app.handle_key_event(press(KeyCode::Char('i'), KeyModifiers::NONE));
        app.handle_key_event(press(KeyCode::Backspace, KeyModifiers::NONE));
        assert_eq!(app.composer_text, "h");
    }

    #[test]
    fn test_release_events_ignored() {
        let (_store, _engine, mut app) = setup();
        let mut key = press(KeyCode::Char('x'), KeyModifiers::NONE);
        key.kind = KeyEventKind::Release;
        assert!(!app.handle_key_event(key));
        assert!(app.composer_text.is_empty());
    }

    #[tokio::test]
    async fn test_submit_appends_and_clears() {
        let (store, engine, mut app) = setup();
        let id = store.insert_titled("a");
        app.open_in_focused_pane(id.clone());
        app.composer_text = "  hello  ".to_string();

        assert!(app.handle_key_event(press(KeyCode::Enter, KeyModifiers::NONE)));
        assert!(app.composer_text.is_empty());
        assert_eq!(store.messages(&id)[0].text_content(), "hello");

        assert!(app.process_next_message().await);
        assert_eq!(engine.called_ids(), vec![id]);
    }

    #[test]
    fn test_blank_composer_not_submitted() {
        let (store, _engine, mut app) = setup();
        let id = store.insert_titled("a");
        app.open_in_focused_pane(id.clone());
        app.composer_text = "   ".to_string();

        assert!(!app.submit_composer());
        assert!(store.messages(&id).is_empty());
    }

    #[test]
    fn test_new_shortcut_disabled_on_single_empty_pane() {
        let (store, _engine, mut app) = setup();
        let id = store.insert_titled("empty");
        app.open_in_focused_pane(id.clone());

        assert!(app.handle_key_event(ctrl_shift('N')));
        assert_eq!(store.len(), 1);
        assert_eq!(app.panes().len(), 1);
        assert_eq!(app.focused_conversation_id(), Some(&id));
    }

    #[test]
    fn test_clear_shortcut_then_confirm() {
        let (store, _engine, mut app) = setup();
        let id = store.insert_with_messages(vec![Message::text(MessageRole::User, "hi")]);
        app.open_in_focused_pane(id.clone());

        app.handle_key_event(ctrl_shift('X'));
        assert_eq!(app.modal_type(), ModalType::Confirmation);
        assert_eq!(store.messages(&id).len(), 1);

        // Shortcuts are swallowed while confirming
        app.handle_key_event(ctrl_shift('D'));
        assert!(app.lifecycle().pending_delete().is_none());

        app.handle_key_event(press(KeyCode::Char('y'), KeyModifiers::NONE));
        assert!(store.messages(&id).is_empty());
        assert_eq!(app.modal_type(), ModalType::None);
    }

    #[test]
    fn test_delete_shortcut_then_cancel() {
        let (store, _engine, mut app) = setup();
        let id = store.insert_titled("doomed");
        app.open_in_focused_pane(id.clone());

        app.handle_key_event(ctrl_shift('d'));
        assert_eq!(app.lifecycle().pending_delete(), Some(&[id.clone()][..]));

        app.handle_key_event(press(KeyCode::Esc, KeyModifiers::NONE));
        assert!(app.lifecycle().pending_delete().is_none());
        assert!(store.conversation(&id).is_some());
        assert!(store.delete_calls().is_empty());
    }

    #[test]
    fn test_split_and_close_pane() {
        let (store, _engine, mut app) = setup();
        let id = store.insert_titled("a");
        app.open_in_focused_pane(id);

        app.handle_key_event(press(KeyCode::Char('t'), KeyModifiers::CONTROL));
        assert_eq!(app.panes().len(), 2);

        app.handle_key_event(press(KeyCode::Char('w'), KeyModifiers::CONTROL));
        assert_eq!(app.panes().len(), 1);
        assert!(!app.handle_key_event(press(KeyCode::Char('w'), KeyModifiers::CONTROL)));
    }

    #[test]
    fn test_toggle_multicast_only_when_visible() {
        let (store, _engine, mut app) = setup();
        let a = store.insert_titled("a");
        let b = store.insert_titled("b");
        app.open_in_focused_pane(a);

        let toggle = press(KeyCode::Char('g'), KeyModifiers::CONTROL);
        assert!(!app.handle_key_event(toggle));

        app.open_in_split_pane(b);
        assert!(app.handle_key_event(toggle));
        assert_eq!(app.composer_multicast_state(), Some(true));
    }

    #[test]
    fn test_hidden_composer_takes_no_input() {
        let (store, engine, mut app) = setup();
        let id = store.insert_with_messages(vec![
            Message::text(MessageRole::User, "q"),
            Message::text(MessageRole::Assistant, "a"),
        ]);
        app.open_in_focused_pane(id.clone());
        app.composer_text = "draft".to_string();
        assert!(app.beam_last_in_focused_pane());
        assert!(!app.is_composer_visible());

        assert!(!app.handle_key_event(press(KeyCode::Char('x'), KeyModifiers::NONE)));
        assert!(!app.handle_key_event(press(KeyCode::Backspace, KeyModifiers::NONE)));
        assert!(!app.handle_key_event(press(KeyCode::Enter, KeyModifiers::NONE)));

        assert_eq!(app.composer_text, "draft");
        assert_eq!(store.messages(&id).len(), 2);
        assert_eq!(engine.call_count(), 0);

        // Typing resumes once the beam closes
        store.close_beam(&id);
        assert!(app.handle_key_event(press(KeyCode::Char('!'), KeyModifiers::NONE)));
        assert_eq!(app.composer_text, "draft!");
    }

    #[test]
    fn test_quit() {
        let (_store, _engine, mut app) = setup();
        app.handle_key_event(press(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }
}

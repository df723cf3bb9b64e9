//! Application state and logic for the chat screen.
//!
//! This module contains the core [`ChatApp`] struct and related types:
//! - [`Modal`] - the presentation surface currently open, if any
//! - [`AppMessage`] - messages from background tasks
//!
//! `ChatApp` owns the pane manager and the orchestration components and is
//! only mutated from the UI task. Background work (generation, file I/O,
//! speech) reports back through [`AppMessage`]s handled by
//! [`ChatApp::handle_message`].

mod actions;
mod handlers;
mod messages;
mod types;

pub use messages::{AppMessage, TaskFailure};
pub use types::{DiagramConfig, Modal, TradeConfig};

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::composer::MulticastComposerBridge;
use crate::execution::{ExecutionDispatcher, UiEffect};
use crate::input::{ModalType, ShortcutContext, ShortcutRouter};
use crate::lifecycle::LifecycleController;
use crate::models::{Conversation, ConversationId, NEW_CHAT_TITLE};
use crate::notifications::{Notice, NoticeBoard};
use crate::panes::{PaneLayout, PaneManager};
use crate::startup::ChatConfig;
use crate::traits::{
    AssetCollector, ConversationStore, ConversationTrade, ExecutionEngine, FolderStore,
    PromptImaginer, SpeechSynthesizer,
};

/// Notice key for a failed import.
pub const IMPORT_FAIL_KEY: &str = "chat-import-fail";
/// Notice key for a completed export.
pub const SAVE_OK_KEY: &str = "chat-save-as-ok";
/// Notice key for a failed export.
pub const SAVE_FAIL_KEY: &str = "chat-save-as-fail";

/// Main application state
pub struct ChatApp {
    pub config: ChatConfig,
    store: Arc<dyn ConversationStore>,
    panes: PaneManager,
    dispatcher: ExecutionDispatcher,
    composer_bridge: MulticastComposerBridge,
    lifecycle: LifecycleController,
    router: ShortcutRouter,
    trade: Option<Arc<dyn ConversationTrade>>,
    speech: Option<Arc<dyn SpeechSynthesizer>>,
    imaginer: Option<Arc<dyn PromptImaginer>>,
    message_tx: mpsc::UnboundedSender<AppMessage>,
    message_rx: Option<mpsc::UnboundedReceiver<AppMessage>>,
    /// Transient notices
    pub notices: NoticeBoard,
    /// Surface covering the panes
    pub modal: Option<Modal>,
    /// Text being composed
    pub composer_text: String,
    /// User preference for sending to every open conversation
    multicast_enabled: bool,
    /// Messages are being selected for bulk actions
    pub is_message_selection_mode: bool,
    /// Flag to quit the application
    pub should_quit: bool,
}

impl ChatApp {
    /// Create an app over a registry and a generation engine.
    ///
    /// Nothing is bound to the initial pane; call
    /// [`open_initial_conversation`](Self::open_initial_conversation).
    pub fn new(
        config: ChatConfig,
        store: Arc<dyn ConversationStore>,
        engine: Arc<dyn ExecutionEngine>,
    ) -> Self {
        let (message_tx, message_rx) = mpsc::unbounded_channel();
        let dispatcher = ExecutionDispatcher::new(engine, message_tx.clone());
        let composer_bridge = MulticastComposerBridge::new(Arc::clone(&store), dispatcher.clone());
        let mut lifecycle = LifecycleController::new(Arc::clone(&store));
        lifecycle.set_folders_enabled(config.folders_enabled);

        Self {
            multicast_enabled: config.multicast_default,
            config,
            store,
            panes: PaneManager::new(),
            dispatcher,
            composer_bridge,
            lifecycle,
            router: ShortcutRouter::new(),
            trade: None,
            speech: None,
            imaginer: None,
            message_tx,
            message_rx: Some(message_rx),
            notices: NoticeBoard::new(),
            modal: None,
            composer_text: String::new(),
            is_message_selection_mode: false,
            should_quit: false,
        }
    }

    pub fn with_folders(mut self, folders: Arc<dyn FolderStore>) -> Self {
        self.lifecycle = self.lifecycle.with_folders(folders);
        self.lifecycle.set_folders_enabled(self.config.folders_enabled);
        self
    }

    pub fn with_assets(mut self, assets: Arc<dyn AssetCollector>) -> Self {
        self.lifecycle = self.lifecycle.with_assets(assets);
        self
    }

    pub fn with_trade(mut self, trade: Arc<dyn ConversationTrade>) -> Self {
        self.trade = Some(trade);
        self
    }

    pub fn with_speech(mut self, speech: Arc<dyn SpeechSynthesizer>) -> Self {
        self.speech = Some(speech);
        self
    }

    pub fn with_imaginer(mut self, imaginer: Arc<dyn PromptImaginer>) -> Self {
        self.imaginer = Some(imaginer);
        self
    }

    /// Hand the message receiver to an external event loop.
    ///
    /// Once taken, [`process_next_message`](Self::process_next_message)
    /// returns `false`.
    pub fn take_message_receiver(&mut self) -> Option<mpsc::UnboundedReceiver<AppMessage>> {
        self.message_rx.take()
    }

    /// Sender for background tasks that report to this app.
    pub fn message_sender(&self) -> mpsc::UnboundedSender<AppMessage> {
        self.message_tx.clone()
    }

    /// Wait for the next background message and handle it.
    ///
    /// Returns `false` when no receiver is held.
    pub async fn process_next_message(&mut self) -> bool {
        let Some(rx) = self.message_rx.as_mut() else {
            return false;
        };
        match rx.recv().await {
            Some(msg) => {
                self.handle_message(msg);
                true
            }
            None => false,
        }
    }

    /// Handle every message already queued. Returns how many were handled.
    pub fn drain_messages(&mut self) -> usize {
        let mut pending = Vec::new();
        if let Some(rx) = self.message_rx.as_mut() {
            while let Ok(msg) = rx.try_recv() {
                pending.push(msg);
            }
        }
        let count = pending.len();
        for msg in pending {
            self.handle_message(msg);
        }
        count
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn store(&self) -> &Arc<dyn ConversationStore> {
        &self.store
    }

    pub fn panes(&self) -> &PaneManager {
        &self.panes
    }

    pub fn layout(&self) -> PaneLayout {
        self.panes.layout()
    }

    pub fn lifecycle(&self) -> &LifecycleController {
        &self.lifecycle
    }

    pub fn router(&self) -> &ShortcutRouter {
        &self.router
    }

    pub fn dispatcher(&self) -> &ExecutionDispatcher {
        &self.dispatcher
    }

    // ========================================================================
    // Derived state
    // ========================================================================

    pub fn focused_conversation_id(&self) -> Option<&ConversationId> {
        self.panes.focused_conversation_id()
    }

    /// Snapshot of the focused conversation, if it still exists.
    pub fn focused_conversation(&self) -> Option<Conversation> {
        self.focused_conversation_id()
            .and_then(|id| self.store.conversation(id))
    }

    /// No conversation is focused, or it has no messages.
    pub fn focused_is_empty(&self) -> bool {
        self.focused_conversation()
            .map(|c| c.is_empty())
            .unwrap_or(true)
    }

    pub fn disable_new_button(&self) -> bool {
        self.focused_is_empty() && !self.panes.is_multi_pane()
    }

    /// The multicast toggle, `None` while hidden (fewer than two distinct
    /// conversations open).
    pub fn composer_multicast_state(&self) -> Option<bool> {
        self.panes
            .is_multi_conversation()
            .then_some(self.multicast_enabled)
    }

    pub fn set_composer_multicast(&mut self, enabled: bool) {
        debug!("Composer multicast {}", if enabled { "on" } else { "off" });
        self.multicast_enabled = enabled;
    }

    pub fn will_multicast(&self) -> bool {
        self.multicast_enabled && self.panes.is_multi_conversation()
    }

    /// Whether the conversation shown in pane `idx` has a beam open.
    pub fn pane_beam_open(&self, idx: usize) -> bool {
        self.panes
            .panes()
            .get(idx)
            .and_then(|pane| pane.conversation_id.as_ref())
            .and_then(|id| self.store.handler(id))
            .map(|handler| handler.is_beam_open())
            .unwrap_or(false)
    }

    pub fn focused_beam_open(&self) -> bool {
        self.panes
            .focused_pane_index()
            .map(|idx| self.pane_beam_open(idx))
            .unwrap_or(false)
    }

    /// The composer is hidden while the focused conversation is beaming.
    pub fn is_composer_visible(&self) -> bool {
        !self.focused_beam_open()
    }

    /// The modal kind key routing should assume.
    pub fn modal_type(&self) -> ModalType {
        if self.lifecycle.pending_confirmation().is_some() {
            ModalType::Confirmation
        } else if self.modal.is_some() {
            ModalType::Surface
        } else {
            ModalType::None
        }
    }

    /// Snapshot for shortcut enablement.
    pub fn shortcut_context(&self) -> ShortcutContext {
        let focused = self.focused_conversation();
        ShortcutContext::new()
            .with_focused(
                focused.is_some(),
                focused.as_ref().map(|c| c.is_empty()).unwrap_or(true),
            )
            .with_multi_pane(self.panes.is_multi_pane())
            .with_modal(self.modal_type())
    }

    // ========================================================================
    // Pane binding
    // ========================================================================

    /// Bind the startup conversation to the focused pane.
    ///
    /// The requested conversation wins when it exists; otherwise an unbound
    /// pane gets the top of the stack, or a fresh conversation when the
    /// registry is empty.
    pub fn open_initial_conversation(&mut self, intent: Option<ConversationId>) {
        if let Some(id) = intent {
            if self.store.conversation(&id).is_some() {
                info!("Opening requested conversation {}", id);
                self.panes.open_in_focused_pane(Some(id));
                return;
            }
            warn!("Requested conversation {} not found", id);
        }

        if self.panes.focused_conversation_id().is_some() {
            return;
        }
        match self.store.conversation_ids().into_iter().next() {
            Some(top) => {
                self.panes.open_in_focused_pane(Some(top));
            }
            None => {
                self.lifecycle.new_conversation(&mut self.panes, true);
            }
        }
    }

    pub fn open_in_focused_pane(&mut self, conversation_id: ConversationId) {
        self.panes.open_in_focused_pane(Some(conversation_id));
    }

    pub fn open_in_split_pane(&mut self, conversation_id: ConversationId) {
        self.panes.open_in_split_pane(Some(conversation_id));
    }

    pub fn remove_pane(&mut self, idx: usize) -> bool {
        self.panes.remove_pane(idx)
    }

    pub fn collapse_pane(&mut self, idx: usize) -> bool {
        self.panes.collapse_pane(idx)
    }

    pub fn click_pane(&mut self, idx: usize, inspect_modifier: bool) -> bool {
        self.panes.click_pane(idx, inspect_modifier)
    }

    pub fn cycle_focus(&mut self) {
        self.panes.cycle_focus();
    }

    /// Title notice for a conversation: `#{n} · {title}`.
    pub fn title_notice_for(&self, conversation_id: &ConversationId) -> Option<Notice> {
        let conversation = self.store.conversation(conversation_id)?;
        let n = self.store.position(conversation_id)? + 1;
        let title = conversation
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(NEW_CHAT_TITLE);
        Some(Notice::title(format!("#{} · {}", n, title)))
    }

    pub(crate) fn show_focused_title(&mut self) {
        let notice = self
            .focused_conversation_id()
            .and_then(|id| self.title_notice_for(id));
        if let Some(notice) = notice {
            self.notices.push(notice);
        }
    }

    // ========================================================================
    // Background messages
    // ========================================================================

    /// Apply the result of a background task.
    pub fn handle_message(&mut self, msg: AppMessage) {
        match msg {
            AppMessage::ExecutionResolved {
                conversation_id,
                mode,
                caller,
                outcome,
                effect,
            } => {
                if self.store.conversation(&conversation_id).is_none() {
                    debug!(
                        "Dropping {} outcome of {} for deleted conversation {}",
                        outcome.code(),
                        caller,
                        conversation_id
                    );
                    return;
                }
                if let Some(effect) = effect {
                    debug!("{} {} on {}: applying {:?}", caller, mode, conversation_id, effect);
                    self.apply_effect(effect);
                }
            }
            AppMessage::ConversationSaved {
                conversation_id,
                result,
            } => match result {
                Ok(()) => {
                    info!("Saved conversation {}", conversation_id);
                    self.notices
                        .push(Notice::success("File saved.").with_key(SAVE_OK_KEY));
                }
                Err(TaskFailure::Cancelled) => {
                    debug!("Save of {} cancelled", conversation_id);
                }
                Err(TaskFailure::Failed { code, message }) => {
                    debug!("Save of {} failed with {}", conversation_id, code);
                    self.notices.push(
                        Notice::issue(format!("Could not save the file. {}", message))
                            .with_key(SAVE_FAIL_KEY),
                    );
                }
            },
            AppMessage::ConversationsOpened(result) => match result {
                Ok(outcome) => {
                    info!("Imported {} conversation(s)", outcome.imported.len());
                    if let Some(id) = outcome.activate_conversation_id {
                        self.panes.open_in_focused_pane(Some(id));
                        self.show_focused_title();
                    }
                }
                Err(TaskFailure::Cancelled) => {
                    debug!("Import cancelled");
                }
                Err(TaskFailure::Failed { code, message }) => {
                    debug!("Import failed with {}: {}", code, message);
                    self.notices.push(
                        Notice::issue("Could not open the file.").with_key(IMPORT_FAIL_KEY),
                    );
                }
            },
            AppMessage::SpeechFinished(result) => match result {
                Ok(()) => debug!("Speech finished"),
                Err(TaskFailure::Cancelled) => debug!("Speech cancelled"),
                Err(TaskFailure::Failed { message, .. }) => {
                    self.notices
                        .push(Notice::issue(format!("Could not speak the text. {}", message)));
                }
            },
        }
    }

    fn apply_effect(&mut self, effect: UiEffect) {
        match effect {
            UiEffect::OpenModelsSetup => self.open_modal(Modal::ModelsSetup),
            UiEffect::OpenPreferences(tab) => self.open_modal(Modal::Preferences(tab)),
            UiEffect::OpenLlmOptions(llm) => self.open_modal(Modal::LlmOptions(llm)),
            UiEffect::Notice(notice) => self.notices.push(notice),
        }
    }

    pub(crate) fn open_modal(&mut self, modal: Modal) {
        if let Some(previous) = self.modal.replace(modal) {
            debug!("Replacing open modal {:?}", previous);
        }
    }
}

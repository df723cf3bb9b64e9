//! Conversation actions triggered from shortcuts or message menus.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::{AppMessage, ChatApp, DiagramConfig, Modal, TaskFailure, TradeConfig};
use crate::error::{ChatError, ErrorContext};
use crate::composer::Delivery;
use crate::execution::{CALLER_EXECUTE_HISTORY, CALLER_IMAGINE, CALLER_REGENERATE};
use crate::lifecycle::DeleteOutcome;
use crate::models::{
    ConversationId, FolderId, Fragment, Message, MessageId, MessageMetadata, MessageRole,
};
use crate::traits::{ExecuteMode, ExportFormat, HistoryDirection, SpeechError};

/// Prompt used when no image prompt could be derived from the text.
pub const IMAGINE_FALLBACK_PROMPT: &str = "An error sign.";

impl ChatApp {
    // ========================================================================
    // Composer
    // ========================================================================

    /// Deliver a composed message to `conversation_id`, or to every open
    /// conversation while multicasting.
    ///
    /// Returns `false` when no target exists any more.
    pub fn handle_composer_action(
        &self,
        conversation_id: &ConversationId,
        mode: ExecuteMode,
        fragments: &[Fragment],
        metadata: Option<&MessageMetadata>,
    ) -> bool {
        !self
            .composer_deliveries(conversation_id, mode, fragments, metadata)
            .is_empty()
    }

    /// Same as [`handle_composer_action`](Self::handle_composer_action),
    /// keeping the generation handles.
    pub fn composer_deliveries(
        &self,
        conversation_id: &ConversationId,
        mode: ExecuteMode,
        fragments: &[Fragment],
        metadata: Option<&MessageMetadata>,
    ) -> Vec<Delivery> {
        self.composer_bridge.fan_out(
            conversation_id,
            mode,
            fragments,
            metadata,
            &self.panes.unique_conversation_ids(),
            self.will_multicast(),
        )
    }

    // ========================================================================
    // Generation
    // ========================================================================

    /// Drop a trailing assistant reply and generate again.
    pub fn regenerate_last_in_focused_pane(&self) -> Option<JoinHandle<bool>> {
        let conversation = self.focused_conversation()?;
        let last = conversation.last_message()?;

        if last.role == MessageRole::Assistant {
            if let Some(handler) = self.store.handler(&conversation.id) {
                debug!("Truncating assistant reply {} before retry", last.id);
                handler.history_truncate_to(&last.id, -1);
            }
        }

        Some(self.dispatcher.spawn(
            ExecuteMode::GenerateContent,
            conversation.id,
            CALLER_REGENERATE,
        ))
    }

    /// Open a beam on the last message of the focused conversation.
    ///
    /// Returns `true` if a beam was invoked.
    pub fn beam_last_in_focused_pane(&self) -> bool {
        let Some(conversation) = self.focused_conversation() else {
            return false;
        };
        let Some(last) = conversation.last_message() else {
            return false;
        };
        let Some(handler) = self.store.handler(&conversation.id) else {
            return false;
        };

        match last.role {
            MessageRole::Assistant => {
                let anchor = last.id.clone();
                let seeds = vec![last.clone()];
                let history = conversation.messages[..conversation.messages.len() - 1].to_vec();
                info!("Beaming assistant message {} of {}", anchor, conversation.id);
                handler.beam_invoke(history, seeds, Some(anchor));
                true
            }
            MessageRole::User => {
                info!("Beaming from user message in {}", conversation.id);
                handler.beam_invoke(conversation.messages.clone(), Vec::new(), None);
                true
            }
            MessageRole::System => {
                debug!("Last message of {} is a system message, not beaming", conversation.id);
                false
            }
        }
    }

    /// Generate from the current history of a conversation.
    pub fn execute_history(&self, conversation_id: ConversationId) -> JoinHandle<bool> {
        self.dispatcher.spawn(
            ExecuteMode::GenerateContent,
            conversation_id,
            CALLER_EXECUTE_HISTORY,
        )
    }

    /// Turn free text into an image prompt, append it and generate an image.
    ///
    /// `None` when the conversation does not exist.
    pub fn imagine_from_text(
        &self,
        conversation_id: &ConversationId,
        text: &str,
    ) -> Option<JoinHandle<bool>> {
        let handler = self.store.handler(conversation_id)?;
        let imaginer = self.imaginer.clone();
        let dispatcher = self.dispatcher.clone();
        let conversation_id = conversation_id.clone();
        let text = text.to_string();

        Some(tokio::spawn(async move {
            let prompt = match imaginer {
                Some(imaginer) => imaginer.imagine_prompt(&text, &conversation_id).await,
                None => None,
            };
            let prompt = prompt.unwrap_or_else(|| {
                debug!("No image prompt for {}, using fallback", conversation_id);
                IMAGINE_FALLBACK_PROMPT.to_string()
            });

            handler.message_append(Message::text(MessageRole::User, prompt));
            dispatcher
                .run_and_resolve(ExecuteMode::GenerateImage, &conversation_id, CALLER_IMAGINE)
                .await
        }))
    }

    /// Read text aloud in the background.
    pub fn speak_text(&self, text: &str) -> JoinHandle<()> {
        let speech = self.speech.clone();
        let tx = self.message_tx.clone();
        let text = text.to_string();

        tokio::spawn(async move {
            let result = match speech {
                Some(speech) => speech.speak(&text).await,
                None => Err(SpeechError::NotConfigured),
            }
            .map_err(|err| {
                TaskFailure::report(err, ErrorContext::new("speak_text").with_component("speech"))
            });
            if tx.send(AppMessage::SpeechFinished(result)).is_err() {
                debug!("App gone before speech finished");
            }
        })
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// New (or recycled) conversation in the focused pane.
    pub fn new_conversation_in_focused_pane(&mut self, force_new: bool) -> ConversationId {
        self.lifecycle.new_conversation(&mut self.panes, force_new)
    }

    /// Branch a conversation and show the branch.
    pub fn branch_conversation(
        &mut self,
        source: &ConversationId,
        message_id: Option<&MessageId>,
    ) -> Option<ConversationId> {
        let branched = self
            .lifecycle
            .branch_conversation(&mut self.panes, source, message_id)?;
        self.show_focused_title();
        Some(branched)
    }

    pub fn request_clear(&mut self, conversation_id: ConversationId) {
        if let Some(displaced) = self.lifecycle.request_clear(conversation_id) {
            debug!("Clear of {} superseded", displaced);
        }
    }

    pub fn confirm_clear(&mut self) -> Option<ConversationId> {
        self.lifecycle.confirm_clear()
    }

    pub fn cancel_clear(&mut self) {
        self.lifecycle.cancel_clear();
    }

    pub fn delete_conversations(
        &mut self,
        ids: Vec<ConversationId>,
        bypass_confirmation: bool,
    ) -> DeleteOutcome {
        self.lifecycle
            .delete_conversations(&mut self.panes, ids, bypass_confirmation)
    }

    pub fn confirm_delete(&mut self) -> DeleteOutcome {
        self.lifecycle.confirm_delete(&mut self.panes)
    }

    pub fn cancel_delete(&mut self) {
        self.lifecycle.cancel_delete();
    }

    /// Move the focused pane through the recency stack.
    pub fn navigate_history(&mut self, direction: HistoryDirection) -> bool {
        let moved = self
            .panes
            .navigate_history(self.store.as_ref(), direction);
        if moved {
            self.show_focused_title();
        }
        moved
    }

    pub fn set_active_folder(&mut self, folder_id: Option<FolderId>) {
        self.lifecycle.set_active_folder(folder_id);
    }

    pub fn toggle_message_selection(&mut self) {
        self.is_message_selection_mode = !self.is_message_selection_mode;
    }

    // ========================================================================
    // Files
    // ========================================================================

    /// Import conversations and activate the most recent one.
    pub fn open_conversation_file(&self) -> Option<JoinHandle<()>> {
        let Some(trade) = self.trade.clone() else {
            let failure = TaskFailure::report(
                ChatError::NotConfigured {
                    feature: "file import",
                },
                ErrorContext::new("open_conversation_file").with_component("trade"),
            );
            if self
                .message_tx
                .send(AppMessage::ConversationsOpened(Err(failure)))
                .is_err()
            {
                debug!("Message channel closed");
            }
            return None;
        };
        let tx = self.message_tx.clone();

        Some(tokio::spawn(async move {
            let result = trade.open_conversations().await.map_err(|err| {
                TaskFailure::report(
                    err,
                    ErrorContext::new("open_conversation_file").with_component("trade"),
                )
            });
            if tx.send(AppMessage::ConversationsOpened(result)).is_err() {
                debug!("App gone before import finished");
            }
        }))
    }

    /// Save a conversation as JSON. Missing conversations are ignored.
    pub fn save_conversation_file(&self, conversation_id: &ConversationId) -> Option<JoinHandle<()>> {
        let conversation = self.store.conversation(conversation_id)?;
        let Some(trade) = self.trade.clone() else {
            let failure = TaskFailure::report(
                ChatError::NotConfigured {
                    feature: "file export",
                },
                ErrorContext::new("save_conversation_file")
                    .with_conversation_id(&conversation.id)
                    .with_component("trade"),
            );
            if self
                .message_tx
                .send(AppMessage::ConversationSaved {
                    conversation_id: conversation.id,
                    result: Err(failure),
                })
                .is_err()
            {
                debug!("Message channel closed");
            }
            return None;
        };
        let tx = self.message_tx.clone();

        Some(tokio::spawn(async move {
            let result = trade
                .save_conversation(&conversation, ExportFormat::Json)
                .await
                .map_err(|err| {
                    TaskFailure::report(
                        err,
                        ErrorContext::new("save_conversation_file")
                            .with_conversation_id(&conversation.id)
                            .with_component("trade"),
                    )
                });
            let message = AppMessage::ConversationSaved {
                conversation_id: conversation.id,
                result,
            };
            if tx.send(message).is_err() {
                debug!("App gone before save finished");
            }
        }))
    }

    // ========================================================================
    // Surfaces
    // ========================================================================

    /// Options of the configured chat model; nothing when none is set up.
    pub fn open_chat_llm_options(&mut self) {
        match self.config.chat_llm.clone() {
            Some(llm) => self.open_modal(Modal::LlmOptions(llm)),
            None => debug!("No chat model configured, no options to show"),
        }
    }

    pub fn open_diagram(&mut self, config: DiagramConfig) {
        self.open_modal(Modal::Diagram(config));
    }

    pub fn open_flatten(&mut self, conversation_id: ConversationId) {
        self.open_modal(Modal::Flatten(conversation_id));
    }

    pub fn open_import_dialog(&mut self) {
        self.open_modal(Modal::Trade(TradeConfig::Import));
    }

    pub fn open_export_dialog(&mut self, conversation_id: Option<ConversationId>, export_all: bool) {
        self.open_modal(Modal::Trade(TradeConfig::Export {
            conversation_id,
            export_all,
        }));
    }

    pub fn close_modal(&mut self) {
        self.modal = None;
    }
}

//! Conversation lifecycle: create, branch, clear and delete.
//!
//! Clear and delete are two-phase. A request is parked in a single-slot
//! [`ConfirmationSlot`] (a newer request displaces an older one) and only the
//! confirm step mutates the registry. Delete may bypass the confirmation.

mod confirm;
pub mod policy;

pub use confirm::{ConfirmationPrompt, ConfirmationRequest, ConfirmationSlot};

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::{ChatError, ErrorContext};
use crate::models::{ConversationId, FolderId, MessageId};
use crate::panes::PaneManager;
use crate::traits::{AssetCollector, ConversationStore, FolderStore};

/// Result of a delete call.
#[derive(Debug)]
pub enum DeleteOutcome {
    /// Nothing was asked for
    Ignored,
    /// Parked until confirmed
    Pending,
    /// Deletion committed
    Deleted {
        /// Ids that still existed and were deleted
        deleted: Vec<ConversationId>,
        /// Conversation bound to the focused pane afterwards
        next: Option<ConversationId>,
        /// Background asset sweep, if one was started
        sweep: Option<JoinHandle<()>>,
    },
}

impl DeleteOutcome {
    pub fn is_pending(&self) -> bool {
        matches!(self, DeleteOutcome::Pending)
    }

    pub fn deleted(&self) -> &[ConversationId] {
        match self {
            DeleteOutcome::Deleted { deleted, .. } => deleted,
            _ => &[],
        }
    }
}

/// Drives conversation creation and destruction against the registry.
pub struct LifecycleController {
    store: Arc<dyn ConversationStore>,
    folders: Option<Arc<dyn FolderStore>>,
    assets: Option<Arc<dyn AssetCollector>>,
    folders_enabled: bool,
    active_folder: Option<FolderId>,
    clear_slot: ConfirmationSlot<ConversationId>,
    delete_slot: ConfirmationSlot<Vec<ConversationId>>,
}

impl LifecycleController {
    pub fn new(store: Arc<dyn ConversationStore>) -> Self {
        Self {
            store,
            folders: None,
            assets: None,
            folders_enabled: false,
            active_folder: None,
            clear_slot: ConfirmationSlot::new(),
            delete_slot: ConfirmationSlot::new(),
        }
    }

    /// Enable folder registration.
    pub fn with_folders(mut self, folders: Arc<dyn FolderStore>) -> Self {
        self.folders = Some(folders);
        self.folders_enabled = true;
        self
    }

    pub fn with_assets(mut self, assets: Arc<dyn AssetCollector>) -> Self {
        self.assets = Some(assets);
        self
    }

    pub fn set_folders_enabled(&mut self, enabled: bool) {
        self.folders_enabled = enabled;
    }

    /// Set the folder new and branched conversations are filed into.
    ///
    /// Ignored while folders are disabled.
    pub fn set_active_folder(&mut self, folder_id: Option<FolderId>) {
        if !self.folders_enabled {
            debug!("Folders disabled, ignoring active folder {:?}", folder_id);
            self.active_folder = None;
            return;
        }
        self.active_folder = folder_id;
    }

    pub fn active_folder(&self) -> Option<&FolderId> {
        if self.folders_enabled {
            self.active_folder.as_ref()
        } else {
            None
        }
    }

    fn file_into_active_folder(&self, conversation_id: &ConversationId) {
        if let (Some(folders), Some(folder_id)) = (&self.folders, self.active_folder()) {
            debug!("Filing {} into folder {}", conversation_id, folder_id);
            folders.add_conversation_to_folder(folder_id, conversation_id);
        }
    }

    /// Open a new conversation in the focused pane.
    ///
    /// An empty top-of-stack conversation is reused unless `force_new`.
    /// Otherwise a conversation is prepended with the focused conversation's
    /// purpose.
    pub fn new_conversation(&self, panes: &mut PaneManager, force_new: bool) -> ConversationId {
        let recycled = if force_new {
            None
        } else {
            let top = self
                .store
                .conversation_ids()
                .first()
                .and_then(|id| self.store.conversation(id));
            policy::recyclable_conversation(top.as_ref())
        };

        let conversation_id = match recycled {
            Some(id) => {
                debug!("Recycling empty conversation {}", id);
                id
            }
            None => {
                let purpose = panes
                    .focused_conversation_id()
                    .and_then(|id| self.store.conversation(id))
                    .map(|c| c.system_purpose_id);
                let id = self.store.prepend_new_conversation(purpose);
                info!("Created conversation {}", id);
                id
            }
        };

        panes.open_in_focused_pane(Some(conversation_id.clone()));
        self.file_into_active_folder(&conversation_id);
        conversation_id
    }

    /// Branch `source` at `message_id` (whole history for `None`) and open
    /// the branch beside the current pane, or in place when no pane is free.
    pub fn branch_conversation(
        &self,
        panes: &mut PaneManager,
        source: &ConversationId,
        message_id: Option<&MessageId>,
    ) -> Option<ConversationId> {
        let Some(branched) = self.store.branch_conversation(source, message_id) else {
            warn!("Cannot branch missing conversation {}", source);
            return None;
        };
        info!("Branched {} into {}", source, branched);

        self.file_into_active_folder(&branched);
        panes.open_in_split_pane(Some(branched.clone()));
        Some(branched)
    }

    /// Ask to clear a conversation. Returns the request it displaced.
    pub fn request_clear(&mut self, conversation_id: ConversationId) -> Option<ConversationId> {
        self.clear_slot.request(conversation_id)
    }

    /// Clear the pending conversation. Returns the id that was cleared.
    pub fn confirm_clear(&mut self) -> Option<ConversationId> {
        let conversation_id = self.clear_slot.take()?;
        match self.store.handler(&conversation_id) {
            Some(handler) => {
                handler.history_clear();
                info!("Cleared conversation {}", conversation_id);
                Some(conversation_id)
            }
            None => {
                debug!("Conversation {} vanished before clear", conversation_id);
                None
            }
        }
    }

    pub fn cancel_clear(&mut self) {
        self.clear_slot.cancel();
    }

    pub fn pending_clear(&self) -> Option<&ConversationId> {
        self.clear_slot.pending()
    }

    /// Delete conversations, or park the request until confirmed.
    pub fn delete_conversations(
        &mut self,
        panes: &mut PaneManager,
        ids: Vec<ConversationId>,
        bypass_confirmation: bool,
    ) -> DeleteOutcome {
        if ids.is_empty() {
            return DeleteOutcome::Ignored;
        }

        if !bypass_confirmation {
            self.delete_slot.request(ids);
            return DeleteOutcome::Pending;
        }

        let (live, gone): (Vec<_>, Vec<_>) = ids
            .into_iter()
            .partition(|id| self.store.conversation(id).is_some());
        if !gone.is_empty() {
            debug!("Skipping {} already deleted conversation(s)", gone.len());
        }

        if live.is_empty() {
            self.delete_slot.cancel();
            return DeleteOutcome::Deleted {
                deleted: Vec::new(),
                next: None,
                sweep: None,
            };
        }

        let purpose = panes
            .focused_conversation_id()
            .and_then(|id| self.store.conversation(id))
            .map(|c| c.system_purpose_id);
        let next = self.store.delete_conversations(&live, purpose);
        info!("Deleted {} conversation(s), next is {}", live.len(), next);

        panes.open_in_focused_pane(Some(next.clone()));
        self.delete_slot.cancel();

        DeleteOutcome::Deleted {
            deleted: live,
            next: Some(next),
            sweep: self.spawn_asset_sweep(),
        }
    }

    /// Commit the pending delete request.
    pub fn confirm_delete(&mut self, panes: &mut PaneManager) -> DeleteOutcome {
        match self.delete_slot.take() {
            Some(ids) => self.delete_conversations(panes, ids, true),
            None => DeleteOutcome::Ignored,
        }
    }

    pub fn cancel_delete(&mut self) {
        self.delete_slot.cancel();
    }

    pub fn pending_delete(&self) -> Option<&[ConversationId]> {
        self.delete_slot.pending().map(Vec::as_slice)
    }

    /// The pending request to show, clear first.
    pub fn pending_confirmation(&self) -> Option<ConfirmationRequest> {
        if let Some(id) = self.clear_slot.pending() {
            return Some(ConfirmationRequest::Clear(id.clone()));
        }
        self.delete_slot
            .pending()
            .map(|ids| ConfirmationRequest::Delete(ids.clone()))
    }

    fn spawn_asset_sweep(&self) -> Option<JoinHandle<()>> {
        let assets = Arc::clone(self.assets.as_ref()?);
        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(_) => {
                warn!("No async runtime, skipping asset sweep");
                return None;
            }
        };
        Some(runtime.spawn(async move {
            match assets.collect_garbage().await {
                Ok(removed) => debug!("Asset sweep removed {} asset(s)", removed),
                Err(e) => {
                    let err = ChatError::from(e)
                        .with_context(ErrorContext::new("collect_garbage").with_component("assets"));
                    warn!(
                        "Asset sweep failed [{}]: {} (retryable: {})",
                        err.error_code(),
                        err,
                        err.is_retryable()
                    );
                }
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{InMemoryConversationStore, InMemoryFolders, MockAssetCollector};
    use crate::models::{Conversation, Message, MessageRole, PurposeId};

    fn setup() -> (InMemoryConversationStore, LifecycleController, PaneManager) {
        let store = InMemoryConversationStore::new();
        let controller = LifecycleController::new(Arc::new(store.clone()));
        (store, controller, PaneManager::new())
    }

    fn busy(store: &InMemoryConversationStore) -> ConversationId {
        store.insert_with_messages(vec![Message::text(MessageRole::User, "hi")])
    }

    #[test]
    fn test_new_conversation_recycles_empty_top() {
        let (store, controller, mut panes) = setup();
        let empty = store.insert_titled("empty");

        let id = controller.new_conversation(&mut panes, false);
        assert_eq!(id, empty);
        assert_eq!(store.len(), 1);
        assert_eq!(panes.focused_conversation_id(), Some(&empty));
    }

    #[test]
    fn test_new_conversation_forced_inherits_purpose() {
        let (store, controller, mut panes) = setup();
        let mut coder = Conversation::new(Some(PurposeId::from("coder")));
        coder.messages.push(Message::text(MessageRole::User, "fn main"));
        let coder_id = store.insert(coder);
        panes.open_in_focused_pane(Some(coder_id));

        let id = controller.new_conversation(&mut panes, true);
        assert_eq!(store.len(), 2);
        assert_eq!(
            store.conversation(&id).unwrap().system_purpose_id,
            PurposeId::from("coder")
        );
        assert_eq!(store.conversation_ids()[0], id);
    }

    #[test]
    fn test_new_conversation_files_into_active_folder() {
        let store = InMemoryConversationStore::new();
        let folders = InMemoryFolders::new();
        let work = folders.create("Work");
        let mut controller = LifecycleController::new(Arc::new(store.clone()))
            .with_folders(Arc::new(folders.clone()));
        controller.set_active_folder(Some(work.clone()));
        let mut panes = PaneManager::new();

        let id = controller.new_conversation(&mut panes, false);
        assert_eq!(folders.conversations_in(&work), vec![id]);
    }

    #[test]
    fn test_active_folder_ignored_when_disabled() {
        let (_store, mut controller, _panes) = setup();
        controller.set_active_folder(Some(FolderId::from("f")));
        assert!(controller.active_folder().is_none());
    }

    #[test]
    fn test_branch_opens_split_pane() {
        let (store, controller, mut panes) = setup();
        let source = busy(&store);
        panes.open_in_focused_pane(Some(source.clone()));

        let branched = controller
            .branch_conversation(&mut panes, &source, None)
            .unwrap();
        assert_eq!(panes.len(), 2);
        assert_eq!(panes.focused_conversation_id(), Some(&branched));
        assert_eq!(store.messages(&branched).len(), 1);

        assert!(controller
            .branch_conversation(&mut panes, &ConversationId::from("gone"), None)
            .is_none());
    }

    #[test]
    fn test_clear_last_request_wins() {
        let (store, mut controller, _panes) = setup();
        let c1 = busy(&store);
        let c2 = busy(&store);

        assert_eq!(controller.request_clear(c1.clone()), None);
        assert_eq!(controller.request_clear(c2.clone()), Some(c1.clone()));
        assert_eq!(controller.confirm_clear(), Some(c2.clone()));

        assert!(store.messages(&c2).is_empty());
        assert_eq!(store.messages(&c1).len(), 1);
        assert!(controller.pending_clear().is_none());
    }

    #[test]
    fn test_cancel_clear() {
        let (store, mut controller, _panes) = setup();
        let c1 = busy(&store);
        controller.request_clear(c1.clone());
        controller.cancel_clear();
        assert_eq!(controller.confirm_clear(), None);
        assert_eq!(store.messages(&c1).len(), 1);
    }

    #[test]
    fn test_delete_without_bypass_is_pending() {
        let (store, mut controller, mut panes) = setup();
        let a = busy(&store);

        let outcome = controller.delete_conversations(&mut panes, vec![a.clone()], false);
        assert!(outcome.is_pending());
        assert!(store.delete_calls().is_empty());
        assert_eq!(controller.pending_delete(), Some(&[a.clone()][..]));
        assert_eq!(
            controller.pending_confirmation(),
            Some(ConfirmationRequest::Delete(vec![a]))
        );
    }

    #[test]
    fn test_confirm_delete_rebinds_focus() {
        let (store, mut controller, mut panes) = setup();
        let older = busy(&store);
        let newer = busy(&store);
        panes.open_in_focused_pane(Some(newer.clone()));

        controller.delete_conversations(&mut panes, vec![newer.clone()], false);
        let _ = controller.pending_delete();
        let _ = controller.pending_delete();
        let outcome = controller.confirm_delete(&mut panes);

        assert_eq!(outcome.deleted(), &[newer.clone()]);
        assert_eq!(store.delete_calls(), vec![vec![newer]]);
        assert_eq!(panes.focused_conversation_id(), Some(&older));
        assert!(controller.pending_delete().is_none());
    }

    #[test]
    fn test_delete_of_vanished_ids_is_silent() {
        let (store, mut controller, mut panes) = setup();
        let keep = busy(&store);
        let gone = busy(&store);
        panes.open_in_focused_pane(Some(keep.clone()));

        controller.delete_conversations(&mut panes, vec![gone.clone()], false);
        store.remove_silently(&gone);
        let outcome = controller.confirm_delete(&mut panes);

        assert!(outcome.deleted().is_empty());
        assert!(store.delete_calls().is_empty());
        assert_eq!(panes.focused_conversation_id(), Some(&keep));
        assert!(controller.pending_delete().is_none());
    }

    #[test]
    fn test_delete_empty_list_is_ignored() {
        let (_store, mut controller, mut panes) = setup();
        assert!(matches!(
            controller.delete_conversations(&mut panes, Vec::new(), true),
            DeleteOutcome::Ignored
        ));
        assert!(matches!(
            controller.confirm_delete(&mut panes),
            DeleteOutcome::Ignored
        ));
    }

    #[tokio::test]
    async fn test_failed_asset_sweep_does_not_affect_delete() {
        let store = InMemoryConversationStore::new();
        let assets = MockAssetCollector::new();
        assets.set_should_fail(true);
        let mut controller = LifecycleController::new(Arc::new(store.clone()))
            .with_assets(Arc::new(assets.clone()));
        let mut panes = PaneManager::new();
        let a = busy(&store);

        let outcome = controller.delete_conversations(&mut panes, vec![a.clone()], true);
        match outcome {
            DeleteOutcome::Deleted { deleted, next, sweep } => {
                assert_eq!(deleted, vec![a]);
                assert!(next.is_some());
                sweep.unwrap().await.unwrap();
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(assets.sweep_count(), 1);
    }
}

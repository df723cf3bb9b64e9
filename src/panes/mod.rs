//! Pane manager: the ordered list of conversation panes and the focus index.
//!
//! The pane list and focus are only mutated through [`PaneManager`] methods,
//! from the UI task. After every mutation a fresh [`PaneLayout`] (with its
//! derived views) is published to subscribers.

pub mod policy;
mod types;

pub use policy::MAX_PANES;
pub use types::{unique_conversation_ids, Pane, PaneLayout, PaneOpen};

use tokio::sync::watch;
use tracing::debug;

use crate::models::{ConversationId, PaneId};
use crate::traits::{ConversationStore, HistoryDirection};

/// Owns the panes and the focused-pane index.
#[derive(Debug)]
pub struct PaneManager {
    panes: Vec<Pane>,
    focused: Option<usize>,
    next_pane_id: u64,
    layout_tx: watch::Sender<PaneLayout>,
}

impl Default for PaneManager {
    fn default() -> Self {
        Self::new()
    }
}

impl PaneManager {
    /// A single unbound, focused pane.
    pub fn new() -> Self {
        let first = Pane {
            pane_id: PaneId(1),
            conversation_id: None,
            order: 0,
        };
        let panes = vec![first];
        let focused = Some(0);
        let (layout_tx, _) = watch::channel(PaneLayout::derive(&panes, focused));
        Self {
            panes,
            focused,
            next_pane_id: 2,
            layout_tx,
        }
    }

    pub fn panes(&self) -> &[Pane] {
        &self.panes
    }

    pub fn len(&self) -> usize {
        self.panes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panes.is_empty()
    }

    pub fn focused_pane_index(&self) -> Option<usize> {
        self.focused
    }

    pub fn focused_conversation_id(&self) -> Option<&ConversationId> {
        self.focused
            .and_then(|idx| self.panes.get(idx))
            .and_then(|pane| pane.conversation_id.as_ref())
    }

    /// Distinct conversation ids across panes, recomputed on every call.
    pub fn unique_conversation_ids(&self) -> Vec<ConversationId> {
        unique_conversation_ids(&self.panes)
    }

    pub fn is_multi_pane(&self) -> bool {
        self.panes.len() >= 2
    }

    pub fn is_multi_addable(&self) -> bool {
        policy::can_add_pane(self.panes.len())
    }

    pub fn is_multi_conversation(&self) -> bool {
        self.unique_conversation_ids().len() >= 2
    }

    /// Current layout with freshly derived views.
    pub fn layout(&self) -> PaneLayout {
        PaneLayout::derive(&self.panes, self.focused)
    }

    /// Subscribe to layout changes.
    pub fn subscribe(&self) -> watch::Receiver<PaneLayout> {
        self.layout_tx.subscribe()
    }

    /// Bind `conversation_id` to the focused pane.
    ///
    /// No-op for `None`. Returns the index of the rebound pane.
    pub fn open_in_focused_pane(&mut self, conversation_id: Option<ConversationId>) -> Option<usize> {
        let conversation_id = conversation_id?;
        let idx = self.ensure_focus();
        debug!("Opening conversation {} in focused pane {}", conversation_id, idx);
        self.panes[idx].conversation_id = Some(conversation_id);
        self.publish();
        Some(idx)
    }

    /// Open `conversation_id` in a new pane, or in the focused pane when the
    /// pane capacity is reached. No-op for `None`.
    pub fn open_in_split_pane(&mut self, conversation_id: Option<ConversationId>) -> Option<PaneOpen> {
        let conversation_id = conversation_id?;

        if !policy::can_add_pane(self.panes.len()) {
            debug!(
                "Pane capacity ({}) reached, replacing focused pane content with {}",
                MAX_PANES, conversation_id
            );
            return self
                .open_in_focused_pane(Some(conversation_id))
                .map(PaneOpen::Replaced);
        }

        let pane_id = PaneId(self.next_pane_id);
        self.next_pane_id += 1;
        let idx = self.panes.len();
        self.panes.push(Pane {
            pane_id,
            conversation_id: Some(conversation_id),
            order: idx,
        });
        self.focused = Some(idx);
        debug!("Opened split pane {} at index {}", pane_id, idx);
        self.publish();
        Some(PaneOpen::Split(idx))
    }

    /// Remove the pane at `idx`. The last remaining pane cannot be removed.
    ///
    /// Returns `true` if a pane was removed.
    pub fn remove_pane(&mut self, idx: usize) -> bool {
        if idx >= self.panes.len() || self.panes.len() <= 1 {
            return false;
        }

        let removed = self.panes.remove(idx);
        self.renumber();
        self.focused = policy::focus_after_removal(self.focused, idx, self.panes.len());
        debug!(
            "Removed pane {} (index {}), focus now {:?}",
            removed.pane_id, idx, self.focused
        );
        self.publish();
        true
    }

    /// Layout gesture: the pane at `idx` was collapsed to zero size.
    pub fn collapse_pane(&mut self, idx: usize) -> bool {
        if policy::should_remove_on_collapse(self.panes.len()) {
            self.remove_pane(idx)
        } else {
            false
        }
    }

    /// Set focus directly. Out-of-range indices are rejected.
    pub fn set_focused_pane_index(&mut self, idx: Option<usize>) -> bool {
        if matches!(idx, Some(i) if i >= self.panes.len()) {
            return false;
        }
        if self.focused != idx {
            self.focused = idx;
            self.publish();
        }
        true
    }

    /// Pointer click on a pane, with or without the inspect modifier.
    pub fn click_pane(&mut self, idx: usize, inspect_modifier: bool) -> bool {
        let focus = policy::focus_for_click(idx, self.panes.len(), inspect_modifier);
        self.set_focused_pane_index(focus)
    }

    /// Move focus to the next pane, wrapping around.
    pub fn cycle_focus(&mut self) {
        let next = match self.focused {
            Some(idx) => (idx + 1) % self.panes.len(),
            None => 0,
        };
        self.set_focused_pane_index(Some(next));
    }

    /// Move the focused pane to the neighbouring conversation in the
    /// registry's recency ordering.
    ///
    /// Returns `true` if the pane moved.
    pub fn navigate_history(
        &mut self,
        store: &dyn ConversationStore,
        direction: HistoryDirection,
    ) -> bool {
        let Some(current) = self.focused_conversation_id().cloned() else {
            return false;
        };
        match store.neighbor(&current, direction) {
            Some(next) if next != current => {
                debug!("History {:?}: {} -> {}", direction, current, next);
                self.open_in_focused_pane(Some(next)).is_some()
            }
            _ => false,
        }
    }

    /// Re-derive focus to pane 0 when nothing is focused.
    fn ensure_focus(&mut self) -> usize {
        match self.focused {
            Some(idx) if idx < self.panes.len() => idx,
            _ => {
                self.focused = Some(0);
                0
            }
        }
    }

    fn renumber(&mut self) {
        for (order, pane) in self.panes.iter_mut().enumerate() {
            pane.order = order;
        }
    }

    fn publish(&self) {
        self.layout_tx.send_replace(self.layout());
    }
}

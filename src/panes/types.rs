//! Pane value types and the derived layout snapshot.

use crate::models::{ConversationId, PaneId};

use super::policy::can_add_pane;

/// One visible slot capable of showing a conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pane {
    pub pane_id: PaneId,
    pub conversation_id: Option<ConversationId>,
    /// Display position, always equal to the index in the pane list
    pub order: usize,
}

/// Where an `open_in_split_pane` request landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaneOpen {
    /// A new pane was appended at this index and focused
    Split(usize),
    /// Capacity was reached; the focused pane at this index was rebound
    Replaced(usize),
}

impl PaneOpen {
    pub fn index(&self) -> usize {
        match self {
            PaneOpen::Split(idx) | PaneOpen::Replaced(idx) => *idx,
        }
    }
}

/// Snapshot of the pane list with its derived views.
///
/// Built from scratch on every change; the derived fields are never stored
/// anywhere else.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PaneLayout {
    pub panes: Vec<Pane>,
    pub focused: Option<usize>,
    /// Distinct bound conversation ids, in pane order
    pub unique_conversation_ids: Vec<ConversationId>,
    pub is_multi_pane: bool,
    pub is_multi_addable: bool,
    pub is_multi_conversation: bool,
}

impl PaneLayout {
    pub fn derive(panes: &[Pane], focused: Option<usize>) -> Self {
        let unique_conversation_ids = unique_conversation_ids(panes);
        Self {
            is_multi_pane: panes.len() >= 2,
            is_multi_addable: can_add_pane(panes.len()),
            is_multi_conversation: unique_conversation_ids.len() >= 2,
            unique_conversation_ids,
            panes: panes.to_vec(),
            focused,
        }
    }

    pub fn focused_conversation_id(&self) -> Option<&ConversationId> {
        self.focused
            .and_then(|idx| self.panes.get(idx))
            .and_then(|pane| pane.conversation_id.as_ref())
    }

    pub fn is_focused(&self, idx: usize) -> bool {
        self.focused == Some(idx)
    }
}

/// Distinct conversation ids bound across panes, first occurrence wins.
pub fn unique_conversation_ids(panes: &[Pane]) -> Vec<ConversationId> {
    let mut ids: Vec<ConversationId> = Vec::with_capacity(panes.len());
    for id in panes.iter().filter_map(|pane| pane.conversation_id.as_ref()) {
        if !ids.contains(id) {
            ids.push(id.clone());
        }
    }
    ids
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pane(id: u64, conversation: Option<&str>, order: usize) -> Pane {
        Pane {
            pane_id: PaneId(id),
            conversation_id: conversation.map(ConversationId::from),
            order,
        }
    }

    #[test]
    fn test_unique_ids_dedup_and_skip_unbound() {
        let panes = vec![
            pane(1, Some("x"), 0),
            pane(2, None, 1),
            pane(3, Some("x"), 2),
            pane(4, Some("y"), 3),
        ];
        let ids = unique_conversation_ids(&panes);
        assert_eq!(ids, vec![ConversationId::from("x"), ConversationId::from("y")]);
    }

    #[test]
    fn test_layout_derived_flags() {
        let single = PaneLayout::derive(&[pane(1, Some("x"), 0)], Some(0));
        assert!(!single.is_multi_pane);
        assert!(single.is_multi_addable);
        assert!(!single.is_multi_conversation);

        let same_twice = PaneLayout::derive(&[pane(1, Some("x"), 0), pane(2, Some("x"), 1)], Some(1));
        assert!(same_twice.is_multi_pane);
        assert!(!same_twice.is_multi_conversation);
        assert_eq!(same_twice.focused_conversation_id(), Some(&ConversationId::from("x")));

        let full = PaneLayout::derive(
            &[
                pane(1, Some("a"), 0),
                pane(2, Some("b"), 1),
                pane(3, None, 2),
                pane(4, None, 3),
            ],
            None,
        );
        assert!(!full.is_multi_addable);
        assert!(full.is_multi_conversation);
        assert!(full.focused_conversation_id().is_none());
    }
}

use serde::{Deserialize, Serialize};

use super::ids::{ConversationId, FolderId};

/// A user folder grouping conversations in the drawer
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Folder {
    pub id: FolderId,
    pub title: String,
    #[serde(default)]
    pub conversation_ids: Vec<ConversationId>,
}

impl Folder {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: FolderId::new(),
            title: title.into(),
            conversation_ids: Vec::new(),
        }
    }

    /// Add a conversation unless it is already in the folder.
    ///
    /// Returns `true` if the conversation was added.
    pub fn add_conversation(&mut self, conversation_id: ConversationId) -> bool {
        if self.conversation_ids.contains(&conversation_id) {
            return false;
        }
        self.conversation_ids.push(conversation_id);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_conversation_is_idempotent() {
        let mut folder = Folder::new("Work");
        let id = ConversationId::from("c1");
        assert!(folder.add_conversation(id.clone()));
        assert!(!folder.add_conversation(id));
        assert_eq!(folder.conversation_ids.len(), 1);
    }
}

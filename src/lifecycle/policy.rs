//! Conversation lifecycle policies.

use crate::models::{Conversation, ConversationId};

/// The top-of-stack conversation can be reused for "new conversation" when
/// it has no messages yet.
pub fn recyclable_conversation(top_of_stack: Option<&Conversation>) -> Option<ConversationId> {
    top_of_stack
        .filter(|conversation| conversation.is_empty())
        .map(|conversation| conversation.id.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Message, MessageRole};

    #[test]
    fn test_empty_top_is_recycled() {
        let top = Conversation::new(None);
        assert_eq!(recyclable_conversation(Some(&top)), Some(top.id.clone()));
    }

    #[test]
    fn test_non_empty_top_is_not_recycled() {
        let top = Conversation::new(None).with_messages(vec![Message::text(MessageRole::User, "hi")]);
        assert_eq!(recyclable_conversation(Some(&top)), None);
        assert_eq!(recyclable_conversation(None), None);
    }
}

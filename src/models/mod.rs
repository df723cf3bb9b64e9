//! Data model shared by the orchestration layer and its collaborators.
//!
//! Conversations and messages are owned by the registry; these types are the
//! snapshots handed across the [`crate::traits`] boundary.

mod conversation;
mod folder;
mod ids;
mod message;

pub use conversation::{Conversation, CHAT_NOVEL_TITLE, DEFAULT_PURPOSE, NEW_CHAT_TITLE};
pub use folder::Folder;
pub use ids::{ConversationId, FolderId, FragmentId, MessageId, PaneId, PurposeId};
pub use message::{
    duplicate_fragments, AttachmentFragment, ContentFragment, ContentPart, Fragment, Message,
    MessageMetadata, MessageRole, ReferenceItem,
};

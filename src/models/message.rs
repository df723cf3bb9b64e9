use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{FragmentId, MessageId};

/// Role of a message in a conversation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
    System,
}

/// One renderable part of a message body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "pt", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    /// Reference to a stored image asset (the blob itself lives elsewhere)
    ImageRef {
        asset_id: String,
        #[serde(default)]
        alt_text: Option<String>,
    },
    Error { error: String },
}

/// Inline content of a message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContentFragment {
    pub fragment_id: FragmentId,
    pub part: ContentPart,
}

/// Content attached to a message (a file, a pasted document, an image)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AttachmentFragment {
    pub fragment_id: FragmentId,
    pub title: String,
    pub part: ContentPart,
}

/// A message is built from an ordered list of fragments
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "ft", rename_all = "snake_case")]
pub enum Fragment {
    Content(ContentFragment),
    Attachment(AttachmentFragment),
}

impl Fragment {
    /// Create a text content fragment.
    pub fn text(text: impl Into<String>) -> Self {
        Fragment::Content(ContentFragment {
            fragment_id: FragmentId::new(),
            part: ContentPart::Text { text: text.into() },
        })
    }

    /// Create an attachment fragment.
    pub fn attachment(title: impl Into<String>, part: ContentPart) -> Self {
        Fragment::Attachment(AttachmentFragment {
            fragment_id: FragmentId::new(),
            title: title.into(),
            part,
        })
    }

    pub fn fragment_id(&self) -> &FragmentId {
        match self {
            Fragment::Content(f) => &f.fragment_id,
            Fragment::Attachment(f) => &f.fragment_id,
        }
    }

    pub fn part(&self) -> &ContentPart {
        match self {
            Fragment::Content(f) => &f.part,
            Fragment::Attachment(f) => &f.part,
        }
    }

    /// Text of a content text fragment, `None` for anything else.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Fragment::Content(ContentFragment {
                part: ContentPart::Text { text },
                ..
            }) => Some(text),
            _ => None,
        }
    }

    /// Deep copy with a fresh fragment id.
    pub fn duplicate(&self) -> Self {
        match self {
            Fragment::Content(f) => Fragment::Content(ContentFragment {
                fragment_id: FragmentId::new(),
                part: f.part.clone(),
            }),
            Fragment::Attachment(f) => Fragment::Attachment(AttachmentFragment {
                fragment_id: FragmentId::new(),
                title: f.title.clone(),
                part: f.part.clone(),
            }),
        }
    }
}

/// Deep-copies fragments so the copies share no ownership with the source.
///
/// Asset references are copied by value; the referenced blobs are shared
/// through the asset store.
pub fn duplicate_fragments(fragments: &[Fragment]) -> Vec<Fragment> {
    fragments.iter().map(Fragment::duplicate).collect()
}

/// Extra data attached to a user message by the composer
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MessageMetadata {
    /// Quoted snippets the message replies to
    #[serde(default)]
    pub in_reference_to: Vec<ReferenceItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReferenceItem {
    pub quote: String,
    #[serde(default)]
    pub source_message_id: Option<MessageId>,
}

impl MessageMetadata {
    pub fn duplicate(&self) -> Self {
        self.clone()
    }

    pub fn is_empty(&self) -> bool {
        self.in_reference_to.is_empty()
    }
}

/// A message within a conversation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub id: MessageId,
    pub role: MessageRole,
    pub fragments: Vec<Fragment>,
    #[serde(default)]
    pub metadata: Option<MessageMetadata>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Build a message from already-owned fragments.
    pub fn from_fragments(role: MessageRole, fragments: Vec<Fragment>) -> Self {
        Self {
            id: MessageId::new(),
            role,
            fragments,
            metadata: None,
            created_at: Utc::now(),
        }
    }

    /// Build a single-text-fragment message.
    pub fn text(role: MessageRole, text: impl Into<String>) -> Self {
        Self::from_fragments(role, vec![Fragment::text(text)])
    }

    pub fn with_metadata(mut self, metadata: MessageMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Concatenated text of all text content fragments.
    pub fn text_content(&self) -> String {
        self.fragments
            .iter()
            .filter_map(Fragment::as_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

//! File-based conversation import/export.
//!
//! Exports go to `<export_dir>/<slug>-<id8>.<ext>`. Imports read one JSON
//! file holding either a single conversation or an array of them; there is
//! no file dialog in the terminal, so the file to import is configured up
//! front and a missing configuration counts as a cancelled dialog.

use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

use crate::adapters::mock::InMemoryConversationStore;
use crate::models::{Conversation, ConversationId, MessageRole};
use crate::traits::{ConversationStore, ConversationTrade, ExportFormat, ImportOutcome, TradeError};

/// Registry side of an import.
pub trait ImportSink: Send + Sync {
    /// Insert an imported conversation and return its id, which differs from
    /// the file's when that id is already taken.
    fn import_conversation(&self, conversation: Conversation) -> ConversationId;
}

impl ImportSink for InMemoryConversationStore {
    fn import_conversation(&self, mut conversation: Conversation) -> ConversationId {
        if self.conversation(&conversation.id).is_some() {
            let fresh = ConversationId::new();
            debug!("Imported id {} taken, using {}", conversation.id, fresh);
            conversation.id = fresh;
        }
        self.insert(conversation)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ConversationFile {
    Many(Vec<Conversation>),
    One(Box<Conversation>),
}

impl ConversationFile {
    fn into_vec(self) -> Vec<Conversation> {
        match self {
            ConversationFile::Many(conversations) => conversations,
            ConversationFile::One(conversation) => vec![*conversation],
        }
    }
}

/// [`ConversationTrade`] over the local file system.
pub struct JsonFileTrade {
    export_dir: PathBuf,
    import_file: Option<PathBuf>,
    sink: Arc<dyn ImportSink>,
}

impl JsonFileTrade {
    pub fn new(export_dir: impl Into<PathBuf>, sink: Arc<dyn ImportSink>) -> Self {
        Self {
            export_dir: export_dir.into(),
            import_file: None,
            sink,
        }
    }

    pub fn with_import_file(mut self, path: Option<PathBuf>) -> Self {
        self.import_file = path;
        self
    }

    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }

    /// Where `conversation` is written in `format`.
    pub fn export_path(&self, conversation: &Conversation, format: ExportFormat) -> PathBuf {
        let id: String = conversation.id.as_str().chars().take(8).collect();
        self.export_dir
            .join(format!("{}-{}.{}", slugify(conversation.display_title()), id, format.extension()))
    }
}

fn slugify(title: &str) -> String {
    let mut slug = String::new();
    for c in title.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-').to_string();
    if slug.is_empty() {
        "conversation".to_string()
    } else {
        slug
    }
}

/// Render a conversation as Markdown.
pub fn render_markdown(conversation: &Conversation) -> String {
    let mut out = format!("# {}\n\n", conversation.display_title());
    for message in &conversation.messages {
        let role = match message.role {
            MessageRole::User => "User",
            MessageRole::Assistant => "Assistant",
            MessageRole::System => "System",
        };
        out.push_str(&format!("**{}**: {}\n\n", role, message.text_content()));
    }
    out
}

#[async_trait]
impl ConversationTrade for JsonFileTrade {
    async fn save_conversation(
        &self,
        conversation: &Conversation,
        format: ExportFormat,
    ) -> Result<(), TradeError> {
        let contents = match format {
            ExportFormat::Json => serde_json::to_string_pretty(conversation)?,
            ExportFormat::Markdown => render_markdown(conversation),
        };
        let path = self.export_path(conversation, format);

        tokio::fs::create_dir_all(&self.export_dir).await?;
        tokio::fs::write(&path, contents).await?;
        info!("Exported {} to {}", conversation.id, path.display());
        Ok(())
    }

    async fn open_conversations(&self) -> Result<ImportOutcome, TradeError> {
        let Some(path) = self.import_file.as_ref() else {
            return Err(TradeError::Cancelled);
        };
        let contents = tokio::fs::read_to_string(path).await?;
        let conversations = serde_json::from_str::<ConversationFile>(&contents)?.into_vec();

        // most recently updated wins; later entries win ties
        let newest = conversations
            .iter()
            .enumerate()
            .max_by_key(|(_, c)| c.updated_at)
            .map(|(idx, _)| idx);

        let imported: Vec<ConversationId> = conversations
            .into_iter()
            .map(|conversation| self.sink.import_conversation(conversation))
            .collect();
        info!("Imported {} conversation(s) from {}", imported.len(), path.display());

        Ok(ImportOutcome {
            activate_conversation_id: newest.and_then(|idx| imported.get(idx).cloned()),
            imported,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Message;
    use chrono::{Duration, Utc};
    use tempfile::TempDir;

    fn trade(dir: &TempDir, store: &InMemoryConversationStore) -> JsonFileTrade {
        JsonFileTrade::new(dir.path().join("exports"), Arc::new(store.clone()))
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("  ??  "), "conversation");
        assert_eq!(slugify("Rust 2021"), "rust-2021");
    }

    #[tokio::test]
    async fn test_save_json_then_import() {
        let dir = TempDir::new().unwrap();
        let store = InMemoryConversationStore::new();
        let conversation = Conversation::new(None)
            .with_title("Trip plan")
            .with_messages(vec![Message::text(MessageRole::User, "where to?")]);
        let trade = trade(&dir, &store);

        trade
            .save_conversation(&conversation, ExportFormat::Json)
            .await
            .unwrap();
        let path = trade.export_path(&conversation, ExportFormat::Json);
        assert!(path.exists());
        assert!(path.file_name().unwrap().to_string_lossy().starts_with("trip-plan-"));

        let outcome = trade
            .with_import_file(Some(path))
            .open_conversations()
            .await
            .unwrap();
        assert_eq!(outcome.imported, vec![conversation.id.clone()]);
        assert_eq!(outcome.activate_conversation_id, Some(conversation.id.clone()));
        assert_eq!(store.messages(&conversation.id).len(), 1);
    }

    #[tokio::test]
    async fn test_import_array_activates_most_recent() {
        let dir = TempDir::new().unwrap();
        let store = InMemoryConversationStore::new();
        let mut older = Conversation::new(None).with_title("older");
        older.updated_at = Utc::now() - Duration::hours(1);
        let newer = Conversation::new(None).with_title("newer");
        let file = dir.path().join("import.json");
        std::fs::write(&file, serde_json::to_string(&vec![newer.clone(), older]).unwrap()).unwrap();

        let outcome = trade(&dir, &store)
            .with_import_file(Some(file))
            .open_conversations()
            .await
            .unwrap();
        assert_eq!(outcome.imported.len(), 2);
        assert_eq!(outcome.activate_conversation_id, Some(newer.id));
    }

    #[tokio::test]
    async fn test_import_renames_taken_ids() {
        let dir = TempDir::new().unwrap();
        let store = InMemoryConversationStore::new();
        let existing = Conversation::new(None);
        store.insert(existing.clone());
        let file = dir.path().join("dup.json");
        std::fs::write(&file, serde_json::to_string(&existing).unwrap()).unwrap();

        let outcome = trade(&dir, &store)
            .with_import_file(Some(file))
            .open_conversations()
            .await
            .unwrap();
        assert_ne!(outcome.imported[0], existing.id);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_import_errors() {
        let dir = TempDir::new().unwrap();
        let store = InMemoryConversationStore::new();

        let err = trade(&dir, &store).open_conversations().await.unwrap_err();
        assert!(err.is_cancelled());

        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "not json").unwrap();
        let err = trade(&dir, &store)
            .with_import_file(Some(bad))
            .open_conversations()
            .await
            .unwrap_err();
        assert!(matches!(err, TradeError::Format(_)));

        let err = trade(&dir, &store)
            .with_import_file(Some(dir.path().join("missing.json")))
            .open_conversations()
            .await
            .unwrap_err();
        assert!(matches!(err, TradeError::Io(_)));
    }

    #[tokio::test]
    async fn test_save_markdown() {
        let dir = TempDir::new().unwrap();
        let store = InMemoryConversationStore::new();
        let conversation = Conversation::new(None)
            .with_messages(vec![Message::text(MessageRole::Assistant, "hello")]);
        let trade = trade(&dir, &store);

        trade
            .save_conversation(&conversation, ExportFormat::Markdown)
            .await
            .unwrap();
        let written =
            std::fs::read_to_string(trade.export_path(&conversation, ExportFormat::Markdown))
                .unwrap();
        assert_eq!(written, "# Chat\n\n**Assistant**: hello\n\n");
    }
}

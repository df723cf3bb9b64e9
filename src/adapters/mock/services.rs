//! Test doubles for the secondary collaborators.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::models::{Conversation, ConversationId, Folder, FolderId};
use crate::traits::{
    AssetCollector, AssetError, ConversationTrade, ExportFormat, FolderStore, ImportOutcome,
    PromptImaginer, SpeechError, SpeechSynthesizer, TradeError,
};

/// Folder registry kept in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryFolders {
    folders: Arc<Mutex<Vec<Folder>>>,
}

impl InMemoryFolders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a folder and return its id.
    pub fn create(&self, title: &str) -> FolderId {
        let folder = Folder::new(title);
        let id = folder.id.clone();
        self.folders.lock().unwrap().push(folder);
        id
    }

    pub fn conversations_in(&self, folder_id: &FolderId) -> Vec<ConversationId> {
        self.folders
            .lock()
            .unwrap()
            .iter()
            .find(|f| &f.id == folder_id)
            .map(|f| f.conversation_ids.clone())
            .unwrap_or_default()
    }
}

impl FolderStore for InMemoryFolders {
    fn add_conversation_to_folder(&self, folder_id: &FolderId, conversation_id: &ConversationId) {
        let mut folders = self.folders.lock().unwrap();
        if let Some(folder) = folders.iter_mut().find(|f| &f.id == folder_id) {
            folder.add_conversation(conversation_id.clone());
        }
    }

    fn folders(&self) -> Vec<Folder> {
        self.folders.lock().unwrap().clone()
    }
}

/// Asset collector that counts sweeps and can be told to fail.
#[derive(Debug, Clone, Default)]
pub struct MockAssetCollector {
    sweeps: Arc<AtomicUsize>,
    should_fail: Arc<Mutex<bool>>,
}

impl MockAssetCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        *self.should_fail.lock().unwrap() = should_fail;
    }

    pub fn sweep_count(&self) -> usize {
        self.sweeps.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AssetCollector for MockAssetCollector {
    async fn collect_garbage(&self) -> Result<usize, AssetError> {
        self.sweeps.fetch_add(1, Ordering::SeqCst);
        if *self.should_fail.lock().unwrap() {
            return Err(AssetError::SweepFailed("Mock sweep failure".to_string()));
        }
        Ok(0)
    }
}

/// Scripted result of a [`MockTrade`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TradeScript {
    Succeed,
    Cancel,
    Fail(String),
}

impl TradeScript {
    fn into_result(self) -> Result<(), TradeError> {
        match self {
            TradeScript::Succeed => Ok(()),
            TradeScript::Cancel => Err(TradeError::Cancelled),
            TradeScript::Fail(msg) => Err(TradeError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                msg,
            ))),
        }
    }
}

/// File trade double: records saves, serves scripted imports.
#[derive(Debug, Clone)]
pub struct MockTrade {
    save_script: Arc<Mutex<TradeScript>>,
    open_script: Arc<Mutex<TradeScript>>,
    import: Arc<Mutex<ImportOutcome>>,
    saved: Arc<Mutex<Vec<(ConversationId, ExportFormat)>>>,
}

impl MockTrade {
    pub fn new() -> Self {
        Self {
            save_script: Arc::new(Mutex::new(TradeScript::Succeed)),
            open_script: Arc::new(Mutex::new(TradeScript::Succeed)),
            import: Arc::new(Mutex::new(ImportOutcome::default())),
            saved: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn set_save_script(&self, script: TradeScript) {
        *self.save_script.lock().unwrap() = script;
    }

    pub fn set_open_script(&self, script: TradeScript) {
        *self.open_script.lock().unwrap() = script;
    }

    /// What the next successful `open_conversations` returns.
    pub fn set_import(&self, outcome: ImportOutcome) {
        *self.import.lock().unwrap() = outcome;
    }

    pub fn saved(&self) -> Vec<(ConversationId, ExportFormat)> {
        self.saved.lock().unwrap().clone()
    }
}

impl Default for MockTrade {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConversationTrade for MockTrade {
    async fn save_conversation(
        &self,
        conversation: &Conversation,
        format: ExportFormat,
    ) -> Result<(), TradeError> {
        let script = self.save_script.lock().unwrap().clone();
        script.into_result()?;
        self.saved
            .lock()
            .unwrap()
            .push((conversation.id.clone(), format));
        Ok(())
    }

    async fn open_conversations(&self) -> Result<ImportOutcome, TradeError> {
        let script = self.open_script.lock().unwrap().clone();
        script.into_result()?;
        Ok(self.import.lock().unwrap().clone())
    }
}

/// Speech double recording what was spoken.
#[derive(Debug, Clone)]
pub struct MockSpeech {
    spoken: Arc<Mutex<Vec<String>>>,
    configured: Arc<Mutex<bool>>,
}

impl MockSpeech {
    pub fn new() -> Self {
        Self {
            spoken: Arc::new(Mutex::new(Vec::new())),
            configured: Arc::new(Mutex::new(true)),
        }
    }

    pub fn set_configured(&self, configured: bool) {
        *self.configured.lock().unwrap() = configured;
    }

    pub fn spoken(&self) -> Vec<String> {
        self.spoken.lock().unwrap().clone()
    }
}

impl Default for MockSpeech {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SpeechSynthesizer for MockSpeech {
    async fn speak(&self, text: &str) -> Result<(), SpeechError> {
        if !*self.configured.lock().unwrap() {
            return Err(SpeechError::NotConfigured);
        }
        self.spoken.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

/// Prompt imaginer answering from a queue, `None` once exhausted.
#[derive(Debug, Clone, Default)]
pub struct MockImaginer {
    prompts: Arc<Mutex<VecDeque<String>>>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockImaginer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_prompt(&self, prompt: &str) {
        self.prompts.lock().unwrap().push_back(prompt.to_string());
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PromptImaginer for MockImaginer {
    async fn imagine_prompt(&self, text: &str, _conversation_id: &ConversationId) -> Option<String> {
        self.requests.lock().unwrap().push(text.to_string());
        self.prompts.lock().unwrap().pop_front()
    }
}

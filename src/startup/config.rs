//! Application configuration.

use std::path::PathBuf;

use crate::error::{ChatError, ChatResult};

pub const ENV_CHAT_LLM: &str = "PANECHAT_CHAT_LLM";
pub const ENV_FOLDERS: &str = "PANECHAT_FOLDERS";
pub const ENV_MULTICAST: &str = "PANECHAT_MULTICAST";
pub const ENV_LOG: &str = "PANECHAT_LOG";
pub const ENV_EXPORT_DIR: &str = "PANECHAT_EXPORT_DIR";
pub const ENV_IMPORT_FILE: &str = "PANECHAT_IMPORT_FILE";

/// Default tracing filter.
pub const DEFAULT_LOG_FILTER: &str = "panechat=info";

/// Runtime configuration.
///
/// # Example
///
/// ```ignore
/// use panechat::startup::ChatConfig;
///
/// let config = ChatConfig::default()
///     .with_chat_llm("echo-1")
///     .with_folders_enabled(true);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatConfig {
    /// Configured chat model, `None` when no model is set up
    pub chat_llm: Option<String>,
    /// Whether folders (and the active folder) are in use
    pub folders_enabled: bool,
    /// Initial state of the composer multicast toggle
    pub multicast_default: bool,
    /// tracing `EnvFilter` directive
    pub log_filter: String,
    /// Where conversation exports are written
    pub export_dir: PathBuf,
    /// Conversation file read by "open file"; `None` behaves like a
    /// dismissed dialog
    pub import_file: Option<PathBuf>,
    /// Where the log file lives
    pub data_dir: PathBuf,
}

impl Default for ChatConfig {
    fn default() -> Self {
        let data_dir = default_data_dir();
        Self {
            chat_llm: None,
            folders_enabled: false,
            multicast_default: false,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            export_dir: data_dir.join("exports"),
            import_file: None,
            data_dir,
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("panechat")
}

impl ChatConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_chat_llm(mut self, llm: impl Into<String>) -> Self {
        self.chat_llm = Some(llm.into());
        self
    }

    pub fn with_folders_enabled(mut self, enabled: bool) -> Self {
        self.folders_enabled = enabled;
        self
    }

    pub fn with_multicast_default(mut self, multicast: bool) -> Self {
        self.multicast_default = multicast;
        self
    }

    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }

    pub fn with_export_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.export_dir = dir.into();
        self
    }

    pub fn with_import_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.import_file = Some(path.into());
        self
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// Path of the log file.
    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join("panechat.log")
    }

    /// Read `PANECHAT_*` environment variables over the defaults.
    pub fn from_env() -> ChatResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an explicit variable source.
    pub fn from_lookup<F>(lookup: F) -> ChatResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(llm) = lookup(ENV_CHAT_LLM).filter(|v| !v.trim().is_empty()) {
            config.chat_llm = Some(llm.trim().to_string());
        }
        if let Some(value) = lookup(ENV_FOLDERS) {
            config.folders_enabled = parse_flag(ENV_FOLDERS, &value)?;
        }
        if let Some(value) = lookup(ENV_MULTICAST) {
            config.multicast_default = parse_flag(ENV_MULTICAST, &value)?;
        }
        if let Some(filter) = lookup(ENV_LOG).filter(|v| !v.trim().is_empty()) {
            config.log_filter = filter;
        }
        if let Some(dir) = lookup(ENV_EXPORT_DIR).filter(|v| !v.trim().is_empty()) {
            config.export_dir = PathBuf::from(dir);
        }
        if let Some(file) = lookup(ENV_IMPORT_FILE).filter(|v| !v.trim().is_empty()) {
            config.import_file = Some(PathBuf::from(file));
        }

        Ok(config)
    }
}

fn parse_flag(key: &str, value: &str) -> ChatResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(ChatError::config(
            key,
            format!("expected a boolean, got '{}'", other),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = ChatConfig::default();
        assert!(config.chat_llm.is_none());
        assert!(!config.folders_enabled);
        assert!(!config.multicast_default);
        assert_eq!(config.log_filter, DEFAULT_LOG_FILTER);
        assert!(config.log_path().ends_with("panechat.log"));
    }

    #[test]
    fn test_builder() {
        let config = ChatConfig::new()
            .with_chat_llm("echo-1")
            .with_folders_enabled(true)
            .with_multicast_default(true)
            .with_export_dir("/tmp/exports");
        assert_eq!(config.chat_llm.as_deref(), Some("echo-1"));
        assert!(config.folders_enabled);
        assert!(config.multicast_default);
        assert_eq!(config.export_dir, PathBuf::from("/tmp/exports"));
    }

    #[test]
    fn test_from_lookup_reads_all_variables() {
        let config = ChatConfig::from_lookup(lookup(&[
            (ENV_CHAT_LLM, " gpt-echo "),
            (ENV_FOLDERS, "yes"),
            (ENV_MULTICAST, "1"),
            (ENV_LOG, "panechat=debug"),
            (ENV_EXPORT_DIR, "/data/out"),
            (ENV_IMPORT_FILE, "/data/in.json"),
        ]))
        .unwrap();

        assert_eq!(config.chat_llm.as_deref(), Some("gpt-echo"));
        assert!(config.folders_enabled);
        assert!(config.multicast_default);
        assert_eq!(config.log_filter, "panechat=debug");
        assert_eq!(config.export_dir, PathBuf::from("/data/out"));
        assert_eq!(config.import_file, Some(PathBuf::from("/data/in.json")));
    }

    #[test]
    fn test_invalid_flag_is_config_error() {
        let err = ChatConfig::from_lookup(lookup(&[(ENV_FOLDERS, "maybe")])).unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_INVALID");
        assert!(err.user_message().contains(ENV_FOLDERS));
    }

    #[test]
    fn test_blank_llm_means_unconfigured() {
        let config = ChatConfig::from_lookup(lookup(&[(ENV_CHAT_LLM, "   ")])).unwrap();
        assert!(config.chat_llm.is_none());
    }

    #[test]
    #[serial]
    fn test_from_env() {
        std::env::set_var(ENV_MULTICAST, "on");
        std::env::remove_var(ENV_FOLDERS);
        let config = ChatConfig::from_env().unwrap();
        std::env::remove_var(ENV_MULTICAST);

        assert!(config.multicast_default);
        assert!(!config.folders_enabled);
    }
}

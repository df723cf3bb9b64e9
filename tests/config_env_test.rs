//! Environment-driven configuration.
//!
//! These tests mutate process environment variables, so they run serially.

use std::path::PathBuf;

use serial_test::serial;

use panechat::startup::config::{
    ENV_CHAT_LLM, ENV_EXPORT_DIR, ENV_FOLDERS, ENV_IMPORT_FILE, ENV_MULTICAST,
};
use panechat::startup::ChatConfig;

const ALL: [&str; 5] = [
    ENV_CHAT_LLM,
    ENV_EXPORT_DIR,
    ENV_FOLDERS,
    ENV_IMPORT_FILE,
    ENV_MULTICAST,
];

fn clear_env() {
    for key in ALL {
        std::env::remove_var(key);
    }
}

#[test]
#[serial]
fn test_from_env_without_variables_is_default() {
    clear_env();
    let config = ChatConfig::from_env().unwrap();
    assert!(config.chat_llm.is_none());
    assert!(!config.multicast_default);
    assert!(config.import_file.is_none());
}

#[test]
#[serial]
fn test_from_env_reads_variables() {
    clear_env();
    std::env::set_var(ENV_CHAT_LLM, "echo-1");
    std::env::set_var(ENV_MULTICAST, "on");
    std::env::set_var(ENV_EXPORT_DIR, "/tmp/panechat-exports");
    std::env::set_var(ENV_IMPORT_FILE, "/tmp/chats.json");

    let config = ChatConfig::from_env().unwrap();
    clear_env();

    assert_eq!(config.chat_llm.as_deref(), Some("echo-1"));
    assert!(config.multicast_default);
    assert_eq!(config.export_dir, PathBuf::from("/tmp/panechat-exports"));
    assert_eq!(config.import_file, Some(PathBuf::from("/tmp/chats.json")));
}

#[test]
#[serial]
fn test_from_env_rejects_bad_flag() {
    clear_env();
    std::env::set_var(ENV_FOLDERS, "sometimes");

    let err = ChatConfig::from_env().unwrap_err();
    clear_env();

    assert!(err.user_message().contains(ENV_FOLDERS));
}

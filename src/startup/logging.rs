//! File logging.
//!
//! The terminal belongs to the pane strip, so tracing output goes to a file
//! under the data directory.

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use super::config::ChatConfig;
use crate::error::{ChatError, ChatResult, ErrorContext, ResultExt};

/// Install the global tracing subscriber writing to `config.log_path()`.
pub fn init_file_logging(config: &ChatConfig) -> ChatResult<()> {
    let log_path = config.log_path();
    if let Some(parent) = log_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|_| ChatError::NoDataDirectory {
                wanted: parent.to_path_buf(),
            })?;
        }
    }

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .context(ErrorContext::new("open_log_file").with_component("logging"))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(log_file))
        .try_init()
        .map_err(|e| ChatError::config("PANECHAT_LOG", e.to_string()))?;

    Ok(())
}

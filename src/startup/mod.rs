//! Startup: configuration and logging.
//!
//! - [`config`] - [`ChatConfig`] read from `PANECHAT_*` variables
//! - [`logging`] - file-backed tracing subscriber
//!
//! ```ignore
//! use panechat::startup::{init_file_logging, ChatConfig};
//!
//! let config = ChatConfig::from_env()?;
//! init_file_logging(&config)?;
//! ```

pub mod config;
pub mod logging;

pub use config::{ChatConfig, DEFAULT_LOG_FILTER};
pub use logging::init_file_logging;

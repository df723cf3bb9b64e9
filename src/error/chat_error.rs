//! Crate-level error type.

use std::fmt;
use std::path::PathBuf;

use super::category::ErrorCategory;
use super::context::ErrorContext;
use crate::traits::{AssetError, SpeechError, TradeError};

/// Unified error for collaborator I/O, configuration and the terminal.
///
/// Orchestration paths that talk to the execution engine never produce this;
/// they use the closed [`ExecuteOutcome`](crate::traits::ExecuteOutcome).
#[derive(Debug)]
pub enum ChatError {
    /// Conversation file import/export.
    Trade(TradeError),

    /// Text-to-speech.
    Speech(SpeechError),

    /// Asset garbage collection.
    Asset(AssetError),

    /// A collaborator the operation needs was never set up.
    NotConfigured { feature: &'static str },

    /// Invalid configuration value.
    Config { key: String, message: String },

    /// Filesystem or terminal I/O.
    Io(std::io::Error),

    /// Could not locate a directory the application needs.
    NoDataDirectory { wanted: PathBuf },

    /// Wrapped error with additional context.
    WithContext {
        error: Box<ChatError>,
        context: ErrorContext,
    },
}

impl ChatError {
    pub fn config(key: impl Into<String>, message: impl Into<String>) -> Self {
        ChatError::Config {
            key: key.into(),
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ChatError::Trade(err) => match err {
                TradeError::Cancelled | TradeError::Unsupported(_) => ErrorCategory::User,
                TradeError::Io(_) => ErrorCategory::System,
                TradeError::Format(_) => ErrorCategory::Client,
            },
            ChatError::Speech(SpeechError::NotConfigured) => ErrorCategory::Configuration,
            ChatError::Speech(_) | ChatError::Asset(_) => ErrorCategory::Service,
            ChatError::Config { .. } | ChatError::NotConfigured { .. } => {
                ErrorCategory::Configuration
            }
            ChatError::Io(_) | ChatError::NoDataDirectory { .. } => ErrorCategory::System,
            ChatError::WithContext { error, .. } => error.category(),
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.category().is_retryable()
    }

    /// Whether the user deliberately aborted the operation.
    pub fn is_cancelled(&self) -> bool {
        match self {
            ChatError::Trade(err) => err.is_cancelled(),
            ChatError::WithContext { error, .. } => error.is_cancelled(),
            _ => false,
        }
    }

    /// Message suitable for a transient notice.
    pub fn user_message(&self) -> String {
        match self {
            ChatError::Trade(TradeError::Cancelled) => "Operation cancelled.".to_string(),
            ChatError::Trade(err) => err.to_string(),
            ChatError::Speech(err) => err.to_string(),
            ChatError::Asset(err) => err.to_string(),
            ChatError::NotConfigured { feature } => {
                let mut chars = feature.chars();
                match chars.next() {
                    Some(first) => format!(
                        "{}{} is not configured.",
                        first.to_uppercase(),
                        chars.as_str()
                    ),
                    None => "Not configured.".to_string(),
                }
            }
            ChatError::Config { key, message } => format!("Invalid setting {}: {}", key, message),
            ChatError::Io(err) => format!("File system error: {}", err),
            ChatError::NoDataDirectory { wanted } => {
                format!("Could not create data directory {}", wanted.display())
            }
            ChatError::WithContext { error, .. } => error.user_message(),
        }
    }

    /// Short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            ChatError::Trade(TradeError::Cancelled) => "TRADE_CANCELLED",
            ChatError::Trade(TradeError::Io(_)) => "TRADE_IO",
            ChatError::Trade(TradeError::Format(_)) => "TRADE_FORMAT",
            ChatError::Trade(TradeError::Unsupported(_)) => "TRADE_UNSUPPORTED",
            ChatError::Speech(SpeechError::NotConfigured) => "SPEECH_UNCONFIGURED",
            ChatError::Speech(SpeechError::Failed(_)) => "SPEECH_FAILED",
            ChatError::Asset(_) => "ASSET_SWEEP",
            ChatError::NotConfigured { .. } => "NOT_CONFIGURED",
            ChatError::Config { .. } => "CONFIG_INVALID",
            ChatError::Io(_) => "IO",
            ChatError::NoDataDirectory { .. } => "NO_DATA_DIR",
            ChatError::WithContext { error, .. } => error.error_code(),
        }
    }

    pub fn with_context(self, ctx: ErrorContext) -> Self {
        ChatError::WithContext {
            error: Box::new(self),
            context: ctx,
        }
    }

    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            ChatError::WithContext { context, .. } => Some(context),
            _ => None,
        }
    }

    /// The error without any context wrappers.
    pub fn inner(&self) -> &ChatError {
        match self {
            ChatError::WithContext { error, .. } => error.inner(),
            _ => self,
        }
    }

    pub fn recovery_hint(&self) -> &'static str {
        self.category().recovery_hint()
    }
}

impl fmt::Display for ChatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatError::Trade(err) => write!(f, "{}", err),
            ChatError::Speech(err) => write!(f, "{}", err),
            ChatError::Asset(err) => write!(f, "{}", err),
            ChatError::NotConfigured { feature } => write!(f, "{} is not configured", feature),
            ChatError::Config { key, message } => write!(f, "invalid {}: {}", key, message),
            ChatError::Io(err) => write!(f, "{}", err),
            ChatError::NoDataDirectory { wanted } => {
                write!(f, "no data directory at {}", wanted.display())
            }
            ChatError::WithContext { error, context } => write!(f, "{} ({})", error, context),
        }
    }
}

impl std::error::Error for ChatError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ChatError::Trade(err) => Some(err),
            ChatError::Speech(err) => Some(err),
            ChatError::Asset(err) => Some(err),
            ChatError::Io(err) => Some(err),
            ChatError::Config { .. }
            | ChatError::NotConfigured { .. }
            | ChatError::NoDataDirectory { .. } => None,
            ChatError::WithContext { error, .. } => error.source(),
        }
    }
}

impl From<TradeError> for ChatError {
    fn from(err: TradeError) -> Self {
        ChatError::Trade(err)
    }
}

impl From<SpeechError> for ChatError {
    fn from(err: SpeechError) -> Self {
        ChatError::Speech(err)
    }
}

impl From<AssetError> for ChatError {
    fn from(err: AssetError) -> Self {
        ChatError::Asset(err)
    }
}

impl From<std::io::Error> for ChatError {
    fn from(err: std::io::Error) -> Self {
        ChatError::Io(err)
    }
}

impl From<serde_json::Error> for ChatError {
    fn from(err: serde_json::Error) -> Self {
        ChatError::Trade(TradeError::Format(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trade_categories() {
        let cancelled: ChatError = TradeError::Cancelled.into();
        assert_eq!(cancelled.category(), ErrorCategory::User);
        assert!(cancelled.is_cancelled());
        assert_eq!(cancelled.error_code(), "TRADE_CANCELLED");

        let io: ChatError =
            TradeError::Io(std::io::Error::new(std::io::ErrorKind::Other, "disk full")).into();
        assert_eq!(io.category(), ErrorCategory::System);
        assert!(!io.is_cancelled());
        assert_eq!(io.user_message(), "file error: disk full");
    }

    #[test]
    fn test_context_does_not_hide_cancellation() {
        let err: ChatError = TradeError::Cancelled.into();
        let wrapped = err.with_context(ErrorContext::new("save_conversation_file"));

        assert!(wrapped.is_cancelled());
        assert_eq!(wrapped.context().unwrap().operation, "save_conversation_file");
        assert!(matches!(wrapped.inner(), ChatError::Trade(TradeError::Cancelled)));
    }

    #[test]
    fn test_speech_not_configured_is_configuration() {
        let err: ChatError = SpeechError::NotConfigured.into();
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert!(!err.is_retryable());

        let failed: ChatError = SpeechError::Failed("timeout".to_string()).into();
        assert!(failed.is_retryable());
    }

    #[test]
    fn test_json_error_becomes_format_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: ChatError = json_err.into();
        assert_eq!(err.error_code(), "TRADE_FORMAT");
        assert_eq!(err.category(), ErrorCategory::Client);
    }

    #[test]
    fn test_config_error_message() {
        let err = ChatError::config("PANECHAT_FOLDERS", "expected a boolean");
        assert_eq!(
            err.user_message(),
            "Invalid setting PANECHAT_FOLDERS: expected a boolean"
        );
        assert_eq!(err.to_string(), "invalid PANECHAT_FOLDERS: expected a boolean");
    }
}

//! Error category classification.
//!
//! Categories drive how an error surfaces: as a notice the user can act on,
//! as a logged system fault, or as a configuration hint.

use std::fmt;

/// High-level categorization of errors for handling decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// The user dismissed or must change something (cancelled dialog,
    /// unsupported format).
    User,

    /// A collaborator service failed (speech, asset sweep).
    /// Usually transient.
    Service,

    /// Filesystem / terminal errors.
    System,

    /// Missing or invalid configuration.
    Configuration,

    /// Invalid state or malformed data, indicates a bug.
    Client,
}

impl ErrorCategory {
    /// Whether the failed operation may succeed if simply tried again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorCategory::Service | ErrorCategory::System)
    }

    /// Short label for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::User => "user",
            ErrorCategory::Service => "service",
            ErrorCategory::System => "system",
            ErrorCategory::Configuration => "configuration",
            ErrorCategory::Client => "client",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ErrorCategory::User => "User action required",
            ErrorCategory::Service => "Service unavailable",
            ErrorCategory::System => "System error",
            ErrorCategory::Configuration => "Configuration problem",
            ErrorCategory::Client => "Application error",
        }
    }

    /// Suggested recovery action for this category.
    pub fn recovery_hint(&self) -> &'static str {
        match self {
            ErrorCategory::User => "Please check your input and try again",
            ErrorCategory::Service => "The service may be busy. Please try again later",
            ErrorCategory::System => "Check file permissions and available disk space",
            ErrorCategory::Configuration => "Check your PANECHAT_* environment settings",
            ErrorCategory::Client => "This may be a bug. Please report this issue if it persists",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

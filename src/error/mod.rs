//! Error handling for panechat.
//!
//! - **Error Categories**: classification driving how an error surfaces
//! - **Unified Error Type**: `ChatError` wraps collaborator errors
//! - **Error Context**: operation and conversation attached for logging
//! - **Result Type Alias**: `ChatResult<T>`
//!
//! The execution engine is the exception: it reports through the closed
//! [`ExecuteOutcome`](crate::traits::ExecuteOutcome) and never produces a
//! `ChatError`.
//!
//! | Category | Example | Retryable |
//! |----------|---------|-----------|
//! | User | Cancelled file dialog | No |
//! | Service | Speech synthesis failed | Yes |
//! | System | Disk full while saving | Yes |
//! | Configuration | Invalid PANECHAT_* value | No |
//! | Client | Malformed conversation file | No |

mod category;
mod chat_error;
mod context;
mod result;

pub use category::ErrorCategory;
pub use chat_error::ChatError;
pub use context::ErrorContext;
pub use result::{ChatResult, ResultExt};

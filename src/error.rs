//! Error types for action-dispatch.

use thiserror::Error;

/// Main error type for all dispatch operations.
///
/// None of these cross [`Component::on_call`](crate::Component::on_call):
/// routing failures are reported through the result sink instead.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// No handler registered for the requested action.
    ///
    /// The display text is the exact message delivered to the caller.
    #[error("has not support for action:{action}")]
    UnroutableAction {
        /// The action name that could not be resolved.
        action: String,
    },

    /// A handler panicked while processing a call.
    #[error("action '{action}' panicked: {message}")]
    HandlerPanicked {
        /// The action whose handler panicked.
        action: String,
        /// Panic payload, if it was a string.
        message: String,
    },

    /// JSON serialization/deserialization error (params and result data).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error while delivering a result.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using DispatchError.
pub type Result<T> = std::result::Result<T, DispatchError>;

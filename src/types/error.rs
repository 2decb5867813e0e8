//! Errors reported to request callers

use thiserror::Error;

/// Request-level failure
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GatewayError {
    /// No usable engine yet; callers may retry
    #[error("Model not ready yet. Please wait for initialization.")]
    NotReady {
        loading: bool,
        /// Terminal initialization failure, when there is one
        detail: Option<String>,
    },

    /// Caller must fix the request
    #[error("{0}")]
    InvalidInput(String),

    /// Engine or classifier failed on a valid request
    #[error("{0}")]
    Internal(String),
}

impl GatewayError {
    pub fn invalid(message: impl Into<String>) -> Self {
        GatewayError::InvalidInput(message.into())
    }
}

//! Error types for session bootstrap and role selection.

use thiserror::Error;

/// Errors that can occur during session bootstrap
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The auth collaborator could not exchange the token for a profile
    #[error("Authentication failed: {reason}")]
    AuthenticationFailed {
        /// Why the exchange failed
        reason: String,
    },

    /// Invalid input (unknown mode string, malformed value)
    #[error("Validation error: {reason}")]
    Validation {
        /// What was invalid
        reason: String,
    },

    /// Referenced user/profile does not exist
    #[error("Not found")]
    NotFound,
}

impl SessionError {
    /// Whether this error is caused by user input rather than the system
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}

/// Result type alias for session operations
pub type Result<T> = std::result::Result<T, SessionError>;

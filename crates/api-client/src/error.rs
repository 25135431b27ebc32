//! Error types for the API client

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors surfaced by the remote-service boundary.
///
/// Every variant is terminal for the triggering action; there is no retry
/// and local state is never left half-updated.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Input rejected before any network call
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Login rejected by the backend
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Operation attempted without a logged-in session
    #[error("Not logged in")]
    NotAuthenticated,

    /// Backend answered with a structured failure
    #[error("Server rejected the request: {0}")]
    Api(String),

    /// Connectivity failure or a malformed response body
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Session file could not be read or written
    #[error("Session storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// Session file contents could not be decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    /// Create a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create an Api error
    pub fn api(message: impl Into<String>) -> Self {
        Self::Api(message.into())
    }
}

impl From<keyrack_core::Error> for ClientError {
    fn from(err: keyrack_core::Error) -> Self {
        Self::Validation(err.to_string())
    }
}

//! Error types for the Hepzify client.

use thiserror::Error;

/// Errors that can occur when talking to a Hepzify server.
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server returned an error response
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// The call needs a signed-in client
    #[error("Authentication required")]
    AuthRequired,

    /// Credentials or token rejected by the server
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    /// The track or playlist does not exist (or is not yours)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid server URL
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse server response
    #[error("Failed to parse response: {0}")]
    Parse(String),
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

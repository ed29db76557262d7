//! Error types for the WeDo invite tools.

use thiserror::Error;

/// Errors that can occur in WeDo operations.
#[derive(Error, Debug)]
pub enum WeDoError {
    #[error("Configuration error: {0}")]
    Config(String),

    /// The API answered with a non-success status.
    #[error("Request failed with status code {status}")]
    Http { status: u16, body: String },

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected response from API: {0}")]
    Decode(String),

    #[error("Not logged in. Run `wedo login` first.")]
    NotAuthenticated,

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl WeDoError {
    /// HTTP status of a rejected request, if the API answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            WeDoError::Http { status, .. } => Some(*status),
            WeDoError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Result type alias for WeDo operations.
pub type WeDoResult<T> = Result<T, WeDoError>;

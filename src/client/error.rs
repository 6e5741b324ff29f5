//! Error types for the FlickAI API client.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    /// Transport failure (connect, timeout, body read)
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success status; `detail` is the server's message when it sent one
    #[error("{detail} (status {status})")]
    Status { status: u16, detail: String },

    /// 401 from the server
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Failed to parse response: {0}")]
    MalformedResponse(String),

    /// Operation needs a logged-in session
    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Invalid base URL: {0}")]
    InvalidUrl(String),
}

impl ClientError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Unauthorized(_))
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;

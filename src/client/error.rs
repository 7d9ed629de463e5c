//! Client Error Types
//!
//! Failures inside the client. They never cross the client boundary as
//! errors: each one is flattened into [`ApiResponse::Error`].
//!
//! [`ApiResponse::Error`]: super::ApiResponse::Error

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur while talking to the weighing backend
#[derive(Error, Debug)]
pub enum ClientError {
    /// Connection refused, reset, DNS failure, timeout
    #[error("Network error: {0}")]
    Transport(#[source] reqwest::Error),

    /// Non-2xx response; `message` is the body's `error` field or a fallback
    #[error("{message}")]
    Status { status: u16, message: String },

    /// 2xx response whose body did not match the expected shape
    #[error("Invalid response from server: {0}")]
    Decode(String),

    /// The caller cancelled before the response arrived
    #[error("Request cancelled")]
    Cancelled,

    /// The HTTP client itself could not be constructed
    #[error("Failed to create HTTP client: {0}")]
    Build(#[source] reqwest::Error),
}

impl ClientError {
    pub(crate) fn from_reqwest(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ClientError::Decode(e.to_string())
        } else {
            ClientError::Transport(e)
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ClientError::Cancelled)
    }
}

/// Error body returned by the backend on failure
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

//! Error taxonomy shared by the store, lifecycle controller and HTTP layer.
//!
//! Every variant is terminal for the request that raised it; nothing is
//! retried internally. The HTTP layer maps variants to status codes.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A required field was missing or unusable.
    #[error("{0}")]
    Validation(String),

    /// Entity lookup returned no result.
    #[error("{0}")]
    NotFound(String),

    /// Missing or malformed access token.
    #[error("{0}")]
    Unauthorized(String),

    /// Chunk bytes could not be persisted.
    #[error("{message}: {details}")]
    Storage { message: String, details: String },

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl Error {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    pub fn storage(error: anyhow::Error) -> Self {
        Self::Storage {
            message: "Upload failed".to_string(),
            details: format!("{:#}", error),
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Presence check: `None` and empty strings both count as missing
pub fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

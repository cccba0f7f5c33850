#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Error types for the vouch verification resolver
//!
//! This crate provides fine-grained error types organized by domain.
//! All error types implement Clone for easier handling.

use std::borrow::Cow;

use thiserror::Error;

pub mod config;
pub mod network;
pub mod verify;

// Re-export all error types at the root
pub use config::ConfigError;
pub use network::NetworkError;
pub use verify::VerifyError;

/// Generic error type for cross-crate boundaries
#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Error {
    #[error("network error: {0}")]
    Network(#[from] NetworkError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("verification error: {0}")]
    Verify(#[from] VerifyError),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("I/O error: {message}")]
    Io { message: String },
}

impl Error {
    /// Create an internal error with a message
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
        }
    }
}

/// Result type alias for vouch operations
pub type Result<T> = std::result::Result<T, Error>;

/// Minimal interface for rendering user-facing error information without
/// requiring heavyweight envelopes.
pub trait UserFacingError {
    /// Short message suitable for CLI output.
    fn user_message(&self) -> Cow<'_, str>;

    /// Optional remediation hint.
    fn user_hint(&self) -> Option<&'static str> {
        None
    }

    /// Whether retrying the same operation is likely to succeed.
    fn is_retryable(&self) -> bool {
        false
    }
}

impl UserFacingError for Error {
    fn user_message(&self) -> Cow<'_, str> {
        match self {
            Error::Network(err) => err.user_message(),
            Error::Config(err) => err.user_message(),
            Error::Io { message } => Cow::Owned(message.clone()),
            _ => Cow::Owned(self.to_string()),
        }
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Error::Network(err) => err.user_hint(),
            Error::Config(err) => err.user_hint(),
            _ => None,
        }
    }

    fn is_retryable(&self) -> bool {
        match self {
            Error::Network(err) => err.is_retryable(),
            Error::Io { .. } => true,
            _ => false,
        }
    }
}

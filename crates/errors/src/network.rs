//! Network-related error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum NetworkError {
    #[error("connection timeout to {url}")]
    Timeout { url: String },

    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    #[error("HTTP error {status}: {message}")]
    HttpError { status: u16, message: String },

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("invalid response body: {message}")]
    InvalidResponse { message: String },
}

impl UserFacingError for NetworkError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::Timeout { .. } | Self::ConnectionFailed(_) => {
                Some("Check your network connection and retry.")
            }
            Self::HttpError { .. } => Some("The remote service may be down; retry later."),
            _ => None,
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Timeout { .. } | Self::ConnectionFailed(_) | Self::HttpError { .. }
        )
    }
}

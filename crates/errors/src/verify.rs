//! Verification-domain error types

use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum VerifyError {
    #[error("unknown package source: {0}")]
    UnknownSource(String),
}

#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Core type definitions for vouch
//!
//! This crate provides the fundamental types shared across the system:
//! package/verification source tags, canonical identifier handling, and
//! the serde models for the remote verification APIs.

pub mod package;
pub mod wire;

// Re-export commonly used types
pub use package::{canonical_name, PackageSource, VerificationSource};
pub use wire::{SnapDetails, SnapInfo, SnapPublisher, VerifiedAppHit, VerifiedAppsPage};

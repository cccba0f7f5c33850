#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Verified-publisher resolution for Flatpak and Snap packages
//!
//! The resolver answers "does this package come from a verified publisher?"
//! from three layers:
//!
//! - a bulk set of verified Flatpak app ids, fetched once per process from
//!   Flathub's paginated collection endpoint;
//! - a compiled-in allowlist of snap names confirmed verified out of band;
//! - a lazy per-snap cache filled from the store's info endpoint as an
//!   optional enrichment behind the allowlist.
//!
//! Remote failures never surface as errors: a failed fetch degrades to
//! "not verified" and sets the resolver's error flag. Once loading has
//! settled, every query is a synchronous in-memory lookup.

mod cache;
mod remote;
mod resolver;
mod trust;

pub use cache::{BulkOutcome, VerificationCache};
pub use remote::RemoteClient;
pub use resolver::{ResolverState, ResolverStatus, VerificationResolver};
pub use trust::StaticTrustTable;

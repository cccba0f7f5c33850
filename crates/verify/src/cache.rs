//! Process-lifetime memoization for verification facts
//!
//! Two stores: the bulk outcome slot for the Flathub fetch (written at most
//! once, first write wins) and a per-snap map filled lazily. Reads are
//! synchronous; an unpopulated store reads as "unknown", never blocks.

use dashmap::DashMap;
use std::collections::HashSet;
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::Mutex;

/// Result of the one bulk fetch attempt this process performed
#[derive(Debug, Clone)]
pub struct BulkOutcome {
    /// App ids whose trust flag was true. Absence means "not verified or
    /// unknown", never an error.
    pub verified: Arc<HashSet<String>>,
    /// False when pagination aborted early on a remote failure; the set then
    /// holds whatever was accumulated before the abort.
    pub complete: bool,
}

/// In-memory verification cache
///
/// Mutated only by the fetch paths in [`crate::RemoteClient`] and by
/// [`clear`](Self::clear); queries are read-only, so a stale "not yet
/// loaded" read yields a conservative negative rather than corruption.
pub struct VerificationCache {
    bulk: RwLock<Option<BulkOutcome>>,
    per_item: DashMap<String, bool>,
    flight: Mutex<()>,
}

impl VerificationCache {
    #[must_use]
    pub fn new() -> Self {
        Self {
            bulk: RwLock::new(None),
            per_item: DashMap::new(),
            flight: Mutex::new(()),
        }
    }

    /// Current bulk outcome, if a fetch attempt has settled
    #[must_use]
    pub fn bulk(&self) -> Option<BulkOutcome> {
        self.bulk
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Record the bulk outcome. First write wins; a concurrent loser gets
    /// the already-stored outcome back so every caller observes one result.
    pub fn store_bulk(&self, verified: HashSet<String>, complete: bool) -> BulkOutcome {
        let mut slot = self.bulk.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = slot.as_ref() {
            return existing.clone();
        }
        let outcome = BulkOutcome {
            verified: Arc::new(verified),
            complete,
        };
        *slot = Some(outcome.clone());
        outcome
    }

    /// Serialize bulk fetch attempts. Callers re-check [`bulk`](Self::bulk)
    /// after acquiring the guard so concurrent triggers collapse into one
    /// network traversal.
    pub async fn lock_bulk_flight(&self) -> tokio::sync::MutexGuard<'_, ()> {
        self.flight.lock().await
    }

    /// Cached per-snap verdict, keyed by canonical name
    #[must_use]
    pub fn per_item(&self, name: &str) -> Option<bool> {
        self.per_item.get(name).map(|entry| *entry)
    }

    /// Record a per-snap verdict. Overwrites are idempotent; entries are
    /// never invalidated except through [`clear`](Self::clear).
    pub fn put_per_item(&self, name: &str, verified: bool) {
        self.per_item.insert(name.to_string(), verified);
    }

    /// Drop everything, allowing a fresh fetch. For tests and manual
    /// refresh only; not part of the normal runtime flow.
    pub fn clear(&self) {
        let mut slot = self.bulk.write().unwrap_or_else(PoisonError::into_inner);
        *slot = None;
        drop(slot);
        self.per_item.clear();
    }
}

impl Default for VerificationCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unpopulated_reads_are_negative() {
        let cache = VerificationCache::new();
        assert!(cache.bulk().is_none());
        assert_eq!(cache.per_item("code"), None);
    }

    #[test]
    fn bulk_first_write_wins() {
        let cache = VerificationCache::new();
        let first = cache.store_bulk(HashSet::from(["org.gimp.GIMP".to_string()]), true);
        assert!(first.complete);

        let second = cache.store_bulk(HashSet::new(), false);
        assert!(second.complete);
        assert!(second.verified.contains("org.gimp.GIMP"));
        assert!(Arc::ptr_eq(&first.verified, &second.verified));
    }

    #[test]
    fn per_item_overwrite_is_idempotent() {
        let cache = VerificationCache::new();
        cache.put_per_item("code", false);
        cache.put_per_item("code", true);
        assert_eq!(cache.per_item("code"), Some(true));
    }

    #[test]
    fn clear_resets_both_stores() {
        let cache = VerificationCache::new();
        cache.store_bulk(HashSet::from(["a".to_string()]), true);
        cache.put_per_item("code", true);

        cache.clear();
        assert!(cache.bulk().is_none());
        assert_eq!(cache.per_item("code"), None);

        // A fresh bulk attempt is permitted after clearing.
        let outcome = cache.store_bulk(HashSet::new(), false);
        assert!(!outcome.complete);
    }
}

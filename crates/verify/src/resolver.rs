//! Verification resolver
//!
//! The public-facing component: composes the static trust table, the cache,
//! and the remote client behind two synchronous query operations plus a
//! loading/error status. Constructed once per process and passed by
//! reference to consumers; all state lives on the instance.

use crate::cache::VerificationCache;
use crate::remote::RemoteClient;
use crate::trust::StaticTrustTable;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use tracing::debug;
use vouch_config::Config;
use vouch_net::NetClient;
use vouch_types::{canonical_name, PackageSource, VerificationSource};

/// Lifecycle of the one-shot load
///
/// The only allowed path is Idle → Loading → {Ready | Degraded}. Re-entry
/// from any non-Idle state answers from the settled state; only
/// [`VerificationResolver::clear_cache`] returns to Idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ResolverState {
    Idle = 0,
    Loading = 1,
    /// Load settled with complete data.
    Ready = 2,
    /// Load settled after a remote failure; queries answer from whatever
    /// partial data was obtained.
    Degraded = 3,
}

impl ResolverState {
    fn from_repr(value: u8) -> Self {
        match value {
            1 => Self::Loading,
            2 => Self::Ready,
            3 => Self::Degraded,
            _ => Self::Idle,
        }
    }
}

/// Status exposed to the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverStatus {
    /// True until the load has settled, successfully or by degrading.
    pub is_loading: bool,
    /// True when the bulk fetch path experienced a failure. Queries keep
    /// answering from partial data; this is attribution, not a gate.
    pub has_error: bool,
}

/// Resolves verified-publisher facts for Flatpak and Snap packages
pub struct VerificationResolver {
    remote: RemoteClient,
    cache: Arc<VerificationCache>,
    trust: StaticTrustTable,
    state: AtomicU8,
}

impl VerificationResolver {
    #[must_use]
    pub fn new(net: NetClient, config: Config) -> Self {
        let cache = Arc::new(VerificationCache::new());
        Self {
            remote: RemoteClient::new(net, config, Arc::clone(&cache)),
            cache,
            trust: StaticTrustTable::new(),
            state: AtomicU8::new(ResolverState::Idle as u8),
        }
    }

    /// Build with a custom trust table; used by tests.
    #[must_use]
    pub fn with_trust_table(net: NetClient, config: Config, trust: StaticTrustTable) -> Self {
        let mut resolver = Self::new(net, config);
        resolver.trust = trust;
        resolver
    }

    /// Perform the one-shot load and return the settled status.
    ///
    /// Triggers the bulk Flathub fetch; the snap side needs no network step
    /// because its trust signal is served from the static table, so it is
    /// ready as soon as the bulk attempt settles. Concurrent and repeat
    /// calls collapse onto one network traversal and all observe the same
    /// outcome. Never returns an error: a failed fetch settles as Degraded.
    pub async fn load(&self) -> ResolverStatus {
        match self.state() {
            ResolverState::Ready | ResolverState::Degraded => return self.status(),
            ResolverState::Idle | ResolverState::Loading => {}
        }

        self.state
            .store(ResolverState::Loading as u8, Ordering::SeqCst);

        // Single-flight lives in the client; a racing caller blocks there
        // and gets the identical outcome, degraded flag included.
        let outcome = self.remote.bulk_verified().await;
        let settled = if outcome.complete {
            ResolverState::Ready
        } else {
            ResolverState::Degraded
        };
        debug!(
            verified = outcome.verified.len(),
            complete = outcome.complete,
            "verification load settled"
        );
        self.state.store(settled as u8, Ordering::SeqCst);
        self.status()
    }

    /// Whether the package comes from a verified publisher.
    ///
    /// Synchronous and non-blocking: before the load settles this returns
    /// `false` for every identifier.
    #[must_use]
    pub fn is_verified(&self, source: PackageSource, id: &str) -> bool {
        if !self.loaded() {
            return false;
        }
        match source {
            PackageSource::Flatpak => self
                .cache
                .bulk()
                .is_some_and(|outcome| outcome.verified.contains(id)),
            PackageSource::Snap => {
                let name = canonical_name(id);
                self.trust.contains(name) || self.cache.per_item(name) == Some(true)
            }
        }
    }

    /// Which source attested the package, for badge attribution
    #[must_use]
    pub fn verification_source(
        &self,
        source: PackageSource,
        id: &str,
    ) -> Option<VerificationSource> {
        self.is_verified(source, id).then(|| match source {
            PackageSource::Flatpak => VerificationSource::Flathub,
            PackageSource::Snap => VerificationSource::Snapcraft,
        })
    }

    /// Warm the per-snap cache for a set of identifiers.
    ///
    /// Best-effort enrichment behind the static table: batched, bounded
    /// fan-out, never errors. Returns the verdict per canonical name.
    pub async fn prefetch_snap_verifications<I, S>(
        &self,
        ids: I,
    ) -> std::collections::HashMap<String, bool>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.remote.snap_verified_many(ids).await
    }

    /// Sorted list of every verified Flatpak app id obtained by the load.
    /// Empty until the load settles.
    #[must_use]
    pub fn verified_flatpak_ids(&self) -> Vec<String> {
        let Some(outcome) = self.cache.bulk() else {
            return Vec::new();
        };
        let mut ids: Vec<String> = outcome.verified.iter().cloned().collect();
        ids.sort_unstable();
        ids
    }

    /// Current loading/error status
    #[must_use]
    pub fn status(&self) -> ResolverStatus {
        let state = self.state();
        ResolverStatus {
            is_loading: matches!(state, ResolverState::Idle | ResolverState::Loading),
            has_error: state == ResolverState::Degraded,
        }
    }

    /// Current lifecycle state
    #[must_use]
    pub fn state(&self) -> ResolverState {
        ResolverState::from_repr(self.state.load(Ordering::SeqCst))
    }

    /// Whether the load has settled; queries answer negatively before then.
    fn loaded(&self) -> bool {
        matches!(
            self.state(),
            ResolverState::Ready | ResolverState::Degraded
        )
    }

    /// Drop all cached facts and return to Idle so a fresh load is allowed.
    /// For tests and manual refresh; not part of the normal runtime flow.
    pub fn clear_cache(&self) {
        self.cache.clear();
        self.state.store(ResolverState::Idle as u8, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> VerificationResolver {
        // Unreachable endpoints; these tests never load.
        let mut config = Config::default();
        config.flathub.base_url = "http://127.0.0.1:9/api/v2".to_string();
        config.snapcraft.base_url = "http://127.0.0.1:9/v2".to_string();
        VerificationResolver::new(NetClient::with_defaults().unwrap(), config)
    }

    #[test]
    fn queries_before_load_are_negative() {
        let resolver = resolver();
        assert_eq!(resolver.state(), ResolverState::Idle);
        assert!(resolver.status().is_loading);
        assert!(!resolver.status().has_error);

        // Even a static-table hit stays hidden until the load settles.
        assert!(!resolver.is_verified(PackageSource::Snap, "spotify"));
        assert!(!resolver.is_verified(PackageSource::Flatpak, "org.gimp.GIMP"));
        assert_eq!(
            resolver.verification_source(PackageSource::Snap, "spotify"),
            None
        );
    }

    #[test]
    fn settling_opens_the_query_gate() {
        let resolver = resolver();
        assert!(!resolver.is_verified(PackageSource::Snap, "spotify"));

        resolver
            .state
            .store(ResolverState::Ready as u8, Ordering::SeqCst);
        assert!(resolver.is_verified(PackageSource::Snap, "spotify"));
        assert_eq!(
            resolver.verification_source(PackageSource::Snap, "spotify"),
            Some(VerificationSource::Snapcraft)
        );

        // A degraded settle answers too; only Idle and Loading stay closed.
        resolver
            .state
            .store(ResolverState::Degraded as u8, Ordering::SeqCst);
        assert!(resolver.is_verified(PackageSource::Snap, "spotify"));
    }

    #[test]
    fn clear_cache_returns_to_idle() {
        let resolver = resolver();
        resolver
            .state
            .store(ResolverState::Degraded as u8, Ordering::SeqCst);
        assert!(resolver.status().has_error);

        resolver.clear_cache();
        assert_eq!(resolver.state(), ResolverState::Idle);
        assert!(!resolver.status().has_error);
    }
}

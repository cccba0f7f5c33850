//! Remote verification client
//!
//! Talks to the two verification sources and converts raw responses into
//! boolean facts. Failures never cross this boundary as errors: every
//! transport failure, non-success status, or malformed payload is logged
//! and degrades to a conservative negative.

use crate::cache::{BulkOutcome, VerificationCache};
use futures::future::join_all;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, warn};
use vouch_config::Config;
use vouch_net::NetClient;
use vouch_types::{canonical_name, SnapInfo, VerifiedAppsPage};

/// Hard cap on collection page size, enforced regardless of configuration.
const MAX_PAGE_SIZE: u32 = 250;

/// Client for the Flathub collection and Snap info endpoints
pub struct RemoteClient {
    net: NetClient,
    config: Config,
    cache: Arc<VerificationCache>,
}

impl RemoteClient {
    #[must_use]
    pub fn new(net: NetClient, config: Config, cache: Arc<VerificationCache>) -> Self {
        Self { net, config, cache }
    }

    /// Fetch the set of verified Flatpak app ids, at most once per process.
    ///
    /// Idempotent and single-flight: if an outcome exists it is returned
    /// without I/O, and concurrent callers share one traversal. Pagination
    /// walks bounded pages from page 1, stops when the server reports no
    /// more pages, and unconditionally stops at the configured page
    /// ceiling. Any failure aborts pagination and keeps what was
    /// accumulated; this function never returns an error.
    pub async fn bulk_verified(&self) -> BulkOutcome {
        if let Some(outcome) = self.cache.bulk() {
            return outcome;
        }

        let _flight = self.cache.lock_bulk_flight().await;
        if let Some(outcome) = self.cache.bulk() {
            return outcome;
        }

        let (verified, complete) = self.fetch_verified_pages().await;
        self.cache.store_bulk(verified, complete)
    }

    async fn fetch_verified_pages(&self) -> (HashSet<String>, bool) {
        let mut verified = HashSet::new();
        let per_page = self.config.flathub.per_page.min(MAX_PAGE_SIZE);
        let timeout = self.config.bulk_timeout();
        let mut page = 1u32;

        loop {
            let url = format!(
                "{}/collection/verified?page={page}&per_page={per_page}",
                self.config.flathub.base_url
            );

            let page_data: VerifiedAppsPage = match self.net.get_json(&url, timeout, &[]).await {
                Ok(data) => data,
                Err(error) => {
                    warn!(page, %error, "verified-app listing aborted; keeping partial set");
                    return (verified, false);
                }
            };

            for hit in &page_data.hits {
                if hit.verification_verified && !hit.app_id.is_empty() {
                    verified.insert(hit.app_id.clone());
                }
            }
            debug!(
                page,
                total_pages = page_data.total_pages,
                accumulated = verified.len(),
                "fetched verified-app page"
            );

            if page >= page_data.total_pages || page >= self.config.flathub.max_pages {
                break;
            }
            page += 1;
        }

        (verified, true)
    }

    /// Whether one snap's publisher is verified, fetching on a cache miss.
    ///
    /// The identifier is canonicalized first (install-mode qualifiers
    /// stripped). Every failure is cached as `false`; this function never
    /// returns an error.
    pub async fn snap_verified(&self, id: &str) -> bool {
        let name = canonical_name(id);
        if name.is_empty() {
            return false;
        }
        if let Some(cached) = self.cache.per_item(name) {
            return cached;
        }

        let url = format!(
            "{}/snaps/info/{name}?fields=publisher",
            self.config.snapcraft.base_url
        );
        let headers = [(
            "Snap-Device-Series",
            self.config.snapcraft.device_series.as_str(),
        )];

        let verified = match self
            .net
            .get_json::<SnapInfo>(&url, self.config.item_timeout(), &headers)
            .await
        {
            Ok(info) => info.snap.publisher.is_verified(),
            Err(error) => {
                warn!(snap = name, %error, "publisher lookup failed; treating as unverified");
                false
            }
        };

        self.cache.put_per_item(name, verified);
        verified
    }

    /// Resolve many snaps, bounding concurrency.
    ///
    /// Input is de-duplicated by canonical name and processed in fixed-size
    /// batches: requests within a batch run concurrently, batches run
    /// strictly sequentially, so outstanding connections never exceed the
    /// batch size. The result covers every distinct canonical name.
    pub async fn snap_verified_many<I, S>(&self, ids: I) -> HashMap<String, bool>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut names = Vec::new();
        for id in ids {
            let name = canonical_name(id.as_ref()).to_string();
            if !name.is_empty() && seen.insert(name.clone()) {
                names.push(name);
            }
        }

        let batch_size = self.config.snapcraft.batch_size.max(1);
        let mut results = HashMap::with_capacity(names.len());

        for batch in names.chunks(batch_size) {
            debug!(batch_len = batch.len(), "resolving snap publisher batch");
            let verdicts = join_all(batch.iter().map(|name| self.snap_verified(name))).await;
            for (name, verified) in batch.iter().zip(verdicts) {
                results.insert(name.clone(), verified);
            }
        }

        results
    }
}

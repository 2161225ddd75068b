//! Remote key source with an atomically swapped cache.
//!
//! The cache is the only mutable shared state in the crate. Readers load a
//! snapshot through [`arc_swap::ArcSwapOption`] and never observe a
//! partially updated set; a refresh replaces the whole snapshot at once.
//! Concurrent misses collapse into a single in-flight fetch: the refresh
//! mutex admits one fetcher and records the outcome (key set or error)
//! under a generation counter, and every caller that queued behind the
//! fetch adopts that outcome instead of fetching again.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwapOption;
use tokio::sync::Mutex;
use tracing::{debug, warn};
use url::Url;

use crate::error::{JwtError, JwtResult};
use crate::jwk::{JwkSet, Key};

/// Keys fetched lazily from an HTTP(S) JWK Set endpoint and cached until the
/// next miss. Construction performs no I/O.
#[derive(Debug)]
pub struct RemoteKeySource {
    url: Url,
    client: reqwest::Client,
    cache: ArcSwapOption<Vec<Key>>,
    /// Bumped after every completed fetch, while the refresh lock is held.
    generation: AtomicU64,
    /// Outcome of the most recently completed fetch.
    refresh: Mutex<Option<JwtResult<Arc<Vec<Key>>>>>,
}

impl RemoteKeySource {
    /// Bind a remote source to an endpoint. Every fetch is bounded by
    /// `timeout`; this source never blocks indefinitely.
    pub fn new(url: Url, timeout: Duration) -> JwtResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| JwtError::configuration(format!("http client setup failed: {err}")))?;
        Ok(Self {
            url,
            client,
            cache: ArcSwapOption::empty(),
            generation: AtomicU64::new(0),
            refresh: Mutex::new(None),
        })
    }

    /// Return the cached key set when it covers the request (the `kid` is
    /// present, or no `kid` was requested and a set exists); otherwise
    /// refresh from the endpoint and atomically replace the cache.
    pub async fn fetch(&self, kid: Option<&str>) -> JwtResult<Arc<Vec<Key>>> {
        let snapshot = self.cache.load_full();
        if let Some(keys) = &snapshot {
            if covers(keys, kid) {
                return Ok(Arc::clone(keys));
            }
        }

        let observed = self.generation.load(Ordering::Acquire);
        let mut last = self.refresh.lock().await;

        // A fetch completed while we waited for the lock. Adopt its outcome,
        // error included, even if the kid is still absent: all callers of one
        // rotation window observe the same result, and a failed fetch is not
        // retried once per queued waiter.
        if self.generation.load(Ordering::Acquire) != observed {
            if let Some(outcome) = last.clone() {
                return outcome;
            }
        }

        let outcome = self.fetch_document().await.map(Arc::new);
        if let Ok(keys) = &outcome {
            debug!(url = %self.url, keys = keys.len(), "remote key set refreshed");
            self.cache.store(Some(Arc::clone(keys)));
        }
        *last = Some(outcome.clone());
        self.generation.fetch_add(1, Ordering::Release);
        outcome
    }

    async fn fetch_document(&self) -> JwtResult<Vec<Key>> {
        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(|err| {
                warn!(url = %self.url, error = %err, "key set fetch failed");
                JwtError::key_resolution(format!("key set fetch failed: {err}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %self.url, %status, "key set endpoint returned an error status");
            return Err(JwtError::key_resolution(format!(
                "key set endpoint returned {status}"
            )));
        }

        let set: JwkSet = response.json().await.map_err(|err| {
            JwtError::key_resolution(format!("key set response is not a valid JWK Set: {err}"))
        })?;
        set.into_keys().map_err(JwtError::key_resolution)
    }
}

fn covers(keys: &[Key], kid: Option<&str>) -> bool {
    match kid {
        None => true,
        Some(kid) => keys.iter().any(|key| key.key_id.as_deref() == Some(kid)),
    }
}

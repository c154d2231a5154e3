//! Cache-backed fetcher
//!
//! Results are memoized per cache key as raw JSON, `null` included, so a
//! repeated request for the same endpoint and params never reaches the
//! transport until the entry is cleared.

use super::transport::Transport;
use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// Build the cache key for an endpoint and its serialized params
///
/// The key is the endpoint name immediately followed by the compact JSON of
/// the params, e.g. `paginatedTransactions{"page":0}`.
pub fn cache_key(endpoint: &str, params: &Value) -> String {
    format!("{endpoint}{params}")
}

/// Fetcher with request memoization and a loading indicator
#[derive(Debug)]
pub struct CustomFetch<T> {
    transport: T,
    cache: Mutex<HashMap<String, Value>>,
    in_flight: AtomicUsize,
}

impl<T: Transport> CustomFetch<T> {
    /// Create a fetcher over a transport with an empty cache
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            cache: Mutex::new(HashMap::new()),
            in_flight: AtomicUsize::new(0),
        }
    }

    /// Get the underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Whether any request issued through this fetcher is still in flight
    pub fn loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    /// Fetch through the cache
    ///
    /// A hit returns the memoized value without touching the transport.
    /// A miss performs the request and memoizes the result once it decodes.
    pub async fn fetch_with_cache<R, P>(&self, endpoint: &str, params: &P) -> Result<Option<R>>
    where
        R: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        let params = serde_json::to_value(params)?;
        let key = cache_key(endpoint, &params);

        let cached = self.entries().get(&key).cloned();
        if let Some(value) = cached {
            debug!("Cache hit: {}", key);
            return decode(endpoint, value);
        }

        debug!("Cache miss: {}", key);
        let value = self.execute(endpoint, params).await?;
        let decoded = decode(endpoint, value.clone())?;
        self.entries().insert(key, value);
        Ok(decoded)
    }

    /// Fetch bypassing the cache; the result is not memoized
    pub async fn fetch_without_cache<R, P>(&self, endpoint: &str, params: &P) -> Result<Option<R>>
    where
        R: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        let params = serde_json::to_value(params)?;
        let value = self.execute(endpoint, params).await?;
        decode(endpoint, value)
    }

    /// Drop every cached entry
    pub fn clear_cache(&self) {
        let mut entries = self.entries();
        debug!("Clearing {} cached entries", entries.len());
        entries.clear();
    }

    /// Drop every cached entry whose key starts with one of `endpoints`
    pub fn clear_cache_by_endpoint<S: AsRef<str>>(&self, endpoints: &[S]) {
        let mut entries = self.entries();
        let before = entries.len();
        entries.retain(|key, _| {
            !endpoints
                .iter()
                .any(|endpoint| key.starts_with(endpoint.as_ref()))
        });
        debug!("Cleared {} cached entries by endpoint", before - entries.len());
    }

    /// Whether a result for this endpoint and params is memoized
    pub fn is_cached<P: Serialize + ?Sized>(&self, endpoint: &str, params: &P) -> bool {
        serde_json::to_value(params)
            .map(|params| self.entries().contains_key(&cache_key(endpoint, &params)))
            .unwrap_or(false)
    }

    /// Number of memoized entries
    pub fn cache_len(&self) -> usize {
        self.entries().len()
    }

    async fn execute(&self, endpoint: &str, params: Value) -> Result<Value> {
        let _loading = LoadingGuard::enter(&self.in_flight);
        self.transport.request(endpoint, params).await
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, Value>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Keeps the in-flight counter raised for as long as it lives, so a failed
/// or dropped request still lowers it.
struct LoadingGuard<'a> {
    counter: &'a AtomicUsize,
}

impl<'a> LoadingGuard<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self { counter }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.counter.fetch_sub(1, Ordering::SeqCst);
    }
}

fn decode<R: DeserializeOwned>(endpoint: &str, value: Value) -> Result<Option<R>> {
    serde_json::from_value(value).map_err(|e| Error::decode(endpoint, e.to_string()))
}

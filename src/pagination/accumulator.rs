//! Pagination accumulator

use crate::error::{Error, Result};
use crate::fetch::{CustomFetch, Transport};
use crate::types::{
    PageToken, PaginatedRequestParams, PaginatedResponse, Transaction, PAGINATED_TRANSACTIONS,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// Everything accumulated so far, or `None` before the first fetch
pub type PaginationState<T> = Option<PaginatedResponse<Vec<T>>>;

/// Accumulator over the `paginatedTransactions` endpoint
pub type PaginatedTransactions<Tr> = PaginatedAccumulator<Transaction, Tr>;

/// What `fetch_all` does when another `fetch_all` is still in flight
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InFlightPolicy {
    /// Run it anyway; each call merges on its own completion
    #[default]
    Allow,
    /// Fail it with `Error::FetchInFlight` without touching state
    Reject,
}

/// Merge a fetched page into the accumulated state
///
/// A `None` response, or no prior state, replaces the state outright.
/// Otherwise the page's records are appended and its `next_page` is taken.
pub fn merge_page<T>(
    state: PaginationState<T>,
    response: Option<PaginatedResponse<Vec<T>>>,
) -> PaginationState<T> {
    match (state, response) {
        (_, None) => None,
        (None, Some(page)) => Some(page),
        (Some(mut accumulated), Some(page)) => {
            accumulated.data.extend(page.data);
            accumulated.next_page = page.next_page;
            Some(accumulated)
        }
    }
}

/// Accumulates the pages of one paginated endpoint
///
/// The state cell is only locked for single reads or writes and never across
/// the fetch, so `invalidate_data` and other `fetch_all` calls may interleave
/// with a fetch in flight. No fetch is ever cancelled: a late merge after an
/// invalidation repopulates the state.
#[derive(Debug)]
pub struct PaginatedAccumulator<T, Tr> {
    fetcher: Arc<CustomFetch<Tr>>,
    cache_key: String,
    policy: InFlightPolicy,
    state: Mutex<PaginationState<T>>,
    in_flight: AtomicUsize,
}

impl<Tr: Transport> PaginatedAccumulator<Transaction, Tr> {
    /// Accumulator over `paginatedTransactions`
    pub fn transactions(fetcher: Arc<CustomFetch<Tr>>) -> Self {
        Self::new(fetcher, PAGINATED_TRANSACTIONS)
    }
}

impl<T, Tr> PaginatedAccumulator<T, Tr>
where
    T: DeserializeOwned + Clone,
    Tr: Transport,
{
    /// Create an empty accumulator fetching `cache_key` through `fetcher`
    pub fn new(fetcher: Arc<CustomFetch<Tr>>, cache_key: impl Into<String>) -> Self {
        Self {
            fetcher,
            cache_key: cache_key.into(),
            policy: InFlightPolicy::default(),
            state: Mutex::new(None),
            in_flight: AtomicUsize::new(0),
        }
    }

    /// Set the in-flight policy
    #[must_use]
    pub fn with_policy(mut self, policy: InFlightPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The endpoint name this accumulator fetches
    pub fn cache_key(&self) -> &str {
        &self.cache_key
    }

    /// The in-flight policy
    pub fn policy(&self) -> InFlightPolicy {
        self.policy
    }

    /// The fetcher shared with other consumers
    pub fn fetcher(&self) -> &Arc<CustomFetch<Tr>> {
        &self.fetcher
    }

    /// Snapshot of the accumulated state
    pub fn data(&self) -> PaginationState<T> {
        self.state().clone()
    }

    /// Borrow the accumulated state without cloning it
    pub fn with_data<R>(&self, f: impl FnOnce(&PaginationState<T>) -> R) -> R {
        f(&*self.state())
    }

    /// Whether the fetcher has a request in flight
    pub fn loading(&self) -> bool {
        self.fetcher.loading()
    }

    /// The page the next `fetch_all` would request
    ///
    /// `Some(0)` with no state, otherwise the held `next_page`, which is
    /// `None` once the last page has been merged.
    pub fn requested_page(&self) -> PageToken {
        match &*self.state() {
            None => Some(0),
            Some(page) => page.next_page,
        }
    }

    /// Whether another page may exist
    ///
    /// True before the first fetch and while the held `next_page` is set.
    pub fn has_more(&self) -> bool {
        self.requested_page().is_some()
    }

    /// Number of accumulated records
    pub fn len(&self) -> usize {
        self.state().as_ref().map_or(0, |page| page.data.len())
    }

    /// Whether no records are accumulated
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fetch the next page and merge it into the state
    ///
    /// The page is chosen from the state at call time; the merge applies to
    /// the state at completion time. A fetch error leaves the state as it is.
    pub async fn fetch_all(&self) -> Result<()> {
        let _in_flight = match self.policy {
            InFlightPolicy::Allow => InFlight::enter(&self.in_flight),
            InFlightPolicy::Reject => InFlight::try_enter(&self.in_flight)
                .ok_or_else(|| Error::in_flight(&self.cache_key))?,
        };

        let params = PaginatedRequestParams::new(self.requested_page());
        debug!("Requesting {} page {:?}", self.cache_key, params.page);

        let response: Option<PaginatedResponse<Vec<T>>> = self
            .fetcher
            .fetch_with_cache(&self.cache_key, &params)
            .await?;

        if response.is_none() {
            debug!("{} returned null, resetting accumulated state", self.cache_key);
        }

        let mut state = self.state();
        let previous = state.take();
        *state = merge_page(previous, response);

        debug!(
            "{} now holds {} records, next page {:?}",
            self.cache_key,
            state.as_ref().map_or(0, |page| page.data.len()),
            state.as_ref().and_then(|page| page.next_page)
        );
        Ok(())
    }

    /// Reset the state to `None`
    pub fn invalidate_data(&self) {
        debug!("Invalidating {} accumulated state", self.cache_key);
        *self.state() = None;
    }

    fn state(&self) -> MutexGuard<'_, PaginationState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Counts running `fetch_all` calls for the lifetime of the guard
struct InFlight<'a> {
    counter: &'a AtomicUsize,
}

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self { counter }
    }

    fn try_enter(counter: &'a AtomicUsize) -> Option<Self> {
        counter
            .compare_exchange(0, 1, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| Self { counter })
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.counter.fetch_sub(1, Ordering::SeqCst);
    }
}

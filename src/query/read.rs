//! Read queries
//!
//! Three read policies over the shared cache:
//!
//! - [`ReadQuery`]: fetch-or-cache. `read()` blocks until data resolves (the
//!   suspending variant, errors propagate to the caller); `state()`/`peek()`
//!   expose the explicit pending/ready/failed shape instead.
//! - [`PollingQuery`]: fixed-interval refetch regardless of staleness, for
//!   status polling.
//! - [`PagedQuery`]: incremental page accumulation with a server-reported
//!   total deciding whether a further page exists.
//!
//! A query whose parameter is not yet available is built disabled and never
//! issues its fetch.

use super::cache::QueryCache;
use super::descriptor::QueryDescriptor;
use super::key::QueryKey;
use super::state::QueryState;
use crate::error::{Error, Result};
use crate::sync::MutexExt;
use crate::types::Paged;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::marker::PhantomData;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

fn decode_state<T: DeserializeOwned>(value: Value) -> QueryState<T> {
    match serde_json::from_value(value) {
        Ok(data) => QueryState::Ready(data),
        Err(e) => QueryState::Failed(format!("failed to parse cached payload: {e}")),
    }
}

/// A cached read bound to one descriptor
pub struct ReadQuery<T> {
    cache: Arc<QueryCache>,
    descriptor: Option<QueryDescriptor>,
    waiting_on: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> ReadQuery<T> {
    pub fn new(cache: Arc<QueryCache>, descriptor: QueryDescriptor) -> Self {
        Self {
            cache,
            descriptor: Some(descriptor),
            waiting_on: String::new(),
            _marker: PhantomData,
        }
    }

    /// A guarded query whose required parameter is not yet available
    ///
    /// It never fetches; `state()` stays pending until the caller rebuilds
    /// the query with the parameter present.
    pub fn disabled(cache: Arc<QueryCache>, waiting_on: &str) -> Self {
        Self {
            cache,
            descriptor: None,
            waiting_on: waiting_on.to_owned(),
            _marker: PhantomData,
        }
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.descriptor.is_some()
    }

    /// The key this query reads through, when enabled
    #[must_use]
    pub fn key(&self) -> Option<&QueryKey> {
        self.descriptor.as_ref().map(QueryDescriptor::key)
    }

    /// Block until data is available and return it
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotReady`] for a disabled query; otherwise propagates
    /// the fetch failure.
    pub fn read(&self) -> Result<T> {
        let descriptor = self.enabled_descriptor()?;
        let value = self.cache.fetch(descriptor)?;
        serde_json::from_value(value).map_err(|e| Error::Parse(e.to_string()))
    }

    /// Fetch regardless of freshness and return the new data
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotReady`] for a disabled query; otherwise propagates
    /// the fetch failure.
    pub fn refetch(&self) -> Result<T> {
        let descriptor = self.enabled_descriptor()?;
        let value = self.cache.force_fetch(descriptor)?;
        serde_json::from_value(value).map_err(|e| Error::Parse(e.to_string()))
    }

    /// Resolve to an explicit state, fetching when needed
    ///
    /// Disabled queries are pending without fetching.
    pub fn state(&self) -> QueryState<T> {
        let Some(descriptor) = &self.descriptor else {
            return QueryState::Pending;
        };
        match self.cache.fetch(descriptor) {
            Ok(value) => decode_state(value),
            Err(e) => QueryState::Failed(e.to_string()),
        }
    }

    /// Inspect the cached state without fetching
    pub fn peek(&self) -> QueryState<T> {
        let Some(key) = self.key() else {
            return QueryState::Pending;
        };
        match self.cache.peek(key) {
            Some(entry) => match entry.data {
                Some(value) => decode_state(value),
                None => entry
                    .error
                    .map_or(QueryState::Pending, QueryState::Failed),
            },
            None => QueryState::Pending,
        }
    }

    fn enabled_descriptor(&self) -> Result<&QueryDescriptor> {
        self.descriptor
            .as_ref()
            .ok_or_else(|| Error::NotReady(self.waiting_on.clone()))
    }
}

// =============================================================================
// Polling
// =============================================================================

/// Fixed-interval refetch over a [`ReadQuery`]
///
/// Caller-driven: a `read()` past the interval forces a refetch whether or
/// not the entry went stale; within the interval it serves the cache.
pub struct PollingQuery<T> {
    inner: ReadQuery<T>,
    interval: Duration,
    last_fetch: Mutex<Option<Instant>>,
}

impl<T: DeserializeOwned> PollingQuery<T> {
    pub fn new(inner: ReadQuery<T>, interval: Duration) -> Self {
        Self {
            inner,
            interval,
            last_fetch: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Serve the cache, refetching once per interval
    ///
    /// # Errors
    ///
    /// Propagates fetch failures and the disabled-query guard.
    pub fn read(&self) -> Result<T> {
        let mut last = self.last_fetch.lock_recovered()?;
        let due = last.is_none_or(|at| at.elapsed() >= self.interval);
        if due {
            let data = self.inner.refetch()?;
            *last = Some(Instant::now());
            return Ok(data);
        }
        drop(last);
        self.inner.read()
    }
}

// =============================================================================
// Pagination
// =============================================================================

/// Next page number, if the server-reported total says one exists
///
/// `total` counts items, not pages; a further page exists while
/// `ceil(total / limit)` exceeds the last loaded page.
#[must_use]
pub fn next_page_param(page: u32, total: u32, limit: u32) -> Option<u32> {
    if limit == 0 {
        return None;
    }
    if total.div_ceil(limit) > page {
        Some(page + 1)
    } else {
        None
    }
}

/// Incremental accumulation of a paginated listing
///
/// Pages land in order; each fetch appends one page through the shared cache
/// (so a page revisit after navigation is served, not refetched).
pub struct PagedQuery<T> {
    cache: Arc<QueryCache>,
    make_page: Box<dyn Fn(u32) -> QueryDescriptor + Send + Sync>,
    limit: u32,
    pages: Mutex<Vec<Paged<T>>>,
}

impl<T: DeserializeOwned + Clone> PagedQuery<T> {
    pub fn new(
        cache: Arc<QueryCache>,
        limit: u32,
        make_page: impl Fn(u32) -> QueryDescriptor + Send + Sync + 'static,
    ) -> Self {
        Self {
            cache,
            make_page: Box::new(make_page),
            limit,
            pages: Mutex::new(Vec::new()),
        }
    }

    /// Fetch the next page; `Ok(None)` when the listing is exhausted
    ///
    /// # Errors
    ///
    /// Propagates the page fetch failure; the loaded prefix is untouched.
    pub fn fetch_next(&self) -> Result<Option<u32>> {
        let Some(page) = self.next_page()? else {
            return Ok(None);
        };
        let descriptor = (self.make_page)(page);
        let value = self.cache.fetch(&descriptor)?;
        let fetched: Paged<T> =
            serde_json::from_value(value).map_err(|e| Error::Parse(e.to_string()))?;

        let mut pages = self.pages.lock_recovered()?;
        pages.push(fetched);
        Ok(Some(page))
    }

    /// Whether a further page exists
    ///
    /// # Errors
    ///
    /// Returns an error only on lock poisoning.
    pub fn has_next(&self) -> Result<bool> {
        Ok(self.next_page()?.is_some())
    }

    /// All items loaded so far, in page order
    ///
    /// # Errors
    ///
    /// Returns an error only on lock poisoning.
    pub fn items(&self) -> Result<Vec<T>> {
        let pages = self.pages.lock_recovered()?;
        Ok(pages.iter().flat_map(|p| p.items.iter().cloned()).collect())
    }

    /// Number of pages loaded so far
    pub fn pages_loaded(&self) -> Result<usize> {
        Ok(self.pages.lock_recovered()?.len())
    }

    /// Server-reported item total, once the first page landed
    pub fn total(&self) -> Result<Option<u32>> {
        Ok(self.pages.lock_recovered()?.last().map(|p| p.total))
    }

    fn next_page(&self) -> Result<Option<u32>> {
        let pages = self.pages.lock_recovered()?;
        Ok(match pages.last() {
            None => Some(1),
            Some(last) => next_page_param(last.page, last.total, self.limit),
        })
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::cache::CacheStrategy;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn cache() -> Arc<QueryCache> {
        Arc::new(QueryCache::new(CacheStrategy::Full, None).unwrap())
    }

    #[test]
    fn test_next_page_param() {
        // ceil(30 / 12) = 3 pages
        assert_eq!(next_page_param(2, 30, 12), Some(3));
        assert_eq!(next_page_param(3, 30, 12), None);
        assert_eq!(next_page_param(1, 0, 12), None);
        assert_eq!(next_page_param(1, 12, 12), None);
        assert_eq!(next_page_param(1, 13, 12), Some(2));
    }

    #[test]
    fn test_disabled_query_never_fetches() {
        let query: ReadQuery<Vec<u32>> = ReadQuery::disabled(cache(), "deployment id");

        assert!(query.state().is_pending());
        assert!(query.peek().is_pending());
        let err = query.read().unwrap_err();
        assert!(err.is_not_ready());
    }

    #[test]
    fn test_read_serves_cache_then_refetch_forces() {
        let hits = Arc::new(AtomicUsize::new(0));
        let hits_clone = hits.clone();
        let descriptor = QueryDescriptor::new(QueryKey::of("counters"), move || {
            Ok(json!(hits_clone.fetch_add(1, Ordering::SeqCst) + 1))
        });
        let query: ReadQuery<u32> = ReadQuery::new(cache(), descriptor);

        assert_eq!(query.read().unwrap(), 1);
        assert_eq!(query.read().unwrap(), 1);
        assert_eq!(query.refetch().unwrap(), 2);
    }

    #[test]
    fn test_state_reports_failure() {
        let descriptor = QueryDescriptor::new(QueryKey::of("broken"), || {
            Err(Error::Network("connection refused".into()))
        });
        let query: ReadQuery<u32> = ReadQuery::new(cache(), descriptor);

        match query.state() {
            QueryState::Failed(msg) => assert!(msg.contains("connection refused")),
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[test]
    fn test_polling_refetches_after_interval() {
        let hits = Arc::new(AtomicUsize::new(0));
        let hits_clone = hits.clone();
        let descriptor = QueryDescriptor::new(QueryKey::of("status"), move || {
            Ok(json!(hits_clone.fetch_add(1, Ordering::SeqCst) + 1))
        });
        let query = PollingQuery::new(
            ReadQuery::<u32>::new(cache(), descriptor),
            Duration::from_millis(10),
        );

        assert_eq!(query.read().unwrap(), 1);
        // Within the interval: served from cache
        assert_eq!(query.read().unwrap(), 1);
        std::thread::sleep(Duration::from_millis(20));
        // Past the interval: forced even though the entry never went stale
        assert_eq!(query.read().unwrap(), 2);
    }

    #[test]
    fn test_paged_query_accumulates_until_exhausted() {
        let cache = cache();
        let query: PagedQuery<String> = PagedQuery::new(cache, 2, |page| {
            QueryDescriptor::new(QueryKey::of("items").param("page", page), move || {
                let items: Vec<String> = match page {
                    1 => vec!["a".into(), "b".into()],
                    2 => vec!["c".into()],
                    _ => vec![],
                };
                Ok(json!({"items": items, "page": page, "limit": 2, "total": 3}))
            })
        });

        assert!(query.has_next().unwrap());
        assert_eq!(query.fetch_next().unwrap(), Some(1));
        assert!(query.has_next().unwrap());
        assert_eq!(query.fetch_next().unwrap(), Some(2));
        assert!(!query.has_next().unwrap());
        assert_eq!(query.fetch_next().unwrap(), None);

        assert_eq!(query.items().unwrap(), vec!["a", "b", "c"]);
        assert_eq!(query.pages_loaded().unwrap(), 2);
        assert_eq!(query.total().unwrap(), Some(3));
    }
}

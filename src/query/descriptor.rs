//! Query descriptors
//!
//! A descriptor pairs a key with a pre-bound fetch closure. The same value
//! serves route prefetch and the reactive read path, so both target the same
//! cache slot and the first paint after a prefetch never double-fetches.

use super::key::QueryKey;
use crate::error::Result;
use serde_json::Value;
use std::sync::Arc;

/// Pre-bound, zero-argument fetch closure
///
/// Must be idempotent and side-effect-free from the cache's perspective:
/// safe to run speculatively during prefetch and again during a read.
pub type FetchFn = Arc<dyn Fn() -> Result<Value> + Send + Sync>;

/// A (key, fetch) pair
#[derive(Clone)]
pub struct QueryDescriptor {
    key: QueryKey,
    fetch: FetchFn,
}

impl QueryDescriptor {
    pub fn new(key: QueryKey, fetch: impl Fn() -> Result<Value> + Send + Sync + 'static) -> Self {
        Self {
            key,
            fetch: Arc::new(fetch),
        }
    }

    #[must_use]
    pub fn key(&self) -> &QueryKey {
        &self.key
    }

    /// Run the fetch once
    pub(crate) fn run(&self) -> Result<Value> {
        (self.fetch)()
    }
}

impl std::fmt::Debug for QueryDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryDescriptor")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

//! Explicit query result state
//!
//! Replaces render-suspension with a value inspected via ordinary control
//! flow: a query is pending, ready with data, or failed with a message.

/// Current state of a read query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryState<T> {
    /// No data yet: never fetched, fetch in flight elsewhere, or disabled
    Pending,
    /// Fresh or stale-but-present data
    Ready(T),
    /// The last fetch failed and no earlier data is available
    Failed(String),
}

impl<T> QueryState<T> {
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self, QueryState::Pending)
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self, QueryState::Ready(_))
    }

    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, QueryState::Failed(_))
    }

    /// The data, discarding pending/failed states
    #[must_use]
    pub fn ready(self) -> Option<T> {
        match self {
            QueryState::Ready(value) => Some(value),
            _ => None,
        }
    }

    /// Map the ready value, leaving other states untouched
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> QueryState<U> {
        match self {
            QueryState::Ready(value) => QueryState::Ready(f(value)),
            QueryState::Pending => QueryState::Pending,
            QueryState::Failed(msg) => QueryState::Failed(msg),
        }
    }
}

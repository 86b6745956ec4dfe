//! # opsdeck - console data layer
//!
//! A framework-agnostic client-side data layer for an ML-platform admin
//! console: typed resource clients over a pluggable HTTP transport, a keyed
//! query cache with declared write-to-read invalidation, and small persistent
//! UI state stores.
//!
//! ## Features
//!
//! - **Resource clients**: one client per backend resource, each method one
//!   transport call, envelope unwrapped, failures propagated unmodified
//! - **Query cache**: structural keys, per-key fetch de-duplication,
//!   configurable eviction (`Full` / `Lru(n)` / `None`), prefetch for route
//!   loaders
//! - **Declared invalidation**: every write op maps to the read keys it
//!   stales, in one table checked for completeness at build time
//! - **Read policies**: blocking fetch-or-cache, fixed-interval polling,
//!   incremental pagination, and enablement-guarded reads
//! - **Mutations**: one write per mutation, exactly one notification per
//!   outcome, local side effects before anything user-visible
//! - **State stores**: injectable containers with snapshots, independent
//!   setters, and watch subscriptions; model selection persists across runs
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use opsdeck::{CacheStrategy, Console, MemoryTransport};
//! use std::sync::Arc;
//!
//! let transport = Arc::new(MemoryTransport::new());
//! let console = Console::builder("my-console", transport)
//!     .cache_strategy(CacheStrategy::Lru(256))
//!     .build()
//!     .unwrap();
//!
//! // Route loader: warm the cache before the route renders
//! console.prefetch(&[
//!     opsdeck::query::descriptors::deployments(console.deployments()),
//! ]);
//!
//! // Component: reads the same cache slot, no duplicate fetch
//! let deployments = console.deployments_query().read().unwrap();
//!
//! // User action: write, notify, invalidate the declared keys
//! let delete = console.delete_deployment_mutation();
//! delete.execute(&deployments[0].id).unwrap();
//!
//! // The next read refetches: the listing key was declared stale
//! let fresh = console.deployments_query().read().unwrap();
//! # let _ = fresh;
//! ```
//!
//! ## Reads without blocking
//!
//! Where the UI wants a loading flag instead of a blocking call, use the
//! explicit state shape:
//!
//! ```rust,no_run
//! # use opsdeck::{Console, MemoryTransport, QueryState};
//! # use std::sync::Arc;
//! # let console = Console::builder("c", Arc::new(MemoryTransport::new())).build().unwrap();
//! match console.clusters_query().peek() {
//!     QueryState::Pending => { /* render spinner */ }
//!     QueryState::Ready(clusters) => { /* render list */ let _ = clusters; }
//!     QueryState::Failed(message) => { /* render error boundary */ let _ = message; }
//! }
//! ```

// Core modules
mod console;
mod error;
mod notify;
mod sync;
mod token;
mod transport;

// Grouped modules
pub mod api;
pub mod query;
pub mod storage;
pub mod stores;
pub mod types;

// Re-exports from core
pub use console::{Console, ConsoleBuilder};
pub use error::{Error, Result};
pub use notify::{LogNotifier, NotificationKind, Notifier, NullNotifier};
pub use token::{TokenStore, TOKEN_KEY};
pub use transport::{HttpTransport, MemoryTransport, Method, RecordedCall};

// Re-exports from the query layer
pub use query::{
    CacheEntry, CacheStrategy, InvalidationMap, InvalidationTarget, Mutation, PagedQuery,
    PollingQuery, QueryCache, QueryDescriptor, QueryKey, QueryState, ReadQuery, WriteOp,
};

// Re-exports from storage and stores
pub use storage::{DurableStore, JsonFileStore, MemoryStore};
pub use stores::{
    ModelSelection, ModelSelectionStore, OnboardVm, OnboardingState, OnboardingStore, Role,
    RoleStore, ViewMode,
};

//! Query layer: keys, descriptors, cache, reads, mutations, invalidation
//!
//! The shared cache is the single mutable resource of the whole data layer;
//! everything writes to it through the fetch/invalidate protocol defined
//! here.

pub mod cache;
pub mod descriptor;
pub mod descriptors;
pub mod invalidation;
pub mod key;
pub mod keys;
pub mod mutation;
pub mod read;
pub mod state;

pub use cache::{CacheEntry, CacheStrategy, QueryCache};
pub use descriptor::{FetchFn, QueryDescriptor};
pub use invalidation::{InvalidationMap, InvalidationTarget, WriteOp};
pub use key::{KeySegment, QueryKey};
pub use mutation::Mutation;
pub use read::{next_page_param, PagedQuery, PollingQuery, ReadQuery};
pub use state::QueryState;

//! Client-side query cache.
//!
//! Reads are keyed by an entity tag plus a scope (all, search criteria,
//! single id, lookup parameter). Entries younger than the stale time are
//! served without a request. Mutations invalidate whole tags.

mod key;
mod layer;
mod storage;

pub use key::{EntityTag, QueryKey};
pub use layer::{CacheLayer, CacheResult};
pub use storage::{MemoryStorage, SqliteStorage};

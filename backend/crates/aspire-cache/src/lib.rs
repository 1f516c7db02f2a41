// Aspire Cache Library
// Single-use launch nonces and idle-expiring client sessions

pub mod error;
pub mod memory;
pub mod reaper;
pub mod store;

pub use error::{CacheError, CacheResult};
pub use memory::InMemoryCache;
pub use reaper::{spawn_reaper, CacheReaper};
pub use store::{CacheRecord, SessionCache, StoreKind};

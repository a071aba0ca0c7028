//! Cache Module
//!
//! Provides in-memory caching with per-entry TTL expiration.

mod entry;
mod expiring;
mod pattern;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use expiring::ExpiringCache;
pub use pattern::{KeyPattern, MatchMode};
pub use store::CacheStore;

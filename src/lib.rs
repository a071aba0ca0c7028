//! TTL Cache - an in-process key/value cache with expiring entries
//!
//! Values are stored under string keys with an optional time-to-live,
//! expired entries are hidden from reads immediately and reclaimed by a
//! background sweep.

pub mod cache;
pub mod config;
pub mod console;
pub mod error;
pub mod tasks;

pub use cache::{CacheEntry, ExpiringCache};
pub use config::Config;
pub use error::{CacheError, Result};

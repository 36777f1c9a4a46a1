//! Cache module for keeping the company record between runs
//!
//! The record is stored through an injected key-value store together with an
//! expiry instant. Expired or malformed entries are deleted on read and
//! reported as a miss, so a broken cache never stops the viewer from loading.

mod manager;
mod store;

pub use manager::{cache_key, CacheError, CompanyCache, RETENTION_HOURS};
pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError};

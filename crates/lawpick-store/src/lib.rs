//! Client-local persistent storage: a small key/value store and the
//! timestamped list cache the bill view falls back to when offline.

mod cache;
mod error;
mod storage;

pub use cache::{BILL_CACHE_KEY, BILL_CACHE_TTL, CachedList, ListCache};
pub use error::StoreError;
pub use storage::{FileStorage, MemoryStorage, Storage};

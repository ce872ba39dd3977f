//! # lrucache
//!
//! Capacity-bounded key/value cache with Least Recently Used eviction.
//!
//! ## Architecture
//! - **Index**: AHash `HashMap` from key to a stable [`Handle`] (O(1))
//! - **Recency list**: doubly-linked list over a slot arena, least
//!   recently used at the front (O(1) promote, evict, remove)
//! - **Capacity**: runtime field, adjustable with [`LruCache::resize`]
//!
//! `insert` never overwrites an existing key. `find`, `get`, `get_mut` and
//! `get_or_insert_default` promote the entry they touch; `peek` and
//! `contains_key` do not.
//!
//! ```
//! use lrucache::LruCache;
//!
//! let mut cache = LruCache::new(2)?;
//! cache.insert("a", 1);
//! cache.insert("b", 2);
//! cache.find("a");
//! cache.insert("c", 3); // evicts "b"
//!
//! assert!(cache.contains_key("a"));
//! assert!(!cache.contains_key("b"));
//! # Ok::<(), lrucache::Error>(())
//! ```

#![warn(missing_docs)]

mod cache;
mod error;
mod list;
mod stats;

pub use cache::LruCache;
pub use error::{Error, Result};
pub use list::{Handle, Iter};
pub use stats::CacheStats;

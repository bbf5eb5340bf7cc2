//! # hotlru
//!
//! Fixed-capacity key-value cache with least-recently-used eviction.
//!
//! ## Architecture
//! - **Index**: AHash `HashMap` from key to arena slot (O(1))
//! - **Recency Sequence**: doubly-linked list threaded through a `Vec`
//!   arena, most-recent at the head (O(1) push, promote, pop)
//! - **SharedCache**: the same cache behind one `parking_lot::Mutex`,
//!   with hit/miss statistics
//!
//! ```
//! use hotlru::LruCache;
//!
//! let mut cache = LruCache::new(2)?;
//! cache.put("a", 1);
//! cache.put("b", 2);
//! cache.get(&"a");
//! cache.put("c", 3); // evicts "b"
//!
//! assert_eq!(cache.get(&"b"), None);
//! assert_eq!(cache.get(&"a"), Some(&1));
//! # Ok::<(), hotlru::Error>(())
//! ```

#![warn(missing_docs)]

mod error;
mod lru;
mod sequence;
mod shared;
mod stats;

pub use error::{Error, Result};
pub use lru::{LruCache, DEFAULT_CAPACITY};
pub use sequence::{Iter, RecencySequence};
pub use shared::SharedCache;
pub use stats::{CacheStats, StatsSnapshot};

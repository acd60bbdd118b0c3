//! # shardedmap
//!
//! A concurrent map from string keys to shared values, split into
//! independently synchronized shards.
//!
//! Every key is hashed to a 64-bit digest. `digest % shard_count` picks the
//! shard, and the digest is the key inside that shard, so operations on
//! different shards never contend. Values are stored behind `Arc<V>` and
//! handed out without copying.
//!
//! ## Features
//!
//! - **Two shard backends**: [`LockedShard`] guards a map with one read-write
//!   lock; [`SwappedShard`] publishes immutable copy-on-write snapshots so
//!   readers never block
//! - **Deterministic routing**: FNV-1a 32/64 digests give the same placement
//!   across runs and processes
//! - **Concurrent bulk operations**: `count`, `all` and `range` fan out over
//!   every shard and wait for all of them
//! - **JSON bridge**: the map serializes as a flat JSON object
//! - **Statistics**: per-shard load and, with the `metrics` feature, per-shard
//!   operation counters
//!
//! ## Digest collisions
//!
//! Shards index by digest, not by string. Two distinct keys with the same
//! digest share one slot and the later `set` wins. With the 64-bit default
//! this is negligible for realistic populations; pick
//! [`HashFunction::Fnv1a64`] over [`HashFunction::Fnv1a32`] for large maps.
//!
//! ## Example
//!
//! ```rust
//! use shardedmap::ShardedMap;
//!
//! let map = ShardedMap::new();
//!
//! map.set("key1", "value1");
//! map.set("key2", "value2");
//!
//! assert_eq!(*map.get("key1")?, "value1");
//! assert!(map.has("key2"));
//!
//! map.remove("key1");
//! assert_eq!(map.count(), 1);
//!
//! for tuple in map.range() {
//!     println!("{}: {}", tuple.key(), tuple.value());
//! }
//! # Ok::<(), shardedmap::Error>(())
//! ```
//!
//! ## Configuration
//!
//! ```rust
//! use shardedmap::{Backend, HashFunction, ShardedMapBuilder};
//!
//! let map = ShardedMapBuilder::new()
//!     .shard_count(32)?
//!     .hash_function(HashFunction::Fnv1a32)
//!     .backend(Backend::Swapped)
//!     .build::<String>()?;
//! # Ok::<(), shardedmap::Error>(())
//! ```

#![deny(missing_docs)]
#![warn(clippy::all)]

/// Configuration and builder types.
pub mod config;
/// Error types.
pub mod error;
/// Key digest functions.
pub mod hash;
/// Iterator implementations.
pub mod iter;
/// JSON bridge.
///
/// A map serializes as a flat object with one field per stored key, exactly
/// the contents of [`ShardedMap::all`](crate::ShardedMap::all).
/// Deserializing builds a fresh default-configured map and sets each field.
pub mod json;
/// The router.
pub mod map;
/// The shard capability and its built-in backends.
///
/// A shard owns one partition of the key space, indexed by digest rather than
/// by the original string key. [`LockedShard`](crate::LockedShard) wraps a
/// mutable map in one read-write lock. [`SwappedShard`](crate::SwappedShard)
/// publishes an immutable map through an atomic reference: readers never
/// lock, writers copy the map, change the copy and publish it.
pub mod shard;
/// Per-shard operation counters and map-level introspection snapshots.
pub mod stats;
/// The stored key/value record.
pub mod tuple;

// Re-export main types
pub use config::{Backend, Config, HashFunction, ShardedMapBuilder, DEFAULT_SHARD_COUNT};
pub use error::Error;
pub use hash::{fnv1a_32, fnv1a_64, KeyHasher};
pub use iter::{Iter, Range};
pub use map::ShardedMap;
pub use shard::{LockedShard, Shard, ShardData, ShardSnapshot, SwappedShard};
pub use stats::{Diagnostics, ShardOps, Stats};
pub use tuple::Tuple;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_operations() {
        let map = ShardedMap::new();

        map.set("key1", "value1");
        map.set("key1", "value2");

        assert_eq!(*map.get("key1").unwrap(), "value2");
        assert_eq!(map.get("nonexistent").unwrap_err(), Error::KeyNotFound);

        map.remove("key1");
        assert!(!map.has("key1"));
    }

    #[test]
    fn test_defaults() {
        let map: ShardedMap<i32> = ShardedMap::new();
        assert_eq!(map.shard_count(), 8);
        assert_eq!(map.config().backend, Backend::Locked);
        assert_eq!(map.digest("abc"), fnv1a_64("abc"));
    }

    #[test]
    fn test_stats() {
        let map = ShardedMap::new();
        map.set("key1", "value1");
        map.set("key2", "value2");

        let stats = map.stats();
        assert_eq!(stats.size, 2);
        assert_eq!(stats.shard_sizes.len(), DEFAULT_SHARD_COUNT);
    }

    #[test]
    fn test_builder() {
        let map = ShardedMapBuilder::new()
            .shard_count(3)
            .unwrap()
            .backend(Backend::Swapped)
            .build::<i32>()
            .unwrap();

        map.set("test", 42);
        assert_eq!(*map.get("test").unwrap(), 42);
        assert_eq!(map.shard_count(), 3);
    }
}

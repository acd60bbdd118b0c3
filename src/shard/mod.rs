use crate::stats::ShardOps;
use crate::tuple::Tuple;
use std::sync::Arc;

mod locked;
mod swapped;

pub use locked::LockedShard;
pub use swapped::SwappedShard;

/// Digest-indexed storage held by a single shard.
pub type ShardData<V> = hashbrown::HashMap<u64, Tuple<V>>;

/// An immutable view of a shard's contents at one instant.
pub type ShardSnapshot<V> = Arc<ShardData<V>>;

/// Operations every shard backend provides.
///
/// Each call must be atomic with respect to every other call on the same
/// shard. The router never holds a lock of its own, so a backend is the only
/// synchronization point for the digests it owns.
pub trait Shard<V>: Send + Sync {
    /// Look up the tuple stored under `digest`.
    fn get(&self, digest: u64) -> Option<Tuple<V>>;

    /// Store `tuple` under `digest`, replacing any previous tuple.
    fn set(&self, digest: u64, tuple: Tuple<V>);

    /// Store several tuples as one mutation.
    fn set_batch(&self, entries: Vec<(u64, Tuple<V>)>) {
        for (digest, tuple) in entries {
            self.set(digest, tuple);
        }
    }

    /// Whether a tuple is stored under `digest`.
    fn has(&self, digest: u64) -> bool;

    /// Remove the tuple under `digest`. Absent digests are a no-op.
    fn remove(&self, digest: u64);

    /// Number of stored tuples.
    fn count(&self) -> usize;

    /// Drop every stored tuple.
    fn clear(&self);

    /// A snapshot of every stored tuple. Later writes to the shard must not
    /// be visible through it.
    fn all(&self) -> ShardSnapshot<V>;

    /// Operation counters for this shard.
    fn stats(&self) -> ShardOps {
        ShardOps::default()
    }
}

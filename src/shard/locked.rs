use super::{Shard, ShardData, ShardSnapshot};
use crate::stats::{ShardOps, ShardStats};
use crate::tuple::Tuple;
use parking_lot::{RwLock, RwLockWriteGuard};
use std::sync::Arc;

/// A shard guarded by one read-write lock.
///
/// Readers share the lock; writers take it exclusively. `all()` copies the
/// map under the shared lock so callers never hold a reference into storage
/// that a later writer mutates.
pub struct LockedShard<V> {
    map: RwLock<ShardData<V>>,
    capacity: usize,
    stats: ShardStats,
}

impl<V> LockedShard<V> {
    /// Create an empty shard.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an empty shard with room for `capacity` tuples.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            map: RwLock::new(ShardData::with_capacity(capacity)),
            capacity,
            stats: ShardStats::new(),
        }
    }

    /// Take the exclusive lock, recording the acquisition.
    fn write(&self) -> RwLockWriteGuard<'_, ShardData<V>> {
        #[cfg(feature = "lock-timing")]
        let started = std::time::Instant::now();

        let guard = self.map.write();

        #[cfg(feature = "lock-timing")]
        self.stats
            .record_lock_wait(started.elapsed().as_nanos().min(u128::from(u64::MAX)) as u64);
        self.stats.record_lock_acquisition();
        guard
    }
}

impl<V> Default for LockedShard<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Shard<V> for LockedShard<V>
where
    V: Send + Sync,
{
    fn get(&self, digest: u64) -> Option<Tuple<V>> {
        let map = self.map.read();
        let result = map.get(&digest).cloned();
        if result.is_some() {
            self.stats.record_read();
        }
        result
    }

    fn set(&self, digest: u64, tuple: Tuple<V>) {
        self.write().insert(digest, tuple);
        self.stats.record_writes(1);
    }

    fn set_batch(&self, entries: Vec<(u64, Tuple<V>)>) {
        if entries.is_empty() {
            return;
        }
        let written = entries.len() as u64;
        self.write().extend(entries);
        self.stats.record_writes(written);
    }

    fn has(&self, digest: u64) -> bool {
        self.map.read().contains_key(&digest)
    }

    fn remove(&self, digest: u64) {
        if self.write().remove(&digest).is_some() {
            self.stats.record_remove();
        }
    }

    fn count(&self) -> usize {
        self.map.read().len()
    }

    fn clear(&self) {
        *self.write() = ShardData::with_capacity(self.capacity);
        self.stats.record_clear();
    }

    fn all(&self) -> ShardSnapshot<V> {
        Arc::new(self.map.read().clone())
    }

    fn stats(&self) -> ShardOps {
        self.stats.snapshot()
    }
}

use super::{Shard, ShardData, ShardSnapshot};
use crate::stats::{ShardOps, ShardStats};
use crate::tuple::Tuple;
use arc_swap::ArcSwap;
use parking_lot::{Mutex, MutexGuard};
use std::sync::Arc;

/// A copy-on-write shard.
///
/// The current map sits behind an [`ArcSwap`]. Reads load it without taking
/// any lock. Writers serialize on a mutex, clone the published map, apply
/// their change to the clone and publish the clone. A published map is never
/// mutated, so a reader iterating a snapshot cannot observe a half-applied
/// write.
///
/// Every write costs a copy of the shard, which makes this backend a fit for
/// read-heavy shards with small populations.
pub struct SwappedShard<V> {
    data: ArcSwap<ShardData<V>>,
    writer: Mutex<()>,
    stats: ShardStats,
}

impl<V> SwappedShard<V> {
    /// Create an empty shard.
    pub fn new() -> Self {
        Self {
            data: ArcSwap::from_pointee(ShardData::new()),
            writer: Mutex::new(()),
            stats: ShardStats::new(),
        }
    }

    fn lock_writer(&self) -> MutexGuard<'_, ()> {
        #[cfg(feature = "lock-timing")]
        let started = std::time::Instant::now();

        let guard = self.writer.lock();

        #[cfg(feature = "lock-timing")]
        self.stats
            .record_lock_wait(started.elapsed().as_nanos().min(u128::from(u64::MAX)) as u64);
        self.stats.record_lock_acquisition();
        guard
    }

    /// Swap in `next` as the visible map. Caller must hold the writer lock.
    fn publish(&self, next: ShardData<V>) {
        self.data.store(Arc::new(next));
        self.stats.record_publish();
    }
}

impl<V> Default for SwappedShard<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Shard<V> for SwappedShard<V>
where
    V: Send + Sync,
{
    fn get(&self, digest: u64) -> Option<Tuple<V>> {
        let result = self.data.load().get(&digest).cloned();
        if result.is_some() {
            self.stats.record_read();
        }
        result
    }

    fn set(&self, digest: u64, tuple: Tuple<V>) {
        let _guard = self.lock_writer();
        // load under the lock: a copy taken before it could miss a write
        // published by the previous holder
        let mut next = ShardData::clone(&self.data.load());
        next.insert(digest, tuple);
        self.publish(next);
        self.stats.record_writes(1);
    }

    fn set_batch(&self, entries: Vec<(u64, Tuple<V>)>) {
        if entries.is_empty() {
            return;
        }
        let written = entries.len() as u64;
        let _guard = self.lock_writer();
        let mut next = ShardData::clone(&self.data.load());
        next.extend(entries);
        self.publish(next);
        self.stats.record_writes(written);
    }

    fn has(&self, digest: u64) -> bool {
        self.data.load().contains_key(&digest)
    }

    fn remove(&self, digest: u64) {
        let _guard = self.lock_writer();
        let current = self.data.load();
        if !current.contains_key(&digest) {
            return;
        }
        let mut next = ShardData::clone(&current);
        next.remove(&digest);
        self.publish(next);
        self.stats.record_remove();
    }

    fn count(&self) -> usize {
        self.data.load().len()
    }

    fn clear(&self) {
        let _guard = self.lock_writer();
        self.publish(ShardData::new());
        self.stats.record_clear();
    }

    fn all(&self) -> ShardSnapshot<V> {
        self.data.load_full()
    }

    fn stats(&self) -> ShardOps {
        self.stats.snapshot()
    }
}

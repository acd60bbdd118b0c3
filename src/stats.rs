#[cfg(feature = "metrics")]
use std::sync::atomic::{AtomicU64, Ordering};

/// Per-shard operation counts. All zero unless the `metrics` feature is on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShardOps {
    /// Lookups that found an entry.
    pub reads: u64,
    /// Tuples stored (inserts and overwrites).
    pub writes: u64,
    /// Removals of a present digest.
    pub removes: u64,
    /// Times the shard was cleared.
    pub clears: u64,
    /// Snapshots published by a swap-based shard.
    pub publishes: u64,
    /// Lock acquisitions taken by writers.
    pub lock_acquisitions: u64,
    /// Cumulative writer lock wait in nanoseconds (0 without `lock-timing`).
    pub lock_wait_nanos: u64,
}

/// Counter block embedded in every built-in shard backend.
#[cfg(feature = "metrics")]
#[derive(Debug, Default)]
pub(crate) struct ShardStats {
    reads: AtomicU64,
    writes: AtomicU64,
    removes: AtomicU64,
    clears: AtomicU64,
    publishes: AtomicU64,
    lock_acquisitions: AtomicU64,
    #[cfg(feature = "lock-timing")]
    lock_wait_nanos: AtomicU64,
}

#[cfg(feature = "metrics")]
impl ShardStats {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub(crate) fn record_read(&self) {
        self.reads.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_writes(&self, n: u64) {
        self.writes.fetch_add(n, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_remove(&self) {
        self.removes.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_clear(&self) {
        self.clears.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_publish(&self) {
        self.publishes.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_lock_acquisition(&self) {
        self.lock_acquisitions.fetch_add(1, Ordering::Relaxed);
    }

    #[cfg(feature = "lock-timing")]
    #[inline]
    pub(crate) fn record_lock_wait(&self, nanos: u64) {
        self.lock_wait_nanos.fetch_add(nanos, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> ShardOps {
        ShardOps {
            reads: self.reads.load(Ordering::Relaxed),
            writes: self.writes.load(Ordering::Relaxed),
            removes: self.removes.load(Ordering::Relaxed),
            clears: self.clears.load(Ordering::Relaxed),
            publishes: self.publishes.load(Ordering::Relaxed),
            lock_acquisitions: self.lock_acquisitions.load(Ordering::Relaxed),
            #[cfg(feature = "lock-timing")]
            lock_wait_nanos: self.lock_wait_nanos.load(Ordering::Relaxed),
            #[cfg(not(feature = "lock-timing"))]
            lock_wait_nanos: 0,
        }
    }
}

/// Zero-sized placeholder when metrics are disabled.
#[cfg(not(feature = "metrics"))]
#[derive(Debug, Default)]
pub(crate) struct ShardStats;

#[cfg(not(feature = "metrics"))]
impl ShardStats {
    pub(crate) fn new() -> Self {
        ShardStats
    }

    #[inline]
    pub(crate) fn record_read(&self) {}

    #[inline]
    pub(crate) fn record_writes(&self, _n: u64) {}

    #[inline]
    pub(crate) fn record_remove(&self) {}

    #[inline]
    pub(crate) fn record_clear(&self) {}

    #[inline]
    pub(crate) fn record_publish(&self) {}

    #[inline]
    pub(crate) fn record_lock_acquisition(&self) {}

    pub(crate) fn snapshot(&self) -> ShardOps {
        ShardOps::default()
    }
}

/// Aggregate statistics for a ShardedMap.
#[derive(Debug, Clone)]
pub struct Stats {
    /// Total number of entries across all shards.
    pub size: usize,
    /// Number of entries in each shard, indexed by shard.
    pub shard_sizes: Vec<usize>,
    /// Operation counts for each shard.
    pub operations: Vec<ShardOps>,
}

/// Load-balance view of a ShardedMap.
#[derive(Debug, Clone)]
pub struct Diagnostics {
    /// Total number of entries across all shards.
    pub total_entries: usize,
    /// Entries per shard.
    pub shard_loads: Vec<usize>,
    /// Sum of reads, writes and removes over all shards (0 without `metrics`).
    pub total_operations: u64,
    /// Average entries per shard.
    pub avg_load_per_shard: f64,
    /// Largest shard load divided by the average. 0.0 for an empty map.
    pub max_load_ratio: f64,
}

impl Diagnostics {
    pub(crate) fn from_stats(stats: &Stats) -> Self {
        let shard_count = stats.shard_sizes.len().max(1);
        let avg_load_per_shard = stats.size as f64 / shard_count as f64;
        let max_load = stats.shard_sizes.iter().copied().max().unwrap_or(0);
        let max_load_ratio = if stats.size == 0 {
            0.0
        } else {
            max_load as f64 / avg_load_per_shard
        };
        let total_operations = stats
            .operations
            .iter()
            .map(|op| op.reads + op.writes + op.removes)
            .sum();

        Self {
            total_entries: stats.size,
            shard_loads: stats.shard_sizes.clone(),
            total_operations,
            avg_load_per_shard,
            max_load_ratio,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostics_ratio() {
        let stats = Stats {
            size: 8,
            shard_sizes: vec![4, 2, 2, 0],
            operations: vec![ShardOps::default(); 4],
        };
        let diag = Diagnostics::from_stats(&stats);
        assert_eq!(diag.total_entries, 8);
        assert_eq!(diag.avg_load_per_shard, 2.0);
        assert_eq!(diag.max_load_ratio, 2.0);
    }

    #[test]
    fn test_diagnostics_empty() {
        let stats = Stats {
            size: 0,
            shard_sizes: vec![0; 4],
            operations: vec![ShardOps::default(); 4],
        };
        let diag = Diagnostics::from_stats(&stats);
        assert_eq!(diag.max_load_ratio, 0.0);
        assert_eq!(diag.total_operations, 0);
    }
}

use crate::config::{create_hasher, Config};
use crate::error::Error;
use crate::hash::ShardHasher;
use crate::iter::{Iter, Range};
use crate::shard::Shard;
use crate::stats::{Diagnostics, ShardOps, Stats};
use crate::tuple::Tuple;
use rayon::prelude::*;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Concurrent map from string keys to shared values, split across shards.
///
/// Each key is digested once; `digest % shard_count` picks the shard and the
/// digest itself is the key inside that shard. The map holds no lock of its
/// own: keyed operations touch exactly one shard, and bulk operations fan out
/// over every shard on the rayon pool and wait for all of them.
///
/// Two keys with the same digest occupy the same slot and overwrite each
/// other. With a 64-bit digest this is rare, but it is not detected.
///
/// # Example
///
/// ```rust
/// use shardedmap::ShardedMap;
///
/// let map = ShardedMap::new();
/// map.set("key1", "value1");
///
/// assert_eq!(*map.get("key1").unwrap(), "value1");
/// assert!(map.get("missing").is_err());
/// ```
pub struct ShardedMap<V> {
    shards: Vec<Box<dyn Shard<V>>>,
    hash: ShardHasher,
    config: Config,
}

impl<V> ShardedMap<V>
where
    V: Send + Sync + 'static,
{
    /// Create a new map with defaults (8 shards, FNV-1a 64, locked shards).
    pub fn new() -> Self {
        let config = Config::default();
        Self::assemble(config, |config| config.backend.create(config.capacity_per_shard))
    }

    /// Create a new map with custom config.
    pub fn with_config(config: Config) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self::assemble(config, |config| {
            config.backend.create(config.capacity_per_shard)
        }))
    }

    /// Create a new map whose shards are produced by `factory`. The config's
    /// backend setting is ignored.
    ///
    /// ```rust
    /// use shardedmap::{Config, Shard, ShardedMap, SwappedShard};
    ///
    /// let map = ShardedMap::with_shard_factory(Config::new(), || {
    ///     Box::new(SwappedShard::new()) as Box<dyn Shard<u32>>
    /// })?;
    /// map.set("a", 1);
    /// # Ok::<(), shardedmap::Error>(())
    /// ```
    pub fn with_shard_factory<F>(config: Config, factory: F) -> Result<Self, Error>
    where
        F: Fn() -> Box<dyn Shard<V>>,
    {
        config.validate()?;
        Ok(Self::assemble(config, |_| factory()))
    }

    fn assemble<F>(config: Config, make_shard: F) -> Self
    where
        F: Fn(&Config) -> Box<dyn Shard<V>>,
    {
        let shards: Vec<_> = (0..config.shard_count).map(|_| make_shard(&config)).collect();
        let hash = create_hasher(&config.hash_function);

        tracing::debug!(
            shard_count = config.shard_count,
            backend = ?config.backend,
            hash = ?hash,
            "sharded map created"
        );

        Self {
            shards,
            hash,
            config,
        }
    }

    /// The configuration this map was built with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Number of shards.
    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    /// Digest of `key` under this map's hash function.
    #[inline]
    pub fn digest(&self, key: &str) -> u64 {
        self.hash.digest(key)
    }

    /// Shard a key is routed to.
    #[inline]
    pub fn shard_index(&self, key: &str) -> usize {
        self.index_of(self.digest(key))
    }

    #[inline]
    fn index_of(&self, digest: u64) -> usize {
        (digest % self.shards.len() as u64) as usize
    }

    #[inline]
    fn route(&self, key: &str) -> (u64, &dyn Shard<V>) {
        let digest = self.digest(key);
        (digest, self.shards[self.index_of(digest)].as_ref())
    }

    /// Store `value` under `key`, replacing any previous value.
    pub fn set(&self, key: impl Into<Arc<str>>, value: V) {
        let tuple = Tuple::new(key, value);
        let (digest, shard) = self.route(tuple.key());
        shard.set(digest, tuple);
    }

    /// Get the value stored under `key`.
    ///
    /// Returns [`Error::KeyNotFound`] when the key is absent.
    pub fn get(&self, key: &str) -> Result<Arc<V>, Error> {
        let (digest, shard) = self.route(key);
        shard
            .get(digest)
            .map(|tuple| Arc::clone(tuple.value()))
            .ok_or(Error::KeyNotFound)
    }

    /// Check whether `key` is stored.
    pub fn has(&self, key: &str) -> bool {
        let (digest, shard) = self.route(key);
        shard.has(digest)
    }

    /// Remove `key`. Removing an absent key does nothing.
    pub fn remove(&self, key: &str) {
        let (digest, shard) = self.route(key);
        shard.remove(digest);
    }

    /// Total number of stored entries across all shards.
    ///
    /// Shards are counted concurrently; the result is the sum of each
    /// shard's count at the moment it was visited.
    pub fn count(&self) -> usize {
        let total: usize = self.shards.par_iter().map(|shard| shard.count()).sum();
        tracing::trace!(shard_count = self.shards.len(), total, "count fan-out");
        total
    }

    /// Check if the map is empty.
    pub fn is_empty(&self) -> bool {
        self.shards.iter().all(|shard| shard.count() == 0)
    }

    /// Copy every entry into a plain map from key to value.
    pub fn all(&self) -> HashMap<String, Arc<V>> {
        let snapshots: Vec<_> = self.shards.par_iter().map(|shard| shard.all()).collect();
        let capacity: usize = snapshots.iter().map(|snapshot| snapshot.len()).sum();

        let mut entries = HashMap::with_capacity(capacity);
        for snapshot in &snapshots {
            for tuple in snapshot.values() {
                entries.insert(tuple.key().to_owned(), Arc::clone(tuple.value()));
            }
        }

        tracing::trace!(
            shard_count = self.shards.len(),
            entries = entries.len(),
            "all fan-out"
        );
        entries
    }

    /// Remove every entry from every shard.
    pub fn clear(&self) {
        for shard in &self.shards {
            shard.clear();
        }
        tracing::debug!(shard_count = self.shards.len(), "sharded map cleared");
    }

    /// Visit every entry and optionally replace its value.
    ///
    /// `f` receives each key and value; returning `Some(new)` stores `new`
    /// under the same key. Replacements for one shard are written as one
    /// batch after that shard has been visited. Visiting order is
    /// unspecified, and a key set concurrently with the transform may be
    /// overwritten by the transformed value.
    ///
    /// ```rust
    /// use shardedmap::ShardedMap;
    ///
    /// let map = ShardedMap::new();
    /// map.set("a", 1);
    /// map.set("b", 2);
    /// map.range_with_transform(|_, v| Some(v * 10));
    /// assert_eq!(*map.get("b").unwrap(), 20);
    /// ```
    pub fn range_with_transform<F>(&self, mut f: F)
    where
        F: FnMut(&str, &V) -> Option<V>,
    {
        for shard in &self.shards {
            let snapshot = shard.all();
            let replacements: Vec<_> = snapshot
                .iter()
                .filter_map(|(digest, tuple)| {
                    f(tuple.key(), tuple.value().as_ref())
                        .map(|value| (*digest, tuple.with_value(value)))
                })
                .collect();
            shard.set_batch(replacements);
        }
    }

    /// Every stored entry, gathered from all shards concurrently.
    ///
    /// Each shard streams its snapshot into an unbounded channel, so the
    /// number of entries is never fixed up front and a shard that grows
    /// between fan-out and drain cannot stall the producers.
    pub fn range(&self) -> Range<V> {
        let range = Range::collect(&self.shards);
        tracing::trace!(shard_count = self.shards.len(), entries = range.len(), "range fan-out");
        range
    }

    /// Lazy iterator that snapshots one shard at a time.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter::new(&self.shards)
    }

    /// Number of entries held by each shard.
    pub fn shard_loads(&self) -> Vec<usize> {
        self.shards.par_iter().map(|shard| shard.count()).collect()
    }

    /// Get detailed statistics about the map and its shards.
    pub fn stats(&self) -> Stats {
        let (shard_sizes, operations): (Vec<usize>, Vec<ShardOps>) = self
            .shards
            .par_iter()
            .map(|shard| (shard.count(), shard.stats()))
            .unzip();
        let size: usize = shard_sizes.iter().sum();

        Stats {
            size,
            shard_sizes,
            operations,
        }
    }

    /// Load-balance summary derived from [`stats`](Self::stats).
    pub fn diagnostics(&self) -> Diagnostics {
        Diagnostics::from_stats(&self.stats())
    }
}

impl<V> Default for ShardedMap<V>
where
    V: Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<V> fmt::Debug for ShardedMap<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShardedMap")
            .field("shard_count", &self.shards.len())
            .field("backend", &self.config.backend)
            .field("hash", &self.hash)
            .finish()
    }
}

impl<K, V> FromIterator<(K, V)> for ShardedMap<V>
where
    K: Into<Arc<str>>,
    V: Send + Sync + 'static,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let map = ShardedMap::new();
        for (key, value) in iter {
            map.set(key, value);
        }
        map
    }
}

use crate::error::Error;
use crate::hash::{KeyHasher, ShardHasher};
use crate::shard::{LockedShard, Shard, SwappedShard};
use std::fmt;
use std::sync::Arc;

/// Shard count used when none is configured.
pub const DEFAULT_SHARD_COUNT: usize = 8;

/// Which digest function maps keys to shards and shard slots.
#[derive(Clone, Default)]
pub enum HashFunction {
    /// 32-bit FNV-1a.
    Fnv1a32,
    /// 64-bit FNV-1a (default).
    #[default]
    Fnv1a64,
    /// ahash with fixed seeds. Fast, but digests are only stable within one
    /// build of the crate.
    AHash,
    /// fxhash (faster but potentially less distributed).
    #[cfg(feature = "fxhash")]
    FxHash,
    /// User-provided digest function.
    Custom(Arc<dyn KeyHasher>),
}

impl HashFunction {
    /// Wrap a closure or function pointer as a custom digest function.
    pub fn custom<H>(hasher: H) -> Self
    where
        H: KeyHasher + 'static,
    {
        HashFunction::Custom(Arc::new(hasher))
    }
}

impl fmt::Debug for HashFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashFunction::Fnv1a32 => write!(f, "HashFunction::Fnv1a32"),
            HashFunction::Fnv1a64 => write!(f, "HashFunction::Fnv1a64"),
            HashFunction::AHash => write!(f, "HashFunction::AHash"),
            #[cfg(feature = "fxhash")]
            HashFunction::FxHash => write!(f, "HashFunction::FxHash"),
            HashFunction::Custom(_) => write!(f, "HashFunction::Custom(...)"),
        }
    }
}

/// Which built-in shard implementation backs each partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    /// [`LockedShard`]: one read-write lock per shard (default).
    #[default]
    Locked,
    /// [`SwappedShard`]: lock-free reads over copy-on-write snapshots.
    Swapped,
}

impl Backend {
    pub(crate) fn create<V>(self, capacity: Option<usize>) -> Box<dyn Shard<V>>
    where
        V: Send + Sync + 'static,
    {
        match self {
            Backend::Locked => Box::new(LockedShard::with_capacity(capacity.unwrap_or(0))),
            Backend::Swapped => Box::new(SwappedShard::new()),
        }
    }
}

/// Configuration for a ShardedMap instance. Fixed once the map is built.
#[derive(Debug, Clone)]
pub struct Config {
    pub(crate) shard_count: usize,
    pub(crate) hash_function: HashFunction,
    pub(crate) backend: Backend,
    pub(crate) capacity_per_shard: Option<usize>,
}

impl Config {
    /// Create a new config with defaults (8 shards, FNV-1a 64, locked shards).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of shards. Must be greater than 0.
    pub fn shard_count(mut self, count: usize) -> Result<Self, Error> {
        if count == 0 {
            return Err(Error::InvalidShardCount);
        }
        self.shard_count = count;
        Ok(self)
    }

    /// Set the digest function.
    pub fn hash_function(mut self, hash_fn: HashFunction) -> Self {
        self.hash_function = hash_fn;
        self
    }

    /// Set the shard backend.
    pub fn backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }

    /// Set initial capacity per shard. Only the locked backend preallocates;
    /// swapped shards size each published copy to its contents.
    pub fn capacity_per_shard(mut self, capacity: usize) -> Self {
        self.capacity_per_shard = Some(capacity);
        self
    }

    pub(crate) fn validate(&self) -> Result<(), Error> {
        if self.shard_count == 0 {
            return Err(Error::InvalidShardCount);
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            shard_count: DEFAULT_SHARD_COUNT,
            hash_function: HashFunction::Fnv1a64,
            backend: Backend::Locked,
            capacity_per_shard: None,
        }
    }
}

/// Builder for creating a ShardedMap with custom configuration.
///
/// ```rust
/// use shardedmap::{Backend, HashFunction, ShardedMapBuilder};
///
/// let map = ShardedMapBuilder::new()
///     .shard_count(32)?
///     .hash_function(HashFunction::Fnv1a32)
///     .backend(Backend::Swapped)
///     .build::<i32>()?;
/// map.set("answer", 42);
/// # Ok::<(), shardedmap::Error>(())
/// ```
#[derive(Debug, Default)]
pub struct ShardedMapBuilder {
    config: Config,
}

impl ShardedMapBuilder {
    /// Create a new builder with default configuration.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Set the number of shards. Must be greater than 0.
    pub fn shard_count(mut self, count: usize) -> Result<Self, Error> {
        self.config = self.config.shard_count(count)?;
        Ok(self)
    }

    /// Set the digest function.
    pub fn hash_function(mut self, hash_fn: HashFunction) -> Self {
        self.config = self.config.hash_function(hash_fn);
        self
    }

    /// Set the shard backend.
    pub fn backend(mut self, backend: Backend) -> Self {
        self.config = self.config.backend(backend);
        self
    }

    /// Set initial capacity per shard.
    pub fn capacity_per_shard(mut self, capacity: usize) -> Self {
        self.config = self.config.capacity_per_shard(capacity);
        self
    }

    /// Build a ShardedMap with the configured settings.
    pub fn build<V>(self) -> Result<crate::ShardedMap<V>, Error>
    where
        V: Send + Sync + 'static,
    {
        crate::ShardedMap::with_config(self.config)
    }

    /// Build a ShardedMap whose shards come from `factory` instead of the
    /// configured backend.
    pub fn build_with_factory<V, F>(self, factory: F) -> Result<crate::ShardedMap<V>, Error>
    where
        V: Send + Sync + 'static,
        F: Fn() -> Box<dyn Shard<V>>,
    {
        crate::ShardedMap::with_shard_factory(self.config, factory)
    }
}

/// Resolve the configured digest function.
pub(crate) fn create_hasher(hash_fn: &HashFunction) -> ShardHasher {
    match hash_fn {
        HashFunction::Fnv1a32 => ShardHasher::Fnv1a32,
        HashFunction::Fnv1a64 => ShardHasher::Fnv1a64,
        HashFunction::AHash => ShardHasher::ahash(),
        #[cfg(feature = "fxhash")]
        HashFunction::FxHash => ShardHasher::FxHash,
        HashFunction::Custom(hasher) => ShardHasher::Custom(Arc::clone(hasher)),
    }
}

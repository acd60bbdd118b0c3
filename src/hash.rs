use std::fmt;
use std::hash::BuildHasher;
use std::sync::Arc;

const FNV_OFFSET_32: u64 = 2_166_136_261;
const FNV_PRIME_32: u64 = 16_777_619;

const FNV_OFFSET_64: u64 = 14_695_981_039_346_656_037;
const FNV_PRIME_64: u64 = 1_099_511_628_211;

// Fixed so that AHash digests (and therefore shard placement) do not change
// between runs of the same build.
const AHASH_SEEDS: [u64; 4] = [
    0x243f_6a88_85a3_08d3,
    0x1319_8a2e_0370_7344,
    0xa409_3822_299f_31d0,
    0x082e_fa98_ec4e_6c89,
];

/// FNV-1a with the 32-bit offset basis and prime, accumulated in a 64-bit
/// word.
///
/// The product is never reduced to 32 bits, so only the low half matches
/// textbook FNV-1a 32. Shard placement depends on the full word.
///
/// ```rust
/// assert_eq!(shardedmap::hash::fnv1a_32("a"), 0x0081_1d68_e40c_292c);
/// assert_eq!(shardedmap::hash::fnv1a_32("a") as u32, 0xe40c_292c);
/// ```
#[inline]
pub fn fnv1a_32(key: &str) -> u64 {
    let mut hash = FNV_OFFSET_32;
    for byte in key.bytes() {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(FNV_PRIME_32);
    }
    hash
}

/// 64-bit FNV-1a over the key's bytes.
///
/// ```rust
/// assert_eq!(shardedmap::hash::fnv1a_64("a"), 0xaf63_dc4c_8601_ec8c);
/// ```
#[inline]
pub fn fnv1a_64(key: &str) -> u64 {
    let mut hash = FNV_OFFSET_64;
    for byte in key.bytes() {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(FNV_PRIME_64);
    }
    hash
}

/// A user-supplied digest function for string keys.
///
/// Implementations must be pure and deterministic: the same key has to
/// produce the same digest for the lifetime of a map, or lookups will miss.
/// Any `Fn(&str) -> u64` closure or function pointer qualifies.
pub trait KeyHasher: Send + Sync {
    /// Digest a key.
    fn hash(&self, key: &str) -> u64;
}

impl<F> KeyHasher for F
where
    F: Fn(&str) -> u64 + Send + Sync,
{
    #[inline]
    fn hash(&self, key: &str) -> u64 {
        self(key)
    }
}

/// Digest function resolved from the configuration.
/// Uses an enum so the built-in functions dispatch without a vtable.
pub(crate) enum ShardHasher {
    Fnv1a32,
    Fnv1a64,
    AHash(ahash::RandomState),
    #[cfg(feature = "fxhash")]
    FxHash,
    Custom(Arc<dyn KeyHasher>),
}

impl ShardHasher {
    pub(crate) fn ahash() -> Self {
        let [k0, k1, k2, k3] = AHASH_SEEDS;
        ShardHasher::AHash(ahash::RandomState::with_seeds(k0, k1, k2, k3))
    }

    /// Digest a key to pick its shard and its slot inside the shard.
    #[inline]
    pub(crate) fn digest(&self, key: &str) -> u64 {
        match self {
            ShardHasher::Fnv1a32 => fnv1a_32(key),
            ShardHasher::Fnv1a64 => fnv1a_64(key),
            ShardHasher::AHash(state) => state.hash_one(key),
            #[cfg(feature = "fxhash")]
            ShardHasher::FxHash => fxhash::hash64(key),
            ShardHasher::Custom(hasher) => KeyHasher::hash(hasher.as_ref(), key),
        }
    }
}

impl fmt::Debug for ShardHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShardHasher::Fnv1a32 => write!(f, "ShardHasher::Fnv1a32"),
            ShardHasher::Fnv1a64 => write!(f, "ShardHasher::Fnv1a64"),
            ShardHasher::AHash(_) => write!(f, "ShardHasher::AHash"),
            #[cfg(feature = "fxhash")]
            ShardHasher::FxHash => write!(f, "ShardHasher::FxHash"),
            ShardHasher::Custom(_) => write!(f, "ShardHasher::Custom(...)"),
        }
    }
}

use std::fmt;
use std::sync::Arc;

/// An immutable key/value record, the unit of storage inside a shard.
///
/// Shards index tuples by digest, so the tuple carries the original key to
/// make it recoverable during full scans. Setting a key never mutates a tuple;
/// it replaces the tuple stored under the digest.
pub struct Tuple<V> {
    key: Arc<str>,
    value: Arc<V>,
}

impl<V> Tuple<V> {
    /// Create a tuple from a key and a value.
    pub fn new(key: impl Into<Arc<str>>, value: V) -> Self {
        Self {
            key: key.into(),
            value: Arc::new(value),
        }
    }

    /// The original string key.
    #[inline]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The stored value.
    #[inline]
    pub fn value(&self) -> &Arc<V> {
        &self.value
    }

    /// A new tuple with the same key and a replacement value.
    pub fn with_value(&self, value: V) -> Self {
        Self {
            key: Arc::clone(&self.key),
            value: Arc::new(value),
        }
    }

    /// Split the tuple into its shared key and value.
    pub fn into_parts(self) -> (Arc<str>, Arc<V>) {
        (self.key, self.value)
    }
}

impl<V> Clone for Tuple<V> {
    fn clone(&self) -> Self {
        Self {
            key: Arc::clone(&self.key),
            value: Arc::clone(&self.value),
        }
    }
}

impl<V: fmt::Debug> fmt::Debug for Tuple<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tuple")
            .field("key", &self.key)
            .field("value", &self.value)
            .finish()
    }
}

impl<V: PartialEq> PartialEq for Tuple<V> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.value == other.value
    }
}

impl<V: Eq> Eq for Tuple<V> {}

use thiserror::Error;

/// Errors that can occur when operating on a ShardedMap.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The requested key was not found in the map.
    #[error("key not found")]
    KeyNotFound,
    /// The shard count is invalid (must be greater than 0).
    #[error("shard count must be greater than 0")]
    InvalidShardCount,
    /// A value could not be encoded by the JSON bridge.
    #[error("failed to serialize map: {0}")]
    Serialize(String),
    /// Input handed to the JSON bridge was malformed.
    #[error("failed to deserialize map: {0}")]
    Deserialize(String),
}

impl Error {
    pub(crate) fn serialize(err: serde_json::Error) -> Self {
        Error::Serialize(err.to_string())
    }

    pub(crate) fn deserialize(err: serde_json::Error) -> Self {
        Error::Deserialize(err.to_string())
    }
}

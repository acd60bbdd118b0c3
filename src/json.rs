use crate::error::Error;
use crate::map::ShardedMap;
use serde::de::{DeserializeOwned, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;

impl<V> Serialize for ShardedMap<V>
where
    V: Serialize + Send + Sync + 'static,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let entries = self.range();
        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for tuple in entries {
            map.serialize_entry(tuple.key(), tuple.value().as_ref())?;
        }
        map.end()
    }
}

struct ShardedMapVisitor<V> {
    marker: PhantomData<fn() -> ShardedMap<V>>,
}

impl<'de, V> Visitor<'de> for ShardedMapVisitor<V>
where
    V: Deserialize<'de> + Send + Sync + 'static,
{
    type Value = ShardedMap<V>;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a map from string keys to values")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let map = ShardedMap::new();
        while let Some((key, value)) = access.next_entry::<String, V>()? {
            map.set(key, value);
        }
        Ok(map)
    }
}

impl<'de, V> Deserialize<'de> for ShardedMap<V>
where
    V: Deserialize<'de> + Send + Sync + 'static,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(ShardedMapVisitor {
            marker: PhantomData,
        })
    }
}

impl<V> ShardedMap<V>
where
    V: Serialize + Send + Sync + 'static,
{
    /// Encode the map as a JSON object.
    pub fn to_json(&self) -> Result<String, Error> {
        serde_json::to_string(self).map_err(Error::serialize)
    }
}

impl<V> ShardedMap<V>
where
    V: DeserializeOwned + Send + Sync + 'static,
{
    /// Decode a JSON object into a new default-configured map.
    pub fn from_json(input: &str) -> Result<Self, Error> {
        serde_json::from_str(input).map_err(|err| {
            tracing::warn!(error = %err, "rejected malformed map input");
            Error::deserialize(err)
        })
    }

    /// Merge the fields of a JSON object into this map, returning how many
    /// fields were stored.
    ///
    /// The whole input is parsed before anything is written, so malformed
    /// input leaves the map untouched.
    pub fn load_json(&self, input: &str) -> Result<usize, Error> {
        let fields: HashMap<String, V> = serde_json::from_str(input).map_err(|err| {
            tracing::warn!(error = %err, "rejected malformed map input");
            Error::deserialize(err)
        })?;

        let loaded = fields.len();
        for (key, value) in fields {
            self.set(key, value);
        }
        tracing::debug!(loaded, "merged json fields");
        Ok(loaded)
    }
}

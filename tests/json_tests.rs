use serde_json::{json, Value};
use shardedmap::{Backend, Config, Error, ShardedMap};

fn populated(backend: Backend) -> ShardedMap<Value> {
    let map = ShardedMap::with_config(Config::new().shard_count(32).unwrap().backend(backend)).unwrap();
    map.set("name", json!("shard"));
    map.set("count", json!(3));
    map.set("nested", json!({"a": [1, 2, 3]}));
    map.set("missing", Value::Null);
    map
}

#[test]
fn test_round_trip() {
    for backend in [Backend::Locked, Backend::Swapped] {
        let original = populated(backend);

        let encoded = original.to_json().unwrap();
        let decoded: ShardedMap<Value> = ShardedMap::from_json(&encoded).unwrap();

        assert_eq!(decoded.count(), original.count());
        assert_eq!(decoded.all(), original.all());
        // decoding always yields the default configuration
        assert_eq!(decoded.shard_count(), shardedmap::DEFAULT_SHARD_COUNT);
    }
}

#[test]
fn test_serde_json_directly() {
    let map = populated(Backend::Locked);
    let bytes = serde_json::to_vec(&map).unwrap();
    let decoded: ShardedMap<Value> = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(*decoded.get("nested").unwrap(), json!({"a": [1, 2, 3]}));
}

#[test]
fn test_encodes_exactly_all() {
    let map = populated(Backend::Swapped);
    let value: Value = serde_json::from_str(&map.to_json().unwrap()).unwrap();
    let object = value.as_object().unwrap();

    assert_eq!(object.len(), map.count());
    for (key, stored) in map.all() {
        assert_eq!(object[&key], *stored);
    }
}

#[test]
fn test_malformed_input_is_an_error() {
    for input in ["", "{", "{\"a\": }", "not json", "42"] {
        let err = ShardedMap::<Value>::from_json(input).unwrap_err();
        assert!(matches!(err, Error::Deserialize(_)), "input {:?}", input);
    }
}

#[test]
fn test_failed_load_leaves_map_unmodified() {
    let map = populated(Backend::Locked);
    let before = map.all();

    assert!(map.load_json("{\"name\": \"other\", ").is_err());

    assert_eq!(map.count(), before.len());
    assert_eq!(map.all(), before);
}

#[test]
fn test_empty_map_encodes_as_empty_object() {
    let map: ShardedMap<i32> = ShardedMap::new();
    assert_eq!(map.to_json().unwrap(), "{}");
}

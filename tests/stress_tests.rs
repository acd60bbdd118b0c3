//! Load tests: concurrent sets and removes on both backends, then verify state and introspection.

use shardedmap::{Backend, Config, ShardedMap};
use std::sync::Arc;
use std::thread;

#[test]
fn test_under_load_then_introspect() {
    for backend in [Backend::Locked, Backend::Swapped] {
        let config = Config::new().shard_count(16).unwrap().backend(backend);
        let map = Arc::new(ShardedMap::with_config(config).unwrap());
        let mut handles = vec![];

        for t in 0..4 {
            let map = Arc::clone(&map);
            handles.push(thread::spawn(move || {
                for i in 0..2000 {
                    map.set(format!("t{}_k{}", t, i), i);
                }
                assert!(map.count() >= 2000);
                for i in 0..2000 {
                    map.remove(&format!("t{}_k{}", t, i));
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert!(map.is_empty());
        assert_eq!(map.count(), 0);
        assert_eq!(map.shard_loads().iter().sum::<usize>(), 0);
    }
}

#[test]
fn test_writers_count_exactly() {
    const WRITERS: usize = 8;
    const PER_WRITER: usize = 500;

    for backend in [Backend::Locked, Backend::Swapped] {
        let map = Arc::new(ShardedMap::with_config(Config::new().backend(backend)).unwrap());
        let handles: Vec<_> = (0..WRITERS)
            .map(|w| {
                let map = Arc::clone(&map);
                thread::spawn(move || {
                    for i in 0..PER_WRITER {
                        map.set(format!("w{}:{}", w, i), (w, i));
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(map.count(), WRITERS * PER_WRITER);
        assert_eq!(map.all().len(), WRITERS * PER_WRITER);
        assert_eq!(map.range().len(), WRITERS * PER_WRITER);
    }
}

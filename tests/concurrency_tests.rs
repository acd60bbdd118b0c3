use shardedmap::{Backend, Config, ShardedMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

fn map_with(backend: Backend) -> Arc<ShardedMap<usize>> {
    let config = Config::new().backend(backend);
    Arc::new(ShardedMap::with_config(config).unwrap())
}

#[test]
fn test_concurrent_sets() {
    for backend in [Backend::Locked, Backend::Swapped] {
        let map = map_with(backend);
        let mut handles = vec![];

        // Spawn 10 threads, each setting 100 disjoint keys
        for thread_id in 0..10 {
            let map = Arc::clone(&map);
            handles.push(thread::spawn(move || {
                for i in 0..100 {
                    map.set(format!("thread_{}_key_{}", thread_id, i), i);
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(map.count(), 1000);
    }
}

#[test]
fn test_concurrent_reads() {
    for backend in [Backend::Locked, Backend::Swapped] {
        let map = map_with(backend);
        for i in 0..100 {
            map.set(format!("key_{}", i), i);
        }

        let mut handles = vec![];
        for _ in 0..20 {
            let map = Arc::clone(&map);
            handles.push(thread::spawn(move || {
                for i in 0..100 {
                    assert_eq!(*map.get(&format!("key_{}", i)).unwrap(), i);
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }
    }
}

#[test]
fn test_concurrent_mixed_operations() {
    for backend in [Backend::Locked, Backend::Swapped] {
        let map = map_with(backend);
        let mut handles = vec![];

        // writers
        for thread_id in 0..5 {
            let map = Arc::clone(&map);
            handles.push(thread::spawn(move || {
                for i in 0..200 {
                    map.set(format!("key_{}_{}", thread_id, i), i);
                    if i % 4 == 0 {
                        map.remove(&format!("key_{}_{}", thread_id, i));
                    }
                }
            }));
        }

        // readers and bulk readers
        for _ in 0..5 {
            let map = Arc::clone(&map);
            handles.push(thread::spawn(move || {
                for i in 0..200 {
                    let _ = map.get(&format!("key_{}_{}", i % 5, i));
                    let snapshot = map.all();
                    for (k, v) in snapshot.iter() {
                        assert!(k.ends_with(&format!("_{}", v)));
                    }
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(map.count(), 5 * 150);
    }
}

#[test]
fn test_range_terminates_under_concurrent_writes() {
    for backend in [Backend::Locked, Backend::Swapped] {
        let map = map_with(backend);
        for i in 0..500 {
            map.set(format!("stable_{}", i), i);
        }

        let stop = Arc::new(AtomicBool::new(false));
        let writer = {
            let map = Arc::clone(&map);
            let stop = Arc::clone(&stop);
            thread::spawn(move || {
                let mut i = 0;
                while !stop.load(Ordering::Relaxed) {
                    map.set(format!("churn_{}", i % 300), i);
                    if i % 2 == 0 {
                        map.remove(&format!("churn_{}", (i + 150) % 300));
                    }
                    i += 1;
                }
            })
        };

        for _ in 0..50 {
            let stable = map
                .range()
                .filter(|tuple| tuple.key().starts_with("stable_"))
                .count();
            assert_eq!(stable, 500);
            assert!(map.iter().count() >= 500);
        }

        stop.store(true, Ordering::Relaxed);
        writer.join().unwrap();
    }
}

#[test]
fn test_concurrent_transform_and_clear() {
    for backend in [Backend::Locked, Backend::Swapped] {
        let map = map_with(backend);
        for i in 0..100 {
            map.set(format!("key_{}", i), i);
        }

        let transformer = {
            let map = Arc::clone(&map);
            thread::spawn(move || {
                for _ in 0..20 {
                    map.range_with_transform(|_, v| Some(v + 1));
                }
            })
        };
        let clearer = {
            let map = Arc::clone(&map);
            thread::spawn(move || {
                for _ in 0..20 {
                    map.clear();
                }
            })
        };

        transformer.join().unwrap();
        clearer.join().unwrap();

        // transform rewrites only keys it saw, so the map never exceeds the
        // original population
        assert!(map.count() <= 100);
    }
}

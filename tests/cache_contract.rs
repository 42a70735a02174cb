use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use ttl_lru_cache::{Cache, CacheError, Expiry, LruCache, ShardedCacheConfig, ShardedLruCache};

fn base() -> Instant {
    Instant::now() + Duration::from_secs(3600)
}

fn s(key: &str) -> String {
    key.to_string()
}

// The capacity-3 walkthrough: LRU evicts a, then b, then the already expired e.
fn run_eviction_scenario<C: Cache<String, &'static str> + ?Sized>(cache: &C) {
    let now = base();
    let secs = |n: u64| Expiry::At(now + Duration::from_secs(n));

    cache.set_now(s("b"), "vb", secs(2), now);
    cache.set_now(s("a"), "va", secs(1), now);
    cache.set_now(s("c"), "vc", secs(3), now);

    assert_eq!(cache.get(&s("a")), Some("va"));
    assert_eq!(cache.get(&s("b")), Some("vb"));
    assert_eq!(cache.get(&s("c")), Some("vc"));

    cache.set_now(s("d"), "vd", secs(4), now);
    assert_eq!(cache.get_quiet(&s("a")), None);

    cache.set_now(s("e"), "ve", Expiry::At(now - Duration::from_secs(4)), now);
    assert_eq!(cache.get_quiet(&s("b")), None);

    cache.set_now(s("f"), "vf", secs(5), now);
    assert_eq!(cache.get_quiet(&s("e")), None);
    assert_eq!(cache.get_quiet(&s("c")), Some("vc"));
    assert_eq!(cache.len(), 3);
}

#[test]
fn eviction_scenario_single_shard() {
    run_eviction_scenario(&LruCache::new(3));
}

#[test]
fn eviction_scenario_through_one_shard() {
    run_eviction_scenario(&ShardedLruCache::new(1, 3).unwrap());
}

#[test]
fn eviction_scenario_through_trait_object() {
    let cache: Box<dyn Cache<String, &'static str>> = Box::new(LruCache::new(3));
    run_eviction_scenario(cache.as_ref());
}

#[test]
fn stale_read_removes_entry() {
    let cache = LruCache::new(4);
    let now = base();
    cache.set_now(s("k"), 1u32, Expiry::At(now), now);
    let later = now + Duration::from_secs(1);

    assert_eq!(cache.get(&s("k")), Some(1));
    assert_eq!(cache.get_quiet(&s("k")), Some(1));
    assert_eq!(cache.get_not_stale_now(&s("k"), later), None);
    assert_eq!(cache.get(&s("k")), None);
    assert!(cache.is_empty());
}

#[test]
fn sharded_config_roundtrip() {
    let config = ShardedCacheConfig::new(4, 42);
    let cache: ShardedLruCache<u64, u64> = ShardedLruCache::with_config(config).unwrap();

    assert_eq!(cache.num_shards(), 4);
    assert_eq!(cache.capacity(), config.total_capacity());
    assert_eq!(cache.capacity(), 40);

    let err = ShardedLruCache::<u64, u64>::new(0, 42).err().unwrap();
    assert_eq!(err, CacheError::ZeroShards);
    assert_eq!(err.to_string(), "shard count cannot be zero");
}

#[test]
fn capacity_bound_under_parallel_writers() {
    let cache = Arc::new(ShardedLruCache::new(8, 256).unwrap());
    let handles: Vec<_> = (0..8)
        .map(|t| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for i in 0..2_000u64 {
                    let expire = if i % 3 == 0 {
                        Expiry::after(Duration::from_millis(1))
                    } else {
                        Expiry::Never
                    };
                    cache.set(t * 10_000 + i, i, expire);
                    assert!(cache.len() <= cache.capacity());
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(cache.len(), cache.capacity());
    let expired = cache.expire_now(Instant::now() + Duration::from_secs(1));
    assert_eq!(cache.len() + expired, cache.capacity());
    let remaining = cache.len();
    assert_eq!(cache.clear(), remaining);
    assert!(cache.is_empty());
}

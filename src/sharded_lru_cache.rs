use std::fmt::Debug;
use std::hash::Hash;
use std::time::Instant;

use ahash::RandomState;
use tracing::debug;

use crate::config::ShardedCacheConfig;
use crate::error::Result;
use crate::expiry::Expiry;
use crate::lru_cache::{Cache, LruCache};

// Fixed seeds so that routing is reproducible across instances and runs
const ROUTING_SEEDS: [u64; 4] = [
    0x243f_6a88_85a3_08d3,
    0x1319_8a2e_0370_7344,
    0xa409_3822_299f_31d0,
    0x082e_fa98_ec4e_6c89,
];

/// A sharded LRU cache with per-entry expiry, for high-concurrency scenarios.
///
/// The cache is split into independent [`LruCache`] shards, each behind its
/// own mutex. A key is routed to `hash(key) % num_shards`, so operations on
/// keys in different shards never contend. Each shard gets
/// `capacity / num_shards` slots; the remainder is unused.
///
/// `clear`, `len`, `capacity` and `expire` visit the shards one after another
/// without a global lock, so under concurrent writes their results are
/// approximate.
///
/// # Type Parameters
///
/// * `K` - The type of keys used in the cache. Must implement `Clone + Debug + Hash + Eq + Send + Sync + 'static`
/// * `V` - The type of values stored in the cache. Must implement `Clone + Debug + Send + Sync + 'static`
///
/// # Examples
///
/// ```rust
/// use ttl_lru_cache::{Expiry, ShardedLruCache};
///
/// let cache = ShardedLruCache::new(4, 1000).unwrap();
/// cache.set("key1".to_string(), "value1".to_string(), Expiry::Never);
/// assert_eq!(cache.get(&"key1".to_string()), Some("value1".to_string()));
/// ```
pub struct ShardedLruCache<K, V>
where
    K: Clone + Debug + Hash + Eq + Send + Sync + 'static,
    V: Clone + Debug + Send + Sync + 'static,
{
    shards: Box<[LruCache<K, V>]>,
    hasher: RandomState,
}

impl<K, V> ShardedLruCache<K, V>
where
    K: Clone + Debug + Hash + Eq + Send + Sync + 'static,
    V: Clone + Debug + Send + Sync + 'static,
{
    /// Creates a cache of `num_shards` shards sharing `capacity` slots.
    ///
    /// Fails if there are no shards or if a shard would end up with no slots.
    pub fn new(num_shards: usize, capacity: usize) -> Result<Self> {
        Self::with_config(ShardedCacheConfig::new(num_shards, capacity))
    }

    /// Creates a cache with a shard count derived from the capacity.
    ///
    /// See [`ShardedCacheConfig::with_capacity`].
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        Self::with_config(ShardedCacheConfig::with_capacity(capacity))
    }

    pub fn with_config(config: ShardedCacheConfig) -> Result<Self> {
        let shard_capacity = config.validate()?;
        debug!(
            num_shards = config.num_shards,
            shard_capacity,
            unused = config.capacity - config.total_capacity(),
            "creating sharded cache"
        );

        let shards = (0..config.num_shards)
            .map(|_| LruCache::new(shard_capacity))
            .collect();

        Ok(Self {
            shards,
            hasher: RandomState::with_seeds(
                ROUTING_SEEDS[0],
                ROUTING_SEEDS[1],
                ROUTING_SEEDS[2],
                ROUTING_SEEDS[3],
            ),
        })
    }

    /// Returns the total capacity of the cache, after rounding.
    pub fn capacity(&self) -> usize {
        self.shards.iter().map(|shard| shard.capacity()).sum()
    }

    /// Returns the number of shards in the cache.
    pub fn num_shards(&self) -> usize {
        self.shards.len()
    }

    /// Returns the index of the shard `key` routes to.
    pub fn shard_index(&self, key: &K) -> usize {
        (self.hasher.hash_one(key) % self.shards.len() as u64) as usize
    }

    fn shard(&self, key: &K) -> &LruCache<K, V> {
        &self.shards[self.shard_index(key)]
    }

    /// Inserts or overwrites a key. See [`Cache::set`].
    pub fn set(&self, key: K, value: V, expire: Expiry) {
        self.set_now(key, value, expire, Instant::now())
    }

    /// Inserts or overwrites a key with an explicit current time. See
    /// [`Cache::set_now`].
    pub fn set_now(&self, key: K, value: V, expire: Expiry, now: Instant) {
        self.shard(&key).set_now(key, value, expire, now)
    }

    /// Retrieves a value, possibly stale, and marks it most recently used.
    pub fn get(&self, key: &K) -> Option<V> {
        self.shard(key).get(key)
    }

    /// Retrieves a value, possibly stale, leaving its LRU position alone.
    pub fn get_quiet(&self, key: &K) -> Option<V> {
        self.shard(key).get_quiet(key)
    }

    /// Retrieves a value only if it has not expired.
    pub fn get_not_stale(&self, key: &K) -> Option<V> {
        self.get_not_stale_now(key, Instant::now())
    }

    pub fn get_not_stale_now(&self, key: &K, now: Instant) -> Option<V> {
        self.shard(key).get_not_stale_now(key, now)
    }

    /// Removes an entry, returning its value.
    pub fn del(&self, key: &K) -> Option<V> {
        self.shard(key).del(key)
    }

    /// Returns the number of entries in the cache.
    pub fn len(&self) -> usize {
        self.shards.iter().map(|shard| shard.len()).sum()
    }

    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.shards.iter().all(|shard| shard.is_empty())
    }

    /// Removes all entries from the cache, returning how many were removed.
    pub fn clear(&self) -> usize {
        let removed = self.shards.iter().map(|shard| shard.clear()).sum();
        debug!(removed, "cleared sharded cache");
        removed
    }

    /// Evicts every expired entry, returning how many were removed.
    pub fn expire(&self) -> usize {
        self.expire_now(Instant::now())
    }

    pub fn expire_now(&self, now: Instant) -> usize {
        let removed = self.shards.iter().map(|shard| shard.expire_now(now)).sum();
        if removed > 0 {
            debug!(removed, "expired entries");
        }
        removed
    }
}

impl<K, V> Cache<K, V> for ShardedLruCache<K, V>
where
    K: Clone + Debug + Hash + Eq + Send + Sync + 'static,
    V: Clone + Debug + Send + Sync + 'static,
{
    fn set_now(&self, key: K, value: V, expire: Expiry, now: Instant) {
        self.set_now(key, value, expire, now)
    }

    fn get(&self, key: &K) -> Option<V> {
        self.get(key)
    }

    fn get_quiet(&self, key: &K) -> Option<V> {
        self.get_quiet(key)
    }

    fn get_not_stale_now(&self, key: &K, now: Instant) -> Option<V> {
        self.get_not_stale_now(key, now)
    }

    fn del(&self, key: &K) -> Option<V> {
        self.del(key)
    }

    fn clear(&self) -> usize {
        self.clear()
    }

    fn expire_now(&self, now: Instant) -> usize {
        self.expire_now(now)
    }

    fn len(&self) -> usize {
        self.len()
    }

    fn is_empty(&self) -> bool {
        self.is_empty()
    }

    fn capacity(&self) -> usize {
        self.capacity()
    }
}

#[cfg(test)]
impl<K, V> ShardedLruCache<K, V>
where
    K: Clone + Debug + Hash + Eq + Send + Sync + 'static,
    V: Clone + Debug + Send + Sync + 'static,
{
    pub(crate) fn assert_consistent(&self) {
        for shard in self.shards.iter() {
            shard.assert_consistent();
        }
    }
}

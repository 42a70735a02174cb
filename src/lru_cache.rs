use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::time::Instant;

use ahash::RandomState;
use parking_lot::Mutex;
use tracing::trace;

use crate::error::{CacheError, Result};
use crate::expiry::Expiry;
use crate::expiry_heap::ExpiryHeap;
use crate::pool::EntryPool;
use crate::slot_list::SlotList;

/// The core trait that defines the behavior of a cache implementation.
///
/// Every operation is atomic with respect to other operations on the same
/// shard. Operations that need the current time come in two forms: one that
/// reads `Instant::now()` and a `*_now` form taking an explicit instant, which
/// keeps tests deterministic.
///
/// Reads through [`get`](Cache::get) and [`get_quiet`](Cache::get_quiet) may
/// return stale entries. Only [`get_not_stale`](Cache::get_not_stale) checks
/// the expiry.
///
/// # Type Parameters
///
/// * `K` - The type of keys used in the cache. Must implement `Clone + Debug + Hash + Eq + Send + Sync + 'static`
/// * `V` - The type of values stored in the cache. Must implement `Clone + Debug + Send + Sync + 'static`
pub trait Cache<K, V>: Send + Sync
where
    K: Clone + Debug + Hash + Eq + Send + Sync + 'static,
    V: Clone + Debug + Send + Sync + 'static,
{
    /// Inserts or overwrites a key, using the current time to decide whether
    /// an entry has already expired if something must be evicted.
    fn set(&self, key: K, value: V, expire: Expiry) {
        self.set_now(key, value, expire, Instant::now())
    }

    /// Inserts or overwrites a key.
    ///
    /// If the key is new and every slot is in use, an entry is evicted first:
    /// the soonest-expiring entry if it expired before `now`, otherwise the
    /// least recently used one.
    fn set_now(&self, key: K, value: V, expire: Expiry, now: Instant);

    /// Retrieves a value, possibly stale, and marks it most recently used.
    fn get(&self, key: &K) -> Option<V>;

    /// Retrieves a value, possibly stale, without touching its LRU position.
    fn get_quiet(&self, key: &K) -> Option<V>;

    /// Retrieves a value only if it has not expired.
    fn get_not_stale(&self, key: &K) -> Option<V> {
        self.get_not_stale_now(key, Instant::now())
    }

    /// Retrieves a value only if its expiry is not before `now`.
    ///
    /// An expired entry is evicted and reported as missing. A live entry is
    /// marked most recently used.
    fn get_not_stale_now(&self, key: &K, now: Instant) -> Option<V>;

    /// Removes an entry, returning its value.
    fn del(&self, key: &K) -> Option<V>;

    /// Removes every entry, returning how many were removed.
    fn clear(&self) -> usize;

    /// Evicts every entry that has expired, returning how many were removed.
    fn expire(&self) -> usize {
        self.expire_now(Instant::now())
    }

    /// Evicts every entry whose expiry is before `now`.
    fn expire_now(&self, now: Instant) -> usize;

    /// Returns the number of entries in the cache.
    fn len(&self) -> usize;

    /// Returns true if the cache is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the total number of slots.
    fn capacity(&self) -> usize;
}

// Everything guarded by one shard lock. Each used slot is referenced by the
// key table, linked into the recency list and present in the expiry heap; each
// free slot sits only in the pool's free list.
struct CacheState<K, V> {
    pool: EntryPool<K, V>,
    lru: SlotList,
    heap: ExpiryHeap,
    table: HashMap<K, usize, RandomState>,
}

impl<K, V> CacheState<K, V>
where
    K: Clone + Debug + Hash + Eq,
    V: Clone,
{
    fn new(capacity: usize) -> Self {
        Self {
            pool: EntryPool::new(capacity),
            lru: SlotList::new(),
            heap: ExpiryHeap::with_capacity(capacity),
            table: HashMap::with_capacity_and_hasher(capacity, RandomState::new()),
        }
    }

    // The soonest-expiring slot, if it expired before now.
    fn expired_entry(&self, now: Instant) -> Option<usize> {
        let idx = self.heap.peek_min()?;
        self.pool.slots()[idx].expire.is_before(now).then_some(idx)
    }

    // Picks the slot to recycle when the pool is exhausted. Expired entries
    // go first, then the least recently used.
    fn eviction_victim(&self, now: Instant) -> Option<usize> {
        if let Some(idx) = self.expired_entry(now) {
            trace!(key = ?self.pool.slots()[idx].key, reason = "ttl", "evicting entry");
            return Some(idx);
        }
        let idx = self.lru.back()?;
        trace!(key = ?self.pool.slots()[idx].key, reason = "lru", "evicting entry");
        Some(idx)
    }

    // Unlink a used slot from the key table, recency list and expiry heap.
    // The slot keeps its payload until it is overwritten or released.
    fn detach(&mut self, idx: usize) {
        debug_assert!(self.pool.slots()[idx].is_used(), "detaching a free slot");
        if let Some(key) = self.pool.slots()[idx].key.as_ref() {
            self.table.remove(key);
        }
        self.lru.remove(self.pool.slots_mut(), idx);
        self.heap.remove(self.pool.slots_mut(), idx);
    }

    // Detach a used slot and hand it back to the free list.
    fn remove_entry(&mut self, idx: usize) -> Option<V> {
        self.detach(idx);
        self.pool.release(idx).map(|(_, value)| value)
    }

    fn set(&mut self, key: K, value: V, expire: Expiry, now: Instant) {
        let idx = if let Some(&idx) = self.table.get(&key) {
            self.detach(idx);
            idx
        } else if let Some(idx) = self.pool.acquire() {
            idx
        } else {
            match self.eviction_victim(now) {
                Some(idx) => {
                    self.detach(idx);
                    idx
                }
                // Only a pool without slots has nothing to evict
                None => return,
            }
        };

        let slot = &mut self.pool.slots_mut()[idx];
        slot.key = Some(key.clone());
        slot.value = Some(value);
        slot.expire = expire;

        self.table.insert(key, idx);
        self.heap.push(self.pool.slots_mut(), idx);
        self.lru.push_front(self.pool.slots_mut(), idx);
    }

    fn get(&mut self, key: &K) -> Option<V> {
        let idx = *self.table.get(key)?;
        self.lru.touch(self.pool.slots_mut(), idx);
        self.pool.slots()[idx].value.clone()
    }

    fn get_quiet(&self, key: &K) -> Option<V> {
        let idx = *self.table.get(key)?;
        self.pool.slots()[idx].value.clone()
    }

    fn get_not_stale(&mut self, key: &K, now: Instant) -> Option<V> {
        let idx = *self.table.get(key)?;
        if self.pool.slots()[idx].expire.is_before(now) {
            trace!(?key, "dropping stale entry on read");
            self.remove_entry(idx);
            return None;
        }
        self.lru.touch(self.pool.slots_mut(), idx);
        self.pool.slots()[idx].value.clone()
    }

    fn del(&mut self, key: &K) -> Option<V> {
        let idx = *self.table.get(key)?;
        self.remove_entry(idx)
    }

    fn clear(&mut self) -> usize {
        let count = self.lru.len();
        while let Some(idx) = self.lru.back() {
            self.remove_entry(idx);
        }
        count
    }

    fn expire(&mut self, now: Instant) -> usize {
        let mut count = 0;
        while let Some(idx) = self.expired_entry(now) {
            self.remove_entry(idx);
            count += 1;
        }
        count
    }

    fn len(&self) -> usize {
        self.table.len()
    }

    // Checks that the pool, key table, recency list and expiry heap agree.
    #[cfg(test)]
    fn assert_consistent(&self) {
        use crate::slot::NIL;

        let slots = self.pool.slots();
        let used = self.pool.capacity() - self.pool.free_len();
        assert_eq!(self.table.len(), used);
        assert_eq!(self.lru.len(), used);
        assert_eq!(self.heap.len(), used);
        assert!(self.heap.is_consistent(slots));

        let recent = self.lru.indices(slots);
        let free = self.pool.free_indices();
        assert_eq!(recent.len() + free.len(), self.pool.capacity());

        for &idx in &recent {
            let slot = &slots[idx];
            let key = slot.key.as_ref().expect("used slot has a key");
            assert!(slot.value.is_some());
            assert_ne!(slot.heap_index, NIL);
            assert_eq!(self.table.get(key), Some(&idx));
        }
        for &idx in &free {
            let slot = &slots[idx];
            assert!(!slot.is_used());
            assert!(slot.value.is_none());
            assert_eq!(slot.heap_index, NIL);
        }
    }
}

/// A fixed-capacity LRU cache with per-entry expiry.
///
/// All slots are allocated once, when the cache is built. After that no
/// operation allocates: a new key claims a free slot, or recycles an expired
/// or least recently used one. Lookups go through a hash table, recency is a
/// linked list over slot indices, and expiry is a min-heap over the same
/// slots.
///
/// The whole cache sits behind one mutex. Use
/// [`ShardedLruCache`](crate::ShardedLruCache) to spread contention across
/// several independent caches.
///
/// # Type Parameters
///
/// * `K` - The type of keys used in the cache. Must implement `Clone + Debug + Hash + Eq + Send + Sync + 'static`
/// * `V` - The type of values stored in the cache. Must implement `Clone + Debug + Send + Sync + 'static`
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
/// use ttl_lru_cache::{Cache, Expiry, LruCache};
///
/// let cache = LruCache::new(2);
/// cache.set("key1".to_string(), "value1".to_string(), Expiry::after(Duration::from_secs(60)));
/// assert_eq!(cache.get(&"key1".to_string()), Some("value1".to_string()));
/// ```
pub struct LruCache<K, V>
where
    K: Clone + Debug + Hash + Eq + Send + Sync + 'static,
    V: Clone + Debug + Send + Sync + 'static,
{
    cap: usize,
    state: Mutex<CacheState<K, V>>,
}

impl<K, V> LruCache<K, V>
where
    K: Clone + Debug + Hash + Eq + Send + Sync + 'static,
    V: Clone + Debug + Send + Sync + 'static,
{
    /// Creates a cache with `capacity` slots.
    ///
    /// # Panics
    ///
    /// Panics if capacity is 0
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Capacity must be positive");
        Self::build(capacity)
    }

    /// Creates a cache with `capacity` slots, rejecting a zero capacity.
    pub fn try_new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(CacheError::ZeroCapacity);
        }
        Ok(Self::build(capacity))
    }

    fn build(capacity: usize) -> Self {
        trace!(capacity, "allocating cache slots");
        Self {
            cap: capacity,
            state: Mutex::new(CacheState::new(capacity)),
        }
    }

    pub fn capacity(&self) -> usize {
        self.cap
    }
}

impl<K, V> Cache<K, V> for LruCache<K, V>
where
    K: Clone + Debug + Hash + Eq + Send + Sync + 'static,
    V: Clone + Debug + Send + Sync + 'static,
{
    fn set_now(&self, key: K, value: V, expire: Expiry, now: Instant) {
        self.state.lock().set(key, value, expire, now)
    }

    fn get(&self, key: &K) -> Option<V> {
        self.state.lock().get(key)
    }

    fn get_quiet(&self, key: &K) -> Option<V> {
        self.state.lock().get_quiet(key)
    }

    fn get_not_stale_now(&self, key: &K, now: Instant) -> Option<V> {
        self.state.lock().get_not_stale(key, now)
    }

    fn del(&self, key: &K) -> Option<V> {
        self.state.lock().del(key)
    }

    fn clear(&self) -> usize {
        self.state.lock().clear()
    }

    fn expire_now(&self, now: Instant) -> usize {
        self.state.lock().expire(now)
    }

    fn len(&self) -> usize {
        self.state.lock().len()
    }

    fn capacity(&self) -> usize {
        self.cap
    }
}

#[cfg(test)]
impl<K, V> LruCache<K, V>
where
    K: Clone + Debug + Hash + Eq + Send + Sync + 'static,
    V: Clone + Debug + Send + Sync + 'static,
{
    pub(crate) fn assert_consistent(&self) {
        self.state.lock().assert_consistent();
    }
}

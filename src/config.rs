//! Sizing for sharded caches.

use crate::error::{CacheError, Result};

// Minimum capacity per shard when the shard count is picked automatically
const MIN_SHARD_CAPACITY: usize = 4;
// Maximum number of shards picked automatically, must be a power of 2
const MAX_SHARDS: usize = 16;

/// Shape of a [`ShardedLruCache`](crate::ShardedLruCache).
///
/// Each shard receives `capacity / num_shards` slots. Any remainder is not
/// redistributed, so the usable capacity can be slightly below `capacity`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShardedCacheConfig {
    /// Requested capacity across all shards
    pub capacity: usize,
    /// Number of independently locked shards
    pub num_shards: usize,
}

impl Default for ShardedCacheConfig {
    fn default() -> Self {
        Self {
            capacity: 1024,
            num_shards: MAX_SHARDS,
        }
    }
}

impl ShardedCacheConfig {
    pub fn new(num_shards: usize, capacity: usize) -> Self {
        Self {
            capacity,
            num_shards,
        }
    }

    /// Picks the shard count from the capacity.
    ///
    /// The count is the largest power of 2 that leaves every shard at least
    /// `MIN_SHARD_CAPACITY` slots, capped at `MAX_SHARDS`.
    pub fn with_capacity(capacity: usize) -> Self {
        let theoretical_shards = capacity / MIN_SHARD_CAPACITY;
        let num_shards = if theoretical_shards >= MAX_SHARDS {
            MAX_SHARDS
        } else {
            let mut n = 1;
            while n * 2 <= theoretical_shards {
                n *= 2;
            }
            n
        };
        Self::new(num_shards, capacity)
    }

    /// Slots given to each shard.
    pub fn shard_capacity(&self) -> usize {
        self.capacity.checked_div(self.num_shards).unwrap_or(0)
    }

    /// Slots actually usable across all shards after rounding.
    pub fn total_capacity(&self) -> usize {
        self.shard_capacity() * self.num_shards
    }

    /// Checks the configuration and returns the per-shard capacity.
    pub fn validate(&self) -> Result<usize> {
        if self.num_shards == 0 {
            return Err(CacheError::ZeroShards);
        }
        if self.capacity == 0 {
            return Err(CacheError::ZeroCapacity);
        }
        match self.shard_capacity() {
            0 => Err(CacheError::CapacityTooSmall {
                capacity: self.capacity,
                shards: self.num_shards,
            }),
            per_shard => Ok(per_shard),
        }
    }
}

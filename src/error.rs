//! Error types for cache construction.
//!
//! Lookups and evictions never fail: a missing key is `None` and a full pool
//! simply triggers eviction. The only errors are misconfigurations caught
//! when a cache is built.

use thiserror::Error;

/// Errors returned when a cache is configured with an unusable shape.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// A cache (or a single shard) was configured with no slots.
    #[error("cache capacity cannot be zero")]
    ZeroCapacity,

    /// A sharded cache was configured with no shards.
    #[error("shard count cannot be zero")]
    ZeroShards,

    /// Splitting the capacity across shards leaves each shard with no slots.
    #[error("capacity {capacity} is too small for {shards} shards")]
    CapacityTooSmall { capacity: usize, shards: usize },
}

/// Convenience Result type for cache construction.
pub type Result<T> = std::result::Result<T, CacheError>;

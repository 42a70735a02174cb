//! A fixed-capacity LRU cache with per-entry expiry, in Rust.
//!
//! This crate provides two cache implementations:
//!
//! 1. [`LruCache`] - A thread-safe cache behind a single lock
//! 2. [`ShardedLruCache`] - Several independently locked [`LruCache`] shards for concurrent use
//!
//! # Features
//!
//! - All slots allocated up front, no allocation per operation afterwards
//! - Expired entries are evicted before live ones when space is needed
//! - Stale-checking and non-checking reads
//! - Explicit-time variants of every time-dependent operation
//! - Optional background expiry with [`Janitor`]
//!
//! # Examples
//!
//! ```rust
//! use std::time::Duration;
//! use ttl_lru_cache::{Cache, Expiry, LruCache, ShardedLruCache};
//!
//! // Create a single-lock cache for storing strings with string keys
//! let basic_cache: LruCache<String, String> = LruCache::new(1000);
//!
//! // Create a sharded cache for better concurrent performance
//! let sharded_cache: ShardedLruCache<String, String> = ShardedLruCache::new(8, 1000).unwrap();
//!
//! // You can use any type that implements Clone + Debug + Hash + Eq + Send + Sync + 'static as key
//! let cache: LruCache<u64, String> = LruCache::new(1000);
//! cache.set(42, "answer".to_string(), Expiry::after(Duration::from_secs(60)));
//! assert_eq!(cache.get(&42), Some("answer".to_string()));
//! assert_eq!(cache.get_not_stale(&42), Some("answer".to_string()));
//! ```

pub mod config;
pub mod error;
mod expiry;
mod expiry_heap;
mod ffi;
pub mod janitor;
pub mod lru_cache;
mod pool;
pub mod sharded_lru_cache;
mod slot;
mod slot_list;


pub use config::ShardedCacheConfig;
pub use error::{CacheError, Result};
pub use expiry::Expiry;
pub use janitor::Janitor;
pub use lru_cache::{Cache, LruCache};
pub use sharded_lru_cache::ShardedLruCache;

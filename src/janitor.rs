//! Background expiry.
//!
//! Caches only drop expired entries lazily: when a write needs a slot, when a
//! stale entry is read through `get_not_stale`, or when `expire` is called. A
//! [`Janitor`] calls `expire` on a fixed interval from its own thread so that
//! expired entries do not linger in an idle cache.

use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use parking_lot::{Condvar, Mutex, MutexGuard};
use tracing::{debug, trace, warn};

use crate::lru_cache::Cache;

struct Shutdown {
    stopped: Mutex<bool>,
    signal: Condvar,
}

/// Handle to a thread that periodically evicts expired entries.
///
/// The thread exits when the handle is dropped or [`stop`](Janitor::stop) is
/// called; both wait for it to finish.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use std::time::Duration;
/// use ttl_lru_cache::{Janitor, ShardedLruCache};
///
/// let cache = Arc::new(ShardedLruCache::<String, String>::new(4, 1000).unwrap());
/// let janitor = Janitor::spawn(Arc::clone(&cache), Duration::from_secs(1));
/// janitor.stop();
/// ```
pub struct Janitor {
    handle: Option<JoinHandle<()>>,
    shutdown: Arc<Shutdown>,
}

impl Janitor {
    /// Spawns a thread calling `cache.expire()` every `interval`.
    pub fn spawn<K, V, C>(cache: Arc<C>, interval: Duration) -> Self
    where
        K: Clone + Debug + Hash + Eq + Send + Sync + 'static,
        V: Clone + Debug + Send + Sync + 'static,
        C: Cache<K, V> + 'static,
    {
        let shutdown = Arc::new(Shutdown {
            stopped: Mutex::new(false),
            signal: Condvar::new(),
        });
        let thread_shutdown = Arc::clone(&shutdown);

        let handle = thread::spawn(move || {
            debug!(?interval, "janitor started");
            let mut stopped = thread_shutdown.stopped.lock();
            while !*stopped {
                thread_shutdown.signal.wait_for(&mut stopped, interval);
                if *stopped {
                    break;
                }
                MutexGuard::unlocked(&mut stopped, || {
                    let removed = cache.expire();
                    trace!(removed, "janitor tick");
                });
            }
            debug!("janitor stopped");
        });

        Self {
            handle: Some(handle),
            shutdown,
        }
    }

    /// Stops the thread and waits for it to exit.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        *self.shutdown.stopped.lock() = true;
        self.shutdown.signal.notify_all();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("janitor thread panicked");
            }
        }
    }
}

impl Drop for Janitor {
    fn drop(&mut self) {
        self.shutdown();
    }
}

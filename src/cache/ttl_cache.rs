//! Shared TTL Cache
//!
//! Thread-safe, namespace-aware handle over a `TtlStore`. This is the API
//! the rest of the service talks to: every operation is total and a cache
//! fault degrades into a miss instead of an error.

use std::sync::{Arc, Mutex};

use tokio::sync::broadcast;
use tracing::{error, warn};

use crate::cache::{CacheEvent, CacheOptions, CacheStats, EventBus, EvictionPolicy, TtlStore};
use crate::config::Config;
use crate::error::CacheError;

// == TTL Cache ==
/// Cloneable handle to one shared cache.
///
/// Values are copied in and out: `get` returns a clone, so mutating a returned
/// value never changes what is cached. Store `Arc<T>` as `V` to share instead.
#[derive(Debug)]
pub struct TtlCache<V> {
    inner: Arc<Mutex<TtlStore<V>>>,
    /// Kept outside the lock so subscribing never depends on lock health
    events: EventBus,
}

impl<V> Clone for TtlCache<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            events: self.events.clone(),
        }
    }
}

impl<V: Clone> TtlCache<V> {
    // == Constructor ==
    /// Creates a cache holding at most `max_keys` entries with a default TTL in seconds.
    pub fn new(max_keys: usize, default_ttl: i64, policy: EvictionPolicy) -> Self {
        let store = TtlStore::new(max_keys, default_ttl, policy);
        let events = store.events().clone();
        Self {
            inner: Arc::new(Mutex::new(store)),
            events,
        }
    }

    /// Creates a cache from the cache section of the service configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.max_keys, config.default_ttl, config.eviction_policy)
    }

    // == Get ==
    /// Returns the live value under `key` in the options' namespace.
    pub fn get(&self, key: &str, options: &CacheOptions) -> Option<V> {
        let full_key = options.compose(key);
        self.with_store("get", None, |store| store.get(&full_key))
    }

    // == Set ==
    /// Stores `value` under `key`. Returns `false` if the insert was refused.
    pub fn set(&self, key: &str, value: V, options: &CacheOptions) -> bool {
        let full_key = options.compose(key);
        self.with_store("set", false, |store| {
            match store.set(&full_key, value, options.ttl) {
                Ok(()) => true,
                Err(err) => {
                    warn!(key = %full_key, error = %err, "cache set refused");
                    false
                }
            }
        })
    }

    // == Delete ==
    /// Deletes each listed key in the options' namespace. Returns the count removed.
    pub fn del<I, K>(&self, keys: I, options: &CacheOptions) -> usize
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let full_keys: Vec<String> = keys
            .into_iter()
            .map(|key| options.compose(key.as_ref()))
            .collect();
        self.with_store("del", 0, |store| store.del(&full_keys))
    }

    /// Deletes a single key. Returns 1 if it existed, else 0.
    pub fn del_one(&self, key: &str, options: &CacheOptions) -> usize {
        self.del([key], options)
    }

    // == Maintenance ==
    /// Removes every expired entry. Returns the number removed.
    pub fn sweep(&self) -> usize {
        self.with_store("sweep", 0, TtlStore::sweep)
    }

    /// True if `key` currently holds a live value. Not counted as a read.
    pub fn contains(&self, key: &str, options: &CacheOptions) -> bool {
        let full_key = options.compose(key);
        self.with_store("contains", false, |store| store.contains(&full_key))
    }

    /// Remaining TTL in seconds; `Some(None)` for an entry without expiry.
    pub fn ttl_remaining(&self, key: &str, options: &CacheOptions) -> Option<Option<u64>> {
        let full_key = options.compose(key);
        self.with_store("ttl", None, |store| store.ttl_remaining(&full_key))
    }

    pub fn stats(&self) -> CacheStats {
        self.with_store("stats", CacheStats::default(), |store| store.stats())
    }

    pub fn len(&self) -> usize {
        self.with_store("len", 0, |store| store.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn max_keys(&self) -> usize {
        self.with_store("max_keys", 0, |store| store.max_keys())
    }

    // == Events ==
    /// Subscribes to lifecycle events emitted from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<CacheEvent> {
        self.events.subscribe()
    }

    // == Internals ==
    /// Runs `op` under the lock.
    ///
    /// A poisoned lock means a holder panicked mid-operation, so the store is
    /// flushed and the poison cleared. This call returns `fallback`; later
    /// calls see an empty, working cache.
    fn with_store<R>(&self, op: &str, fallback: R, f: impl FnOnce(&mut TtlStore<V>) -> R) -> R {
        match self.inner.lock() {
            Ok(mut store) => f(&mut *store),
            Err(poisoned) => {
                let err = CacheError::Internal(format!("lock poisoned during {op}"));
                let dropped = poisoned.into_inner().clear();
                self.inner.clear_poison();
                error!(error = %err, dropped, "cache flushed after fault, falling back");
                fallback
            }
        }
    }
}

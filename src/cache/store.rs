//! Cache Store Module
//!
//! Single-owner cache engine: HashMap storage with set-order tracking, TTL
//! expiry and bounded capacity. Keys here are already composed; namespacing
//! and locking live in `TtlCache`.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use tracing::warn;

use crate::cache::{
    current_timestamp_ms, CacheEntry, CacheEvent, CacheStats, EventBus, SetOrder,
    EVENT_CHANNEL_CAPACITY,
};
use crate::error::{CacheError, Result};

// == Eviction Policy ==
/// What `set` does with a new key when the store is full.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EvictionPolicy {
    /// Evict the least recently set entry. Reads do not refresh the order.
    #[default]
    EvictOldest,
    /// Drop expired entries, then refuse the insert if still full.
    RejectNew,
}

impl FromStr for EvictionPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "evict-oldest" | "evict_oldest" | "oldest" => Ok(EvictionPolicy::EvictOldest),
            "reject-new" | "reject_new" | "reject" => Ok(EvictionPolicy::RejectNew),
            other => Err(format!("unknown eviction policy: {other}")),
        }
    }
}

impl fmt::Display for EvictionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvictionPolicy::EvictOldest => write!(f, "evict-oldest"),
            EvictionPolicy::RejectNew => write!(f, "reject-new"),
        }
    }
}

// == TTL Store ==
/// Cache storage with TTL expiry, a hard key limit and lifecycle events.
#[derive(Debug)]
pub struct TtlStore<V> {
    /// Composed key -> entry
    entries: HashMap<String, CacheEntry<V>>,
    /// Set-order tracker used for eviction
    order: SetOrder,
    /// Activity counters
    stats: CacheStats,
    /// Lifecycle event fan-out
    events: EventBus,
    /// Maximum number of entries allowed
    max_keys: usize,
    /// TTL in seconds applied when a call gives none; `<= 0` = no expiry
    default_ttl: i64,
    policy: EvictionPolicy,
}

impl<V: Clone> TtlStore<V> {
    // == Constructor ==
    /// Creates a new store.
    ///
    /// # Arguments
    /// * `max_keys` - Maximum number of entries the store can hold
    /// * `default_ttl` - TTL in seconds for entries set without one
    /// * `policy` - Behavior when a new key arrives at capacity
    pub fn new(max_keys: usize, default_ttl: i64, policy: EvictionPolicy) -> Self {
        Self {
            entries: HashMap::new(),
            order: SetOrder::new(),
            stats: CacheStats::new(),
            events: EventBus::new(EVENT_CHANNEL_CAPACITY),
            max_keys,
            default_ttl,
            policy,
        }
    }

    /// The event bus this store publishes to.
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    // == Get ==
    /// Returns a copy of the live value stored under `key`.
    ///
    /// An expired entry is removed on the spot (EXPIRED) and the read misses.
    pub fn get(&mut self, key: &str) -> Option<V> {
        let now = current_timestamp_ms();

        let expired = match self.entries.get(key) {
            Some(entry) if !entry.is_expired_at(now) => {
                let value = entry.value.clone();
                self.stats.record_hit();
                self.events.emit(CacheEvent::Hit {
                    key: key.to_string(),
                });
                return Some(value);
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            self.remove_expired(key);
        }

        self.stats.record_miss();
        self.events.emit(CacheEvent::Miss {
            key: key.to_string(),
        });
        None
    }

    // == Set ==
    /// Inserts or replaces `key`, resetting its expiry.
    ///
    /// # Arguments
    /// * `key` - Composed key
    /// * `value` - Value to store
    /// * `ttl` - TTL in seconds, `None` for the store default, `<= 0` for no expiry
    ///
    /// # Errors
    /// `CacheError::CapacityExceeded` when the key is new, the store is full
    /// and the policy cannot make room.
    pub fn set(&mut self, key: &str, value: V, ttl: Option<i64>) -> Result<()> {
        let is_new = !self.entries.contains_key(key);

        if is_new && self.entries.len() >= self.max_keys {
            self.make_room()?;
        }

        let ttl = self.resolve_ttl(ttl);
        self.entries
            .insert(key.to_string(), CacheEntry::new(value, ttl));
        self.order.touch(key);

        self.stats.record_set();
        self.stats.set_keys(self.entries.len());
        self.events.emit(CacheEvent::Set {
            key: key.to_string(),
            ttl,
        });

        Ok(())
    }

    // == Delete ==
    /// Removes every listed key that exists. Returns how many were removed.
    pub fn del<I, K>(&mut self, keys: I) -> usize
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let mut removed = 0;

        for key in keys {
            let key = key.as_ref();
            if self.entries.remove(key).is_some() {
                self.order.remove(key);
                self.stats.record_delete();
                self.events.emit(CacheEvent::Deleted {
                    key: key.to_string(),
                });
                removed += 1;
            }
        }

        self.stats.set_keys(self.entries.len());
        removed
    }

    // == Sweep ==
    /// Removes all expired entries. Returns the number removed.
    pub fn sweep(&mut self) -> usize {
        let now = current_timestamp_ms();
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired_keys {
            self.remove_expired(key);
        }

        expired_keys.len()
    }

    // == Inspection ==
    /// True if `key` holds a live entry. Does not count as a read.
    pub fn contains(&self, key: &str) -> bool {
        self.entries
            .get(key)
            .is_some_and(|entry| !entry.is_expired())
    }

    /// Remaining TTL in seconds of a live entry: `Some(None)` means no expiry.
    pub fn ttl_remaining(&self, key: &str) -> Option<Option<u64>> {
        self.entries
            .get(key)
            .filter(|entry| !entry.is_expired())
            .map(CacheEntry::ttl_remaining)
    }

    /// Returns current statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_keys(self.entries.len());
        stats
    }

    /// Number of stored entries, including expired ones not yet swept.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_keys(&self) -> usize {
        self.max_keys
    }

    // == Flush ==
    /// Drops every entry without emitting events. Returns the number dropped.
    ///
    /// Counters are kept; only the key count resets.
    pub fn clear(&mut self) -> usize {
        let dropped = self.entries.len();
        self.entries.clear();
        self.order = SetOrder::new();
        self.stats.set_keys(0);
        dropped
    }

    // == Internals ==
    fn resolve_ttl(&self, requested: Option<i64>) -> Option<u64> {
        let ttl = requested.unwrap_or(self.default_ttl);
        (ttl > 0).then_some(ttl as u64)
    }

    fn remove_expired(&mut self, key: &str) {
        if self.entries.remove(key).is_some() {
            self.order.remove(key);
            self.stats.record_expiration();
            self.stats.set_keys(self.entries.len());
            self.events.emit(CacheEvent::Expired {
                key: key.to_string(),
            });
        }
    }

    /// Frees one slot for a new key according to the policy.
    fn make_room(&mut self) -> Result<()> {
        match self.policy {
            EvictionPolicy::EvictOldest => {
                let now = current_timestamp_ms();
                while self.entries.len() >= self.max_keys {
                    let Some(oldest) = self.order.evict_oldest() else {
                        return Err(self.reject());
                    };
                    match self.entries.remove(&oldest) {
                        // A victim whose TTL already elapsed counts as expired
                        Some(entry) if entry.is_expired_at(now) => {
                            self.stats.record_expiration();
                            self.events.emit(CacheEvent::Expired { key: oldest });
                        }
                        Some(_) => {
                            self.stats.record_eviction();
                            self.events.emit(CacheEvent::Evicted { key: oldest });
                        }
                        None => {}
                    }
                }
                Ok(())
            }
            EvictionPolicy::RejectNew => {
                self.sweep();
                if self.entries.len() >= self.max_keys {
                    Err(self.reject())
                } else {
                    Ok(())
                }
            }
        }
    }

    fn reject(&mut self) -> CacheError {
        self.stats.record_rejection();
        warn!(max_keys = self.max_keys, "cache full, rejecting new key");
        CacheError::CapacityExceeded {
            max_keys: self.max_keys,
        }
    }
}

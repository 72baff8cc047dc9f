//! Cache Module
//!
//! Generic in-memory cache with per-entry TTL, key namespacing, bounded
//! capacity and lifecycle events.

mod entry;
mod events;
mod key;
mod order;
mod stats;
mod store;
mod ttl_cache;


// Re-export public types
pub use entry::{current_timestamp_ms, CacheEntry};
pub use events::{CacheEvent, EventBus};
pub use key::{compose_key, CacheOptions};
pub use order::SetOrder;
pub use stats::CacheStats;
pub use store::{EvictionPolicy, TtlStore};
pub use ttl_cache::TtlCache;

// == Public Constants ==
/// TTL in seconds for entries set without one
pub const DEFAULT_TTL_SECS: i64 = 900;

/// Interval in seconds between background sweeps
pub const DEFAULT_CHECK_PERIOD_SECS: u64 = 120;

/// Maximum number of entries a cache holds
pub const DEFAULT_MAX_KEYS: usize = 10_000;

/// Events buffered per subscriber before it starts lagging
pub const EVENT_CHANNEL_CAPACITY: usize = 1024;

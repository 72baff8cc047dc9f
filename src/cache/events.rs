//! Cache Events Module
//!
//! Lifecycle notifications for cache activity. Every event is logged through
//! `tracing` and published on a broadcast channel for any number of observers
//! (metrics, audit, tests).

use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{debug, info};

// == Cache Event ==
/// A single cache lifecycle event. Events carry composed keys, never values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CacheEvent {
    /// An entry was inserted or overwritten; `ttl` is `None` for no expiry
    Set { key: String, ttl: Option<u64> },
    /// An entry was removed by `del`
    Deleted { key: String },
    /// An entry was removed because its TTL elapsed
    Expired { key: String },
    /// An entry was removed to make room for a new key
    Evicted { key: String },
    /// A read returned a live value
    Hit { key: String },
    /// A read found nothing live
    Miss { key: String },
}

impl CacheEvent {
    /// The composed key the event refers to.
    pub fn key(&self) -> &str {
        match self {
            CacheEvent::Set { key, .. }
            | CacheEvent::Deleted { key }
            | CacheEvent::Expired { key }
            | CacheEvent::Evicted { key }
            | CacheEvent::Hit { key }
            | CacheEvent::Miss { key } => key,
        }
    }

    /// Upper-case event name, as used in log lines.
    pub fn name(&self) -> &'static str {
        match self {
            CacheEvent::Set { .. } => "SET",
            CacheEvent::Deleted { .. } => "DELETED",
            CacheEvent::Expired { .. } => "EXPIRED",
            CacheEvent::Evicted { .. } => "EVICTED",
            CacheEvent::Hit { .. } => "HIT",
            CacheEvent::Miss { .. } => "MISS",
        }
    }
}

// == Event Bus ==
/// Fan-out of cache events to subscribers.
///
/// Emitting never blocks. Slow subscribers lag and lose the oldest events,
/// which they observe as `RecvError::Lagged`.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<CacheEvent>,
}

impl EventBus {
    /// Creates a bus buffering up to `capacity` events per subscriber.
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Logs the event and publishes it to current subscribers.
    pub fn emit(&self, event: CacheEvent) {
        match &event {
            CacheEvent::Set { key, ttl } => debug!(key = %key, ttl = ?ttl, "cache SET"),
            CacheEvent::Evicted { key } => info!(key = %key, "cache EVICTED"),
            other => debug!(key = %other.key(), "cache {}", other.name()),
        }

        // An error only means nobody is subscribed right now.
        let _ = self.tx.send(event);
    }

    /// Subscribes to events emitted from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<CacheEvent> {
        self.tx.subscribe()
    }
}

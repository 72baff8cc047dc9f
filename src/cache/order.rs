//! Set-Order Tracker Module
//!
//! Tracks the order in which keys were last written, for oldest-first eviction.

use std::collections::{BTreeMap, HashMap};

// == Set Order ==
/// Orders keys by their most recent `set`.
///
/// Every touch stamps the key with a fresh sequence number; the smallest
/// live sequence number is the least recently set key. Reads never touch.
#[derive(Debug, Default)]
pub struct SetOrder {
    /// Sequence number -> key, ascending = oldest first
    by_seq: BTreeMap<u64, String>,
    /// Key -> its current sequence number
    seq_of: HashMap<String, u64>,
    /// Next sequence number to hand out
    next_seq: u64,
}

impl SetOrder {
    // == Constructor ==
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    // == Touch ==
    /// Marks a key as the most recently set.
    pub fn touch(&mut self, key: &str) {
        self.remove(key);

        let seq = self.next_seq;
        self.next_seq += 1;
        self.by_seq.insert(seq, key.to_string());
        self.seq_of.insert(key.to_string(), seq);
    }

    // == Remove ==
    /// Stops tracking a key. Unknown keys are ignored.
    pub fn remove(&mut self, key: &str) {
        if let Some(seq) = self.seq_of.remove(key) {
            self.by_seq.remove(&seq);
        }
    }

    // == Evict Oldest ==
    /// Removes and returns the least recently set key.
    pub fn evict_oldest(&mut self) -> Option<String> {
        let (_, key) = self.by_seq.pop_first()?;
        self.seq_of.remove(&key);
        Some(key)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_new() {
        let mut order = SetOrder::new();
        assert_eq!(order.evict_oldest(), None);
    }

    #[test]
    fn test_first_touched_is_oldest() {
        let mut order = SetOrder::new();

        order.touch("key1");
        order.touch("key2");
        order.touch("key3");

        assert_eq!(order.evict_oldest().as_deref(), Some("key1"));
        assert_eq!(order.evict_oldest().as_deref(), Some("key2"));
    }

    #[test]
    fn test_retouch_moves_to_newest() {
        let mut order = SetOrder::new();

        order.touch("a");
        order.touch("b");
        order.touch("c");
        order.touch("a");

        assert_eq!(order.evict_oldest().as_deref(), Some("b"));
        assert_eq!(order.evict_oldest().as_deref(), Some("c"));
        assert_eq!(order.evict_oldest().as_deref(), Some("a"));
        assert_eq!(order.evict_oldest(), None);
    }

    #[test]
    fn test_remove() {
        let mut order = SetOrder::new();

        order.touch("key1");
        order.touch("key2");
        order.remove("key1");
        order.remove("nonexistent");

        assert_eq!(order.evict_oldest().as_deref(), Some("key2"));
        assert_eq!(order.evict_oldest(), None);
    }

    #[test]
    fn test_touch_same_key_repeatedly() {
        let mut order = SetOrder::new();

        order.touch("key1");
        order.touch("key1");
        order.touch("key1");

        assert_eq!(order.evict_oldest().as_deref(), Some("key1"));
        assert_eq!(order.evict_oldest(), None);
    }
}

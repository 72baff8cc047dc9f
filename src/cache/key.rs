//! Key Namespacing Module
//!
//! Per-call options and the composition of logical keys into store keys.

// == Cache Options ==
/// Per-call options accepted by `get`, `set` and `del`.
///
/// `ttl` is only consulted by `set`. A `prefix` namespaces the logical key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheOptions {
    /// TTL override in seconds; `<= 0` stores the entry without expiry
    pub ttl: Option<i64>,
    /// Namespace prefix; empty is treated as no prefix
    pub prefix: Option<String>,
}

impl CacheOptions {
    /// Options with neither TTL override nor prefix.
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for options carrying only a prefix.
    pub fn prefixed(prefix: impl Into<String>) -> Self {
        Self::new().with_prefix(prefix)
    }

    /// Sets the TTL override in seconds.
    pub fn with_ttl(mut self, ttl: i64) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Sets the namespace prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Composes `key` under these options' prefix.
    pub fn compose(&self, key: &str) -> String {
        compose_key(key, self.prefix.as_deref())
    }
}

// == Key Composition ==
/// Builds the store key: `prefix:key` with a non-empty prefix, else `key`.
pub fn compose_key(key: &str, prefix: Option<&str>) -> String {
    match prefix {
        Some(prefix) if !prefix.is_empty() => format!("{prefix}:{key}"),
        _ => key.to_string(),
    }
}

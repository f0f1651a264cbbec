//! Bounded FIFO cache for validated guidance results.
//!
//! Keyed by a deterministic fingerprint of normalized user text, matched
//! pattern identity, and locale. Eviction is strict FIFO (oldest-inserted
//! first), not LRU: entries are never mutated after insertion and there is
//! no time-based expiry. Only validated, post-repair results are stored.
//!
//! The cache is an explicitly constructed object shared via `Arc` and
//! injected into the engine, so tests supply isolated instances.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use tracing::debug;

use crate::validate::GenerationResult;

/// Sentinel used in fingerprints when no catalog pattern matched.
pub const NO_MATCH_SENTINEL: &str = "no-match";

/// Default maximum entry count, matching the original deployment's bound.
pub const DEFAULT_CACHE_CAPACITY: usize = 1000;

/// Computes the cache fingerprint for a request.
///
/// User text is lower-cased with internal whitespace collapsed and trimmed;
/// the matched pattern id (or [`NO_MATCH_SENTINEL`]) and the locale code are
/// appended. Locale-sensitive by design: the same situation in two locales
/// is two distinct entries.
pub fn fingerprint(user_text: &str, pattern_id: Option<&str>, locale: &str) -> String {
    let normalized = user_text
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    format!(
        "{}::{}::{}",
        normalized,
        pattern_id.unwrap_or(NO_MATCH_SENTINEL),
        locale
    )
}

struct CacheInner {
    map: HashMap<String, GenerationResult>,
    /// Insertion order for FIFO eviction.
    order: VecDeque<String>,
}

/// Shared, capacity-bounded guidance cache.
pub struct GuidanceCache {
    capacity: usize,
    inner: Mutex<CacheInner>,
}

impl GuidanceCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            inner: Mutex::new(CacheInner {
                map: HashMap::new(),
                order: VecDeque::new(),
            }),
        }
    }

    pub fn with_default_capacity() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.inner.lock().map(|g| g.map.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, key: &str) -> Option<GenerationResult> {
        let guard = self.inner.lock().ok()?;
        guard.map.get(key).cloned()
    }

    /// Inserts a validated result, evicting the single oldest-inserted entry
    /// when the cache is at capacity. Re-inserting an existing key replaces
    /// the value and keeps the original insertion position (second write
    /// wins on value, not on age).
    pub fn put(&self, key: String, value: GenerationResult) {
        if self.capacity == 0 {
            return;
        }
        let Ok(mut guard) = self.inner.lock() else {
            return;
        };
        if guard.map.contains_key(&key) {
            guard.map.insert(key, value);
            return;
        }
        if guard.map.len() >= self.capacity {
            if let Some(oldest) = guard.order.pop_front() {
                guard.map.remove(&oldest);
                debug!(evicted = %oldest, "guidance cache full; evicted oldest entry");
            }
        }
        guard.order.push_back(key.clone());
        guard.map.insert(key, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::{GenerationResult, Quotation};

    fn result(tag: &str) -> GenerationResult {
        GenerationResult {
            pattern_name: tag.to_string(),
            insight: "i".to_string(),
            mythological_summary: "m".to_string(),
            philosophical_explanation: "p".to_string(),
            guidance_steps: vec!["s".to_string()],
            quotation: Quotation {
                original_text: "o".to_string(),
                english_translation: "e".to_string(),
                locale_translation: "l".to_string(),
            },
        }
    }

    #[test]
    fn fingerprint_normalizes_whitespace_and_case() {
        let a = fingerprint("  I feel   TORN  ", Some("crossroads"), "en");
        let b = fingerprint("i feel torn", Some("crossroads"), "en");
        assert_eq!(a, b);
    }

    #[test]
    fn fingerprint_is_locale_and_pattern_sensitive() {
        let base = fingerprint("i feel torn", Some("crossroads"), "en");
        assert_ne!(base, fingerprint("i feel torn", Some("crossroads"), "hi"));
        assert_ne!(base, fingerprint("i feel torn", None, "en"));
        assert!(fingerprint("x", None, "en").contains(NO_MATCH_SENTINEL));
    }

    #[test]
    fn fifo_eviction_removes_exactly_the_first_inserted() {
        let cache = GuidanceCache::new(3);
        for i in 0..4 {
            cache.put(format!("key-{i}"), result(&format!("r{i}")));
        }
        assert_eq!(cache.len(), 3);
        assert!(cache.get("key-0").is_none());
        for i in 1..4 {
            assert!(cache.get(&format!("key-{i}")).is_some(), "key-{i} retained");
        }
    }

    #[test]
    fn reinsert_replaces_value_without_growing() {
        let cache = GuidanceCache::new(2);
        cache.put("k".to_string(), result("first"));
        cache.put("k".to_string(), result("second"));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("k").map(|r| r.pattern_name), Some("second".to_string()));
    }

    #[test]
    fn zero_capacity_stores_nothing() {
        let cache = GuidanceCache::new(0);
        cache.put("k".to_string(), result("r"));
        assert!(cache.get("k").is_none());
        assert!(cache.is_empty());
    }
}

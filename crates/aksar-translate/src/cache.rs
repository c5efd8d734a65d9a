// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-memory translation cache.
//
// Keyed by language pair and the SHA-256 of the source text. Bounded with LRU
// eviction: a lookup refreshes the entry. Nothing is written to disk.

use std::num::NonZeroUsize;
use std::sync::Mutex;

use lru::LruCache;
use sha2::{Digest, Sha256};
use tracing::debug;

/// Default number of cached translations.
pub const DEFAULT_CAPACITY: usize = 256;

/// Identity of one translation request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub source: String,
    pub target: String,
    /// Hex-encoded SHA-256 of the source text.
    pub digest: String,
}

impl CacheKey {
    pub fn new(source: &str, target: &str, text: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(text.as_bytes());
        Self {
            source: source.to_owned(),
            target: target.to_owned(),
            digest: hex::encode(hasher.finalize()),
        }
    }
}

/// Thread-safe bounded LRU cache of translated text.
pub struct TranslationCache {
    /// `None` when caching is disabled.
    entries: Option<Mutex<LruCache<CacheKey, String>>>,
}

impl Default for TranslationCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl TranslationCache {
    /// A capacity of zero disables caching.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: NonZeroUsize::new(capacity).map(|size| Mutex::new(LruCache::new(size))),
        }
    }

    pub fn capacity(&self) -> usize {
        self.entries
            .as_ref()
            .and_then(|entries| entries.lock().ok().map(|cache| cache.cap().get()))
            .unwrap_or(0)
    }

    /// Look up a translation and mark it most recently used.
    pub fn get(&self, key: &CacheKey) -> Option<String> {
        let mut cache = self.entries.as_ref()?.lock().ok()?;
        cache.get(key).cloned()
    }

    pub fn insert(&self, key: CacheKey, translated: String) {
        let Some(entries) = &self.entries else {
            return;
        };
        if let Ok(mut cache) = entries.lock() {
            if let Some((evicted, _)) = cache.push(key.clone(), translated) {
                if evicted != key {
                    debug!(source = %evicted.source, target = %evicted.target, "evicted cached translation");
                }
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries
            .as_ref()
            .and_then(|entries| entries.lock().ok().map(|cache| cache.len()))
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(text: &str) -> CacheKey {
        CacheKey::new("en", "km", text)
    }

    #[test]
    fn key_depends_on_pair_and_text() {
        let a = CacheKey::new("km", "en", "សួស្តី");
        assert_eq!(a, CacheKey::new("km", "en", "សួស្តី"));
        assert_ne!(a, CacheKey::new("en", "km", "សួស្តី"));
        assert_ne!(a, CacheKey::new("km", "en", "សួស្តី "));
        assert_eq!(a.digest.len(), 64);
    }

    #[test]
    fn stores_and_returns_translation() {
        let cache = TranslationCache::default();
        let key = CacheKey::new("km", "en", "ក");
        assert!(cache.get(&key).is_none());
        cache.insert(key.clone(), "ka".into());
        assert_eq!(cache.get(&key).as_deref(), Some("ka"));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.capacity(), DEFAULT_CAPACITY);
    }

    #[test]
    fn evicts_least_recently_used_when_full() {
        let cache = TranslationCache::new(2);
        cache.insert(key("one"), "1".into());
        cache.insert(key("two"), "2".into());
        cache.insert(key("three"), "3".into());

        assert!(cache.get(&key("one")).is_none());
        assert_eq!(cache.get(&key("two")).as_deref(), Some("2"));
        assert_eq!(cache.get(&key("three")).as_deref(), Some("3"));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn recently_read_entry_survives_eviction() {
        let cache = TranslationCache::new(2);
        cache.insert(key("page one"), "a".into());
        cache.insert(key("page two"), "b".into());
        assert_eq!(cache.get(&key("page one")).as_deref(), Some("a"));

        cache.insert(key("page three"), "c".into());

        assert_eq!(cache.get(&key("page one")).as_deref(), Some("a"));
        assert!(cache.get(&key("page two")).is_none());
        assert_eq!(cache.get(&key("page three")).as_deref(), Some("c"));
    }

    #[test]
    fn reinserting_replaces_value() {
        let cache = TranslationCache::new(2);
        cache.insert(key("hi"), "old".into());
        cache.insert(key("hi"), "new".into());
        assert_eq!(cache.get(&key("hi")).as_deref(), Some("new"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn zero_capacity_never_stores() {
        let cache = TranslationCache::new(0);
        cache.insert(key("hi"), "x".into());
        assert!(cache.is_empty());
        assert!(cache.get(&key("hi")).is_none());
        assert_eq!(cache.capacity(), 0);
    }
}

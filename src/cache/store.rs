use hashbrown::HashMap as FastHashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::matcher::Bindings;

use super::translator::{CacheKey, KeyTranslator};

/// Result of a cached match attempt. `NoMatch` is an explicit sentinel so a
/// confirmed miss is as cheap to replay as a confirmed hit.
#[derive(Debug, Clone, PartialEq)]
pub enum CachedOutcome {
    Match(Bindings),
    NoMatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CacheStamp {
    translator: u64,
    generation: u64,
}

/// Integer-keyed value cache stamped with the translator epoch it was
/// built against. Any access under a newer stamp drops the whole store
/// before proceeding, so stale keys can never resolve.
#[derive(Debug)]
pub struct DataCache<V> {
    stamp: Option<CacheStamp>,
    entries: FastHashMap<CacheKey, V>,
}

impl<V> DataCache<V> {
    pub fn new() -> Self {
        Self {
            stamp: None,
            entries: FastHashMap::new(),
        }
    }

    pub fn lookup(&mut self, translator: &KeyTranslator, pathname: &str) -> Option<&V> {
        let key = translator.key_for(pathname)?;
        self.sync(translator);
        self.entries.get(&key)
    }

    pub fn store(&mut self, translator: &KeyTranslator, pathname: &str, value: V) {
        let Some(key) = translator.key_for(pathname) else {
            return;
        };
        self.sync(translator);
        self.entries.insert(key, value);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The key is requested before this runs, so a capacity flush triggered
    /// by that very request is already visible here.
    fn sync(&mut self, translator: &KeyTranslator) {
        let current = CacheStamp {
            translator: translator.id(),
            generation: translator.generation(),
        };
        if self.stamp != Some(current) {
            self.entries.clear();
            self.stamp = Some(current);
        }
    }
}

impl<V> Default for DataCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Default)]
pub struct CacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
}

impl CacheStats {
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> (u64, u64) {
        (
            self.hits.load(Ordering::Relaxed),
            self.misses.load(Ordering::Relaxed),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn survives_within_one_generation() {
        let translator = KeyTranslator::new();
        let mut cache = DataCache::new();
        cache.store(&translator, "/a", 1u32);

        assert_eq!(cache.lookup(&translator, "/a"), Some(&1));
    }

    #[test]
    fn clears_itself_when_the_translator_flushes() {
        let translator = KeyTranslator::with_capacity(2);
        let mut cache = DataCache::new();
        cache.store(&translator, "/a", 1u32);
        translator.key_for("/b").unwrap();

        // Third distinct pathname flushes the translator; the stale store
        // must not resolve "/c" through a recycled key.
        assert_eq!(cache.lookup(&translator, "/c"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn distrusts_a_different_translator_instance() {
        let first = KeyTranslator::new();
        let second = KeyTranslator::new();
        let mut cache = DataCache::new();
        cache.store(&first, "/a", 1u32);

        second.key_for("/b").unwrap();
        assert_eq!(cache.lookup(&second, "/a"), None);
    }

    #[test]
    fn ignores_uncacheable_pathnames() {
        let translator = KeyTranslator::new();
        let mut cache = DataCache::new();
        let long = format!("/{}", "y".repeat(300));

        cache.store(&translator, &long, 1u32);
        assert!(cache.is_empty());
        assert_eq!(cache.lookup(&translator, &long), None);
    }
}

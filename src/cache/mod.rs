mod store;
mod translator;

pub use store::{CacheStats, CachedOutcome, DataCache};
pub use translator::{CacheKey, KeyTranslator, MAX_CACHEABLE_PATH_LEN, TRANSLATOR_CAPACITY};

use parking_lot::Mutex;
use std::sync::Arc;

use crate::path::parse_pathname;
use crate::segment::ParsedPath;

/// Process-wide cache state: the key translator plus the shared
/// parsed-path cache. Constructed once at startup and injected by shared
/// reference into every router that should share it; never a lazily
/// created global.
#[derive(Debug)]
pub struct SharedCaches {
    translator: KeyTranslator,
    paths: Mutex<DataCache<Arc<ParsedPath>>>,
    path_stats: CacheStats,
}

impl SharedCaches {
    pub fn new() -> Self {
        Self {
            translator: KeyTranslator::new(),
            paths: Mutex::new(DataCache::new()),
            path_stats: CacheStats::default(),
        }
    }

    pub fn translator(&self) -> &KeyTranslator {
        &self.translator
    }

    /// (hits, misses) of the shared parsed-path cache.
    pub fn path_metrics(&self) -> (u64, u64) {
        self.path_stats.snapshot()
    }

    /// Parses a pathname through the shared cache. Only the whole parsed
    /// result is memoized, keyed by the exact input string.
    pub fn parse(&self, pathname: &str) -> Arc<ParsedPath> {
        let mut paths = self.paths.lock();
        if let Some(hit) = paths.lookup(&self.translator, pathname) {
            self.path_stats.record_hit();
            return Arc::clone(hit);
        }

        self.path_stats.record_miss();
        let parsed = Arc::new(parse_pathname(pathname));
        paths.store(&self.translator, pathname, Arc::clone(&parsed));
        parsed
    }
}

impl Default for SharedCaches {
    fn default() -> Self {
        Self::new()
    }
}

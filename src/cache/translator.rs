use hashbrown::HashMap as FastHashMap;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

/// Pathnames longer than this are never cached; `key_for` reports them as
/// not cacheable.
pub const MAX_CACHEABLE_PATH_LEN: usize = 255;

/// Distinct-key limit. Reaching it drops the whole translator (both
/// tables) and advances the generation: a full flush, not an LRU.
pub const TRANSLATOR_CAPACITY: usize = 10_000;

pub type CacheKey = u32;

static NEXT_TRANSLATOR_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Default)]
struct TranslatorState {
    map: FastHashMap<Box<str>, CacheKey>,
    rev: Vec<Box<str>>,
}

/// Translates pathname strings to small stable integer keys and back, so
/// downstream caches never retain arbitrarily many pathname strings as map
/// keys. Every flush epoch is observable through `generation`.
#[derive(Debug)]
pub struct KeyTranslator {
    id: u64,
    capacity: usize,
    generation: AtomicU64,
    state: RwLock<TranslatorState>,
}

impl KeyTranslator {
    pub fn new() -> Self {
        Self::with_capacity(TRANSLATOR_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            id: NEXT_TRANSLATOR_ID.fetch_add(1, Ordering::Relaxed),
            capacity: capacity.max(1),
            generation: AtomicU64::new(0),
            state: RwLock::new(TranslatorState::default()),
        }
    }

    /// Process-unique identity, letting a cache detect it was handed a
    /// different translator instance.
    #[inline]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Returns the stable key for a pathname, allocating one on first
    /// sight. `None` means the pathname is not cacheable.
    pub fn key_for(&self, pathname: &str) -> Option<CacheKey> {
        if pathname.len() > MAX_CACHEABLE_PATH_LEN {
            return None;
        }

        if let Some(key) = self.state.read().map.get(pathname).copied() {
            return Some(key);
        }

        let mut state = self.state.write();
        if let Some(&key) = state.map.get(pathname) {
            return Some(key);
        }

        if state.rev.len() >= self.capacity {
            state.map.clear();
            state.rev.clear();
            let generation = self.generation.fetch_add(1, Ordering::Release) + 1;
            tracing::event!(
                tracing::Level::DEBUG,
                operation = "translator_flush",
                generation = generation,
                capacity = self.capacity as u64,
            );
        }

        let key = state.rev.len() as CacheKey;
        let boxed = pathname.to_string().into_boxed_str();
        state.rev.push(boxed.clone());
        state.map.insert(boxed, key);
        Some(key)
    }

    /// Reverse lookup for a previously issued key; `None` after a flush.
    pub fn pathname(&self, key: CacheKey) -> Option<String> {
        self.state
            .read()
            .rev
            .get(key as usize)
            .map(|pathname| pathname.to_string())
    }

    pub fn len(&self) -> usize {
        self.state.read().rev.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for KeyTranslator {
    fn default() -> Self {
        Self::new()
    }
}

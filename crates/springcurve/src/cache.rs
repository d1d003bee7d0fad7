//! Spring caches
//!
//! Two bounded LRU stores share one identity key per `(from, to, config)`:
//! one holds the live integrator behind easing functions, the other the
//! sampled frame sequence. Each identity is simulated and sampled at most
//! once while it stays cached.

use lru::LruCache;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use crate::config::{PartialSpringConfig, SpringConfig};
use crate::error::{Result, SpringError};
use crate::frames::FrameSequence;
use crate::handle::SpringHandle;
use crate::spring::SpringIntegrator;

/// Default number of identities each store keeps
pub const DEFAULT_CACHE_CAPACITY: usize = 256;

/// An integrator shared between a cache and the handles it gave out
pub type SharedIntegrator = Arc<Mutex<SpringIntegrator>>;

/// Frame sequences are filled at most once per slot
type FrameSlot = Arc<OnceLock<Arc<FrameSequence>>>;

static GLOBAL_CACHE: OnceLock<SpringCache> = OnceLock::new();

/// Configure the process-wide cache used by [`crate::spring`]
///
/// Must run before the first spring is created through the global entry
/// point; afterwards the cache already exists and this returns an error.
pub fn init_global_cache(config: CacheConfig) -> Result<()> {
    let cache = SpringCache::new(config)?;
    GLOBAL_CACHE
        .set(cache)
        .map_err(|_| SpringError::GlobalCacheInitialized)
}

/// The process-wide cache, created with default settings on first use
pub fn global_cache() -> &'static SpringCache {
    GLOBAL_CACHE.get_or_init(SpringCache::default)
}

/// Cache sizing
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum identities held by each store
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

fn default_capacity() -> usize {
    DEFAULT_CACHE_CAPACITY
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

/// Identity of a simulation: `"{from}-{to}-{mass},{tension},{friction},{precision}"`
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SpringKey(String);

impl SpringKey {
    pub fn new(from: f64, to: f64, config: &SpringConfig) -> Self {
        // Adding zero folds -0.0 into 0.0 so both print as "0"
        Self(format!(
            "{}-{}-{},{},{},{}",
            from + 0.0,
            to + 0.0,
            config.mass + 0.0,
            config.tension + 0.0,
            config.friction + 0.0,
            config.precision + 0.0
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SpringKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Statistics about a spring cache
#[derive(Clone, Debug, Default)]
pub struct CacheStats {
    /// Number of cached integrators
    pub springs: usize,
    /// Number of cached frame sequences (including ones still sampling)
    pub frame_sequences: usize,
    /// Lookups answered from either store
    pub hits: u64,
    /// Lookups that had to create an entry
    pub misses: u64,
    pub capacity: usize,
}

impl CacheStats {
    /// Get the hit rate (0.0 to 1.0)
    pub fn hit_rate(&self) -> f32 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f32 / total as f32
        }
    }
}

struct CacheInner {
    springs: LruCache<SpringKey, SharedIntegrator>,
    frames: LruCache<SpringKey, FrameSlot>,
    hits: u64,
    misses: u64,
}

/// Bounded store of spring integrators and their sampled frames
///
/// Safe to share between threads. The store lock is only held for lookups;
/// sampling runs outside it, and concurrent requests for the same identity
/// wait for a single sampling pass.
pub struct SpringCache {
    inner: Mutex<CacheInner>,
    capacity: NonZeroUsize,
}

impl SpringCache {
    /// Create a cache from its configuration
    pub fn new(config: CacheConfig) -> Result<Self> {
        let capacity = NonZeroUsize::new(config.capacity).ok_or(SpringError::ZeroCapacity)?;
        Ok(Self::with_capacity(capacity))
    }

    pub fn with_capacity(capacity: NonZeroUsize) -> Self {
        Self {
            inner: Mutex::new(CacheInner {
                springs: LruCache::new(capacity),
                frames: LruCache::new(capacity),
                hits: 0,
                misses: 0,
            }),
            capacity,
        }
    }

    fn lock(&self) -> MutexGuard<'_, CacheInner> {
        // Entries stay consistent across a panicking holder
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Create (or reuse) a spring from `from` to `to`
    pub fn spring(
        &self,
        from: f64,
        to: f64,
        config: impl Into<PartialSpringConfig>,
    ) -> SpringHandle {
        let partial: PartialSpringConfig = config.into();
        let config = partial.normalize();
        let key = SpringKey::new(from, to, &config);

        let integrator = self.integrator(&key, from, to, config);
        let frames = self.frames(&key, from, to, config);

        SpringHandle::new(key, integrator, frames)
    }

    /// Get or create the shared integrator for `key`
    pub fn integrator(
        &self,
        key: &SpringKey,
        from: f64,
        to: f64,
        config: SpringConfig,
    ) -> SharedIntegrator {
        let mut inner = self.lock();

        let cached = inner.springs.get(key).cloned();
        if let Some(integrator) = cached {
            inner.hits += 1;
            tracing::trace!(%key, "Spring cache hit");
            return integrator;
        }

        inner.misses += 1;
        tracing::debug!(%key, "Creating spring integrator");
        let integrator = Arc::new(Mutex::new(SpringIntegrator::new(from, to, config)));
        inner.springs.put(key.clone(), Arc::clone(&integrator));
        integrator
    }

    /// Get or sample the frame sequence for `key`
    ///
    /// Sampling drives its own integrator, leaving the shared one untouched.
    pub fn frames(
        &self,
        key: &SpringKey,
        from: f64,
        to: f64,
        config: SpringConfig,
    ) -> Arc<FrameSequence> {
        let slot = {
            let mut inner = self.lock();
            let cached = inner.frames.get(key).cloned();
            match cached {
                Some(slot) => {
                    inner.hits += 1;
                    tracing::trace!(%key, "Frame cache hit");
                    slot
                }
                None => {
                    inner.misses += 1;
                    let slot = FrameSlot::default();
                    inner.frames.put(key.clone(), Arc::clone(&slot));
                    slot
                }
            }
        };

        Arc::clone(slot.get_or_init(|| {
            tracing::debug!(%key, "Sampling spring frames");
            let mut sampler = SpringIntegrator::new(from, to, config);
            Arc::new(FrameSequence::sample(&mut sampler))
        }))
    }

    /// Check if an identity has a cached integrator
    pub fn contains(&self, key: &SpringKey) -> bool {
        self.lock().springs.contains(key)
    }

    /// Maximum identities held by each store
    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    pub fn stats(&self) -> CacheStats {
        let inner = self.lock();
        CacheStats {
            springs: inner.springs.len(),
            frame_sequences: inner.frames.len(),
            hits: inner.hits,
            misses: inner.misses,
            capacity: self.capacity.get(),
        }
    }

    /// Drop every cached entry and reset statistics
    ///
    /// Handles already given out keep their integrator and frames.
    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.springs.clear();
        inner.frames.clear();
        inner.hits = 0;
        inner.misses = 0;
    }
}

impl Default for SpringCache {
    fn default() -> Self {
        Self::with_capacity(
            NonZeroUsize::new(DEFAULT_CACHE_CAPACITY).unwrap_or(NonZeroUsize::MIN),
        )
    }
}

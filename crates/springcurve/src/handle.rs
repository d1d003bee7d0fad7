//! Spring handles
//!
//! A `SpringHandle` is what callers get back for a `(from, to, config)`
//! request. It exposes the spring two ways: as a continuous easing function
//! over the cached integrator, and as the pre-sampled keyframes.

use std::sync::{Arc, PoisonError};

use crate::cache::{SharedIntegrator, SpringKey};
use crate::frames::FrameSequence;
use crate::spring::SpringState;

/// A cached spring, ready to be played back
#[derive(Clone)]
pub struct SpringHandle {
    key: SpringKey,
    integrator: SharedIntegrator,
    frames: Arc<FrameSequence>,
}

impl SpringHandle {
    pub(crate) fn new(
        key: SpringKey,
        integrator: SharedIntegrator,
        frames: Arc<FrameSequence>,
    ) -> Self {
        Self {
            key,
            integrator,
            frames,
        }
    }

    /// Identity shared by every handle for the same spring
    pub fn key(&self) -> &SpringKey {
        &self.key
    }

    /// Sampled playback duration in milliseconds
    pub fn duration(&self) -> f64 {
        self.frames.duration()
    }

    pub fn frames(&self) -> &Arc<FrameSequence> {
        &self.frames
    }

    /// Current state of the shared integrator
    pub fn state(&self) -> SpringState {
        self.integrator
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .state()
    }

    /// Return an easing function and the sampled duration
    ///
    /// The function advances the cached integrator, which every handle for
    /// the same identity shares: each call continues from wherever the last
    /// call left the spring, advancing it by `t` milliseconds.
    pub fn to_easing_function(&self) -> (impl Fn(f64) -> f64 + Send + Sync + 'static, f64) {
        let integrator = Arc::clone(&self.integrator);
        let easing = move |t: f64| {
            integrator
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .advance(t)
        };
        (easing, self.duration())
    }

    /// Return named keyframes and the sampled duration
    pub fn to_keyframes(&self, name: &str) -> (Keyframes, f64) {
        let keyframes = Keyframes {
            name: name.to_string(),
            frames: Arc::clone(&self.frames),
        };
        (keyframes, self.duration())
    }
}

impl std::fmt::Debug for SpringHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpringHandle")
            .field("key", &self.key)
            .field("duration", &self.duration())
            .field("frames", &self.frames.len())
            .finish()
    }
}

/// Named frame data for a presentation layer to render
#[derive(Clone, Debug)]
pub struct Keyframes {
    name: String,
    frames: Arc<FrameSequence>,
}

impl Keyframes {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn frames(&self) -> &Arc<FrameSequence> {
        &self.frames
    }

    /// Frames paired with their fraction of the sequence, from 0.0 to 1.0
    pub fn offsets(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        let last = self.frames.len().saturating_sub(1).max(1) as f64;
        self.frames
            .frames()
            .iter()
            .enumerate()
            .map(move |(i, &position)| (i as f64 / last, position))
    }
}

#[cfg(test)]
mod tests {
    use crate::cache::{CacheConfig, SpringCache};
    use crate::config::PartialSpringConfig;

    fn cache() -> SpringCache {
        SpringCache::new(CacheConfig::default()).unwrap()
    }

    #[test]
    fn test_easing_function_starts_at_from() {
        let cache = cache();
        let handle = cache.spring(0.0, 100.0, PartialSpringConfig::default());
        let (ease, duration) = handle.to_easing_function();

        assert!(duration > 0.0);
        assert_eq!(ease(0.0), 0.0);
        assert!((ease(duration) - 100.0).abs() <= 0.001);
        assert!(handle.state().done);
    }

    #[test]
    fn test_easing_functions_share_integrator() {
        let cache = cache();
        let a = cache.spring(0.0, 100.0, PartialSpringConfig::default());
        let b = cache.spring(0.0, 100.0, PartialSpringConfig::default());

        let (ease_a, _) = a.to_easing_function();
        let first = ease_a(16.0);
        assert!(first > 0.0);
        assert_eq!(b.state().position, first);
    }

    #[test]
    fn test_keyframes_offsets() {
        let cache = cache();
        let handle = cache.spring(0.0, 1.0, PartialSpringConfig::default());
        let (keyframes, duration) = handle.to_keyframes("slide-in");

        assert_eq!(keyframes.name(), "slide-in");
        assert_eq!(duration, handle.duration());

        let offsets: Vec<(f64, f64)> = keyframes.offsets().collect();
        assert_eq!(offsets.len(), handle.frames().len());
        assert_eq!(offsets.first().map(|o| o.0), Some(0.0));
        assert_eq!(offsets.last().map(|o| o.0), Some(1.0));
        assert_eq!(offsets.last().map(|o| o.1), handle.frames().last());
    }

    #[test]
    fn test_single_frame_offsets() {
        let cache = cache();
        let handle = cache.spring(2.0, 2.0, PartialSpringConfig::default());
        let (keyframes, _) = handle.to_keyframes("noop");

        let offsets: Vec<(f64, f64)> = keyframes.offsets().collect();
        assert_eq!(offsets, vec![(0.0, 2.0)]);
    }
}

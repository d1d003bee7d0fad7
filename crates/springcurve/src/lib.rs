//! Springcurve
//!
//! Damped spring motion curves between two scalar values, exposed either as
//! a continuous easing function or as pre-sampled keyframes.
//!
//! # Features
//!
//! - **Spring Physics**: fixed-step Euler springs with tension, friction, mass
//! - **Frame Sampling**: positions recorded at a fixed cadence until the spring rests
//! - **Caching**: bounded LRU stores so each `(from, to, config)` is simulated once
//! - **Partial Configs**: unset fields fall back to documented defaults
//!
//! ```ignore
//! use springcurve::{spring, PartialSpringConfig};
//!
//! let handle = spring(0.0, 100.0, PartialSpringConfig::new().tension(210.0));
//! let (ease, duration) = handle.to_easing_function();
//! let (keyframes, _) = handle.to_keyframes("slide-in");
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod frames;
pub mod handle;
pub mod spring;

pub use cache::{
    global_cache, init_global_cache, CacheConfig, CacheStats, SharedIntegrator, SpringCache,
    SpringKey, DEFAULT_CACHE_CAPACITY,
};
pub use config::{normalize, PartialSpringConfig, SpringConfig, SpringSettings};
pub use error::{Result, SpringError};
pub use frames::{FrameSequence, FRAME, ITERATION_LIMIT};
pub use handle::{Keyframes, SpringHandle};
pub use spring::{SpringIntegrator, SpringState, STEP_MS};

/// Create (or reuse) a spring from `from` to `to` in the process-wide cache
///
/// Missing config fields take their defaults. Requests with the same
/// endpoints and normalized config share one integrator and one sampling
/// pass.
pub fn spring(from: f64, to: f64, config: impl Into<PartialSpringConfig>) -> SpringHandle {
    global_cache().spring(from, to, config)
}

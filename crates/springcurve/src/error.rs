//! Error types for springcurve

use thiserror::Error;

/// Errors raised while configuring springs and their caches
///
/// The numeric core never fails; these only surface when loading settings
/// or setting up a cache.
#[derive(Error, Debug)]
pub enum SpringError {
    /// Settings text was not valid TOML or did not match the schema
    #[error("Failed to parse spring settings: {0}")]
    Settings(#[from] toml::de::Error),

    /// A cache was requested with room for nothing
    #[error("Cache capacity must be greater than zero")]
    ZeroCapacity,

    /// The process-wide cache was configured after it was already in use
    #[error("Global spring cache is already initialized")]
    GlobalCacheInitialized,
}

/// Result type for springcurve operations
pub type Result<T> = std::result::Result<T, SpringError>;

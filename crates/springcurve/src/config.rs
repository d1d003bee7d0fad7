//! Spring configuration
//!
//! `SpringConfig` is the complete set of physical parameters a simulation
//! runs with. Callers usually supply a `PartialSpringConfig` instead and let
//! [`normalize`] fill the gaps with the documented defaults.

use serde::{Deserialize, Serialize};

use crate::cache::CacheConfig;
use crate::error::Result;

/// Default mass of the moving body
pub const DEFAULT_MASS: f64 = 1.0;
/// Default spring stiffness
pub const DEFAULT_TENSION: f64 = 170.0;
/// Default damping coefficient
pub const DEFAULT_FRICTION: f64 = 26.0;
/// Default settling distance
pub const DEFAULT_PRECISION: f64 = 0.001;

/// Configuration for a spring simulation
///
/// Tension and friction are expressed per second; the integrator rescales
/// them to millisecond steps. A `precision` of `0.0` means "derive the
/// settling distance from the distance travelled".
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpringConfig {
    pub mass: f64,
    pub tension: f64,
    pub friction: f64,
    pub precision: f64,
}

impl SpringConfig {
    /// Create a new spring configuration with the default precision
    pub fn new(tension: f64, friction: f64, mass: f64) -> Self {
        Self {
            mass,
            tension,
            friction,
            precision: DEFAULT_PRECISION,
        }
    }

    /// Replace the settling distance
    pub fn with_precision(mut self, precision: f64) -> Self {
        self.precision = precision;
        self
    }

    /// A gentle, slow spring (good for page transitions)
    pub fn gentle() -> Self {
        Self::new(120.0, 14.0, 1.0)
    }

    /// A wobbly spring with visible overshoot
    pub fn wobbly() -> Self {
        Self::new(180.0, 12.0, 1.0)
    }

    /// A stiff, snappy spring
    pub fn stiff() -> Self {
        Self::new(210.0, 20.0, 1.0)
    }

    /// A slow spring that barely overshoots
    pub fn slow() -> Self {
        Self::new(280.0, 60.0, 1.0)
    }

    /// A heavily damped spring that crawls into place
    pub fn molasses() -> Self {
        Self::new(280.0, 120.0, 1.0)
    }

    /// Friction at which this spring's tension and mass stop oscillating
    pub fn critical_friction(&self) -> f64 {
        2.0 * (self.tension * self.mass).sqrt()
    }

    /// Check if the spring is underdamped (will oscillate)
    pub fn is_underdamped(&self) -> bool {
        self.friction < self.critical_friction()
    }

    /// Check if the spring is critically damped (no oscillation, fastest settling)
    pub fn is_critically_damped(&self) -> bool {
        (self.friction - self.critical_friction()).abs() < 0.01
    }

    /// Check if the spring is overdamped (slow settling, no oscillation)
    pub fn is_overdamped(&self) -> bool {
        self.friction > self.critical_friction()
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            mass: DEFAULT_MASS,
            tension: DEFAULT_TENSION,
            friction: DEFAULT_FRICTION,
            precision: DEFAULT_PRECISION,
        }
    }
}

/// A spring configuration where any field may be left out
///
/// Absent fields are `None`. An explicit `Some(0.0)` is kept as zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartialSpringConfig {
    pub mass: Option<f64>,
    pub tension: Option<f64>,
    pub friction: Option<f64>,
    pub precision: Option<f64>,
}

impl PartialSpringConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mass(mut self, mass: f64) -> Self {
        self.mass = Some(mass);
        self
    }

    pub fn tension(mut self, tension: f64) -> Self {
        self.tension = Some(tension);
        self
    }

    pub fn friction(mut self, friction: f64) -> Self {
        self.friction = Some(friction);
        self
    }

    pub fn precision(mut self, precision: f64) -> Self {
        self.precision = Some(precision);
        self
    }

    /// Fill every absent field with its default
    pub fn normalize(&self) -> SpringConfig {
        normalize(self)
    }
}

impl From<SpringConfig> for PartialSpringConfig {
    fn from(config: SpringConfig) -> Self {
        Self {
            mass: Some(config.mass),
            tension: Some(config.tension),
            friction: Some(config.friction),
            precision: Some(config.precision),
        }
    }
}

impl From<Option<PartialSpringConfig>> for PartialSpringConfig {
    fn from(config: Option<PartialSpringConfig>) -> Self {
        config.unwrap_or_default()
    }
}

/// Complete a partial configuration with the documented defaults
pub fn normalize(partial: &PartialSpringConfig) -> SpringConfig {
    SpringConfig {
        mass: partial.mass.unwrap_or(DEFAULT_MASS),
        tension: partial.tension.unwrap_or(DEFAULT_TENSION),
        friction: partial.friction.unwrap_or(DEFAULT_FRICTION),
        precision: partial.precision.unwrap_or(DEFAULT_PRECISION),
    }
}

/// Settings file contents
///
/// ```toml
/// [spring]
/// tension = 210
/// friction = 20
///
/// [cache]
/// capacity = 512
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SpringSettings {
    /// Defaults applied to springs created from these settings
    #[serde(default)]
    pub spring: PartialSpringConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

impl SpringSettings {
    /// Parse settings from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let settings: SpringSettings = toml::from_str(content)?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_fills_defaults() {
        let config = normalize(&PartialSpringConfig::default());
        assert_eq!(config, SpringConfig::default());
        assert_eq!(config.mass, 1.0);
        assert_eq!(config.tension, 170.0);
        assert_eq!(config.friction, 26.0);
        assert_eq!(config.precision, 0.001);
    }

    #[test]
    fn test_normalize_keeps_explicit_zero() {
        let config = PartialSpringConfig::new()
            .tension(0.0)
            .friction(0.0)
            .precision(0.0)
            .normalize();

        assert_eq!(config.tension, 0.0);
        assert_eq!(config.friction, 0.0);
        assert_eq!(config.precision, 0.0);
        assert_eq!(config.mass, DEFAULT_MASS);
    }

    #[test]
    fn test_partial_from_complete_round_trips() {
        let config = SpringConfig::wobbly();
        assert_eq!(PartialSpringConfig::from(config).normalize(), config);
    }

    #[test]
    fn test_spring_presets() {
        // The default tuning sits just under critical damping
        assert!(SpringConfig::default().is_underdamped());
        assert!(SpringConfig::wobbly().is_underdamped());
        assert!(SpringConfig::gentle().is_underdamped());
        assert!(SpringConfig::stiff().is_underdamped());

        assert!(SpringConfig::slow().is_overdamped());
        assert!(SpringConfig::molasses().is_overdamped());
    }

    #[test]
    fn test_critical_damping() {
        let config = SpringConfig::new(100.0, 20.0, 1.0);
        assert_eq!(config.critical_friction(), 20.0);
        assert!(config.is_critically_damped());
        assert!(!config.is_underdamped());
        assert!(!config.is_overdamped());
    }

    #[test]
    fn test_settings_from_toml() {
        let settings = SpringSettings::from_toml_str(
            r#"
            [spring]
            tension = 210.0
            friction = 0.0

            [cache]
            capacity = 32
            "#,
        )
        .unwrap();

        assert_eq!(settings.spring.tension, Some(210.0));
        assert_eq!(settings.spring.friction, Some(0.0));
        assert_eq!(settings.spring.mass, None);
        assert_eq!(settings.cache.capacity, 32);
    }

    #[test]
    fn test_settings_tables_are_optional() {
        let settings = SpringSettings::from_toml_str("").unwrap();
        assert_eq!(settings, SpringSettings::default());
    }

    #[test]
    fn test_settings_reject_bad_types() {
        let err = SpringSettings::from_toml_str("[spring]\ntension = \"tight\"\n");
        assert!(err.is_err());
    }
}

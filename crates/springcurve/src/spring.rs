//! Spring physics
//!
//! Fixed-step forward Euler integration of a scalar damped spring between
//! two endpoints. Each call to [`SpringIntegrator::advance`] continues from
//! the stored position and velocity in 1ms steps.

use crate::config::SpringConfig;

/// Length of one integration step, in milliseconds
pub const STEP_MS: f64 = 1.0;

/// Settling distance used when the spring starts at its target
const SAME_ENDPOINT_PRECISION: f64 = 0.005;

/// Snapshot of an integrator's mutable state
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringState {
    pub position: f64,
    /// `None` until the integrator has advanced at least once
    pub velocity: Option<f64>,
    pub done: bool,
}

/// A stateful spring simulation from `from` to `to`
///
/// Once `done` is set the integrator is permanently at rest and every
/// further advance returns `to`.
#[derive(Clone, Debug)]
pub struct SpringIntegrator {
    from: f64,
    to: f64,
    config: SpringConfig,
    last_position: f64,
    last_velocity: Option<f64>,
    v0: Option<f64>,
    done: bool,
}

impl SpringIntegrator {
    pub fn new(from: f64, to: f64, config: SpringConfig) -> Self {
        Self {
            from,
            to,
            config,
            last_position: from,
            last_velocity: None,
            v0: None,
            done: false,
        }
    }

    /// Seed the first advance with an initial velocity (units per ms)
    pub fn with_initial_velocity(mut self, v0: f64) -> Self {
        self.v0 = Some(v0);
        self
    }

    pub fn from(&self) -> f64 {
        self.from
    }

    pub fn to(&self) -> f64 {
        self.to
    }

    pub fn config(&self) -> &SpringConfig {
        &self.config
    }

    pub fn position(&self) -> f64 {
        self.last_position
    }

    pub fn velocity(&self) -> Option<f64> {
        self.last_velocity
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn state(&self) -> SpringState {
        SpringState {
            position: self.last_position,
            velocity: self.last_velocity,
            done: self.done,
        }
    }

    /// The distance from `to` below which the spring counts as settled
    pub fn precision(&self) -> f64 {
        if self.config.precision != 0.0 {
            self.config.precision
        } else if self.from == self.to {
            SAME_ENDPOINT_PRECISION
        } else {
            ((self.to - self.from).abs() * 0.001).min(1.0)
        }
    }

    /// Integrate forward by `dt` milliseconds and return the new position
    ///
    /// `dt` is rounded up to whole steps; zero or negative values only
    /// report the current position.
    pub fn advance(&mut self, dt: f64) -> f64 {
        if self.done {
            return self.to;
        }

        let config = self.config;
        let to = self.to;
        let mut position = self.last_position;

        // Loose springs never move
        if config.tension <= 0.0 {
            self.done = true;
            return position;
        }

        let precision = self.precision();
        let rest_velocity = precision / 10.0;
        let mut velocity = self.last_velocity.or(self.v0).unwrap_or(0.0);
        let mut finished = false;

        // NaN and negative durations saturate to zero steps
        let steps = (dt / STEP_MS).ceil().max(0.0) as u64;

        for _ in 0..steps {
            let is_moving = velocity.abs() > rest_velocity;
            if !is_moving && (to - position).abs() <= precision {
                finished = true;
                break;
            }

            // Coefficients are tuned per second; scale to ms and ms^2
            let spring_force = -config.tension * 0.000001 * (position - to);
            let damping_force = -config.friction * 0.001 * velocity;
            let acceleration = (spring_force + damping_force) / config.mass;

            velocity += acceleration * STEP_MS;
            position += velocity * STEP_MS;
        }

        self.last_velocity = Some(velocity);
        self.last_position = position;

        if !position.is_finite() {
            tracing::warn!(
                from = self.from,
                to,
                ?config,
                position,
                "Spring produced a non-finite position, forcing it to rest"
            );
            finished = true;
        }

        if finished {
            self.done = true;
        }

        position
    }
}

//! Frame sampling
//!
//! Drives a spring at a fixed cadence and records every position it
//! reports until it comes to rest.

use crate::spring::SpringIntegrator;

/// Sampling cadence, in the same time base as [`SpringIntegrator::advance`]
pub const FRAME: f64 = 1.0 / 6.0;

/// Upper bound on sampling iterations for springs that never settle
pub const ITERATION_LIMIT: u32 = 100_000;

/// Positions sampled from a spring, with the total playback duration
#[derive(Clone, Debug, PartialEq)]
pub struct FrameSequence {
    duration: f64,
    frames: Vec<f64>,
    settled: bool,
}

impl FrameSequence {
    /// Sample `spring` until it is done or the iteration limit is reached
    ///
    /// Every iteration passes the accumulated elapsed time to `advance`, so
    /// later frames cover progressively more simulated steps. Once the
    /// spring is done no further frames are recorded, but the loop keeps
    /// counting to the limit; the duration reflects the full count.
    pub fn sample(spring: &mut SpringIntegrator) -> Self {
        let mut frames = Vec::new();
        let mut elapsed = 0.0;

        for _ in 1..ITERATION_LIMIT {
            elapsed += FRAME;
            if !spring.is_done() {
                frames.push(spring.advance(elapsed));
            }
        }

        let settled = spring.is_done();
        if !settled {
            tracing::debug!(
                from = spring.from(),
                to = spring.to(),
                frames = frames.len(),
                "Spring did not settle within the sampling limit, keeping truncated frames"
            );
        }

        // `elapsed` is already in frame units; kept as-is for duration parity
        let duration = elapsed * FRAME * 1000.0;

        Self {
            duration,
            frames,
            settled,
        }
    }

    /// Total playback duration in milliseconds
    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn frames(&self) -> &[f64] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn last(&self) -> Option<f64> {
        self.frames.last().copied()
    }

    /// Whether the spring came to rest before sampling stopped
    pub fn settled(&self) -> bool {
        self.settled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SpringConfig;

    #[test]
    fn test_sampling_stops_recording_at_rest() {
        let mut spring = SpringIntegrator::new(0.0, 100.0, SpringConfig::default());
        let sequence = FrameSequence::sample(&mut spring);

        assert!(sequence.settled());
        assert!(spring.is_done());
        assert!(!sequence.is_empty());
        assert!(sequence.len() < ITERATION_LIMIT as usize);

        let last = sequence.last().unwrap();
        assert!((last - 100.0).abs() <= 0.001);
    }

    #[test]
    fn test_duration_counts_every_iteration() {
        let mut spring = SpringIntegrator::new(0.0, 1.0, SpringConfig::stiff());
        let sequence = FrameSequence::sample(&mut spring);

        let mut elapsed = 0.0;
        for _ in 1..ITERATION_LIMIT {
            elapsed += FRAME;
        }
        assert_eq!(sequence.duration(), elapsed * FRAME * 1000.0);
    }

    #[test]
    fn test_frames_advance_by_accumulated_time() {
        let config = SpringConfig::default();
        let mut sampled = SpringIntegrator::new(0.0, 100.0, config);
        let sequence = FrameSequence::sample(&mut sampled);

        // Replay the first few calls by hand
        let mut manual = SpringIntegrator::new(0.0, 100.0, config);
        let mut elapsed = 0.0;
        for frame in sequence.frames().iter().take(20) {
            elapsed += FRAME;
            assert_eq!(manual.advance(elapsed), *frame);
        }
    }

    #[test]
    fn test_loose_spring_has_single_frame() {
        let mut spring = SpringIntegrator::new(4.0, 8.0, SpringConfig::new(0.0, 26.0, 1.0));
        let sequence = FrameSequence::sample(&mut spring);

        assert_eq!(sequence.frames(), &[4.0]);
        assert!(sequence.settled());
    }

    #[test]
    fn test_runaway_spring_terminates() {
        // Explicit Euler blows up when tension outpaces the step size
        let config = SpringConfig::new(5_000_000.0, 0.0, 1.0);
        let mut spring = SpringIntegrator::new(0.0, 1.0, config);
        let sequence = FrameSequence::sample(&mut spring);

        assert!(spring.is_done());
        assert!(!sequence.last().unwrap().is_finite());
    }

    #[test]
    #[ignore = "samples the full iteration limit, slow in debug builds"]
    fn test_unsettled_spring_truncates_at_limit() {
        // Far below what f64 rounding near the target can reach
        let config = SpringConfig::default().with_precision(1e-300);
        let mut spring = SpringIntegrator::new(0.0, 100.0, config);
        let sequence = FrameSequence::sample(&mut spring);

        assert!(!sequence.settled());
        assert!(!spring.is_done());
        assert_eq!(sequence.len(), (ITERATION_LIMIT - 1) as usize);

        let last = sequence.last().unwrap();
        assert!(last.is_finite());
        assert!((last - 100.0).abs() < 1e-6);
    }
}

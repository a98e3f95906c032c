//! Time management utilities
//!
//! The host measures wall-clock frame time however it likes and hands the
//! raw delta to [`FrameClock::advance`]. The clock clamps it and splits it
//! into the fixed number of sub-steps the integrator runs.

/// Clamped frame timing for the fixed sub-step integrator
#[derive(Debug, Clone)]
pub struct FrameClock {
    max_frame_delta: f32,
    substeps: u32,
    frame_delta: f32,
    simulated_time: f64,
    frame_count: u64,
}

/// Timing for one simulated frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStep {
    /// Raw delta reported by the host (seconds, never negative)
    pub frame_delta: f32,
    /// Delta after clamping to the configured maximum
    pub clamped_delta: f32,
    /// Size of each sub-step
    pub substep_delta: f32,
    /// Number of sub-steps to run
    pub substeps: u32,
}

impl FrameClock {
    /// Create a clock that caps frames at `max_frame_delta` and splits them into `substeps`
    pub fn new(max_frame_delta: f32, substeps: u32) -> Self {
        Self {
            max_frame_delta,
            substeps: substeps.max(1),
            frame_delta: 0.0,
            simulated_time: 0.0,
            frame_count: 0,
        }
    }

    /// Sub-step size for a raw frame delta: `min(max_frame_delta, delta) / substeps`
    ///
    /// Negative and non-finite deltas count as zero.
    pub fn substep_delta(&self, frame_delta: f32) -> f32 {
        self.clamp(frame_delta) / self.substeps as f32
    }

    fn clamp(&self, frame_delta: f32) -> f32 {
        if frame_delta.is_finite() {
            frame_delta.clamp(0.0, self.max_frame_delta)
        } else {
            0.0
        }
    }

    /// Record a new frame and return its sub-step layout
    pub fn advance(&mut self, frame_delta: f32) -> FrameStep {
        let clamped_delta = self.clamp(frame_delta);
        self.frame_delta = if frame_delta.is_finite() { frame_delta.max(0.0) } else { 0.0 };
        self.simulated_time += f64::from(clamped_delta);
        self.frame_count += 1;

        FrameStep {
            frame_delta: self.frame_delta,
            clamped_delta,
            substep_delta: clamped_delta / self.substeps as f32,
            substeps: self.substeps,
        }
    }

    /// Raw delta of the last frame
    pub fn frame_delta(&self) -> f32 {
        self.frame_delta
    }

    /// Total simulated time (sum of clamped deltas)
    pub fn simulated_time(&self) -> f64 {
        self.simulated_time
    }

    /// Number of frames advanced so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Sub-steps per frame
    pub fn substeps(&self) -> u32 {
        self.substeps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_long_frame_is_clamped() {
        let mut clock = FrameClock::new(0.05, 5);
        let step = clock.advance(1.0);

        assert_eq!(step.clamped_delta, 0.05);
        assert_eq!(step.substep_delta, 0.05 / 5.0);
        assert_eq!(step.substeps, 5);
        assert_eq!(clock.frame_delta(), 1.0);
    }

    #[test]
    fn test_short_frame_passes_through() {
        let clock = FrameClock::new(0.05, 5);
        assert_eq!(clock.substep_delta(0.01), 0.01 / 5.0);
    }

    #[test]
    fn test_bad_deltas_count_as_zero() {
        let mut clock = FrameClock::new(0.05, 5);
        assert_eq!(clock.substep_delta(-1.0), 0.0);
        assert_eq!(clock.advance(f32::NAN).substep_delta, 0.0);
        assert_eq!(clock.frame_count(), 1);
    }

    #[test]
    fn test_simulated_time_accumulates_clamped_deltas() {
        let mut clock = FrameClock::new(0.05, 5);
        clock.advance(0.02);
        clock.advance(3.0);
        assert!((clock.simulated_time() - 0.07).abs() < 1e-6);
    }
}

//! Fixed timestep for driving the farm from variable frame times.

/// Most fixed steps taken for a single frame.
const MAX_STEPS_PER_FRAME: u32 = 10;

/// Splits frame deltas into fixed simulation steps.
#[derive(Debug, Clone)]
pub struct FixedStep {
    /// Length of one step in real seconds
    step: f32,
    /// Time not yet consumed by a step
    accumulator: f32,
}

impl FixedStep {
    /// Create a timestep of `step` real seconds.
    #[must_use]
    pub fn new(step: f32) -> Self {
        let step = if step.is_finite() && step > 0.0 {
            step
        } else {
            1.0 / 30.0
        };
        Self {
            step,
            accumulator: 0.0,
        }
    }

    /// Length of one step.
    #[must_use]
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Accumulate a frame delta.
    /// Returns the number of fixed steps to run.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        if !frame_dt.is_finite() || frame_dt <= 0.0 {
            return 0;
        }
        self.accumulator += frame_dt;
        let mut count = 0;

        while self.accumulator >= self.step && count < MAX_STEPS_PER_FRAME {
            self.accumulator -= self.step;
            count += 1;
        }

        // Still behind after the cap: drop the backlog
        if self.accumulator > self.step * 2.0 {
            self.accumulator = 0.0;
        }

        count
    }
}

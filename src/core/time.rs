//! Fixed-step timing

/// Fixed-step simulation clock.
///
/// Real frame time is accumulated and handed out as whole physics steps of
/// `step` seconds, so the simulation advances identically regardless of the
/// render rate.
#[derive(Clone, Debug)]
pub struct SimClock {
    step: f32,
    accumulator: f32,
    /// Upper bound on steps per frame; frames slower than this drop time.
    max_steps_per_frame: u32,
    tick_count: u64,
    elapsed: f64,
}

impl SimClock {
    /// Create a clock that produces steps of `step` seconds
    pub fn new(step: f32) -> Self {
        Self {
            step,
            accumulator: 0.0,
            max_steps_per_frame: 8,
            tick_count: 0,
            elapsed: 0.0,
        }
    }

    /// Set the per-frame step cap
    pub fn with_max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps_per_frame = max_steps.max(1);
        self
    }

    /// Feed one frame's worth of real time. Returns how many fixed steps to run.
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.max(0.0);

        let mut steps = 0;
        while self.accumulator >= self.step && steps < self.max_steps_per_frame {
            self.accumulator -= self.step;
            steps += 1;
        }

        if steps == self.max_steps_per_frame && self.accumulator >= self.step {
            log::debug!(
                "Simulation falling behind, dropping {:.3}s",
                self.accumulator
            );
            self.accumulator = 0.0;
        }

        self.tick_count += steps as u64;
        self.elapsed += (steps as f32 * self.step) as f64;
        steps
    }

    /// Fixed step length in seconds
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Total fixed steps handed out
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Simulated seconds elapsed
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Fraction of a step left in the accumulator, for render interpolation
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.step
    }
}

impl Default for SimClock {
    fn default() -> Self {
        Self::new(1.0 / 60.0)
    }
}

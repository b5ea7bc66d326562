//! Fixed timestep accumulator
//!
//! Hosts call `ticks_due` with real elapsed time each frame and run that many
//! `Engine::step()` calls. Physics is defined per tick, so the outcome of a shot
//! never depends on the host frame rate.

use crate::consts::{MAX_FRAME_DELTA, MAX_SUBSTEPS, SIM_DT};

#[derive(Debug, Clone)]
pub struct FixedStep {
    dt: f32,
    max_substeps: u32,
    accumulator: f32,
}

impl Default for FixedStep {
    fn default() -> Self {
        Self::new(SIM_DT, MAX_SUBSTEPS)
    }
}

impl FixedStep {
    pub fn new(dt: f32, max_substeps: u32) -> Self {
        Self {
            dt,
            max_substeps,
            accumulator: 0.0,
        }
    }

    /// Bank `elapsed` seconds and return how many ticks to run now
    pub fn ticks_due(&mut self, elapsed: f32) -> u32 {
        if !elapsed.is_finite() || elapsed <= 0.0 {
            return 0;
        }
        self.accumulator += elapsed.min(MAX_FRAME_DELTA);

        let mut ticks = 0;
        while self.accumulator >= self.dt && ticks < self.max_substeps {
            self.accumulator -= self.dt;
            ticks += 1;
        }
        ticks
    }

    /// Fraction of a tick left in the accumulator, for render interpolation
    pub fn alpha(&self) -> f32 {
        (self.accumulator / self.dt).clamp(0.0, 1.0)
    }

    /// Drop banked time (after a pause or tab switch)
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

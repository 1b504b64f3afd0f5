use crate::error::Result;
use crate::grid::CellChange;
use crate::simulation::engine::SimulationEngine;

/// Steps advanced per animation frame
pub const DEFAULT_STEPS_PER_FRAME: usize = 10;

/// Drives an engine from an external clock.
///
/// Each `tick` carries the caller's timestamp in milliseconds. A batch
/// runs only while playing and once `interval_ms` has elapsed since the
/// previous batch.
#[derive(Clone, Debug)]
pub struct FrameClock {
    interval_ms: f64,
    steps_per_frame: usize,
    playing: bool,
    last_ms: f64,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(0.0, DEFAULT_STEPS_PER_FRAME)
    }
}

impl FrameClock {
    /// Paused clock
    pub fn new(interval_ms: f64, steps_per_frame: usize) -> Self {
        Self {
            interval_ms: interval_ms.max(0.0),
            steps_per_frame,
            playing: false,
            last_ms: 0.0,
        }
    }

    pub fn play(&mut self) {
        self.playing = true;
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// Flip play/pause, returning the new state
    pub fn toggle(&mut self) -> bool {
        self.playing = !self.playing;
        self.playing
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn set_interval(&mut self, interval_ms: f64) {
        self.interval_ms = interval_ms.max(0.0);
    }

    pub fn interval(&self) -> f64 {
        self.interval_ms
    }

    pub fn set_steps_per_frame(&mut self, steps: usize) {
        self.steps_per_frame = steps;
    }

    pub fn steps_per_frame(&self) -> usize {
        self.steps_per_frame
    }

    /// Run one batch if due; `None` when paused or early.
    ///
    /// A failed batch still counts as a frame. Its error carries the
    /// changes applied before the failure.
    pub fn tick(
        &mut self,
        now_ms: f64,
        engine: &mut SimulationEngine,
    ) -> Result<Option<Vec<CellChange>>> {
        if !self.playing || now_ms - self.last_ms < self.interval_ms {
            return Ok(None);
        }
        let result = engine.step_n(self.steps_per_frame);
        self.last_ms = now_ms;
        result.map(Some)
    }
}

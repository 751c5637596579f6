//! Display refresh to simulation frame conversion
//!
//! The display callback fires at whatever rate the device refreshes. The
//! simulation runs at a fixed 60 frames per second, so elapsed wall time is
//! accumulated and paid out as whole frames.

use crate::consts::{FRAME_MS, MAX_SUBSTEPS};

#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    /// Timestamp of the previous callback (ms), None right after a reset
    last_time: Option<f64>,
    /// Unspent wall time (ms)
    accumulator: f64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of simulation frames to run for a callback at `now_ms`
    ///
    /// The first callback after a reset runs exactly one frame. Backlog beyond
    /// `MAX_SUBSTEPS` frames is dropped rather than caught up.
    pub fn advance(&mut self, now_ms: f64) -> u32 {
        let Some(last) = self.last_time.replace(now_ms) else {
            self.accumulator = 0.0;
            return 1;
        };

        let elapsed = (now_ms - last).max(0.0);
        self.accumulator += elapsed;

        let mut steps = 0;
        while self.accumulator >= FRAME_MS && steps < MAX_SUBSTEPS {
            self.accumulator -= FRAME_MS;
            steps += 1;
        }
        if steps == MAX_SUBSTEPS && self.accumulator >= FRAME_MS {
            log::debug!("Dropping {:.1}ms of frame backlog", self.accumulator);
            self.accumulator = 0.0;
        }
        steps
    }

    /// Forget the elapsed-time baseline (call on pause and resume)
    pub fn reset_baseline(&mut self) {
        self.last_time = None;
        self.accumulator = 0.0;
    }
}

//! Pass detection and score bookkeeping

use super::pipes::Pipe;

/// Counts pipes the player has fully cleared
#[derive(Debug, Clone, Default)]
pub struct ScoreTracker {
    score: u64,
}

impl ScoreTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    /// Score every pipe whose right edge is behind the player
    ///
    /// The `scored` flag makes this idempotent: re-running it over the same
    /// pipes never counts one twice. Returns the number of newly passed pipes.
    pub fn update(&mut self, pipes: &mut [Pipe], player_x: f32) -> u32 {
        let mut passed = 0;
        for pipe in pipes.iter_mut().filter(|p| !p.scored && p.right() < player_x) {
            pipe.scored = true;
            passed += 1;
        }
        if passed > 0 {
            self.score += u64::from(passed);
            log::debug!("Passed {} pipe(s), score {}", passed, self.score);
        }
        passed
    }

    pub fn reset(&mut self) {
        self.score = 0;
    }
}

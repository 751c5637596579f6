//! Pipe generation, scrolling and retirement
//!
//! Pipes spawn at the right edge on a fixed frame cadence with the gap center
//! drawn from a seeded RNG, so a seed fully determines the course.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, SimError};
use crate::tuning::Tuning;

/// A top/bottom pipe pair with a passable gap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pipe {
    /// Left edge
    pub x: f32,
    pub width: f32,
    /// Vertical center of the gap
    pub gap_y: f32,
    pub gap_height: f32,
    /// Set once the player has fully passed this pipe
    pub scored: bool,
}

impl Pipe {
    /// Height of the top section (from y = 0 to the gap)
    #[inline]
    pub fn top_height(&self) -> f32 {
        self.gap_y - self.gap_height / 2.0
    }

    /// Y where the bottom section starts
    #[inline]
    pub fn bottom_y(&self) -> f32 {
        self.gap_y + self.gap_height / 2.0
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Check the fields collision math depends on
    pub fn validate(&self) -> Result<(), SimError> {
        if !self.x.is_finite() || !self.gap_y.is_finite() || !self.gap_height.is_finite() {
            return Err(SimError::InvariantViolation(format!(
                "pipe has non-finite geometry: {:?}",
                self
            )));
        }
        if !(self.width > 0.0) || !(self.gap_height > 0.0) {
            return Err(SimError::InvariantViolation(format!(
                "pipe has non-positive size: {:?}",
                self
            )));
        }
        Ok(())
    }
}

/// Spawns, scrolls and retires pipes
#[derive(Debug, Clone)]
pub struct PipeGenerator {
    canvas_width: f32,
    width: f32,
    gap_height: f32,
    spawn_interval: u64,
    min_gap_y: f32,
    max_gap_y: f32,
    /// Playing frames since the last reset
    frame_count: u64,
    /// Live pipes, oldest (leftmost) first
    pipes: Vec<Pipe>,
    rng: Pcg32,
}

impl PipeGenerator {
    /// Build a generator, rejecting canvases too short for a gap range
    pub fn new(
        canvas_width: f32,
        canvas_height: f32,
        tuning: &Tuning,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        if !canvas_width.is_finite()
            || !canvas_height.is_finite()
            || canvas_width <= 0.0
            || canvas_height <= 0.0
        {
            return Err(ConfigError::InvalidDimensions {
                width: canvas_width,
                height: canvas_height,
            });
        }

        let min = tuning.min_canvas_height();
        if canvas_height <= min {
            return Err(ConfigError::EmptyGapRange {
                height: canvas_height,
                min,
            });
        }

        Ok(Self {
            canvas_width,
            width: tuning.pipe_width,
            gap_height: tuning.pipe_gap,
            spawn_interval: tuning.spawn_interval,
            min_gap_y: tuning.min_gap_y,
            max_gap_y: canvas_height - tuning.gap_bottom_margin,
            frame_count: 0,
            pipes: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
        })
    }

    pub fn pipes(&self) -> &[Pipe] {
        &self.pipes
    }

    pub fn pipes_mut(&mut self) -> &mut [Pipe] {
        &mut self.pipes
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Inclusive range the gap center is drawn from
    pub fn gap_range(&self) -> (f32, f32) {
        (self.min_gap_y, self.max_gap_y)
    }

    /// Append one pipe at the right edge of the canvas
    pub fn generate_pipe(&mut self) -> &Pipe {
        let gap_y = self.rng.random_range(self.min_gap_y..=self.max_gap_y);
        log::debug!("Spawning pipe at frame {} with gap_y {:.1}", self.frame_count, gap_y);
        self.pipes.push(Pipe {
            x: self.canvas_width,
            width: self.width,
            gap_y,
            gap_height: self.gap_height,
            scored: false,
        });
        &self.pipes[self.pipes.len() - 1]
    }

    /// Scroll every pipe left and drop those fully off-screen
    pub fn update_pipes(&mut self, scroll_speed: f32) {
        for pipe in &mut self.pipes {
            pipe.x -= scroll_speed;
        }
        // retain is stable, relative order survives
        self.pipes.retain(|p| p.x >= -p.width);
    }

    /// One playing frame: count, scroll, retire, then spawn on the cadence
    pub fn advance(&mut self, scroll_speed: f32) {
        self.frame_count += 1;
        self.update_pipes(scroll_speed);
        if self.frame_count.is_multiple_of(self.spawn_interval) {
            self.generate_pipe();
        }
    }

    /// Clear all pipes and the frame counter
    pub fn reset(&mut self) {
        self.pipes.clear();
        self.frame_count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn generator(height: f32) -> PipeGenerator {
        PipeGenerator::new(400.0, height, &Tuning::default(), 42).unwrap()
    }

    #[test]
    fn test_gap_range_for_600() {
        let g = generator(600.0);
        assert_eq!(g.gap_range(), (100.0, 350.0));
    }

    #[test]
    fn test_rejects_short_canvas() {
        let err = PipeGenerator::new(400.0, 350.0, &Tuning::default(), 1).unwrap_err();
        assert_eq!(
            err,
            ConfigError::EmptyGapRange {
                height: 350.0,
                min: 350.0
            }
        );
        assert!(PipeGenerator::new(400.0, 351.0, &Tuning::default(), 1).is_ok());
    }

    #[test]
    fn test_rejects_invalid_dimensions() {
        assert!(matches!(
            PipeGenerator::new(0.0, 600.0, &Tuning::default(), 1),
            Err(ConfigError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            PipeGenerator::new(400.0, f32::NAN, &Tuning::default(), 1),
            Err(ConfigError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_generate_pipe_at_right_edge() {
        let mut g = generator(600.0);
        let pipe = g.generate_pipe().clone();
        assert_eq!(pipe.x, 400.0);
        assert_eq!(pipe.width, 60.0);
        assert_eq!(pipe.gap_height, 150.0);
        assert!(!pipe.scored);
        assert_eq!(pipe.top_height(), pipe.gap_y - 75.0);
        assert_eq!(pipe.bottom_y(), pipe.gap_y + 75.0);
    }

    #[test]
    fn test_pipe_past_left_edge_is_removed() {
        let mut g = generator(600.0);
        g.generate_pipe();
        g.generate_pipe();
        g.pipes_mut()[0].x = -59.0;
        g.pipes_mut()[1].x = 200.0;

        g.update_pipes(2.0);
        // -61 < -60
        assert_eq!(g.pipes().len(), 1);
        assert_eq!(g.pipes()[0].x, 198.0);
    }

    #[test]
    fn test_pipe_exactly_at_minus_width_is_kept() {
        let mut g = generator(600.0);
        g.generate_pipe();
        g.pipes_mut()[0].x = -58.0;
        g.update_pipes(2.0);
        assert_eq!(g.pipes().len(), 1);
    }

    #[test]
    fn test_retirement_preserves_order() {
        let mut g = generator(600.0);
        for _ in 0..4 {
            g.generate_pipe();
        }
        let xs = [-100.0, 50.0, -80.0, 300.0];
        for (pipe, x) in g.pipes_mut().iter_mut().zip(xs) {
            pipe.x = x;
        }
        g.update_pipes(0.0);
        let remaining: Vec<f32> = g.pipes().iter().map(|p| p.x).collect();
        assert_eq!(remaining, vec![50.0, 300.0]);
    }

    #[test]
    fn test_spawn_cadence() {
        let mut g = generator(600.0);
        for _ in 0..119 {
            g.advance(2.0);
        }
        assert!(g.pipes().is_empty());
        g.advance(2.0);
        assert_eq!(g.pipes().len(), 1);
        assert_eq!(g.pipes()[0].x, 400.0);

        for _ in 0..120 {
            g.advance(2.0);
        }
        assert_eq!(g.pipes().len(), 2);
        assert_eq!(g.frame_count(), 240);
    }

    #[test]
    fn test_reset_clears_pipes_and_counter() {
        let mut g = generator(600.0);
        for _ in 0..250 {
            g.advance(2.0);
        }
        g.reset();
        assert!(g.pipes().is_empty());
        assert_eq!(g.frame_count(), 0);
    }

    #[test]
    fn test_same_seed_same_course() {
        let mut a = generator(600.0);
        let mut b = generator(600.0);
        for _ in 0..10 {
            assert_eq!(a.generate_pipe().gap_y, b.generate_pipe().gap_y);
        }
    }

    #[test]
    fn test_validate_rejects_malformed_pipe() {
        let pipe = Pipe {
            x: 10.0,
            width: 60.0,
            gap_y: f32::NAN,
            gap_height: 150.0,
            scored: false,
        };
        assert!(matches!(pipe.validate(), Err(SimError::InvariantViolation(_))));

        let pipe = Pipe {
            gap_y: 200.0,
            width: 0.0,
            ..pipe
        };
        assert!(pipe.validate().is_err());
    }

    #[test]
    fn test_gap_bounds_across_random_heights() {
        let mut seed_rng = Pcg32::seed_from_u64(7);
        for i in 0..1000u64 {
            let height = seed_rng.random_range(400.0f32..2000.0);
            let mut g = PipeGenerator::new(400.0, height, &Tuning::default(), i).unwrap();
            for _ in 0..5 {
                let gap_y = g.generate_pipe().gap_y;
                assert!(gap_y >= 100.0, "gap_y {gap_y} below minimum");
                assert!(gap_y <= height - 250.0, "gap_y {gap_y} above {}", height - 250.0);
            }
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(1000))]

        #[test]
        fn prop_gap_within_bounds(height in 400.0f32..4000.0, seed in any::<u64>()) {
            let mut g = PipeGenerator::new(400.0, height, &Tuning::default(), seed).unwrap();
            let gap_y = g.generate_pipe().gap_y;
            prop_assert!(gap_y >= 100.0);
            prop_assert!(gap_y <= height - 250.0);
        }
    }

    proptest! {
        #[test]
        fn prop_len_changes_only_by_retire_and_spawn(frames in 1u64..1500) {
            let mut g = generator(600.0);
            for _ in 0..frames {
                let before = g.pipes().len();
                let leaving = g.pipes().iter().filter(|p| p.x - 2.0 < -p.width).count();
                g.advance(2.0);
                let spawned = usize::from(g.frame_count().is_multiple_of(120));
                prop_assert_eq!(g.pipes().len(), before - leaving + spawned);
                prop_assert!(g.pipes().iter().all(|p| p.x >= -p.width));
            }
        }
    }
}

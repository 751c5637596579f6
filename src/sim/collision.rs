//! Collision detection between the player and the world
//!
//! The player's hitbox is a circle, intentionally smaller than the sprite.
//! Each pipe is two axis-aligned rectangles above and below its gap.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::pipes::Pipe;
use crate::error::SimError;

/// What the player hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionKind {
    Pipe,
    Boundary,
}

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            max: Vec2::new(x + width, y + height),
        }
    }

    /// No area: nothing can touch it
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.max.x <= self.min.x || self.max.y <= self.min.y
    }

    /// Point on or inside the rectangle closest to `p`
    #[inline]
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        p.clamp(self.min, self.max)
    }
}

/// Closest-point circle/rectangle overlap test
///
/// Touching (distance exactly equal to the radius) is not a hit, and an
/// empty rectangle is never hit.
#[inline]
pub fn circle_rect_overlap(center: Vec2, radius: f32, rect: &Rect) -> bool {
    if rect.is_empty() {
        return false;
    }
    let closest = rect.closest_point(center);
    center.distance_squared(closest) < radius * radius
}

/// The two solid sections of a pipe: top, then bottom
///
/// Sections pushed off the canvas collapse to zero height and are empty.
pub fn pipe_rects(pipe: &Pipe, canvas_height: f32) -> [Rect; 2] {
    let top = Rect::new(pipe.x, 0.0, pipe.width, pipe.top_height().max(0.0));
    let bottom_y = pipe.bottom_y();
    let bottom = Rect::new(
        pipe.x,
        bottom_y,
        pipe.width,
        (canvas_height - bottom_y).max(0.0),
    );
    [top, bottom]
}

/// Check the player's hitbox circle against every pipe
///
/// Malformed pipes are an upstream bug and are reported, never skipped.
pub fn check_pipe_collision(
    player_x: f32,
    player_y: f32,
    radius: f32,
    pipes: &[Pipe],
    canvas_height: f32,
) -> Result<bool, SimError> {
    let center = Vec2::new(player_x, player_y);

    for pipe in pipes {
        pipe.validate()?;

        // Broad phase: skip pipes outside the hitbox's horizontal extent
        if pipe.right() < player_x - radius || pipe.x > player_x + radius {
            continue;
        }

        if pipe_rects(pipe, canvas_height)
            .iter()
            .any(|rect| circle_rect_overlap(center, radius, rect))
        {
            return Ok(true);
        }
    }

    Ok(false)
}

/// Check whether the player has left the playfield vertically
#[inline]
pub fn check_boundary_collision(player_y: f32, player_height: f32, canvas_height: f32) -> bool {
    player_y < 0.0 || player_y > canvas_height - player_height
}

/// Run both checks; a pipe hit takes precedence over a boundary hit
pub fn evaluate(
    player_x: f32,
    player_y: f32,
    player_height: f32,
    radius: f32,
    pipes: &[Pipe],
    canvas_height: f32,
) -> Result<Option<CollisionKind>, SimError> {
    if !player_x.is_finite() || !player_y.is_finite() {
        return Err(SimError::InvariantViolation(format!(
            "player position is not finite: ({player_x}, {player_y})"
        )));
    }

    if check_pipe_collision(player_x, player_y, radius, pipes, canvas_height)? {
        return Ok(Some(CollisionKind::Pipe));
    }
    if check_boundary_collision(player_y, player_height, canvas_height) {
        return Ok(Some(CollisionKind::Boundary));
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const H: f32 = 600.0;
    const R: f32 = 15.0;

    fn pipe(x: f32, gap_y: f32) -> Pipe {
        Pipe {
            x,
            width: 60.0,
            gap_y,
            gap_height: 150.0,
            scored: false,
        }
    }

    #[test]
    fn test_circle_in_gap_misses() {
        // Gap spans y 225..375 at x 80..140
        let pipes = [pipe(80.0, 300.0)];
        assert!(!check_pipe_collision(100.0, 300.0, R, &pipes, H).unwrap());
    }

    #[test]
    fn test_circle_overlapping_top_section_hits() {
        let pipes = [pipe(80.0, 300.0)];
        // Top section ends at 225; circle reaches up to 220
        assert!(check_pipe_collision(100.0, 235.0, R, &pipes, H).unwrap());
    }

    #[test]
    fn test_circle_overlapping_bottom_section_hits() {
        let pipes = [pipe(80.0, 300.0)];
        assert!(check_pipe_collision(100.0, 365.0, R, &pipes, H).unwrap());
    }

    #[test]
    fn test_corner_uses_true_distance() {
        // Top section corner at (80, 225). Circle center diagonal from it.
        let pipes = [pipe(80.0, 300.0)];
        // 11² + 11² = 242 > 225: bounding boxes overlap but the circle doesn't
        assert!(!check_pipe_collision(69.0, 236.0, R, &pipes, H).unwrap());
        // 10² + 10² = 200 < 225
        assert!(check_pipe_collision(70.0, 235.0, R, &pipes, H).unwrap());
    }

    #[test]
    fn test_touching_edge_is_not_a_hit() {
        let pipes = [pipe(80.0, 300.0)];
        // Exactly radius away from the left face at the top section's height
        assert!(!check_pipe_collision(65.0, 100.0, R, &pipes, H).unwrap());
        assert!(check_pipe_collision(65.5, 100.0, R, &pipes, H).unwrap());
    }

    #[test]
    fn test_far_pipes_are_ignored() {
        let pipes = [pipe(300.0, 100.0), pipe(-60.0, 100.0)];
        assert!(!check_pipe_collision(100.0, 40.0, R, &pipes, H).unwrap());
    }

    #[test]
    fn test_malformed_pipe_is_an_error() {
        let mut bad = pipe(500.0, 300.0);
        bad.gap_height = f32::NAN;
        // Even far away pipes are validated
        let result = check_pipe_collision(100.0, 300.0, R, &[bad], H);
        assert!(matches!(result, Err(SimError::InvariantViolation(_))));
    }

    #[test]
    fn test_opening_past_top_edge_has_no_top_section() {
        // Opening spans y -50..250; nothing solid above the player
        let tall = Pipe {
            x: 80.0,
            width: 60.0,
            gap_y: 100.0,
            gap_height: 300.0,
            scored: false,
        };
        let [top, bottom] = pipe_rects(&tall, H);
        assert!(top.is_empty());
        assert!(!bottom.is_empty());

        assert!(!check_pipe_collision(100.0, 10.0, R, &[tall.clone()], H).unwrap());
        assert_eq!(evaluate(100.0, 10.0, 24.0, R, &[tall.clone()], H).unwrap(), None);
        // Bottom section still solid
        assert!(check_pipe_collision(100.0, 245.0, R, &[tall], H).unwrap());
    }

    #[test]
    fn test_boundary_edges() {
        let player_height = 24.0;
        assert!(!check_boundary_collision(0.0, player_height, H));
        assert!(check_boundary_collision(-0.1, player_height, H));
        assert!(!check_boundary_collision(576.0, player_height, H));
        assert!(check_boundary_collision(576.1, player_height, H));
    }

    #[test]
    fn test_pipe_takes_precedence_over_boundary() {
        // Player above the canvas while inside a pipe's top section
        let pipes = [pipe(80.0, 300.0)];
        let result = evaluate(100.0, -5.0, 24.0, R, &pipes, H).unwrap();
        assert_eq!(result, Some(CollisionKind::Pipe));

        let result = evaluate(100.0, -5.0, 24.0, R, &[], H).unwrap();
        assert_eq!(result, Some(CollisionKind::Boundary));

        let result = evaluate(100.0, 300.0, 24.0, R, &pipes, H).unwrap();
        assert_eq!(result, None);
    }

    #[test]
    fn test_non_finite_player_is_an_error() {
        assert!(evaluate(100.0, f32::NAN, 24.0, R, &[], H).is_err());
    }

    proptest! {
        #[test]
        fn prop_broad_phase_matches_exhaustive(
            px in 0.0f32..400.0,
            py in 0.0f32..600.0,
            pipe_x in -60.0f32..400.0,
            gap_y in 100.0f32..350.0,
        ) {
            let p = pipe(pipe_x, gap_y);
            let center = Vec2::new(px, py);
            let exhaustive = pipe_rects(&p, H)
                .iter()
                .any(|rect| circle_rect_overlap(center, R, rect));
            let fast = check_pipe_collision(px, py, R, &[p], H).unwrap();
            prop_assert_eq!(fast, exhaustive);
        }
    }
}

//! Vertical physics for the player
//!
//! Velocities are in pixels per frame, so gravity and flap are applied once
//! per simulation frame regardless of display refresh rate.

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_ROTATION, ROTATION_FACTOR};
use crate::error::SimError;
use crate::tuning::Tuning;

/// The player entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Fixed horizontal position
    pub x: f32,
    pub y: f32,
    /// Vertical velocity (px/frame, positive is down)
    pub velocity: f32,
    /// Visual tilt in degrees, derived from velocity
    pub rotation: f32,
    pub width: f32,
    pub height: f32,
    /// Wing animation hint, no physics effect
    pub is_flapping: bool,
}

impl Player {
    /// Spawn at the vertical center of the canvas, at rest
    pub fn new(tuning: &Tuning, canvas_height: f32) -> Self {
        Self {
            x: tuning.player_x,
            y: canvas_height / 2.0,
            velocity: 0.0,
            rotation: 0.0,
            width: tuning.player_width,
            height: tuning.player_height,
            is_flapping: false,
        }
    }

    /// Position and velocity must be real numbers to integrate
    pub fn validate(&self) -> Result<(), SimError> {
        if !self.x.is_finite() || !self.y.is_finite() || !self.velocity.is_finite() {
            return Err(SimError::InvariantViolation(format!(
                "player has non-finite state: {:?}",
                self
            )));
        }
        Ok(())
    }
}

/// Accelerate downward, clamping only the downward side
#[inline]
pub fn apply_gravity(player: &mut Player, tuning: &Tuning) {
    player.velocity = (player.velocity + tuning.gravity).min(tuning.terminal_velocity);
}

/// Overwrite velocity with the flap impulse
#[inline]
pub fn apply_flap(player: &mut Player, tuning: &Tuning) {
    player.velocity = tuning.flap_strength;
    player.is_flapping = true;
}

#[inline]
pub fn update_position(player: &mut Player, delta_time: f32) {
    player.y += player.velocity * delta_time;
}

/// Tilt in degrees for a given velocity
#[inline]
pub fn rotation_for(velocity: f32) -> f32 {
    (velocity * ROTATION_FACTOR).clamp(-MAX_ROTATION, MAX_ROTATION)
}

/// Advance the player by one frame: gravity, position, derived rotation
pub fn step(player: &mut Player, tuning: &Tuning, delta_time: f32) {
    apply_gravity(player, tuning);
    update_position(player, delta_time);
    player.rotation = rotation_for(player.velocity);
    // Wings fold again once the bird starts falling
    if player.velocity > 0.0 {
        player.is_flapping = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::CANVAS_HEIGHT;
    use proptest::prelude::*;

    fn player() -> Player {
        Player::new(&Tuning::default(), CANVAS_HEIGHT)
    }

    #[test]
    fn test_new_player_centered_at_rest() {
        let p = player();
        assert_eq!(p.y, 300.0);
        assert_eq!(p.velocity, 0.0);
        assert_eq!(p.rotation, 0.0);
    }

    #[test]
    fn test_gravity_single_step() {
        let mut p = player();
        apply_gravity(&mut p, &Tuning::default());
        assert!((p.velocity - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_gravity_reaches_terminal_after_twenty_steps() {
        let tuning = Tuning::default();
        let mut p = player();
        for _ in 0..20 {
            apply_gravity(&mut p, &tuning);
        }
        assert!((p.velocity - 12.0).abs() < 1e-4);

        for _ in 0..50 {
            apply_gravity(&mut p, &tuning);
        }
        assert_eq!(p.velocity, 12.0);
    }

    #[test]
    fn test_flap_overwrites_velocity() {
        let tuning = Tuning::default();
        let mut p = player();
        p.velocity = 11.4;
        apply_flap(&mut p, &tuning);
        assert_eq!(p.velocity, -10.0);
        assert!(p.is_flapping);

        // Repeated flaps don't accumulate
        apply_flap(&mut p, &tuning);
        assert_eq!(p.velocity, -10.0);
    }

    #[test]
    fn test_gravity_does_not_clamp_upward_velocity() {
        let tuning = Tuning::default();
        let mut p = player();
        apply_flap(&mut p, &tuning);
        apply_gravity(&mut p, &tuning);
        assert!((p.velocity - -9.4).abs() < 1e-6);
    }

    #[test]
    fn test_update_position_scales_with_delta() {
        let mut p = player();
        p.velocity = 4.0;
        update_position(&mut p, 0.5);
        assert_eq!(p.y, 302.0);
    }

    #[test]
    fn test_rotation_clamped() {
        assert_eq!(rotation_for(0.0), 0.0);
        assert_eq!(rotation_for(5.0), 15.0);
        assert_eq!(rotation_for(12.0), 45.0);
        assert_eq!(rotation_for(-10.0), -30.0);
        assert_eq!(rotation_for(-100.0), -45.0);
    }

    proptest! {
        #[test]
        fn prop_free_fall_velocity(frames in 0u32..200) {
            let tuning = Tuning::default();
            let mut p = player();
            for _ in 0..frames {
                let before = p.velocity;
                step(&mut p, &tuning, 1.0);
                prop_assert!(p.velocity >= before);
            }
            let expected = (frames as f32 * tuning.gravity).min(tuning.terminal_velocity);
            prop_assert!((p.velocity - expected).abs() < 1e-3);
        }

        #[test]
        fn prop_velocity_and_rotation_stay_in_bounds(
            flaps in proptest::collection::vec(any::<bool>(), 0..300)
        ) {
            let tuning = Tuning::default();
            let mut p = player();
            for flap in flaps {
                if flap {
                    apply_flap(&mut p, &tuning);
                }
                step(&mut p, &tuning, 1.0);
                prop_assert!(p.velocity >= tuning.flap_strength);
                prop_assert!(p.velocity <= tuning.terminal_velocity);
                prop_assert!((-45.0..=45.0).contains(&p.rotation));
            }
        }
    }
}

//! Data-driven game balance
//!
//! Every physics and pipe constant lives here so a session can be built from
//! a JSON file. Missing fields fall back to the defaults in [`crate::consts`].

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Downward acceleration (px/frame²)
    pub gravity: f32,
    /// Maximum fall speed reachable through gravity (px/frame)
    pub terminal_velocity: f32,
    /// Velocity set by a flap (px/frame, negative is up)
    pub flap_strength: f32,

    pub player_x: f32,
    pub player_width: f32,
    pub player_height: f32,
    pub hitbox_radius: f32,

    pub pipe_width: f32,
    pub pipe_gap: f32,
    /// Frames between pipe spawns
    pub spawn_interval: u64,
    /// Pixels per frame
    pub scroll_speed: f32,
    pub min_gap_y: f32,
    pub gap_bottom_margin: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            terminal_velocity: TERMINAL_VELOCITY,
            flap_strength: FLAP_STRENGTH,

            player_x: PLAYER_X,
            player_width: PLAYER_WIDTH,
            player_height: PLAYER_HEIGHT,
            hitbox_radius: HITBOX_RADIUS,

            pipe_width: PIPE_WIDTH,
            pipe_gap: PIPE_GAP,
            spawn_interval: PIPE_SPAWN_INTERVAL,
            scroll_speed: SCROLL_SPEED,
            min_gap_y: MIN_GAP_Y,
            gap_bottom_margin: GAP_BOTTOM_MARGIN,
        }
    }
}

impl Tuning {
    /// Parse and validate tuning from JSON
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values the simulation can't run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("gravity", self.gravity),
            ("terminal_velocity", self.terminal_velocity),
            ("player_width", self.player_width),
            ("player_height", self.player_height),
            ("hitbox_radius", self.hitbox_radius),
            ("pipe_width", self.pipe_width),
            ("pipe_gap", self.pipe_gap),
            ("scroll_speed", self.scroll_speed),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidTuning { field, value });
            }
        }

        if !self.flap_strength.is_finite() || self.flap_strength >= 0.0 {
            return Err(ConfigError::InvalidTuning {
                field: "flap_strength",
                value: self.flap_strength,
            });
        }
        if self.spawn_interval == 0 {
            return Err(ConfigError::InvalidTuning {
                field: "spawn_interval",
                value: 0.0,
            });
        }
        for (field, value) in [
            ("player_x", self.player_x),
            ("min_gap_y", self.min_gap_y),
            ("gap_bottom_margin", self.gap_bottom_margin),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidTuning { field, value });
            }
        }

        // Wherever the gap center lands, the whole opening stays on the canvas
        let half_gap = self.pipe_gap / 2.0;
        if half_gap > self.min_gap_y || half_gap > self.gap_bottom_margin {
            return Err(ConfigError::InvalidTuning {
                field: "pipe_gap",
                value: self.pipe_gap,
            });
        }
        Ok(())
    }

    /// Smallest canvas height that leaves a non-empty gap range
    pub fn min_canvas_height(&self) -> f32 {
        self.min_gap_y + self.gap_bottom_margin
    }
}

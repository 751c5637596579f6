//! Flappy Arcade - physics side-scroller core for the arcade minigame suite
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, pipes, collisions, scoring, game state)
//! - `renderer`: Draw-call rendering through an abstract render surface
//! - `platform`: Frame timing shared by the browser and native front ends
//! - `highscores`: Remote high-score service client and cached board
//! - `audio`: Sound triggers
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod error;
pub mod highscores;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::{ConfigError, InvalidTransition, ServiceError, SimError};
pub use highscores::{HighScoreCache, HighScoreEntry, ScoreService};
pub use settings::Settings;
pub use tuning::Tuning;

use serde::{Deserialize, Serialize};

/// Game configuration constants
pub mod consts {
    /// Simulation rate (physics constants are per frame at this rate)
    pub const SIM_HZ: f64 = 60.0;
    /// Duration of one simulation frame in milliseconds
    pub const FRAME_MS: f64 = 1000.0 / SIM_HZ;
    /// Maximum substeps per display refresh to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Default canvas dimensions
    pub const CANVAS_WIDTH: f32 = 400.0;
    pub const CANVAS_HEIGHT: f32 = 600.0;

    /// Downward acceleration (px/frame²)
    pub const GRAVITY: f32 = 0.6;
    /// Fastest fall reachable through gravity alone (px/frame)
    pub const TERMINAL_VELOCITY: f32 = 12.0;
    /// Velocity set by a flap (px/frame, negative is up)
    pub const FLAP_STRENGTH: f32 = -10.0;
    /// Rotation derived from velocity (degrees per px/frame)
    pub const ROTATION_FACTOR: f32 = 3.0;
    pub const MAX_ROTATION: f32 = 45.0;

    /// Player defaults
    pub const PLAYER_X: f32 = 100.0;
    pub const PLAYER_WIDTH: f32 = 34.0;
    pub const PLAYER_HEIGHT: f32 = 24.0;
    /// Collision circle, smaller than the sprite for forgiving gameplay
    pub const HITBOX_RADIUS: f32 = 15.0;

    /// Pipe defaults
    pub const PIPE_WIDTH: f32 = 60.0;
    pub const PIPE_GAP: f32 = 150.0;
    pub const PIPE_SPAWN_INTERVAL: u64 = 120;
    pub const SCROLL_SPEED: f32 = 2.0;
    /// Gap center bounds: [MIN_GAP_Y, canvas_height - GAP_BOTTOM_MARGIN]
    pub const MIN_GAP_Y: f32 = 100.0;
    pub const GAP_BOTTOM_MARGIN: f32 = 250.0;
}

/// Score-service identifier for each game in the suite
///
/// Each variant gets its own leaderboard on the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameId {
    Flappy,
    Maze,
}

impl GameId {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameId::Flappy => "flappy-bird",
            GameId::Maze => "pacman",
        }
    }
}

impl std::fmt::Display for GameId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (velocities are per frame)
//! - Seeded RNG only
//! - Stable iteration order (pipes stay oldest first)
//! - No rendering or platform dependencies

pub mod collision;
pub mod physics;
pub mod pipes;
pub mod score;
pub mod state;
pub mod tick;

pub use collision::{CollisionKind, check_boundary_collision, check_pipe_collision};
pub use physics::{Player, apply_flap, apply_gravity, rotation_for, update_position};
pub use pipes::{Pipe, PipeGenerator};
pub use score::ScoreTracker;
pub use state::{Action, GameEvent, GamePhase, GameState};
pub use tick::{TickInput, tick};

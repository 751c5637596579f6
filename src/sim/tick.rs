//! Fixed timestep simulation tick
//!
//! One call advances the session by exactly one frame, in a fixed order:
//! physics, pipes, collision, scoring. Rendering happens afterwards.

use super::collision;
use super::physics;
use super::pipes::Pipe;
use super::state::{Action, GameEvent, GamePhase, GameState};
use crate::error::SimError;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Flap events since the last frame, each applied on its own
    pub flaps: u32,
    /// Phase change request (start/pause/resume/restart)
    pub action: Option<Action>,
    /// Idle/demo mode - autopilot flaps for the player
    pub idle_mode: bool,
}

/// Advance the game state by one frame
///
/// Input is applied first. The world is then checked before anything moves,
/// so an invariant violation returns with player and pipes untouched.
pub fn tick(state: &mut GameState, input: &TickInput) -> Result<(), SimError> {
    if let Some(action) = input.action {
        // Invalid requests are logged by the state machine and otherwise ignored
        let _ = state.request(action);
    }

    for _ in 0..input.flaps {
        state.flap();
    }

    if state.phase != GamePhase::Playing {
        return Ok(());
    }

    check_world(state).inspect_err(|e| log::error!("Aborting frame: {}", e))?;

    if input.idle_mode && autopilot_wants_flap(state) {
        state.flap();
    }

    // Physics
    physics::step(&mut state.player, &state.tuning, 1.0);

    // Pipes
    state.pipes.advance(state.tuning.scroll_speed);
    if state
        .pipes
        .frame_count()
        .is_multiple_of(state.tuning.spawn_interval)
    {
        state.push_event(GameEvent::PipeSpawned);
    }

    // Collision
    let hit = collision::evaluate(
        state.player.x,
        state.player.y,
        state.player.height,
        state.tuning.hitbox_radius,
        state.pipes.pipes(),
        state.canvas_height,
    )
    .inspect_err(|e| log::error!("Aborting frame: {}", e))?;

    if let Some(kind) = hit {
        // Positions from this frame are kept for rendering; nothing advances after
        state.end_run(kind);
        return Ok(());
    }

    // Scoring
    let player_x = state.player.x;
    if state.score.update(state.pipes.pipes_mut(), player_x) > 0 {
        let score = state.current_score();
        state.push_event(GameEvent::Scored { score });
    }

    Ok(())
}

fn check_world(state: &GameState) -> Result<(), SimError> {
    state.player.validate()?;
    state.pipes.pipes().iter().try_for_each(Pipe::validate)
}

/// Demo autopilot: flap when falling below the next gap's center
fn autopilot_wants_flap(state: &GameState) -> bool {
    let player = &state.player;
    let radius = state.tuning.hitbox_radius;
    let target = state
        .live_pipes()
        .iter()
        .find(|p| p.right() + radius > player.x)
        .map(|p| p.gap_y)
        .unwrap_or(state.canvas_height / 2.0);

    player.velocity >= 0.0 && player.y > target + 30.0
}

//! Draws one frame of a session

use glam::Vec2;

use super::{RenderSurface, colors};
use crate::sim::{GamePhase, GameState, Pipe, Player};

/// Pipe lip drawn at the gap edge
const CAP_HEIGHT: f32 = 20.0;
const CAP_OVERHANG: f32 = 4.0;

/// Draw the world; HUD text is left to the page
pub fn draw_frame<S: RenderSurface + ?Sized>(surface: &mut S, state: &GameState) {
    surface.set_fill_color(colors::SKY);
    surface.fill_rect(0.0, 0.0, state.canvas_width, state.canvas_height);

    for pipe in state.live_pipes() {
        draw_pipe(surface, pipe, state.canvas_height);
    }

    draw_player(surface, &state.player);

    if matches!(state.phase, GamePhase::Paused | GamePhase::GameOver) {
        surface.set_fill_color(colors::OVERLAY);
        surface.fill_rect(0.0, 0.0, state.canvas_width, state.canvas_height);
    }
}

/// Sections with no height on the canvas are skipped, matching the hitboxes
fn draw_pipe<S: RenderSurface + ?Sized>(surface: &mut S, pipe: &Pipe, canvas_height: f32) {
    let top = pipe.top_height();
    let bottom = pipe.bottom_y();
    let has_top = top > 0.0;
    let has_bottom = bottom < canvas_height;

    surface.set_fill_color(colors::PIPE);
    if has_top {
        surface.fill_rect(pipe.x, 0.0, pipe.width, top);
    }
    if has_bottom {
        surface.fill_rect(pipe.x, bottom, pipe.width, canvas_height - bottom);
    }

    surface.set_fill_color(colors::PIPE_CAP);
    let cap_x = pipe.x - CAP_OVERHANG;
    let cap_w = pipe.width + CAP_OVERHANG * 2.0;
    if has_top {
        let cap_h = CAP_HEIGHT.min(top);
        surface.fill_rect(cap_x, top - cap_h, cap_w, cap_h);
    }
    if has_bottom {
        let cap_h = CAP_HEIGHT.min(canvas_height - bottom);
        surface.fill_rect(cap_x, bottom, cap_w, cap_h);
    }
}

/// Bird centered on the hitbox, tilted by its derived rotation
fn draw_player<S: RenderSurface + ?Sized>(surface: &mut S, player: &Player) {
    let half_w = player.width / 2.0;
    let half_h = player.height / 2.0;

    surface.save();
    surface.translate(Vec2::new(player.x, player.y));
    surface.rotate(player.rotation.to_radians());

    surface.set_fill_color(colors::BIRD);
    surface.fill_ellipse(Vec2::ZERO, half_w, half_h);

    // Wing up while flapping, down otherwise
    let wing_y = if player.is_flapping { -half_h * 0.4 } else { half_h * 0.2 };
    surface.set_fill_color(colors::WING);
    surface.fill_ellipse(Vec2::new(-half_w * 0.35, wing_y), half_w * 0.45, half_h * 0.35);

    let eye = Vec2::new(half_w * 0.45, -half_h * 0.35);
    surface.set_fill_color(colors::EYE);
    surface.fill_circle(eye, half_h * 0.35);
    surface.set_fill_color(colors::PUPIL);
    surface.fill_circle(eye + Vec2::new(half_h * 0.1, 0.0), half_h * 0.15);

    surface.set_fill_color(colors::BEAK);
    surface.fill_polygon(&[
        Vec2::new(half_w * 0.7, -half_h * 0.05),
        Vec2::new(half_w * 1.25, half_h * 0.15),
        Vec2::new(half_w * 0.7, half_h * 0.4),
    ]);

    surface.restore();
}

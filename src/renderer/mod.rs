//! Rendering module
//!
//! The scene is drawn with primitive calls on a [`RenderSurface`]; any
//! backend with filled shapes and a transform stack will do.

pub mod scene;

#[cfg(target_arch = "wasm32")]
pub mod canvas;

pub use scene::draw_frame;

use glam::Vec2;

/// RGBA color, components in 0.0 - 1.0
pub type Color = [f32; 4];

/// Primitive drawing operations
///
/// `save`/`restore` push and pop the transform and fill state.
pub trait RenderSurface {
    fn set_fill_color(&mut self, color: Color);
    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32);
    fn fill_circle(&mut self, center: Vec2, radius: f32);
    fn fill_ellipse(&mut self, center: Vec2, radius_x: f32, radius_y: f32);
    fn fill_polygon(&mut self, points: &[Vec2]);
    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, offset: Vec2);
    /// Rotate subsequent drawing by `radians`
    fn rotate(&mut self, radians: f32);
}

/// Colors for game elements
pub mod colors {
    use super::Color;

    pub const SKY: Color = [0.44, 0.77, 0.81, 1.0];
    pub const PIPE: Color = [0.45, 0.75, 0.18, 1.0];
    pub const PIPE_CAP: Color = [0.33, 0.58, 0.12, 1.0];
    pub const BIRD: Color = [0.98, 0.8, 0.2, 1.0];
    pub const WING: Color = [1.0, 0.93, 0.6, 1.0];
    pub const EYE: Color = [1.0, 1.0, 1.0, 1.0];
    pub const PUPIL: Color = [0.0, 0.0, 0.0, 1.0];
    pub const BEAK: Color = [0.95, 0.45, 0.15, 1.0];
    /// Translucent veil over paused / game over frames
    pub const OVERLAY: Color = [0.0, 0.0, 0.0, 0.4];
}

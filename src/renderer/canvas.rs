//! Canvas 2D backend for the render surface (WASM only)

use glam::Vec2;
use web_sys::CanvasRenderingContext2d;

use super::{Color, RenderSurface};

/// CSS color string for a fill
fn css_color(color: Color) -> String {
    let [r, g, b, a] = color;
    format!(
        "rgba({}, {}, {}, {:.3})",
        (r.clamp(0.0, 1.0) * 255.0).round() as u8,
        (g.clamp(0.0, 1.0) * 255.0).round() as u8,
        (b.clamp(0.0, 1.0) * 255.0).round() as u8,
        a.clamp(0.0, 1.0)
    )
}

pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        Self { ctx }
    }
}

impl RenderSurface for CanvasSurface {
    fn set_fill_color(&mut self, color: Color) {
        self.ctx.set_fill_style_str(&css_color(color));
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.ctx
            .fill_rect(x as f64, y as f64, width as f64, height as f64);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32) {
        self.fill_ellipse(center, radius, radius);
    }

    fn fill_ellipse(&mut self, center: Vec2, radius_x: f32, radius_y: f32) {
        self.ctx.begin_path();
        let _ = self.ctx.ellipse(
            center.x as f64,
            center.y as f64,
            radius_x as f64,
            radius_y as f64,
            0.0,
            0.0,
            std::f64::consts::TAU,
        );
        self.ctx.fill();
    }

    fn fill_polygon(&mut self, points: &[Vec2]) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        self.ctx.begin_path();
        self.ctx.move_to(first.x as f64, first.y as f64);
        for p in rest {
            self.ctx.line_to(p.x as f64, p.y as f64);
        }
        self.ctx.close_path();
        self.ctx.fill();
    }

    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
    }

    fn translate(&mut self, offset: Vec2) {
        let _ = self.ctx.translate(offset.x as f64, offset.y as f64);
    }

    fn rotate(&mut self, radians: f32) {
        let _ = self.ctx.rotate(radians as f64);
    }
}

//! 2D rendering
//!
//! Draws the grid and both balls into any `Surface`: an `OffscreenCanvas`
//! context on the web, a command recorder natively and in tests.

pub mod recording;

#[cfg(target_arch = "wasm32")]
pub mod canvas;

pub use recording::{DrawCommand, RecordingSurface};

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;

use crate::consts::{BLACK, BLACK_DEBUG, WHITE, WHITE_DEBUG};
use crate::metrics::Metrics;
use crate::settings::Settings;
use crate::sim::{BallKind, SimState};

/// Canvas offsets (in canvas sizes) of a ball and its four wrapped copies
pub const GHOST_OFFSETS: [(f32, f32); 5] = [(0.0, 0.0), (0.0, 1.0), (0.0, -1.0), (1.0, 0.0), (-1.0, 0.0)];

/// Drawing primitives the renderer needs
pub trait Surface {
    fn width(&self) -> f32;
    fn height(&self) -> f32;

    fn clear_rect(&mut self, x: f32, y: f32, w: f32, h: f32);
    fn set_fill_color(&mut self, color: &str);
    fn set_stroke_color(&mut self, color: &str);
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32);
    /// Debug overlays only
    fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32);
    fn fill_circle(&mut self, x: f32, y: f32, radius: f32);
    fn translate(&mut self, x: f32, y: f32);
    fn reset_transform(&mut self);
    /// Debug overlays only
    fn fill_text(&mut self, text: &str, x: f32, y: f32);
}

/// What to draw beyond the grid and balls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub ghosts: bool,
    pub show_candidates: bool,
    pub show_metrics: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            ghosts: true,
            show_candidates: false,
            show_metrics: false,
        }
    }
}

impl From<&Settings> for RenderOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            ghosts: settings.ghosts,
            show_candidates: settings.show_candidates,
            show_metrics: settings.show_metrics,
        }
    }
}

fn ball_colors(kind: BallKind) -> (&'static str, &'static str) {
    match kind {
        BallKind::Black => (BLACK, BLACK_DEBUG),
        BallKind::White => (WHITE, WHITE_DEBUG),
    }
}

/// Draw one frame of `state`
pub fn render_frame(
    surface: &mut dyn Surface,
    state: &SimState,
    metrics: &Metrics,
    options: RenderOptions,
) {
    let (w, h) = (surface.width(), surface.height());
    let cell_size = state.arena.cell_size;
    let radius = state.arena.radius;
    let size = state.grid.size();

    surface.clear_rect(0.0, 0.0, w, h);
    surface.set_fill_color(BLACK);
    surface.fill_rect(0.0, 0.0, w, h);

    // Walk the grid with the transform; +1 overlap hides seams between cells
    surface.set_fill_color(WHITE);
    for row in state.grid.rows() {
        for cell in row {
            if cell.is_light() {
                surface.fill_rect(0.0, 0.0, cell_size + 1.0, cell_size + 1.0);
            }
            surface.translate(cell_size, 0.0);
        }
        surface.translate(-cell_size * size as f32, cell_size);
    }
    surface.reset_transform();

    let offsets = if options.ghosts { &GHOST_OFFSETS[..] } else { &GHOST_OFFSETS[..1] };
    for &(ox, oy) in offsets {
        for ball in &state.balls {
            let (fill, debug) = ball_colors(ball.kind);
            let x = ball.pos.x + ox * w;
            let y = ball.pos.y + oy * h;

            surface.set_fill_color(fill);
            surface.fill_circle(x, y, radius);

            if options.show_candidates {
                let col_min = (x / cell_size).floor() - 1.0;
                let row_min = (y / cell_size).floor() - 1.0;
                surface.set_stroke_color(debug);
                surface.stroke_rect(col_min * cell_size, row_min * cell_size, cell_size * 3.0, cell_size * 3.0);
            }
        }
    }

    if options.show_metrics {
        surface.set_fill_color("red");
        surface.fill_text(&format!("Frame: {}", metrics.fps), 10.0, 24.0);
        surface.fill_text(&format!("Update: {}", metrics.ups), 10.0, 48.0);
    }
}

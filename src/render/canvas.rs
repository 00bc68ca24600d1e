//! `OffscreenCanvas` 2D context as a render surface

use std::f64::consts::TAU;

use wasm_bindgen::JsCast;
use web_sys::{OffscreenCanvas, OffscreenCanvasRenderingContext2d};

use super::Surface;
use crate::error::{Result, StartupError};

pub struct CanvasSurface {
    ctx: OffscreenCanvasRenderingContext2d,
    width: f32,
    height: f32,
}

impl CanvasSurface {
    /// Take the 2D context of a transferred canvas
    pub fn new(canvas: &OffscreenCanvas) -> Result<Self> {
        let (width, height) = (canvas.width(), canvas.height());
        if width == 0 || height == 0 {
            return Err(StartupError::EmptySurface { width, height });
        }

        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .ok_or(StartupError::MissingContext)?
            .dyn_into::<OffscreenCanvasRenderingContext2d>()
            .map_err(|_| StartupError::MissingContext)?;
        ctx.set_font("24px sans-serif");

        Ok(Self {
            ctx,
            width: width as f32,
            height: height as f32,
        })
    }
}

impl Surface for CanvasSurface {
    fn width(&self) -> f32 {
        self.width
    }

    fn height(&self) -> f32 {
        self.height
    }

    fn clear_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.ctx.clear_rect(x as f64, y as f64, w as f64, h as f64);
    }

    fn set_fill_color(&mut self, color: &str) {
        self.ctx.set_fill_style_str(color);
    }

    fn set_stroke_color(&mut self, color: &str) {
        self.ctx.set_stroke_style_str(color);
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.ctx.fill_rect(x as f64, y as f64, w as f64, h as f64);
    }

    fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.ctx.stroke_rect(x as f64, y as f64, w as f64, h as f64);
    }

    fn fill_circle(&mut self, x: f32, y: f32, radius: f32) {
        self.ctx.begin_path();
        if self.ctx.arc(x as f64, y as f64, radius as f64, 0.0, TAU).is_ok() {
            self.ctx.fill();
        }
        self.ctx.close_path();
    }

    fn translate(&mut self, x: f32, y: f32) {
        let _ = self.ctx.translate(x as f64, y as f64);
    }

    fn reset_transform(&mut self) {
        let _ = self.ctx.reset_transform();
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32) {
        let _ = self.ctx.fill_text(text, x as f64, y as f64);
    }
}

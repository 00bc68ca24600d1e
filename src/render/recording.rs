//! Headless surface that records draw calls

use super::Surface;

/// One recorded draw call, with the arguments as issued
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    ClearRect { x: f32, y: f32, w: f32, h: f32 },
    FillColor(String),
    StrokeColor(String),
    FillRect { x: f32, y: f32, w: f32, h: f32 },
    StrokeRect { x: f32, y: f32, w: f32, h: f32 },
    FillCircle { x: f32, y: f32, radius: f32 },
    Translate { x: f32, y: f32 },
    ResetTransform,
    FillText { text: String, x: f32, y: f32 },
}

/// Keeps the commands issued since the last full-surface clear
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    width: f32,
    height: f32,
    commands: Vec<DrawCommand>,
    /// Current translation
    offset: (f32, f32),
    /// Top-left corners of filled rects after translation
    rect_origins: Vec<(f32, f32)>,
    /// Full clears seen so far, one per frame
    frames: u64,
}

impl RecordingSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
            offset: (0.0, 0.0),
            rect_origins: Vec::new(),
            frames: 0,
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn filled_rect_origins(&self) -> Vec<(f32, f32)> {
        self.rect_origins.clone()
    }

    pub fn translation(&self) -> (f32, f32) {
        self.offset
    }

    /// Number of frames started (full-surface clears)
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Surface for RecordingSurface {
    fn width(&self) -> f32 {
        self.width
    }

    fn height(&self) -> f32 {
        self.height
    }

    fn clear_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        if x <= 0.0 && y <= 0.0 && w >= self.width && h >= self.height {
            self.commands.clear();
            self.rect_origins.clear();
            self.frames += 1;
        }
        self.commands.push(DrawCommand::ClearRect { x, y, w, h });
    }

    fn set_fill_color(&mut self, color: &str) {
        self.commands.push(DrawCommand::FillColor(color.to_string()));
    }

    fn set_stroke_color(&mut self, color: &str) {
        self.commands.push(DrawCommand::StrokeColor(color.to_string()));
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.rect_origins.push((x + self.offset.0, y + self.offset.1));
        self.commands.push(DrawCommand::FillRect { x, y, w, h });
    }

    fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.commands.push(DrawCommand::StrokeRect { x, y, w, h });
    }

    fn fill_circle(&mut self, x: f32, y: f32, radius: f32) {
        self.commands.push(DrawCommand::FillCircle { x, y, radius });
    }

    fn translate(&mut self, x: f32, y: f32) {
        self.offset.0 += x;
        self.offset.1 += y;
        self.commands.push(DrawCommand::Translate { x, y });
    }

    fn reset_transform(&mut self) {
        self.offset = (0.0, 0.0);
        self.commands.push(DrawCommand::ResetTransform);
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32) {
        self.commands.push(DrawCommand::FillText {
            text: text.to_string(),
            x,
            y,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_clear_starts_a_frame() {
        let mut surface = RecordingSurface::new(100.0, 50.0);
        surface.fill_rect(0.0, 0.0, 1.0, 1.0);
        surface.clear_rect(0.0, 0.0, 100.0, 50.0);
        assert_eq!(surface.frames(), 1);
        assert_eq!(surface.commands().len(), 1);

        // A partial clear is just another command
        surface.clear_rect(10.0, 10.0, 5.0, 5.0);
        assert_eq!(surface.frames(), 1);
        assert_eq!(surface.commands().len(), 2);
    }

    #[test]
    fn test_translation_applies_to_rect_origins() {
        let mut surface = RecordingSurface::new(100.0, 100.0);
        surface.translate(10.0, 0.0);
        surface.translate(5.0, 20.0);
        surface.fill_rect(1.0, 1.0, 4.0, 4.0);
        surface.reset_transform();
        surface.fill_rect(0.0, 0.0, 4.0, 4.0);
        assert_eq!(surface.filled_rect_origins(), vec![(16.0, 21.0), (0.0, 0.0)]);
    }
}

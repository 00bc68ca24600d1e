//! Frame and update rate counters
//!
//! Counts accumulate for at least one window (1000 ms), then become the
//! displayed rates and start over.

use crate::consts::METRICS_WINDOW_MS;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metrics {
    /// Frames drawn in the current window
    pub frames: u32,
    /// Physics updates run in the current window
    pub updates: u32,
    /// When the current window started (ms)
    pub window_start: f64,
    /// Frames drawn in the last complete window
    pub fps: u32,
    /// Updates run in the last complete window
    pub ups: u32,
}

impl Metrics {
    pub fn new(now: f64) -> Self {
        Self {
            frames: 0,
            updates: 0,
            window_start: now,
            fps: 0,
            ups: 0,
        }
    }

    #[inline]
    pub fn record_frame(&mut self) {
        self.frames += 1;
    }

    #[inline]
    pub fn record_update(&mut self) {
        self.updates += 1;
    }

    /// Close the window if it has lasted long enough. Returns true on rollover.
    pub fn roll(&mut self, now: f64) -> bool {
        if now - self.window_start < METRICS_WINDOW_MS {
            return false;
        }
        self.window_start = now;
        self.fps = self.frames;
        self.ups = self.updates;
        self.frames = 0;
        self.updates = 0;
        log::debug!("fps {} ups {}", self.fps, self.ups);
        true
    }
}

//! Millisecond time sources

use std::cell::Cell;
use std::rc::Rc;

/// A monotonic millisecond timestamp
pub trait Clock {
    fn now(&self) -> f64;
}

/// Milliseconds since construction
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    start: std::time::Instant,
}

#[cfg(not(target_arch = "wasm32"))]
impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            start: std::time::Instant::now(),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Clock for MonotonicClock {
    fn now(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

/// `performance.now()` of the current global scope (window or worker)
#[cfg(target_arch = "wasm32")]
pub struct PerformanceClock {
    performance: web_sys::Performance,
}

#[cfg(target_arch = "wasm32")]
impl PerformanceClock {
    pub fn new() -> crate::error::Result<Self> {
        use wasm_bindgen::JsCast;

        let global = js_sys::global();
        let performance = if let Some(window) = global.dyn_ref::<web_sys::Window>() {
            window.performance()
        } else {
            global
                .dyn_into::<web_sys::WorkerGlobalScope>()
                .map_err(|_| crate::StartupError::NotInWorker)?
                .performance()
        };
        performance
            .map(|performance| Self { performance })
            .ok_or_else(|| crate::StartupError::Scheduler("performance unavailable".into()))
    }
}

#[cfg(target_arch = "wasm32")]
impl Clock for PerformanceClock {
    fn now(&self) -> f64 {
        self.performance.now()
    }
}

/// Clock that only moves when told to; clones share the same time
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new(now: f64) -> Self {
        Self {
            now: Rc::new(Cell::new(now)),
        }
    }

    pub fn set(&self, now: f64) {
        self.now.set(now);
    }

    pub fn advance(&self, ms: f64) {
        self.now.set(self.now.get() + ms);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        self.now.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_clones_share_time() {
        let clock = ManualClock::new(5.0);
        let other = clock.clone();
        clock.advance(10.0);
        assert_eq!(other.now(), 15.0);
        other.set(100.0);
        assert_eq!(clock.now(), 100.0);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_monotonic_clock_never_goes_back() {
        let clock = MonotonicClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(a >= 0.0);
        assert!(b >= a);
    }
}

//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Time (`performance.now()` on the web, `Instant` natively)

pub mod time;

pub use time::{Clock, ManualClock};

#[cfg(not(target_arch = "wasm32"))]
pub use time::MonotonicClock;

#[cfg(target_arch = "wasm32")]
pub use time::PerformanceClock;

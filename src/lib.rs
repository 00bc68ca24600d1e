//! Torus Duel - two balls claiming territory on a wrap-around grid
//!
//! Core modules:
//! - `sim`: Grid, balls, collision resolution and the update tick
//! - `render`: Draws the simulation into any 2D `Surface`
//! - `scheduler`: Next-frame / next-turn callback scheduling
//! - `app`: Wires state, surface and scheduler into two callback chains
//! - `worker` / `web`: One-way surface handoff to the context that runs the simulation
//! - `platform`: Time sources

pub mod app;
pub mod error;
pub mod metrics;
pub mod platform;
pub mod render;
pub mod scheduler;
pub mod settings;
pub mod sim;

#[cfg(not(target_arch = "wasm32"))]
pub mod worker;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use app::Simulation;
pub use error::StartupError;
pub use metrics::Metrics;
pub use settings::Settings;
pub use sim::SeedPolicy;

/// Simulation constants
pub mod consts {
    /// Cells per grid side
    pub const GRID_SIZE: usize = 24;
    /// Ball speed along each axis (pixels/s)
    pub const BALL_SPEED: f32 = 300.0;
    /// Metrics snapshot window (ms)
    pub const METRICS_WINDOW_MS: f64 = 1000.0;
    /// Upper bound on collisions resolved in a single update tick
    pub const MAX_RESOLVE_PASSES: u32 = 64;

    /// Background, dark cells and the black ball
    pub const BLACK: &str = "#451952";
    /// Light cells and the white ball
    pub const WHITE: &str = "#F39F5A";
    /// Debug outline of the black ball's collision candidates
    pub const BLACK_DEBUG: &str = "red";
    /// Debug outline of the white ball's collision candidates
    pub const WHITE_DEBUG: &str = "blue";
}

/// Map a signed cell index onto `[0, n)` (toroidal wrap)
#[inline]
pub fn wrap_index(i: i64, n: usize) -> usize {
    i.rem_euclid(n as i64) as usize
}

/// Map a coordinate onto `[0, extent)` (toroidal wrap)
#[inline]
pub fn wrap_coord(v: f32, extent: f32) -> f32 {
    let wrapped = v.rem_euclid(extent);
    // rem_euclid can round a tiny negative input up to exactly `extent`
    if wrapped >= extent { 0.0 } else { wrapped }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_wrap_index_edges() {
        assert_eq!(wrap_index(-1, 24), 23);
        assert_eq!(wrap_index(24, 24), 0);
        assert_eq!(wrap_index(25, 24), 1);
        assert_eq!(wrap_index(-25, 24), 23);
        assert_eq!(wrap_index(0, 24), 0);
    }

    #[test]
    fn test_wrap_coord_tiny_negative() {
        let w = wrap_coord(-1e-9, 600.0);
        assert!((0.0..600.0).contains(&w));
    }

    proptest! {
        #[test]
        fn wrap_index_in_range_and_congruent(i in -1_000_000i64..1_000_000, n in 1usize..200) {
            let w = wrap_index(i, n);
            prop_assert!(w < n);
            prop_assert_eq!((w as i64 - i).rem_euclid(n as i64), 0);
        }

        #[test]
        fn wrap_coord_in_range(v in -1.0e8f32..1.0e8, extent in 1.0f32..4096.0) {
            let w = wrap_coord(v, extent);
            prop_assert!(w >= 0.0 && w < extent);
        }
    }
}

//! Simulation module
//!
//! All physics lives here. Nothing in this module touches a surface, a
//! scheduler or a clock:
//! - Time comes in as millisecond timestamps
//! - Randomness only at construction, from a seeded RNG
//! - Balls are always processed black first, then white

pub mod collision;
pub mod grid;
pub mod state;
pub mod tick;

pub use collision::{Axis, Hit, Resolution, compute_collision, resolve_ball, resolve_collisions};
pub use grid::{Cell, Grid, SeedPolicy};
pub use state::{Arena, Ball, BallKind, SimState};
pub use tick::{TickOutcome, UpdateClock, tick};

//! Simulation state and core types

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::grid::{Cell, Grid};
use crate::consts::GRID_SIZE;
use crate::settings::Settings;
use crate::wrap_coord;

/// Which of the two balls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BallKind {
    Black,
    White,
}

impl BallKind {
    /// Cell value this ball passes through (and paints when it bounces)
    pub fn ignores(self) -> Cell {
        match self {
            BallKind::Black => Cell::Light,
            BallKind::White => Cell::Dark,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BallKind::Black => "black",
            BallKind::White => "white",
        }
    }
}

/// A ball entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub kind: BallKind,
    pub pos: Vec2,
    /// Direction with components of ±1; the speed scales it
    pub dir: Vec2,
}

impl Ball {
    pub fn new(kind: BallKind, pos: Vec2, dir: Vec2) -> Self {
        Self { kind, pos, dir }
    }

    /// Black ball: near the left edge, heading up-right
    pub fn black(rng: &mut impl Rng, arena: &Arena) -> Self {
        let cell = arena.cell_size;
        let x = cell + rng.random::<f32>() * cell * 2.0;
        let y = arena.height / 2.0 + rng.random::<f32>() * cell * 2.0 - cell;
        Self::new(BallKind::Black, Vec2::new(x, y), Vec2::new(1.0, -1.0))
    }

    /// White ball: near the right edge, heading down-left
    pub fn white(rng: &mut impl Rng, arena: &Arena) -> Self {
        let cell = arena.cell_size;
        let x = arena.width - cell - rng.random::<f32>() * cell * 2.0;
        let y = arena.height / 2.0 + rng.random::<f32>() * cell * 2.0 - cell;
        Self::new(BallKind::White, Vec2::new(x, y), Vec2::new(-1.0, 1.0))
    }

    #[inline]
    pub fn ignores(&self) -> Cell {
        self.kind.ignores()
    }

    /// Move along `dir` by `step.x` pixels horizontally and `step.y` vertically
    #[inline]
    pub fn advance(&mut self, step: Vec2) {
        self.pos += self.dir * step;
    }

    /// Wrap position back onto the canvas
    pub fn wrap(&mut self, width: f32, height: f32) {
        self.pos = Vec2::new(wrap_coord(self.pos.x, width), wrap_coord(self.pos.y, height));
    }

    /// Unwrapped `(row, col)` of the cell containing the centre
    #[inline]
    pub fn cell_index(&self, cell_size: f32) -> (i64, i64) {
        (
            (self.pos.y / cell_size).floor() as i64,
            (self.pos.x / cell_size).floor() as i64,
        )
    }
}

/// Canvas geometry derived from the surface size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
    /// Side of one cell; the grid tiles the shorter canvas dimension
    pub cell_size: f32,
    /// Ball radius, half a cell
    pub radius: f32,
}

impl Arena {
    pub fn new(width: f32, height: f32, grid_size: usize) -> Self {
        let cell_size = width.min(height) / grid_size as f32;
        Self {
            width,
            height,
            cell_size,
            radius: cell_size / 2.0,
        }
    }
}

/// Complete simulation state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimState {
    /// Seed the starting offsets were drawn from
    pub seed: u64,
    pub arena: Arena,
    pub grid: Grid,
    /// Black first, then white
    pub balls: [Ball; 2],
    /// Pixels per second along each axis
    pub speed: f32,
    /// Cap on collisions resolved per tick
    pub max_resolve_passes: u32,
}

impl SimState {
    /// Create a fresh state for a `width × height` canvas
    pub fn new(width: f32, height: f32, settings: &Settings, seed: u64) -> Self {
        let arena = Arena::new(width, height, GRID_SIZE);
        let mut rng = Pcg32::seed_from_u64(seed);
        let balls = [Ball::black(&mut rng, &arena), Ball::white(&mut rng, &arena)];

        Self {
            seed,
            arena,
            grid: Grid::new(GRID_SIZE, settings.seed_policy),
            balls,
            speed: settings.speed,
            max_resolve_passes: settings.max_resolve_passes,
        }
    }

    /// Assemble a state from explicit parts
    pub fn from_parts(arena: Arena, grid: Grid, balls: [Ball; 2], speed: f32) -> Self {
        Self {
            seed: 0,
            arena,
            grid,
            balls,
            speed,
            max_resolve_passes: crate::consts::MAX_RESOLVE_PASSES,
        }
    }

    pub fn black(&self) -> &Ball {
        &self.balls[0]
    }

    pub fn white(&self) -> &Ball {
        &self.balls[1]
    }
}

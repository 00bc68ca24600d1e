//! Toroidal cell grid
//!
//! Cells are addressed `(row, col)`, where `row = floor(y / cell_size)` and
//! `col = floor(x / cell_size)`. Signed indices wrap around both edges.

use serde::{Deserialize, Serialize};

use crate::wrap_index;

/// A single grid cell. Each ball passes freely through one of the two values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Cell {
    /// Painted with the background colour
    Dark = 0,
    /// Painted with the light colour
    Light = 1,
}

impl Cell {
    pub fn bit(self) -> u8 {
        self as u8
    }

    pub fn is_light(self) -> bool {
        self == Cell::Light
    }
}

impl From<bool> for Cell {
    fn from(light: bool) -> Self {
        if light { Cell::Light } else { Cell::Dark }
    }
}

/// How the grid is split between the two colours at start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SeedPolicy {
    /// Light below the main diagonal (`row > col`)
    #[default]
    DiagonalSplit,
    /// Light on the left half (`col < size / 2`)
    VerticalSplit,
}

impl SeedPolicy {
    /// Initial value of the cell at `(row, col)` on a `size × size` grid
    pub fn cell(self, row: usize, col: usize, size: usize) -> Cell {
        match self {
            SeedPolicy::DiagonalSplit => Cell::from(row > col),
            SeedPolicy::VerticalSplit => Cell::from(col < size / 2),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SeedPolicy::DiagonalSplit => "diagonal",
            SeedPolicy::VerticalSplit => "vertical",
        }
    }
}

/// Square grid of cells, stored row-major
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    size: usize,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn new(size: usize, policy: SeedPolicy) -> Self {
        assert!(size > 0, "grid size must be positive");
        let cells = (0..size * size)
            .map(|i| policy.cell(i / size, i % size, size))
            .collect();
        Self { size, cells }
    }

    /// Cells per side
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[row * self.size + col]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, cell: Cell) {
        self.cells[row * self.size + col] = cell;
    }

    /// Read with signed indices wrapped onto the torus
    #[inline]
    pub fn get_wrapped(&self, row: i64, col: i64) -> Cell {
        self.get(wrap_index(row, self.size), wrap_index(col, self.size))
    }

    /// Write with signed indices wrapped onto the torus
    #[inline]
    pub fn set_wrapped(&mut self, row: i64, col: i64, cell: Cell) {
        let (row, col) = (wrap_index(row, self.size), wrap_index(col, self.size));
        self.set(row, col, cell);
    }

    /// Number of cells holding `cell`
    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().filter(|&&c| c == cell).count()
    }

    /// Rows in top-to-bottom order
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks_exact(self.size)
    }
}

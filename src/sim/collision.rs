//! Collision detection and response between balls and grid cells
//!
//! A ball is tested against the 3×3 block of cells around the one holding its
//! centre. Indices outside the grid wrap around for the cell lookup, but the
//! unwrapped index is kept for geometry so a ball near the right edge sees the
//! column-0 cell just past the edge.

use glam::Vec2;

use super::grid::Grid;
use super::state::{Arena, Ball, SimState};

/// Which velocity component a hit reflects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// A resolved ball/cell collision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    /// Index into `SimState::balls`
    pub ball: usize,
    /// Wrapped grid row of the claimed cell
    pub row: usize,
    /// Wrapped grid column of the claimed cell
    pub col: usize,
    pub axis: Axis,
}

/// Everything resolved during one update tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Hits in the order they were resolved
    pub hits: Vec<Hit>,
    /// Resolution stopped at the pass cap with collisions possibly left over
    pub capped: bool,
}

/// Test a circle against an axis-aligned square cell
///
/// Returns the axis to reflect on, or `None` if the circle and the square do
/// not touch. Touching at exactly `radius` counts as a hit. When the centre is
/// as far from the square horizontally as vertically, the hit is on `Y`.
pub fn compute_collision(
    ball_pos: Vec2,
    ball_radius: f32,
    cell_origin: Vec2,
    cell_size: f32,
) -> Option<Axis> {
    let nearest = ball_pos.clamp(cell_origin, cell_origin + Vec2::splat(cell_size));
    let d = ball_pos - nearest;
    if d.length_squared() > ball_radius * ball_radius {
        return None;
    }
    if d.x.abs() > d.y.abs() {
        Some(Axis::X)
    } else {
        Some(Axis::Y)
    }
}

/// Centre coordinate that leaves the ball tangent to a cell edge
///
/// `index` is the cell's unwrapped row or column and `dir` the ball's
/// (already reflected) direction on that axis.
#[inline]
pub fn contact_coord(index: i64, dir: f32, cell_size: f32, radius: f32) -> f32 {
    let edge = index as f32 * cell_size;
    if dir > 0.0 {
        edge + cell_size + radius
    } else {
        edge - radius
    }
}

/// Resolve the first collision between `ball` and its neighbouring cells
///
/// Cells already holding the ball's ignored value are skipped. On a hit the
/// cell is claimed, the matching direction component is reversed, and the
/// ball is snapped tangent to the cell edge. Returns `(row, col, axis)` of the
/// claimed cell.
pub fn resolve_ball(
    ball: &mut Ball,
    grid: &mut Grid,
    arena: &Arena,
) -> Option<(usize, usize, Axis)> {
    let cell_size = arena.cell_size;
    let radius = arena.radius;
    let (center_row, center_col) = ball.cell_index(cell_size);
    let ignores = ball.ignores();

    // Saturate so a centre far off the canvas cannot overflow the scan bounds
    for row in center_row.saturating_sub(1)..=center_row.saturating_add(1) {
        for col in center_col.saturating_sub(1)..=center_col.saturating_add(1) {
            if grid.get_wrapped(row, col) == ignores {
                continue;
            }
            let origin = Vec2::new(col as f32 * cell_size, row as f32 * cell_size);
            let Some(axis) = compute_collision(ball.pos, radius, origin, cell_size) else {
                continue;
            };

            grid.set_wrapped(row, col, ignores);
            match axis {
                Axis::X => {
                    ball.dir.x = -ball.dir.x;
                    ball.pos.x = contact_coord(col, ball.dir.x, cell_size, radius);
                }
                Axis::Y => {
                    ball.dir.y = -ball.dir.y;
                    ball.pos.y = contact_coord(row, ball.dir.y, cell_size, radius);
                }
            }

            let size = grid.size();
            return Some((crate::wrap_index(row, size), crate::wrap_index(col, size), axis));
        }
    }

    None
}

/// Resolve collisions for both balls until a full pass finds none
///
/// Every hit changes the grid and a direction, so the scan restarts from the
/// first ball after each one. Resolves at most `state.max_resolve_passes`
/// hits.
pub fn resolve_collisions(state: &mut SimState) -> Resolution {
    let mut resolution = Resolution::default();
    let cap = state.max_resolve_passes as usize;

    loop {
        if resolution.hits.len() >= cap {
            log::warn!(
                "Collision resolution hit the cap of {} passes; deferring the rest to the next tick",
                cap
            );
            resolution.capped = true;
            return resolution;
        }

        let SimState {
            balls, grid, arena, ..
        } = &mut *state;

        let hit = balls.iter_mut().enumerate().find_map(|(i, ball)| {
            let (row, col, axis) = resolve_ball(ball, grid, arena)?;
            log::trace!("{} ball claimed ({}, {}) on {:?}", ball.kind.as_str(), row, col, axis);
            Some(Hit {
                ball: i,
                row,
                col,
                axis,
            })
        });

        match hit {
            Some(hit) => resolution.hits.push(hit),
            None => return resolution,
        }
    }
}

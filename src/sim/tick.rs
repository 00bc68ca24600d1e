//! Variable-timestep update tick
//!
//! Physics integrates by wall-clock time elapsed since the previous tick, so
//! the update rate can run ahead of or behind the display rate.

use glam::Vec2;

use super::collision::{Resolution, resolve_collisions};
use super::state::SimState;

/// Result of a single update
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// No time passed since the previous tick
    Skipped,
    /// Balls moved by `delta_ms` worth of travel
    Advanced {
        delta_ms: f64,
        resolution: Resolution,
    },
}

impl TickOutcome {
    pub fn is_advanced(&self) -> bool {
        matches!(self, TickOutcome::Advanced { .. })
    }
}

/// Remembers when the previous update ran
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UpdateClock {
    last_time: f64,
}

impl UpdateClock {
    /// Start measuring from `now` (ms)
    pub fn new(now: f64) -> Self {
        Self { last_time: now }
    }

    pub fn last_time(&self) -> f64 {
        self.last_time
    }

    /// Advance `state` to `now`, skipping all work when no time has passed
    pub fn update(&mut self, state: &mut SimState, now: f64) -> TickOutcome {
        let delta_ms = now - self.last_time;
        if delta_ms == 0.0 {
            return TickOutcome::Skipped;
        }
        self.last_time = now;

        let resolution = tick(state, delta_ms);
        TickOutcome::Advanced {
            delta_ms,
            resolution,
        }
    }
}

/// Move both balls by `delta_ms`, settle collisions, then wrap onto the canvas
pub fn tick(state: &mut SimState, delta_ms: f64) -> Resolution {
    let (width, height) = (state.arena.width, state.arena.height);

    // Whole laps around the canvas land in the same place
    let travel = state.speed as f64 * delta_ms / 1000.0;
    let step = Vec2::new(
        (travel % width as f64) as f32,
        (travel % height as f64) as f32,
    );
    for ball in &mut state.balls {
        ball.advance(step);
    }

    let resolution = resolve_collisions(state);

    for ball in &mut state.balls {
        ball.wrap(width, height);
    }

    resolution
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::collision::Axis;
    use crate::sim::grid::{Cell, Grid, SeedPolicy};
    use crate::sim::state::{Arena, Ball, BallKind};

    /// 4×4 diagonal grid; the black ball sits in light cell (2, 1) heading up-left
    /// toward dark cell (1, 1), the white ball rests in dark cell (0, 3)
    fn small_state() -> SimState {
        let arena = Arena::new(80.0, 80.0, 4);
        let grid = Grid::new(4, SeedPolicy::DiagonalSplit);
        let balls = [
            Ball::new(BallKind::Black, Vec2::new(30.0, 50.0), Vec2::new(-1.0, -1.0)),
            Ball::new(BallKind::White, Vec2::new(70.0, 10.0), Vec2::new(-1.0, 1.0)),
        ];
        SimState::from_parts(arena, grid, balls, 300.0)
    }

    #[test]
    fn test_single_tick_flips_one_cell() {
        let mut state = small_state();
        let before = state.grid.clone();

        // 10 ms at 300 px/s: 3 px per axis
        let resolution = tick(&mut state, 10.0);

        assert_eq!(resolution.hits.len(), 1);
        let hit = resolution.hits[0];
        assert_eq!((hit.ball, hit.row, hit.col, hit.axis), (0, 1, 1, Axis::Y));

        let changed: Vec<(usize, usize)> = (0..4)
            .flat_map(|r| (0..4).map(move |c| (r, c)))
            .filter(|&(r, c)| state.grid.get(r, c) != before.get(r, c))
            .collect();
        assert_eq!(changed, vec![(1, 1)]);
        assert_eq!(state.grid.get(1, 1), Cell::Light);

        // Only the vertical component reversed
        assert_eq!(state.black().dir, Vec2::new(-1.0, 1.0));
        assert_eq!(state.white().dir, Vec2::new(-1.0, 1.0));
        // Snapped below the claimed cell
        assert!((state.black().pos.y - 50.0).abs() < 1e-4);
        assert!((state.black().pos.x - 27.0).abs() < 1e-4);
    }

    #[test]
    fn test_zero_delta_is_a_no_op() {
        let mut state = SimState::new(480.0, 480.0, &Settings::default(), 3);
        let mut clock = UpdateClock::new(0.0);

        assert!(clock.update(&mut state, 16.0).is_advanced());
        let balls = state.balls.clone();
        let grid = state.grid.clone();

        assert_eq!(clock.update(&mut state, 16.0), TickOutcome::Skipped);
        assert_eq!(state.balls, balls);
        assert_eq!(state.grid, grid);
        assert_eq!(clock.last_time(), 16.0);
    }

    #[test]
    fn test_huge_delta_stays_on_canvas() {
        let mut state = SimState::new(640.0, 480.0, &Settings::default(), 11);
        tick(&mut state, 1.0e9);

        for ball in &state.balls {
            assert!(ball.pos.x >= 0.0 && ball.pos.x < 640.0, "x = {}", ball.pos.x);
            assert!(ball.pos.y >= 0.0 && ball.pos.y < 480.0, "y = {}", ball.pos.y);
        }
    }

    #[test]
    fn test_extreme_speed_stays_on_canvas() {
        let settings = Settings::from_json(r#"{"speed": 1e30}"#).unwrap();
        let mut state = SimState::new(480.0, 480.0, &settings, 8);
        let mut clock = UpdateClock::new(0.0);

        for frame in 1..=20 {
            clock.update(&mut state, frame as f64 * 16.0);
            for ball in &state.balls {
                assert!(ball.pos.is_finite());
                assert!(ball.pos.x >= 0.0 && ball.pos.x < 480.0, "x = {}", ball.pos.x);
                assert!(ball.pos.y >= 0.0 && ball.pos.y < 480.0, "y = {}", ball.pos.y);
            }
        }
    }

    #[test]
    fn test_negative_travel_wraps() {
        let arena = Arena::new(80.0, 80.0, 4);
        let mut grid = Grid::new(4, SeedPolicy::DiagonalSplit);
        for row in 0..4 {
            for col in 0..4 {
                grid.set(row, col, Cell::Dark);
            }
        }
        // Two dark-ignoring balls never collide on an all-dark grid
        let balls = [
            Ball::new(BallKind::White, Vec2::new(1.0, 10.0), Vec2::new(-1.0, 1.0)),
            Ball::new(BallKind::White, Vec2::new(40.0, 79.0), Vec2::new(1.0, 1.0)),
        ];
        let mut state = SimState::from_parts(arena, grid, balls, 300.0);

        let resolution = tick(&mut state, 10.0);
        assert!(resolution.hits.is_empty());
        assert!((state.balls[0].pos.x - 78.0).abs() < 1e-4);
        assert!((state.balls[0].pos.y - 13.0).abs() < 1e-4);
        assert!((state.balls[1].pos.x - 43.0).abs() < 1e-4);
        assert!((state.balls[1].pos.y - 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_long_run_keeps_invariants() {
        let mut state = SimState::new(480.0, 480.0, &Settings::default(), 1234);
        let mut clock = UpdateClock::new(0.0);
        let mut now = 0.0;

        for _ in 0..5_000 {
            now += 4.0;
            clock.update(&mut state, now);
            for ball in &state.balls {
                assert!(ball.pos.x >= 0.0 && ball.pos.x < 480.0);
                assert!(ball.pos.y >= 0.0 && ball.pos.y < 480.0);
                assert_eq!(ball.dir.x.abs(), 1.0);
                assert_eq!(ball.dir.y.abs(), 1.0);
            }
        }
        let total = state.grid.count(Cell::Light) + state.grid.count(Cell::Dark);
        assert_eq!(total, 24 * 24);
    }
}

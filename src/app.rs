//! Simulation driver
//!
//! Owns the state, the surface and the clock, and keeps two independent
//! callback chains alive on a scheduler: render at every frame, update at every
//! turn. Each callback re-arms itself before doing its work.

use std::cell::RefCell;
use std::rc::Rc;

use crate::metrics::Metrics;
use crate::platform::Clock;
use crate::render::{RenderOptions, Surface, render_frame};
use crate::scheduler::Scheduler;
use crate::settings::Settings;
use crate::sim::{SimState, TickOutcome, UpdateClock};

/// Simulation instance holding all state
pub struct Simulation<S: Surface> {
    state: SimState,
    surface: S,
    clock: Box<dyn Clock>,
    updates: UpdateClock,
    metrics: Metrics,
    options: RenderOptions,
}

impl<S: Surface> Simulation<S> {
    /// Build a simulation sized to `surface`
    ///
    /// Uses `settings.rng_seed` for the starting offsets, or a random seed.
    pub fn new(surface: S, clock: Box<dyn Clock>, settings: &Settings) -> Self {
        let seed = settings.rng_seed.unwrap_or_else(rand::random);
        let state = SimState::new(surface.width(), surface.height(), settings, seed);
        let now = clock.now();

        log::info!(
            "Simulation initialized: {}x{} canvas, {} split, seed {}",
            surface.width(),
            surface.height(),
            settings.seed_policy.as_str(),
            seed
        );

        Self {
            state,
            surface,
            clock,
            updates: UpdateClock::new(now),
            metrics: Metrics::new(now),
            options: RenderOptions::from(settings),
        }
    }

    pub fn state(&self) -> &SimState {
        &self.state
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Run physics up to the current time
    pub fn update(&mut self) -> TickOutcome {
        let now = self.clock.now();
        let outcome = self.updates.update(&mut self.state, now);
        if outcome.is_advanced() {
            self.metrics.record_update();
        }
        outcome
    }

    /// Draw the current state and roll the metrics window
    pub fn render(&mut self) {
        self.metrics.record_frame();
        render_frame(&mut self.surface, &self.state, &self.metrics, self.options);

        let now = self.clock.now();
        self.metrics.roll(now);
    }
}

/// Start the render and update chains
pub fn start<S: Surface + 'static>(sim: Rc<RefCell<Simulation<S>>>, scheduler: Rc<dyn Scheduler>) {
    request_frame(sim.clone(), scheduler.clone());
    request_turn(sim, scheduler);
    log::info!("Simulation running");
}

fn request_frame<S: Surface + 'static>(sim: Rc<RefCell<Simulation<S>>>, scheduler: Rc<dyn Scheduler>) {
    let next = scheduler.clone();
    scheduler.next_frame(Box::new(move |_time| {
        request_frame(sim.clone(), next);
        sim.borrow_mut().render();
    }));
}

fn request_turn<S: Surface + 'static>(sim: Rc<RefCell<Simulation<S>>>, scheduler: Rc<dyn Scheduler>) {
    let next = scheduler.clone();
    scheduler.next_turn(Box::new(move || {
        request_turn(sim.clone(), next);
        sim.borrow_mut().update();
    }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::ManualClock;
    use crate::render::{DrawCommand, RecordingSurface};
    use crate::scheduler::EventLoop;
    use crate::sim::Cell;

    fn setup() -> (Rc<RefCell<Simulation<RecordingSurface>>>, Rc<EventLoop>, ManualClock) {
        let clock = ManualClock::new(0.0);
        let settings = Settings {
            rng_seed: Some(77),
            ..Default::default()
        };
        let sim = Simulation::new(
            RecordingSurface::new(480.0, 480.0),
            Box::new(clock.clone()),
            &settings,
        );
        let sim = Rc::new(RefCell::new(sim));
        let event_loop = Rc::new(EventLoop::new());
        start(sim.clone(), event_loop.clone());
        (sim, event_loop, clock)
    }

    #[test]
    fn test_update_chain_reschedules_itself() {
        let (sim, event_loop, clock) = setup();
        let start = sim.borrow().state().black().pos;

        for _ in 0..10 {
            clock.advance(2.0);
            assert_eq!(event_loop.run_turns(), 1);
        }
        assert!(event_loop.has_ready_turns());
        assert_eq!(sim.borrow().metrics().updates, 10);
        assert_ne!(sim.borrow().state().black().pos, start);
    }

    #[test]
    fn test_turns_without_time_do_nothing() {
        let (sim, event_loop, _clock) = setup();
        let before = sim.borrow().state().balls.clone();

        for _ in 0..5 {
            event_loop.run_turns();
        }
        assert_eq!(sim.borrow().metrics().updates, 0);
        assert_eq!(sim.borrow().state().balls, before);
    }

    #[test]
    fn test_render_and_update_are_decoupled() {
        let (sim, event_loop, clock) = setup();

        // Four updates per frame for just over a second
        for _ in 0..63 {
            for _ in 0..4 {
                clock.advance(4.0);
                event_loop.run_turns();
            }
            event_loop.run_frame(clock.now());
        }

        let sim = sim.borrow();
        let metrics = sim.metrics();
        assert!(metrics.fps > 0);
        assert_eq!(metrics.ups, metrics.fps * 4);
        assert_eq!(sim.surface().frames(), 63);
    }

    #[test]
    fn test_frame_draws_current_state() {
        let (sim, event_loop, clock) = setup();
        clock.advance(16.0);
        event_loop.run_turns();
        event_loop.run_frame(16.0);

        let sim = sim.borrow();
        let lit = sim.state().grid.count(Cell::Light);
        let rects = sim
            .surface()
            .commands()
            .iter()
            .filter(|c| matches!(c, DrawCommand::FillRect { .. }))
            .count();
        assert_eq!(rects, lit + 1);

        let first_circle = sim.surface().commands().iter().find_map(|c| match c {
            DrawCommand::FillCircle { x, y, .. } => Some((*x, *y)),
            _ => None,
        });
        let black = sim.state().black().pos;
        assert_eq!(first_circle, Some((black.x, black.y)));
    }
}

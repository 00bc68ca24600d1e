//! Background simulation worker
//!
//! The surface is moved to the worker exactly once; from then on only the
//! worker's thread touches it. The worker runs both callback chains on its own
//! event loop and only listens for shutdown between turns.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};

use crate::app::{self, Simulation};
use crate::error::{Result, StartupError};
use crate::metrics::Metrics;
use crate::platform::{Clock, MonotonicClock};
use crate::render::Surface;
use crate::scheduler::EventLoop;
use crate::settings::Settings;
use crate::sim::SimState;

/// Display refresh interval of the native event loop (60 Hz)
pub const FRAME_INTERVAL_MS: f64 = 1000.0 / 60.0;

/// Messages from the owner to the worker
pub enum WorkerMessage<S> {
    /// One-way transfer of the drawing surface
    Surface { surface: S, settings: Settings },
    Shutdown,
}

/// Final snapshot returned when the worker stops
#[derive(Debug, Clone)]
pub struct WorkerReport {
    pub state: SimState,
    pub metrics: Metrics,
}

/// Handle to a simulation running on its own thread
pub struct SimulationWorker<S: Surface + Send + 'static> {
    sender: Sender<WorkerMessage<S>>,
    thread: JoinHandle<Option<WorkerReport>>,
    handed_off: bool,
}

impl<S: Surface + Send + 'static> SimulationWorker<S> {
    /// Start the worker thread; it idles until it receives a surface
    pub fn spawn() -> Result<Self> {
        let (sender, receiver) = mpsc::channel();
        let thread = thread::Builder::new()
            .name("torus-duel-sim".into())
            .spawn(move || run_worker(receiver))?;

        Ok(Self {
            sender,
            thread,
            handed_off: false,
        })
    }

    /// Give the worker exclusive ownership of `surface` and start simulating
    pub fn handoff(&mut self, surface: S, settings: Settings) -> Result<()> {
        if self.handed_off {
            return Err(StartupError::AlreadyHandedOff);
        }
        self.sender
            .send(WorkerMessage::Surface { surface, settings })
            .map_err(|_| StartupError::WorkerGone)?;
        self.handed_off = true;
        log::info!("Surface handed off to worker");
        Ok(())
    }

    /// Stop the worker and collect its final state (`None` if never started)
    pub fn shutdown(self) -> Result<Option<WorkerReport>> {
        // A worker that already exited has dropped its receiver
        let _ = self.sender.send(WorkerMessage::Shutdown);
        self.thread.join().map_err(|_| StartupError::WorkerGone)
    }
}

fn run_worker<S: Surface + 'static>(receiver: Receiver<WorkerMessage<S>>) -> Option<WorkerReport> {
    let (surface, settings) = match receiver.recv() {
        Ok(WorkerMessage::Surface { surface, settings }) => (surface, settings),
        Ok(WorkerMessage::Shutdown) | Err(_) => {
            log::info!("Worker stopped before receiving a surface");
            return None;
        }
    };

    let clock = MonotonicClock::new();
    let sim = Rc::new(RefCell::new(Simulation::new(surface, Box::new(clock), &settings)));
    let event_loop = Rc::new(EventLoop::new());
    app::start(sim.clone(), event_loop.clone());

    event_loop.run(&clock, FRAME_INTERVAL_MS, || match receiver.try_recv() {
        Ok(WorkerMessage::Shutdown) | Err(TryRecvError::Disconnected) => true,
        Ok(WorkerMessage::Surface { .. }) => {
            log::warn!("Ignoring second surface; the worker already owns one");
            false
        }
        Err(TryRecvError::Empty) => false,
    });

    let sim = sim.borrow();
    log::info!(
        "Worker stopped after {:.0} ms: {} fps, {} ups",
        clock.now(),
        sim.metrics().fps,
        sim.metrics().ups
    );
    Some(WorkerReport {
        state: sim.state().clone(),
        metrics: *sim.metrics(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RecordingSurface;
    use crate::sim::Cell;
    use std::time::Duration;

    fn settings() -> Settings {
        Settings {
            rng_seed: Some(2024),
            ..Default::default()
        }
    }

    #[test]
    fn test_worker_runs_after_handoff() {
        let mut worker = SimulationWorker::spawn().unwrap();
        worker
            .handoff(RecordingSurface::new(480.0, 480.0), settings())
            .unwrap();
        thread::sleep(Duration::from_millis(100));

        let report = worker.shutdown().unwrap().expect("worker should have started");
        let start = SimState::new(480.0, 480.0, &settings(), 2024);
        assert_ne!(report.state.balls, start.balls);

        for ball in &report.state.balls {
            assert!(ball.pos.x >= 0.0 && ball.pos.x < 480.0);
            assert!(ball.pos.y >= 0.0 && ball.pos.y < 480.0);
        }
        let cells = report.state.grid.count(Cell::Light) + report.state.grid.count(Cell::Dark);
        assert_eq!(cells, 24 * 24);
    }

    #[test]
    fn test_second_handoff_is_rejected() {
        let mut worker = SimulationWorker::spawn().unwrap();
        worker
            .handoff(RecordingSurface::new(240.0, 240.0), settings())
            .unwrap();

        let again = worker.handoff(RecordingSurface::new(240.0, 240.0), settings());
        assert!(matches!(again, Err(StartupError::AlreadyHandedOff)));
        assert!(worker.shutdown().unwrap().is_some());
    }

    #[test]
    fn test_shutdown_without_surface() {
        let worker = SimulationWorker::<RecordingSurface>::spawn().unwrap();
        assert!(worker.shutdown().unwrap().is_none());
    }
}

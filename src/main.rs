//! Torus Duel entry point
//!
//! Natively the simulation runs headless on a worker thread for a few seconds.
//! The web build starts from `torus_duel::web::wasm_main` instead.

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is torus_duel::web::wasm_main, this is just to satisfy the compiler
}

/// Default headless run length
#[cfg(not(target_arch = "wasm32"))]
const DEFAULT_RUN_SECS: f64 = 3.0;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::time::Duration;

    use torus_duel::Settings;
    use torus_duel::render::RecordingSurface;
    use torus_duel::sim::Cell;
    use torus_duel::worker::SimulationWorker;

    env_logger::init();
    log::info!("Torus Duel (native, headless) starting...");

    let secs = match std::env::args().nth(1).map(|arg| arg.parse::<f64>()) {
        None => DEFAULT_RUN_SECS,
        Some(Ok(secs)) if secs > 0.0 && secs.is_finite() => secs,
        Some(_) => {
            log::error!("Usage: torus-duel [seconds]");
            std::process::exit(2);
        }
    };

    let settings = Settings::load();
    if let Err(e) = settings.validate() {
        log::error!("Invalid settings: {}", e);
        std::process::exit(2);
    }
    let surface = RecordingSurface::new(settings.width as f32, settings.height as f32);

    let report = SimulationWorker::spawn()
        .and_then(|mut worker| {
            worker.handoff(surface, settings)?;
            std::thread::sleep(Duration::from_secs_f64(secs));
            worker.shutdown()
        })
        .unwrap_or_else(|e| {
            log::error!("{}", e);
            std::process::exit(1);
        });

    match report {
        Some(report) => {
            let grid = &report.state.grid;
            println!(
                "{:.1}s: {} fps, {} ups, {} light / {} dark cells",
                secs,
                report.metrics.fps,
                report.metrics.ups,
                grid.count(Cell::Light),
                grid.count(Cell::Dark)
            );
        }
        None => log::warn!("Simulation never started"),
    }
}

//! Startup errors
//!
//! Everything here is an environment precondition. Entry points fail fast on
//! these; nothing inside the running loop can produce one.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("No canvas element found: {0}")]
    MissingCanvas(String),

    #[error("Canvas has no 2D context")]
    MissingContext,

    #[error("Not running inside a dedicated worker")]
    NotInWorker,

    #[error("Scheduler unavailable: {0}")]
    Scheduler(String),

    #[error("Surface was already handed off")]
    AlreadyHandedOff,

    #[error("Worker is no longer running")]
    WorkerGone,

    #[error("Failed to spawn worker: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("Failed to start worker: {0}")]
    WorkerStart(String),

    #[error("Ball speed must be finite and non-negative, got {0}")]
    InvalidSpeed(f32),

    #[error("Surface has no area: {width}x{height}")]
    EmptySurface { width: u32, height: u32 },

    #[error("At least one collision pass per tick is required")]
    NoResolvePasses,

    #[error("Malformed message: {0}")]
    Message(String),
}

pub type Result<T> = std::result::Result<T, StartupError>;

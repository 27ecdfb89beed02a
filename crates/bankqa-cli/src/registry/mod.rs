//! Per-invocation run directories: config snapshot, JSON log, result artifact.

mod logging;
mod run;

pub use logging::init_run_logging;
pub use run::{start_run, write_artifact, RunContext};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("run directory io failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("run artifact encoding failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("tracing subscriber already installed: {0}")]
    Subscriber(#[from] tracing_subscriber::util::TryInitError),
}

pub type RegistryResult<T> = Result<T, RegistryError>;

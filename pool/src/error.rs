use std::fmt;
use std::io;
use std::time::Duration;

use engine::EngineError;

#[derive(Debug)]
pub enum PoolError {
    /// Every worker is busy and the queue is at capacity. Retry later.
    QueueFull,

    /// No result arrived within the job timeout. The job's eventual result is discarded.
    Timeout(Duration),

    /// The pool is shutting down and accepts no new work.
    ShuttingDown,

    InvalidConfig(String),

    /// A worker thread could not be started.
    Spawn(io::Error),

    /// The engine failed on this job.
    Engine(EngineError),
}

impl fmt::Display for PoolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoolError::QueueFull => write!(f, "queue full, try again later"),
            PoolError::Timeout(timeout) => write!(f, "evaluation timed out after {:?}", timeout),
            PoolError::ShuttingDown => write!(f, "pool is shutting down"),
            PoolError::InvalidConfig(msg) => write!(f, "invalid pool config: {}", msg),
            PoolError::Spawn(e) => write!(f, "failed to start worker: {}", e),
            PoolError::Engine(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for PoolError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PoolError::Spawn(e) => Some(e),
            PoolError::Engine(e) => Some(e),
            _ => None,
        }
    }
}

impl From<EngineError> for PoolError {
    fn from(e: EngineError) -> Self {
        PoolError::Engine(e)
    }
}

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

/// Failure of a single analysis. Never affects other jobs.
#[derive(Debug)]
pub enum EngineError {
    /// The engine binary could not be started.
    Spawn { path: PathBuf, source: io::Error },

    /// Reading from or writing to the engine failed.
    Io(io::Error),

    /// The engine broke the protocol, e.g. closed its output before `bestmove`.
    Protocol(String),

    /// No `bestmove` arrived, even after `stop`.
    Unresponsive(Duration),

    /// The position string was empty.
    InvalidPosition,

    /// The job was dropped before an engine was started for it.
    Cancelled,

    /// The analysis panicked.
    Panicked(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Spawn { path, source } => {
                write!(f, "failed to spawn engine at {}: {}", path.display(), source)
            }
            EngineError::Io(e) => write!(f, "engine i/o error: {}", e),
            EngineError::Protocol(msg) => write!(f, "engine protocol error: {}", msg),
            EngineError::Unresponsive(waited) => {
                write!(f, "engine sent no bestmove within {:?}", waited)
            }
            EngineError::InvalidPosition => write!(f, "empty position"),
            EngineError::Cancelled => write!(f, "evaluation cancelled"),
            EngineError::Panicked(msg) => write!(f, "evaluation panicked: {}", msg),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::Spawn { source, .. } => Some(source),
            EngineError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for EngineError {
    fn from(e: io::Error) -> Self {
        EngineError::Io(e)
    }
}

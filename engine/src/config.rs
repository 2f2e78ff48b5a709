use std::path::PathBuf;
use std::time::Duration;

/// How to launch and drive the external engine for a single analysis.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Engine binary, resolved through `PATH` when not absolute.
    pub path: PathBuf,
    pub args: Vec<String>,

    // Sent as `setoption` directives during the handshake.
    pub threads: usize,
    pub hash_mb: usize,

    /// Number of ranked lines requested through `MultiPV`.
    pub lines: usize,

    /// Fixed search budget per position (`go movetime`).
    pub movetime_ms: u64,

    /// Upper bound on moves kept per principal variation.
    pub max_pv_moves: usize,

    /// Extra time the engine gets past `movetime_ms` before `stop` is sent,
    /// and again after `stop` before it is considered unresponsive.
    pub response_grace: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("stockfish"),
            args: Vec::new(),
            threads: 1,
            hash_mb: 100,
            lines: 3,
            movetime_ms: 500,
            max_pv_moves: 32,
            response_grace: Duration::from_secs(2),
        }
    }
}

impl EngineConfig {
    pub fn movetime(&self) -> Duration {
        Duration::from_millis(self.movetime_ms)
    }
}

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use engine::EngineConfig;
use pool::PoolConfig;

#[derive(Parser, Debug)]
#[command(name = "evalpool")]
#[command(author = "Jørgen Hanssen <jorgen@hanssen.io>")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Evaluate FEN positions with a pool of UCI engine processes")]
pub struct Args {
    /// UCI engine binary.
    #[arg(short, long, default_value = "stockfish")]
    pub engine: PathBuf,

    /// Extra argument passed to the engine (repeatable).
    #[arg(long = "engine-arg", allow_hyphen_values = true)]
    pub engine_args: Vec<String>,

    /// Concurrent engine processes.
    #[arg(short, long, default_value_t = default_workers())]
    pub workers: usize,

    /// Positions allowed to wait for a free worker.
    #[arg(long, default_value_t = 100)]
    pub queue_size: usize,

    /// Per-position time limit, queueing included.
    #[arg(long, default_value_t = 5000)]
    pub timeout_ms: u64,

    /// Engine search time per position.
    #[arg(long, default_value_t = 500)]
    pub movetime: u64,

    /// Ranked lines to report (MultiPV).
    #[arg(long, default_value_t = 3)]
    pub lines: usize,

    /// Engine threads per process.
    #[arg(long, default_value_t = 1)]
    pub threads: usize,

    /// Engine hash size per process, in MB.
    #[arg(long, default_value_t = 100)]
    pub hash: usize,

    /// Remember this many results; 0 disables.
    #[arg(long, default_value_t = 0)]
    pub memo: usize,

    /// Read positions from a file instead of stdin, one FEN per line.
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Log engine communication to a file for debugging.
    #[arg(short, long)]
    pub log_file: Option<PathBuf>,
}

fn default_workers() -> usize {
    num_cpus::get().clamp(1, 4)
}

impl Args {
    pub fn pool_config(&self) -> PoolConfig {
        PoolConfig {
            workers: self.workers,
            queue_size: self.queue_size,
            job_timeout: Duration::from_millis(self.timeout_ms),
            memo_capacity: self.memo,
        }
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            path: self.engine.clone(),
            args: self.engine_args.clone(),
            threads: self.threads,
            hash_mb: self.hash,
            lines: self.lines,
            movetime_ms: self.movetime,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["evalpool"]);
        let pool = args.pool_config();
        let engine = args.engine_config();

        assert!((1..=4).contains(&pool.workers));
        assert_eq!(pool.queue_size, 100);
        assert_eq!(pool.job_timeout, Duration::from_secs(5));
        assert_eq!(engine.path, PathBuf::from("stockfish"));
        assert_eq!(engine.lines, 3);
        assert_eq!(engine.movetime_ms, 500);
    }

    #[test]
    fn test_overrides() {
        let args = Args::parse_from([
            "evalpool",
            "--engine",
            "/usr/games/stockfish",
            "--engine-arg",
            "--quiet",
            "--workers",
            "8",
            "--queue-size",
            "0",
            "--lines",
            "1",
            "--memo",
            "64",
        ]);

        assert_eq!(args.engine_args, vec!["--quiet".to_string()]);
        assert_eq!(args.pool_config().workers, 8);
        assert_eq!(args.pool_config().queue_size, 0);
        assert_eq!(args.pool_config().memo_capacity, 64);
        assert_eq!(args.engine_config().lines, 1);
    }
}

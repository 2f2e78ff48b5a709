//! Bounded worker pool for engine evaluations.
//!
//! A fixed number of workers pull positions from a bounded queue and hand
//! each one to an [`engine::Analyzer`]. Callers block in
//! [`WorkerPool::submit`] until the result arrives or the job timeout
//! expires; a full queue rejects work immediately instead of buffering it.

mod config;
mod error;
mod job;
mod memo;
mod pool;
mod stats;
mod worker;

pub use config::PoolConfig;
pub use error::PoolError;
pub use memo::ResultMemo;
pub use pool::WorkerPool;
pub use stats::PoolStats;

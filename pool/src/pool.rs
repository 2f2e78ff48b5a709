use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam::channel::{self, RecvTimeoutError, Sender, TrySendError};
use engine::{Analyzer, EngineError, Evaluation};
use log::{debug, info, warn};
use parking_lot::{Mutex, RwLock};

use crate::job::Job;
use crate::memo::ResultMemo;
use crate::stats::{Counters, PoolStats};
use crate::worker::Worker;
use crate::{PoolConfig, PoolError};

/// State shared between the pool handle and its workers.
pub(crate) struct Shared {
    stopping: AtomicBool,
    pub counters: Counters,
    pub memo: ResultMemo,
}

impl Shared {
    fn new(memo_capacity: usize) -> Self {
        Self {
            stopping: AtomicBool::new(false),
            counters: Counters::default(),
            memo: ResultMemo::new(memo_capacity),
        }
    }

    #[inline]
    pub fn is_stopping(&self) -> bool {
        self.stopping.load(Ordering::Acquire)
    }
}

/// A fixed set of workers evaluating positions from a bounded queue.
///
/// At most `workers` engine processes run at once and at most
/// `queue_size` jobs wait for one. Work beyond that is rejected
/// immediately with [`PoolError::QueueFull`].
pub struct WorkerPool {
    config: PoolConfig,
    // `None` once shutdown has closed the queue.
    jobs: RwLock<Option<Sender<Job>>>,
    handles: Mutex<Vec<JoinHandle<()>>>,
    shared: Arc<Shared>,
}

impl WorkerPool {
    pub fn new(config: PoolConfig, analyzer: Arc<dyn Analyzer>) -> Result<Self, PoolError> {
        config.validate()?;

        let (tx, rx) = channel::bounded(config.queue_size);
        let shared = Arc::new(Shared::new(config.memo_capacity));
        let mut handles = Vec::with_capacity(config.workers);

        for id in 0..config.workers {
            let worker = Worker::new(id, rx.clone(), Arc::clone(&analyzer), Arc::clone(&shared));
            let spawned = thread::Builder::new()
                .name(format!("eval-worker-{}", id))
                .spawn(move || worker.run());

            match spawned {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    // Closing the queue lets the workers started so far exit.
                    drop(tx);
                    for handle in handles {
                        let _ = handle.join();
                    }
                    return Err(PoolError::Spawn(e));
                }
            }
        }

        info!(
            "Started {} workers (queue size {}, job timeout {:?})",
            config.workers, config.queue_size, config.job_timeout
        );

        Ok(Self {
            config,
            jobs: RwLock::new(Some(tx)),
            handles: Mutex::new(handles),
            shared,
        })
    }

    /// Evaluates `fen`, blocking until a result arrives or the job timeout elapses.
    ///
    /// Never waits for queue space: a saturated pool fails with
    /// [`PoolError::QueueFull`]. After a timeout the worker still finishes
    /// the job and its result is dropped.
    pub fn submit(&self, fen: &str) -> Result<Evaluation, PoolError> {
        if self.shared.is_stopping() {
            return Err(PoolError::ShuttingDown);
        }

        if let Some(evaluation) = self.shared.memo.get(fen) {
            Counters::bump(&self.shared.counters.memo_hits);
            return Ok(evaluation);
        }

        let (job, reply) = Job::new(fen.to_string());
        {
            let jobs = self.jobs.read();
            let Some(tx) = jobs.as_ref() else {
                return Err(PoolError::ShuttingDown);
            };

            match tx.try_send(job) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => {
                    Counters::bump(&self.shared.counters.rejected);
                    debug!("Rejected {:?}: queue full", fen);
                    return Err(PoolError::QueueFull);
                }
                Err(TrySendError::Disconnected(_)) => return Err(PoolError::ShuttingDown),
            }
        }

        match reply.recv_timeout(self.config.job_timeout) {
            Ok(Ok(evaluation)) => Ok(evaluation),
            Ok(Err(EngineError::Cancelled)) => Err(PoolError::ShuttingDown),
            Ok(Err(e)) => Err(PoolError::Engine(e)),
            Err(RecvTimeoutError::Timeout) => {
                Counters::bump(&self.shared.counters.timed_out);
                debug!("Timed out waiting for {:?}", fen);
                Err(PoolError::Timeout(self.config.job_timeout))
            }
            Err(RecvTimeoutError::Disconnected) => Err(PoolError::ShuttingDown),
        }
    }

    /// Stops accepting work and waits for every worker to finish its current job.
    ///
    /// Jobs still queued are answered with [`PoolError::ShuttingDown`].
    /// Safe to call more than once; later calls wait for the first to finish.
    pub fn shutdown(&self) {
        let first = !self.shared.stopping.swap(true, Ordering::AcqRel);
        if first {
            info!("Shutting down worker pool");
        }

        // Dropping the sender closes the queue once it drains.
        drop(self.jobs.write().take());

        let mut handles = self.handles.lock();
        for handle in handles.drain(..) {
            if handle.join().is_err() {
                warn!("A worker panicked while shutting down");
            }
        }

        if first {
            info!("All workers stopped");
        }
    }

    pub fn is_shutting_down(&self) -> bool {
        self.shared.is_stopping()
    }

    pub fn stats(&self) -> PoolStats {
        let counters = &self.shared.counters;

        PoolStats {
            workers: self.config.workers,
            queued: self.jobs.read().as_ref().map_or(0, |tx| tx.len()),
            in_flight: Counters::read(&counters.in_flight),
            completed: Counters::read(&counters.completed),
            failed: Counters::read(&counters.failed),
            rejected: Counters::read(&counters.rejected),
            timed_out: Counters::read(&counters.timed_out),
            memo_hits: Counters::read(&counters.memo_hits),
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

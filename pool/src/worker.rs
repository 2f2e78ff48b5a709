use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::Ordering;
use std::sync::Arc;

use crossbeam::channel::Receiver;
use engine::{Analyzer, EngineError};
use log::{debug, info, warn};

use crate::job::{Job, JobOutcome};
use crate::pool::Shared;
use crate::stats::Counters;

/// Pulls jobs off the shared queue and evaluates them one at a time.
///
/// Exits once the queue is closed and drained. Jobs still queued after
/// shutdown has begun are answered with [`EngineError::Cancelled`]
/// without starting an engine.
pub struct Worker {
    id: usize,
    jobs: Receiver<Job>,
    analyzer: Arc<dyn Analyzer>,
    shared: Arc<Shared>,
}

impl Worker {
    pub fn new(
        id: usize,
        jobs: Receiver<Job>,
        analyzer: Arc<dyn Analyzer>,
        shared: Arc<Shared>,
    ) -> Self {
        Self {
            id,
            jobs,
            analyzer,
            shared,
        }
    }

    /// Main loop: process jobs until the queue is closed.
    pub fn run(self) {
        debug!("[Worker {}] Started", self.id);

        while let Ok(job) = self.jobs.recv() {
            if self.shared.is_stopping() {
                job.complete(Err(EngineError::Cancelled));
                continue;
            }
            self.process(job);
        }

        info!("[Worker {}] Shutting down", self.id);
    }

    fn process(&self, job: Job) {
        let counters = &self.shared.counters;

        counters.in_flight.fetch_add(1, Ordering::Relaxed);
        let outcome = evaluate(self.analyzer.as_ref(), &job.fen);
        counters.in_flight.fetch_sub(1, Ordering::Relaxed);

        match &outcome {
            Ok(evaluation) => {
                self.shared.memo.insert(&job.fen, evaluation);
                Counters::bump(&counters.completed);
            }
            Err(e) => {
                warn!("[Worker {}] Evaluation of {:?} failed: {}", self.id, job.fen, e);
                Counters::bump(&counters.failed);
            }
        }

        let fen = job.fen.clone();
        if !job.complete(outcome) {
            debug!("[Worker {}] Discarding late result for {:?}", self.id, fen);
        }
    }
}

fn evaluate(analyzer: &dyn Analyzer, fen: &str) -> JobOutcome {
    panic::catch_unwind(AssertUnwindSafe(|| analyzer.analyze(fen)))
        .unwrap_or_else(|payload| Err(EngineError::Panicked(panic_message(payload.as_ref()))))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

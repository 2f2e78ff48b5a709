use crossbeam::channel::{self, Receiver, Sender};
use engine::{EngineError, Evaluation};

pub type JobOutcome = Result<Evaluation, EngineError>;

/// A position waiting for, or being evaluated by, a worker.
pub struct Job {
    pub fen: String,
    reply: Sender<JobOutcome>,
}

impl Job {
    /// Creates a job together with the receiving end of its reply slot.
    ///
    /// The slot holds one outcome, so a worker finishing after the caller
    /// gave up never blocks.
    pub fn new(fen: String) -> (Self, Receiver<JobOutcome>) {
        let (reply, rx) = channel::bounded(1);
        (Self { fen, reply }, rx)
    }

    /// Delivers the outcome. Returns false if the caller stopped waiting.
    pub fn complete(self, outcome: JobOutcome) -> bool {
        self.reply.try_send(outcome).is_ok()
    }
}

use std::sync::atomic::{AtomicUsize, Ordering};

/// Running totals shared by the pool handle and its workers.
#[derive(Debug, Default)]
pub(crate) struct Counters {
    pub in_flight: AtomicUsize,
    pub completed: AtomicUsize,
    pub failed: AtomicUsize,
    pub rejected: AtomicUsize,
    pub timed_out: AtomicUsize,
    pub memo_hits: AtomicUsize,
}

impl Counters {
    #[inline]
    pub fn bump(counter: &AtomicUsize) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn read(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::Relaxed)
    }
}

/// Point-in-time view of pool load. Values are read independently and may be
/// slightly inconsistent with each other under load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    pub workers: usize,
    pub queued: usize,
    pub in_flight: usize,
    pub completed: usize,
    pub failed: usize,
    pub rejected: usize,
    pub timed_out: usize,
    pub memo_hits: usize,
}

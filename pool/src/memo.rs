use std::collections::VecDeque;

use ahash::AHashMap;
use engine::Evaluation;
use parking_lot::Mutex;

/// Best-effort cache of finished evaluations, keyed by position.
///
/// A single lock guards the map and its eviction order; it is never held
/// while an engine runs. Oldest entries are evicted first.
pub struct ResultMemo {
    capacity: usize,
    inner: Mutex<MemoInner>,
}

#[derive(Default)]
struct MemoInner {
    entries: AHashMap<String, Evaluation>,
    order: VecDeque<String>,
}

impl ResultMemo {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            inner: Mutex::new(MemoInner::default()),
        }
    }

    fn is_enabled(&self) -> bool {
        self.capacity > 0
    }

    pub fn get(&self, fen: &str) -> Option<Evaluation> {
        if !self.is_enabled() {
            return None;
        }
        self.inner.lock().entries.get(fen.trim()).cloned()
    }

    pub fn insert(&self, fen: &str, evaluation: &Evaluation) {
        if !self.is_enabled() {
            return;
        }

        let key = fen.trim();
        let mut inner = self.inner.lock();

        if let Some(existing) = inner.entries.get_mut(key) {
            *existing = evaluation.clone();
            return;
        }

        while inner.entries.len() >= self.capacity {
            let Some(oldest) = inner.order.pop_front() else {
                break;
            };
            inner.entries.remove(&oldest);
        }

        inner.order.push_back(key.to_string());
        inner.entries.insert(key.to_string(), evaluation.clone());
    }
}

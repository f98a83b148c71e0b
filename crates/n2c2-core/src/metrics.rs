//! Run counters for `n2c2-eval`.
//!
//! Loading and scoring bump a [`Counter`] on the process-wide [`METRICS`];
//! the binary reports them once at exit through [`Metrics::flush`].

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Process-wide counters.
pub static METRICS: Metrics = Metrics::new();

/// What a run counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Counter {
    /// Annotation files parsed, gold and system alike.
    DocumentsLoaded,
    /// Gold/system pairs classified.
    PairsEvaluated,
    /// Files present in only one of the two folders.
    FilesSkipped,
}

impl Counter {
    pub const ALL: [Counter; 3] = [
        Counter::DocumentsLoaded,
        Counter::PairsEvaluated,
        Counter::FilesSkipped,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Counter::DocumentsLoaded => "documents_loaded",
            Counter::PairsEvaluated => "pairs_evaluated",
            Counter::FilesSkipped => "files_skipped",
        }
    }

    fn slot(self) -> usize {
        self as usize
    }
}

/// Point-in-time copy of every counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub documents_loaded: u64,
    pub pairs_evaluated: u64,
    pub files_skipped: u64,
}

/// One atomic slot per [`Counter`].
pub struct Metrics {
    slots: [AtomicU64; 3],
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub const fn new() -> Self {
        Self {
            slots: [AtomicU64::new(0), AtomicU64::new(0), AtomicU64::new(0)],
        }
    }

    pub fn incr(&self, counter: Counter) {
        self.add(counter, 1);
    }

    pub fn add(&self, counter: Counter, amount: u64) {
        if amount == 0 {
            return;
        }
        self.slots[counter.slot()].fetch_add(amount, Ordering::Relaxed);
        tracing::trace!(metric = counter.name(), amount, "counter incremented");
    }

    pub fn get(&self, counter: Counter) -> u64 {
        self.slots[counter.slot()].load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            documents_loaded: self.get(Counter::DocumentsLoaded),
            pairs_evaluated: self.get(Counter::PairsEvaluated),
            files_skipped: self.get(Counter::FilesSkipped),
        }
    }

    /// Log the current values as one `info!` event.
    pub fn flush(&self) {
        let s = self.snapshot();
        tracing::info!(
            event = "run.counters",
            documents_loaded = s.documents_loaded,
            pairs_evaluated = s.pairs_evaluated,
            files_skipped = s.files_skipped,
        );
    }

    /// Zero every counter.
    pub fn reset(&self) {
        for counter in Counter::ALL {
            self.slots[counter.slot()].store(0, Ordering::Relaxed);
        }
    }
}

//! Shared pieces every stage worker holds: cancellation token, emitter, per-stage counters.

use crossbeam_channel::Sender;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crate::Record;

/// Single top-level cancellation signal for a run. Cloned into every worker.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Downstream is gone (all receivers dropped) or the run was cancelled. The worker should return.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Closed;

impl std::fmt::Display for Closed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("pipeline closed")
    }
}

impl std::error::Error for Closed {}

/// Live counters for one stage, shared by its workers.
#[derive(Debug)]
pub struct StageCounters {
    pub name: &'static str,
    pub workers: usize,
    received: AtomicUsize,
    emitted: AtomicUsize,
}

impl StageCounters {
    pub fn new(name: &'static str, workers: usize) -> Self {
        Self {
            name,
            workers,
            received: AtomicUsize::new(0),
            emitted: AtomicUsize::new(0),
        }
    }

    pub(crate) fn record_received(&self) {
        self.received.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StageStats {
        StageStats {
            name: self.name,
            workers: self.workers,
            received: self.received.load(Ordering::Relaxed),
            emitted: self.emitted.load(Ordering::Relaxed),
        }
    }
}

/// Counters for one stage after the run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StageStats {
    pub name: &'static str,
    pub workers: usize,
    /// Records taken from the input channel (0 for the source).
    pub received: usize,
    /// Records sent on the output channel.
    pub emitted: usize,
}

/// A worker's handle on its stage's output channel.
///
/// Each worker owns one clone of the stage's sender. The output channel closes when the
/// last worker of the stage returns and drops its emitter.
pub struct Emitter {
    tx: Sender<Record>,
    cancel: CancelToken,
    counters: Arc<StageCounters>,
}

impl Emitter {
    pub fn new(tx: Sender<Record>, cancel: CancelToken, counters: Arc<StageCounters>) -> Self {
        Self {
            tx,
            cancel,
            counters,
        }
    }

    /// Send one record downstream. Blocks while the channel is full (backpressure).
    pub fn emit(&self, record: Record) -> Result<(), Closed> {
        if self.cancel.is_cancelled() {
            return Err(Closed);
        }
        self.tx.send(record).map_err(|_| Closed)?;
        self.counters.emitted.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub(crate) fn counters(&self) -> &StageCounters {
        &self.counters
    }
}

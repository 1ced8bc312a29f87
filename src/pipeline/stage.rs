//! Stage roles: what a stage does to one record, and the adapters that turn that into a worker loop.
//!
//! The adapters here are the only place that loops over channels. Stage implementations only
//! see one record (or, for the source, one call) at a time.

use crossbeam_channel::Receiver;
use log::warn;
use std::io;

use super::context::{Closed, Emitter};
use crate::Record;

/// One worker of a stage: read `input` until it closes, write to `output`.
///
/// `input` is `None` for the first stage. Returning drops `output`; once every worker of
/// the stage has returned, the downstream channel closes.
pub trait StageWorker: Send + Sync {
    fn run(&self, input: Option<Receiver<Record>>, output: Emitter);
}

/// Transformation of a single record into zero or more records.
///
/// Shared by every worker of a fan-out stage, so it must not hold per-record state.
/// Per-record errors are resolved inside `handle` (forward unmatched or drop); the only
/// error returned is [`Closed`], which stops the worker.
pub trait RecordHandler: Send + Sync {
    fn handle(&self, record: Record, out: &Emitter) -> Result<(), Closed>;
}

/// First stage of a chain: produces every record in one call, then returns.
pub trait RecordSource: Send + Sync {
    fn produce(&self, out: &Emitter) -> Result<(), Closed>;
}

/// Terminal consumer, run on the caller's thread after the last stage.
pub trait RecordSink {
    fn accept(&mut self, record: Record) -> io::Result<()>;

    /// Called once after the last record.
    fn finish(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<F> RecordSink for F
where
    F: FnMut(Record) -> io::Result<()>,
{
    fn accept(&mut self, record: Record) -> io::Result<()> {
        self(record)
    }
}

/// Adapts a [`RecordHandler`] into a [`StageWorker`] that loops until input closes.
pub struct HandlerWorker<H>(pub H);

impl<H: RecordHandler> StageWorker for HandlerWorker<H> {
    fn run(&self, input: Option<Receiver<Record>>, output: Emitter) {
        let Some(input) = input else {
            warn!(
                "stage '{}' has no input; a handler cannot be the first stage",
                output.counters().name
            );
            return;
        };
        while let Ok(record) = input.recv() {
            if output.is_cancelled() {
                break;
            }
            output.counters().record_received();
            if self.0.handle(record, &output).is_err() {
                break;
            }
        }
    }
}

/// Adapts a [`RecordSource`] into a [`StageWorker`] that is called once.
pub struct SourceWorker<S>(pub S);

impl<S: RecordSource> StageWorker for SourceWorker<S> {
    fn run(&self, _input: Option<Receiver<Record>>, output: Emitter) {
        let _ = self.0.produce(&output);
    }
}

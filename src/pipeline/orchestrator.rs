use crossbeam_channel::{Receiver, bounded};
use log::{debug, error};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use super::context::{CancelToken, Emitter, StageCounters, StageStats};
use super::stage::{HandlerWorker, RecordHandler, RecordSink, RecordSource, SourceWorker, StageWorker};
use crate::Record;
use crate::error::ScanError;

struct StageSpec {
    name: &'static str,
    worker: Arc<dyn StageWorker>,
    parallelism: usize,
}

/// Builds a fixed, linear chain: one source, then handlers in order, each with its own fan-out.
///
/// ```ignore
/// let handles = PipelineBuilder::from_source("enumerate", enumerator)
///     .stage("filter", filter, 1)
///     .stage("archive", archive_scanner, 8)
///     .spawn()?;
/// let stats = handles.drain(&mut reporter)?;
/// ```
pub struct PipelineBuilder {
    stages: Vec<StageSpec>,
    channel_cap: usize,
    cancel: CancelToken,
}

impl PipelineBuilder {
    /// Start a chain with `source` as the first stage (parallelism 1).
    pub fn from_source<S: RecordSource + 'static>(name: &'static str, source: S) -> Self {
        Self {
            stages: vec![StageSpec {
                name,
                worker: Arc::new(SourceWorker(source)),
                parallelism: 1,
            }],
            channel_cap: super::DEFAULT_CHANNEL_CAP,
            cancel: CancelToken::new(),
        }
    }

    /// Append a handler stage run by `parallelism` workers sharing one input and one output channel.
    pub fn stage<H: RecordHandler + 'static>(
        self,
        name: &'static str,
        handler: H,
        parallelism: usize,
    ) -> Self {
        self.worker(name, Arc::new(HandlerWorker(handler)), parallelism)
    }

    /// Append a stage from a raw [`StageWorker`]. Parallelism 0 is treated as 1.
    pub fn worker(
        mut self,
        name: &'static str,
        worker: Arc<dyn StageWorker>,
        parallelism: usize,
    ) -> Self {
        self.stages.push(StageSpec {
            name,
            worker,
            parallelism: parallelism.max(1),
        });
        self
    }

    /// Bounded capacity of every hop. 0 is treated as 1.
    pub fn channel_cap(mut self, cap: usize) -> Self {
        self.channel_cap = cap.max(1);
        self
    }

    pub fn cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Create the channels and start every worker. Stage i's output is stage i+1's input.
    pub fn spawn(self) -> Result<PipelineHandles, ScanError> {
        let PipelineBuilder {
            stages,
            channel_cap,
            cancel,
        } = self;

        let mut input: Option<Receiver<Record>> = None;
        let mut workers = Vec::new();
        let mut counters = Vec::with_capacity(stages.len());

        for spec in stages {
            let (tx, rx) = bounded::<Record>(channel_cap);
            let stage_counters = Arc::new(StageCounters::new(spec.name, spec.parallelism));
            debug!(
                "pipeline: stage '{}' x{} (cap {})",
                spec.name, spec.parallelism, channel_cap
            );
            for i in 0..spec.parallelism {
                let worker = Arc::clone(&spec.worker);
                let input = input.clone();
                let output = Emitter::new(tx.clone(), cancel.clone(), Arc::clone(&stage_counters));
                let guard = PanicGuard {
                    stage: spec.name,
                    cancel: cancel.clone(),
                };
                let handle = thread::Builder::new()
                    .name(format!("{}-{}", spec.name, i))
                    .spawn(move || {
                        let _guard = guard;
                        worker.run(input, output);
                    })
                    .map_err(|source| {
                        cancel.cancel();
                        ScanError::Spawn {
                            stage: spec.name,
                            source,
                        }
                    })?;
                workers.push(WorkerHandle {
                    stage: spec.name,
                    handle,
                });
            }
            // Workers now hold the only senders; the channel closes when the last one returns.
            drop(tx);
            input = Some(rx);
            counters.push(stage_counters);
        }

        let output = match input {
            Some(rx) => rx,
            None => unreachable!("a pipeline always has its source stage"),
        };
        Ok(PipelineHandles {
            output,
            workers,
            counters,
            cancel,
        })
    }
}

/// Cancels the whole run if the worker thread unwinds.
struct PanicGuard {
    stage: &'static str,
    cancel: CancelToken,
}

impl Drop for PanicGuard {
    fn drop(&mut self) {
        if thread::panicking() {
            error!("worker of stage '{}' panicked; cancelling run", self.stage);
            self.cancel.cancel();
        }
    }
}

struct WorkerHandle {
    stage: &'static str,
    handle: JoinHandle<()>,
}

/// A running chain: the last stage's output plus every worker's join handle.
pub struct PipelineHandles {
    output: Receiver<Record>,
    workers: Vec<WorkerHandle>,
    counters: Vec<Arc<StageCounters>>,
    cancel: CancelToken,
}

impl PipelineHandles {
    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    /// Run `sink` on the calling thread until the last stage closes, then join all workers.
    /// A sink write error cancels the run and is logged; the remaining records are dropped.
    pub fn drain(self, sink: &mut dyn RecordSink) -> Result<Vec<StageStats>, ScanError> {
        while let Ok(record) = self.output.recv() {
            if self.cancel.is_cancelled() {
                break;
            }
            if let Err(e) = sink.accept(record) {
                error!("report sink failed: {}", e);
                self.cancel.cancel();
                break;
            }
        }
        if let Err(e) = sink.finish() {
            error!("report sink failed: {}", e);
        }
        self.join()
    }

    /// Join every worker. Drops the output first, so undrained records are discarded and
    /// blocked senders unwind. Returns per-stage counters, or the first stage that panicked.
    pub fn join(self) -> Result<Vec<StageStats>, ScanError> {
        let PipelineHandles {
            output,
            workers,
            counters,
            cancel: _,
        } = self;
        drop(output);

        let mut panicked = None;
        for w in workers {
            if w.handle.join().is_err() && panicked.is_none() {
                panicked = Some(w.stage);
            }
        }
        if let Some(stage) = panicked {
            return Err(ScanError::StagePanicked { stage });
        }

        let stats: Vec<StageStats> = counters.iter().map(|c| c.snapshot()).collect();
        for s in &stats {
            debug!(
                "pipeline: stage '{}' x{}: received {}, emitted {}",
                s.name, s.workers, s.received, s.emitted
            );
        }
        Ok(stats)
    }
}

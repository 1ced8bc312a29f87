//! Pipeline engine: stage roles, channel wiring, fan-out, shutdown, and the enumerator source.

pub mod context;
pub mod error_handler;
pub mod orchestrator;
pub mod stage;
pub mod walk;

pub use context::{CancelToken, Closed, Emitter, StageCounters, StageStats};
pub use error_handler::{Diagnostics, report_skipped};
pub use orchestrator::{PipelineBuilder, PipelineHandles};
pub use stage::{HandlerWorker, RecordHandler, RecordSink, RecordSource, SourceWorker, StageWorker};
pub use walk::{Enumerator, WalkOutcome, run_walk_loop, to_outcome_walkdir};

/// Capacity of every channel hop. Bounds memory to stages x cap records and throttles the walk
/// when the scanners fall behind.
pub const DEFAULT_CHANNEL_CAP: usize = 100;

use std::sync::Arc;

use crate::Record;
use crate::engine::core::ScanConfig;
use crate::pipeline::{Closed, Emitter, RecordHandler};

/// Applies the name pattern to every record. Only ever sets `found_name_match`, so running it
/// after a stage that already matched (or twice) changes nothing.
pub struct NameMatchStage {
    config: Arc<ScanConfig>,
}

impl NameMatchStage {
    pub fn new(config: Arc<ScanConfig>) -> Self {
        Self { config }
    }
}

impl RecordHandler for NameMatchStage {
    fn handle(&self, mut record: Record, out: &Emitter) -> Result<(), Closed> {
        self.config.names.apply(&mut record);
        out.emit(record)
    }
}

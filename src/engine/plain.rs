use std::fs::File;
use std::sync::Arc;

use crate::Record;
use crate::engine::core::ScanConfig;
use crate::pipeline::{Closed, Diagnostics, Emitter, RecordHandler};

/// Content-scans records no earlier stage has handled. Read failures leave the record
/// unmatched and are not retried.
pub struct PlainScanner {
    config: Arc<ScanConfig>,
    diagnostics: Diagnostics,
}

impl PlainScanner {
    pub fn new(config: Arc<ScanConfig>, diagnostics: Diagnostics) -> Self {
        Self {
            config,
            diagnostics,
        }
    }

    fn scan(&self, record: &mut Record) {
        let Some(content) = &self.config.content else {
            return;
        };
        if record.is_dir {
            return;
        }
        let file = match File::open(&record.path) {
            Ok(f) => f,
            Err(e) => {
                self.diagnostics.skip(&record.path, "open", e);
                return;
            }
        };
        match file.metadata() {
            Ok(meta) if !content.accepts_size(meta.len()) => {
                self.diagnostics
                    .skip(&record.path, "content", "larger than max content size");
                return;
            }
            _ => {}
        }
        match content.find_in_stream(file) {
            Ok(found) => record.found_content_match = found,
            Err(e) => self.diagnostics.skip(&record.path, "read", e),
        }
    }
}

impl RecordHandler for PlainScanner {
    fn handle(&self, mut record: Record, out: &Emitter) -> Result<(), Closed> {
        if record.processed || self.config.content.is_none() {
            return out.emit(record);
        }
        self.scan(&mut record);
        record.processed = true;
        out.emit(record)
    }
}

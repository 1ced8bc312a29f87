use crate::Record;
use crate::engine::matcher::FilterList;
use crate::pipeline::{Closed, Emitter, RecordHandler};

/// Pass records whose name matches one of the filter globs; drop the rest.
pub struct NameFilter {
    filters: FilterList,
}

impl NameFilter {
    pub fn new(filters: FilterList) -> Self {
        Self { filters }
    }
}

impl RecordHandler for NameFilter {
    fn handle(&self, record: Record, out: &Emitter) -> Result<(), Closed> {
        if self.filters.allows(&record.name) {
            out.emit(record)?;
        }
        Ok(())
    }
}

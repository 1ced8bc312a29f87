//! Archive scanner: expands zip archives into one record per member.

use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use zip::ZipArchive;

use crate::Record;
use crate::engine::core::ScanConfig;
use crate::pipeline::{Closed, Diagnostics, Emitter, RecordHandler};

/// Opens each record as a zip archive. Non-archives pass through untouched.
///
/// For an archive, the archive record is forwarded first (marked processed), then one record
/// per central directory entry as each is read. A member whose data cannot be opened or read
/// is still emitted, unmatched by content. The archive handle lives only for this one record and is
/// dropped on every return path, including a closed downstream.
pub struct ArchiveScanner {
    config: Arc<ScanConfig>,
    diagnostics: Diagnostics,
}

impl ArchiveScanner {
    pub fn new(config: Arc<ScanConfig>, diagnostics: Diagnostics) -> Self {
        Self {
            config,
            diagnostics,
        }
    }

    fn open(&self, record: &Record) -> Option<ZipArchive<File>> {
        let file = File::open(&record.path).ok()?;
        ZipArchive::new(file).ok()
    }

    fn scan_members(
        &self,
        archive: &mut ZipArchive<File>,
        archive_path: &Path,
        out: &Emitter,
    ) -> Result<(), Closed> {
        for index in 0..archive.len() {
            // Name comes from the central directory; a broken local header only costs the content.
            let Some(name) = archive.name_for_index(index).map(str::to_string) else {
                continue;
            };
            let is_dir = name.ends_with('/');
            let mut member = Record::member(archive_path, &name, is_dir);
            self.config.names.apply(&mut member);

            if let Some(content) = &self.config.content
                && !is_dir
            {
                match archive.by_index(index) {
                    Ok(reader) if !content.accepts_size(reader.size()) => {
                        self.diagnostics
                            .skip(&member.path, "content", "larger than max content size");
                    }
                    Ok(reader) => match content.find_in_stream(reader) {
                        Ok(found) => member.found_content_match = found,
                        Err(e) => self.diagnostics.skip(&member.path, "read member", e),
                    },
                    Err(e) => self.diagnostics.skip(&member.path, "open member", e),
                }
            }

            out.emit(member)?;
        }
        Ok(())
    }
}

impl RecordHandler for ArchiveScanner {
    fn handle(&self, mut record: Record, out: &Emitter) -> Result<(), Closed> {
        if record.is_dir || record.processed {
            return out.emit(record);
        }
        let Some(mut archive) = self.open(&record) else {
            return out.emit(record);
        };

        record.processed = true;
        self.config.names.apply(&mut record);
        let archive_path = record.path.clone();
        out.emit(record)?;
        self.scan_members(&mut archive, &archive_path, out)
    }
}

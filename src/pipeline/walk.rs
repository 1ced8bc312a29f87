//! Enumerator: the source stage. Walks the root and emits one record per node.

use log::debug;
use std::path::{Path, PathBuf};

use super::context::{Closed, Emitter};
use super::error_handler::Diagnostics;
use super::stage::RecordSource;
use crate::Record;
use crate::engine::tools::display_path;

/// One result from a directory walk: either a record to emit or an error with optional path.
pub enum WalkOutcome {
    Ok(Record),
    Err { msg: String, path: Option<PathBuf> },
}

/// Convert a walkdir result into [`WalkOutcome`]. `root` decides how the path is displayed.
pub fn to_outcome_walkdir(
    r: Result<walkdir::DirEntry, walkdir::Error>,
    root: &Path,
) -> WalkOutcome {
    match r {
        Ok(entry) => {
            let name = entry.file_name().to_string_lossy().into_owned();
            let is_dir = entry.file_type().is_dir();
            let path = display_path(entry.path(), root);
            WalkOutcome::Ok(Record::new(path, name, is_dir))
        }
        Err(err) => WalkOutcome::Err {
            msg: format!("{}", err),
            path: err.path().map(PathBuf::from),
        },
    }
}

/// Walks `root` without following symbolic links. Single producer; the walker's order is kept.
pub struct Enumerator {
    root: PathBuf,
    diagnostics: Diagnostics,
}

impl Enumerator {
    pub fn new(root: &Path, diagnostics: Diagnostics) -> Self {
        Self {
            root: root.to_path_buf(),
            diagnostics,
        }
    }
}

impl RecordSource for Enumerator {
    fn produce(&self, out: &Emitter) -> Result<(), Closed> {
        let iter = walkdir::WalkDir::new(&self.root)
            .follow_links(false)
            .into_iter()
            .map(|r| to_outcome_walkdir(r, &self.root));
        let count = run_walk_loop(iter, out, &self.diagnostics)?;
        debug!("walk: {} entries under {}", count, self.root.display());
        Ok(())
    }
}

/// Run the common walk loop: emit each Ok record, send errors to diagnostics and keep going.
/// Returns the count of records emitted, or [`Closed`] if downstream went away.
pub fn run_walk_loop<I>(iter: I, out: &Emitter, diagnostics: &Diagnostics) -> Result<usize, Closed>
where
    I: Iterator<Item = WalkOutcome>,
{
    let mut count = 0_usize;
    for outcome in iter {
        match outcome {
            WalkOutcome::Ok(record) => {
                out.emit(record)?;
                count += 1;
            }
            WalkOutcome::Err { msg, path } => {
                let path = path.unwrap_or_else(|| PathBuf::from("<no-path>"));
                diagnostics.skip(&path, "walk", msg);
            }
        }
    }
    Ok(count)
}

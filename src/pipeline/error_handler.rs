use log::{debug, warn};
use std::fmt::Display;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Side stream for per-entry I/O errors. Errors never travel on record channels; stages
/// resolve the record (skip or forward unmatched) and note the error here.
#[derive(Clone, Debug, Default)]
pub struct Diagnostics {
    skipped: Arc<AtomicUsize>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Note a per-entry failure. Logged at debug level (`--verbose`).
    pub fn skip(&self, path: &Path, what: &str, err: impl Display) {
        debug!("skipped {} ({}): {}", path.display(), what, err);
        self.skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn skipped(&self) -> usize {
        self.skipped.load(Ordering::Relaxed)
    }
}

/// Log the skipped-entry summary once the pipeline has been joined.
pub fn report_skipped(diagnostics: &Diagnostics) {
    let skipped = diagnostics.skipped();
    if skipped > 0 {
        warn!(
            "Skipped {} entries due to permission errors or unreadable files (use --verbose to list)",
            skipped
        );
    }
}

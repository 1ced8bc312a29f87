//! Zipscan: search a directory tree and the zip archives inside it by name and content

pub mod engine;
pub mod error;
pub mod pipeline;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use types::*;

pub use error::ScanError;
pub use pipeline::{CancelToken, RecordSink};

use log::{debug, error};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use engine::{Reporter, ScanConfig};

/// Result alias used by public zipscan API
pub type Result<T> = std::result::Result<T, ScanError>;

/// Scan `opts.root`, writing one matching path per line to `out`.
///
/// Patterns are compiled before any worker starts, so a bad pattern returns
/// [`ScanError::InvalidPattern`] without touching the tree.
pub fn scan_dir<W: Write>(opts: &ScanOpts, out: W) -> Result<RunSummary> {
    let mut reporter = Reporter::new(out);
    scan_dir_with(opts, &CancelToken::new(), &mut reporter)
}

/// Streaming form: every record that reaches the end of the chain (matched or not) is passed
/// to `sink` on the calling thread. Use [`Record::is_match`] to keep only matches.
///
/// `cancel` stops the run early; the returned summary then has `cancelled: true`.
pub fn scan_dir_with(
    opts: &ScanOpts,
    cancel: &CancelToken,
    sink: &mut dyn RecordSink,
) -> Result<RunSummary> {
    let config = ScanConfig::compile(opts)?;
    let config_str = format!(
        "{} CONFIG:{:#?}",
        env!("CARGO_PKG_NAME").to_uppercase(),
        config
    );
    debug!("{}", config_str);
    engine::scan(config, sink, cancel)
}

/// Single entry point for the surrounding CLI: scan and print matches to stdout.
///
/// `parallelism` sets the archive and plain scanner worker count (0: available threads).
pub fn run(
    root: &Path,
    name_pattern: &str,
    content_pattern: &str,
    filters: &[String],
    content_search: bool,
    parallelism: usize,
) -> ExitStatus {
    let opts = ScanOpts {
        root: root.to_path_buf(),
        name_pattern: name_pattern.to_string(),
        content_pattern: content_pattern.to_string(),
        filters: filters.to_vec(),
        content_search,
        parallelism: Some(parallelism),
        ..ScanOpts::default()
    };
    let stdout = io::stdout();
    match scan_dir(&opts, BufWriter::new(stdout.lock())) {
        Ok(summary) => ExitStatus::from(&summary),
        Err(e) if e.is_config_error() => {
            error!("{}", e);
            ExitStatus::ConfigError
        }
        Err(e) => {
            error!("{}", e);
            ExitStatus::Failed
        }
    }
}

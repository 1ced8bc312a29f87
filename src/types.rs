//! Public and internal types for the zipscan API and pipeline.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::pipeline::StageStats;
use crate::utils::config::ContentConsts;

/// Separator between an archive path and a member name in a member record's path.
pub const MEMBER_SEPARATOR: &str = "@";

/// One filesystem node or one archive member flowing through the pipeline.
///
/// A record is owned by exactly one worker at a time. Only the owning stage sets
/// its flags, and the match flags only ever go from `false` to `true`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Record {
    /// Unique within a run. Filesystem path, or `archive@member` for archive members.
    pub path: PathBuf,
    /// Leaf name used for filtering and name matching.
    pub name: String,
    pub is_dir: bool,
    /// Set once content scanning has been attempted, so no later stage scans it again.
    pub processed: bool,
    pub found_name_match: bool,
    pub found_content_match: bool,
}

impl Record {
    /// Record for a real filesystem node, as produced by the enumerator.
    pub fn new(path: impl Into<PathBuf>, name: impl Into<String>, is_dir: bool) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            is_dir,
            ..Self::default()
        }
    }

    /// Record for `member` inside the archive at `archive`. Path is `archive@member`.
    pub fn member(archive: &Path, member: &str, is_dir: bool) -> Self {
        let mut path = OsString::from(archive.as_os_str());
        path.push(MEMBER_SEPARATOR);
        path.push(member);
        let name = member.trim_end_matches('/').to_string();
        Self {
            path: PathBuf::from(path),
            name,
            is_dir,
            processed: true,
            ..Self::default()
        }
    }

    /// A record is reported iff either match flag is set.
    pub fn is_match(&self) -> bool {
        self.found_name_match || self.found_content_match
    }
}

/// Which field of a record the name matcher tests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MatchTarget {
    /// Leaf name (archive members: full member name).
    #[default]
    Name,
    /// Full display path, e.g. `dir/b.zip@inner.txt`.
    Path,
}

/// Position of the name matcher in the fixed chain.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StageOrder {
    /// Enumerator, filter, archive scanner, plain scanner, name matcher, reporter.
    #[default]
    ScanThenMatch,
    /// Enumerator, filter, name matcher, archive scanner, plain scanner, reporter.
    /// Archive members are then name-matched by the archive scanner only.
    MatchThenScan,
}

impl std::str::FromStr for StageOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scan-then-match" => Ok(Self::ScanThenMatch),
            "match-then-scan" => Ok(Self::MatchThenScan),
            other => Err(format!(
                "unknown stage order '{other}' (expected scan-then-match or match-then-scan)"
            )),
        }
    }
}

/// Lib options for [`scan_dir`](crate::scan_dir). Patterns are raw strings here;
/// [`ScanConfig::compile`](crate::engine::ScanConfig::compile) validates them before any thread starts.
#[derive(Clone, Debug)]
pub struct ScanOpts {
    /// Directory to scan. Symbolic links are not followed.
    pub root: PathBuf,
    /// Regular expression for names. Ignored when `content_search` is on (content pattern is used).
    pub name_pattern: String,
    /// Regular expression searched in file and member content.
    pub content_pattern: String,
    /// Glob list; only names matching one of these enter the scan. Empty passes everything.
    pub filters: Vec<String>,
    /// Enable content search. Name and content patterns become the same pattern.
    pub content_search: bool,
    /// Worker count for the archive and plain scanners. None or 0: available threads, capped by FD limit.
    pub parallelism: Option<usize>,
    pub match_target: MatchTarget,
    pub stage_order: StageOrder,
    /// Files and members larger than this are not content scanned (bytes). Bounds memory per
    /// scanner worker. Default 64 MiB; None: no limit.
    pub max_content_size: Option<u64>,
    /// Bounded capacity of every channel hop.
    pub channel_cap: usize,
}

impl Default for ScanOpts {
    fn default() -> Self {
        Self {
            root: PathBuf::from(crate::utils::config::DefaultPatterns::ROOT),
            name_pattern: crate::utils::config::DefaultPatterns::NAME.to_string(),
            content_pattern: crate::utils::config::DefaultPatterns::CONTENT.to_string(),
            filters: Vec::new(),
            content_search: false,
            parallelism: None,
            match_target: MatchTarget::default(),
            stage_order: StageOrder::default(),
            max_content_size: Some(ContentConsts::DEFAULT_MAX_CONTENT_SIZE),
            channel_cap: crate::pipeline::DEFAULT_CHANNEL_CAP,
        }
    }
}

/// Outcome of one run.
#[derive(Clone, Debug, Default)]
pub struct RunSummary {
    /// Records the reporter printed.
    pub matches: usize,
    /// Entries skipped or left unmatched because of a per-entry I/O error.
    pub skipped: usize,
    /// Per-stage counters in chain order.
    pub stages: Vec<StageStats>,
    pub cancelled: bool,
}

/// Process exit status of a CLI run (grep convention).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    Matched,
    NoMatches,
    ConfigError,
    Failed,
}

impl ExitStatus {
    pub fn code(self) -> i32 {
        match self {
            Self::Matched => 0,
            Self::NoMatches => 1,
            Self::ConfigError => 2,
            Self::Failed => 3,
        }
    }
}

impl From<&RunSummary> for ExitStatus {
    fn from(summary: &RunSummary) -> Self {
        if summary.cancelled {
            ExitStatus::Failed
        } else if summary.matches > 0 {
            ExitStatus::Matched
        } else {
            ExitStatus::NoMatches
        }
    }
}

use clap::Parser;
use std::path::PathBuf;

use crate::StageOrder;
use crate::utils::config::DefaultPatterns;

/// Search a directory tree and the zip archives inside it by name and content.
#[derive(Clone, Debug, Parser)]
#[command(name = "zipscan")]
#[command(
    about = "Print paths (including archive@member) whose name or content matches a pattern."
)]
pub struct Cli {
    /// Directory to scan (symbolic links are not followed). Default: current directory.
    #[arg(value_name = "DIR", default_value = DefaultPatterns::ROOT)]
    pub dir: PathBuf,

    /// Regular expression for file, directory, and member names. Default: `.*`.
    #[arg(long, short = 'p')]
    pub pattern: Option<String>,

    /// Regular expression searched in file content. Default: `^$`.
    #[arg(long, short = 'c')]
    pub content: Option<String>,

    /// Enable content search. Name and content patterns then become the content pattern.
    #[arg(long, short = 's', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub search_content: Option<bool>,

    /// Only names matching one of these globs are scanned. Comma separated and/or repeated: -f '*.zip,*.jar' -f '*.txt'
    #[arg(long, short = 'f', value_delimiter = ',', num_args = 1..)]
    pub filter: Vec<String>,

    /// Worker threads for the archive and plain scanners. Default or 0: available threads, capped by FD limit.
    #[arg(long, short = 'j', value_parser = clap::value_parser!(usize))]
    pub jobs: Option<usize>,

    /// Match the name pattern against the full path instead of the leaf name.
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub match_path: Option<bool>,

    /// Where the name matcher sits in the chain: scan-then-match (default) or match-then-scan.
    #[arg(long, value_parser = clap::value_parser!(StageOrder))]
    pub order: Option<StageOrder>,

    /// Skip content search for files and members larger than this many bytes (default 64 MiB, 0: no limit).
    #[arg(long, value_parser = clap::value_parser!(u64))]
    pub max_content_size: Option<u64>,

    /// Capacity of each channel between stages.
    #[arg(long, value_parser = clap::value_parser!(usize))]
    pub channel_cap: Option<usize>,

    /// Verbose output (debug logs and per-entry errors on stderr).
    #[arg(long, short = 'v', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub verbose: Option<bool>,
}

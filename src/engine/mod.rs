//! Engine module: stage implementations, matchers, run configuration, CLI

pub mod archive;
pub mod arg_parser;
pub mod cli;
pub mod core;
pub mod filter;
pub mod matcher;
pub mod names;
pub mod plain;
pub mod report;
pub mod tools;

// Re-export commonly used items
pub use arg_parser::Cli;
pub use archive::ArchiveScanner;
pub use cli::handle_run;
pub use core::{ScanConfig, build_pipeline, resolve_parallelism, scan};
pub use filter::NameFilter;
pub use matcher::{ContentMatcher, FilterList, NameMatcher};
pub use names::NameMatchStage;
pub use plain::PlainScanner;
pub use report::Reporter;
pub use tools::display_path;

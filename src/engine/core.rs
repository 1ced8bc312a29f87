//! Run configuration and the fixed stage chain

use log::debug;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use crate::engine::archive::ArchiveScanner;
use crate::engine::filter::NameFilter;
use crate::engine::matcher::{ContentMatcher, FilterList, NameMatcher};
use crate::engine::names::NameMatchStage;
use crate::engine::plain::PlainScanner;
use crate::error::ScanError;
use crate::pipeline::{
    CancelToken, Diagnostics, Enumerator, PipelineBuilder, RecordSink, report_skipped,
};
use crate::utils::config::WorkerThreadLimits;
use crate::utils::fd_limit::max_workers_by_fd_limit;
use crate::{Record, RunSummary, ScanOpts, StageOrder};

/// Immutable, validated configuration for one run. Shared by every stage through an `Arc`.
#[derive(Debug)]
pub struct ScanConfig {
    pub root: PathBuf,
    pub names: NameMatcher,
    /// `Some` iff content search is enabled.
    pub content: Option<ContentMatcher>,
    pub filters: FilterList,
    pub archive_workers: usize,
    pub plain_workers: usize,
    pub stage_order: StageOrder,
    pub channel_cap: usize,
}

impl ScanConfig {
    /// Validate root and compile every pattern. All configuration errors surface here,
    /// before any worker starts.
    pub fn compile(opts: &ScanOpts) -> Result<Self, ScanError> {
        if let Err(e) = fs::metadata(&opts.root) {
            return Err(if e.kind() == io::ErrorKind::NotFound {
                ScanError::RootNotFound(opts.root.clone())
            } else {
                ScanError::Io {
                    path: opts.root.clone(),
                    source: e,
                }
            });
        }
        // With content search, one pattern serves both names and content.
        let name_pattern = if opts.content_search {
            &opts.content_pattern
        } else {
            &opts.name_pattern
        };
        let names = NameMatcher::new(name_pattern, opts.match_target)?;
        let content = if opts.content_search {
            Some(ContentMatcher::new(
                &opts.content_pattern,
                opts.max_content_size,
            )?)
        } else {
            None
        };
        let filters = FilterList::new(&opts.filters)?;
        let workers = resolve_parallelism(opts.parallelism);

        Ok(Self {
            root: opts.root.clone(),
            names,
            content,
            filters,
            archive_workers: workers,
            plain_workers: workers,
            stage_order: opts.stage_order,
            channel_cap: opts.channel_cap.max(1),
        })
    }
}

/// Scanner worker count: requested or available threads, capped by the FD limit.
/// A request of 0 means available threads, the same as no request.
pub fn resolve_parallelism(requested: Option<usize>) -> usize {
    let wanted = requested
        .filter(|&n| n > 0)
        .unwrap_or_else(|| WorkerThreadLimits::current().all_threads)
        .max(1);
    match max_workers_by_fd_limit() {
        Some(fd_cap) if fd_cap < wanted => {
            debug!("Capping scanner workers {} -> {} (FD limit ~80%)", wanted, fd_cap);
            fd_cap
        }
        _ => wanted,
    }
}

/// Assemble the fixed chain for `config`. The caller drains the result into the reporter.
pub fn build_pipeline(
    config: &Arc<ScanConfig>,
    diagnostics: &Diagnostics,
    cancel: &CancelToken,
) -> PipelineBuilder {
    let source = Enumerator::new(&config.root, diagnostics.clone());
    let filter = NameFilter::new(config.filters.clone());
    let archive = ArchiveScanner::new(Arc::clone(config), diagnostics.clone());
    let plain = PlainScanner::new(Arc::clone(config), diagnostics.clone());
    let names = NameMatchStage::new(Arc::clone(config));

    let builder = PipelineBuilder::from_source("enumerate", source)
        .channel_cap(config.channel_cap)
        .cancel_token(cancel.clone())
        .stage("filter", filter, WorkerThreadLimits::SERIAL_THREADS);

    match config.stage_order {
        StageOrder::ScanThenMatch => builder
            .stage("archive", archive, config.archive_workers)
            .stage("plain", plain, config.plain_workers)
            .stage("names", names, WorkerThreadLimits::SERIAL_THREADS),
        StageOrder::MatchThenScan => builder
            .stage("names", names, WorkerThreadLimits::SERIAL_THREADS)
            .stage("archive", archive, config.archive_workers)
            .stage("plain", plain, config.plain_workers),
    }
}

/// Counts matched records on their way into the wrapped sink.
struct CountingSink<'a> {
    inner: &'a mut dyn RecordSink,
    matches: usize,
}

impl RecordSink for CountingSink<'_> {
    fn accept(&mut self, record: Record) -> io::Result<()> {
        if record.is_match() {
            self.matches += 1;
        }
        self.inner.accept(record)
    }

    fn finish(&mut self) -> io::Result<()> {
        self.inner.finish()
    }
}

/// Run the whole chain, feeding every record that reaches the end into `sink`.
/// Returns once the last worker has finished.
pub fn scan(
    config: ScanConfig,
    sink: &mut dyn RecordSink,
    cancel: &CancelToken,
) -> Result<RunSummary, ScanError> {
    let config = Arc::new(config);
    let diagnostics = Diagnostics::new();

    let handles = build_pipeline(&config, &diagnostics, cancel).spawn()?;
    let mut counting = CountingSink {
        inner: sink,
        matches: 0,
    };
    let stages = handles.drain(&mut counting)?;
    report_skipped(&diagnostics);

    Ok(RunSummary {
        matches: counting.matches,
        skipped: diagnostics.skipped(),
        stages,
        cancelled: cancel.is_cancelled(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unified_pattern_when_content_search() {
        let opts = ScanOpts {
            name_pattern: "never".to_string(),
            content_pattern: "hello".to_string(),
            content_search: true,
            ..ScanOpts::default()
        };
        let config = ScanConfig::compile(&opts).unwrap();
        assert_eq!(config.names.as_str(), "hello");
        assert!(config.content.is_some());
    }

    #[test]
    fn no_content_matcher_without_content_search() {
        let config = ScanConfig::compile(&ScanOpts::default()).unwrap();
        assert!(config.content.is_none());
        assert_eq!(config.names.as_str(), ".*");
    }

    #[test]
    fn missing_root_is_config_error() {
        let opts = ScanOpts {
            root: PathBuf::from("/definitely/not/here/zipscan"),
            ..ScanOpts::default()
        };
        let err = ScanConfig::compile(&opts).unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn requested_parallelism_at_least_one() {
        assert!(resolve_parallelism(None) >= 1);
        assert_eq!(resolve_parallelism(Some(1)), 1);
    }

    #[test]
    fn zero_parallelism_means_available_threads() {
        assert_eq!(resolve_parallelism(Some(0)), resolve_parallelism(None));
    }
}

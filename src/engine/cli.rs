//! CLI command handler: merge `.zipscan.toml` and flags, run the scan, map the outcome to an exit status.

use anyhow::{Context, Result};
use log::{debug, warn};
use std::io::{self, BufWriter};

use crate::engine::arg_parser::Cli;
use crate::engine::report::Reporter;
use crate::pipeline::CancelToken;
use crate::utils::setup_logging;
use crate::utils::zipscan_toml::{apply_file_to_opts, load_zipscan_toml};
use crate::{ExitStatus, MatchTarget, ScanOpts, scan_dir_with};

/// Overwrite opts field from the CLI when the flag was given.
macro_rules! apply_cli_opt {
    ($cli:expr, $opts:expr, $cli_field:ident => $opts_field:ident) => {
        if let Some(v) = $cli.$cli_field.clone() {
            $opts.$opts_field = v;
        }
    };
}

/// Defaults, then `.zipscan.toml` from DIR, then CLI flags.
/// An unreadable or malformed settings file is a config error.
pub fn setup_opts(cli: &Cli) -> crate::Result<(ScanOpts, bool)> {
    let mut opts = ScanOpts {
        root: cli.dir.clone(),
        ..ScanOpts::default()
    };
    let mut verbose = false;
    if let Some(file) = load_zipscan_toml(&cli.dir)? {
        verbose = apply_file_to_opts(&file, &mut opts)?;
    }

    apply_cli_opt!(cli, opts, pattern => name_pattern);
    apply_cli_opt!(cli, opts, content => content_pattern);
    apply_cli_opt!(cli, opts, search_content => content_search);
    apply_cli_opt!(cli, opts, order => stage_order);
    apply_cli_opt!(cli, opts, channel_cap => channel_cap);
    if !cli.filter.is_empty() {
        opts.filters = cli.filter.clone();
    }
    if let Some(j) = cli.jobs {
        opts.parallelism = Some(j);
    }
    if let Some(max) = cli.max_content_size {
        opts.max_content_size = (max > 0).then_some(max);
    }
    if let Some(true) = cli.match_path {
        opts.match_target = MatchTarget::Path;
    } else if let Some(false) = cli.match_path {
        opts.match_target = MatchTarget::Name;
    }
    if let Some(v) = cli.verbose {
        verbose = v;
    }
    Ok((opts, verbose))
}

/// Run one scan, printing matches to stdout. Configuration errors map to
/// [`ExitStatus::ConfigError`] before any worker starts.
pub fn handle_run(cli: &Cli) -> Result<ExitStatus> {
    let (opts, verbose) = match setup_opts(cli) {
        Ok(v) => v,
        Err(e) => {
            setup_logging(cli.verbose.unwrap_or(false));
            log::error!("{}", e);
            return Ok(ExitStatus::ConfigError);
        }
    };
    setup_logging(verbose);

    let cancel = CancelToken::new();
    let cancel_handler = cancel.clone();
    ctrlc::set_handler(move || cancel_handler.cancel()).context("set Ctrl+C handler")?;

    debug!("Scanning {}...", opts.root.display());
    let stdout = io::stdout();
    let mut reporter = Reporter::new(BufWriter::new(stdout.lock()));
    let summary = match scan_dir_with(&opts, &cancel, &mut reporter) {
        Ok(summary) => summary,
        Err(e) if e.is_config_error() => {
            log::error!("{}", e);
            return Ok(ExitStatus::ConfigError);
        }
        Err(e) => return Err(e).context("scan failed"),
    };

    if summary.cancelled {
        warn!("Scan cancelled; output is partial");
    }
    debug!(
        "{} matches, {} skipped entries",
        summary.matches, summary.skipped
    );
    Ok(ExitStatus::from(&summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn cli_flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "zipscan",
            "/nonexistent-zipscan-dir",
            "-p",
            r"\.txt$",
            "-s",
            "-j",
            "3",
            "--match-path",
        ])
        .unwrap();
        let (opts, verbose) = setup_opts(&cli).unwrap();
        assert!(!verbose);
        assert_eq!(opts.name_pattern, r"\.txt$");
        assert!(opts.content_search);
        assert_eq!(opts.parallelism, Some(3));
        assert_eq!(opts.match_target, MatchTarget::Path);
        assert_eq!(opts.content_pattern, "^$");
    }

    #[test]
    fn settings_file_applies_before_flags() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(".zipscan.toml"),
            "[settings]\npattern = 'from-file'\ncontent = 'kept'\n",
        )
        .unwrap();
        let dir_arg = dir.path().to_string_lossy().into_owned();
        let cli = Cli::try_parse_from(["zipscan", dir_arg.as_str(), "-p", "from-flag"]).unwrap();
        let (opts, _) = setup_opts(&cli).unwrap();
        assert_eq!(opts.name_pattern, "from-flag");
        assert_eq!(opts.content_pattern, "kept");
    }

    #[test]
    fn malformed_settings_file_exits_with_config_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".zipscan.toml"), "[settings]\njobs = 'many'\n").unwrap();
        let dir_arg = dir.path().to_string_lossy().into_owned();
        let cli = Cli::try_parse_from(["zipscan", dir_arg.as_str()]).unwrap();
        assert!(setup_opts(&cli).unwrap_err().is_config_error());
        assert_eq!(handle_run(&cli).unwrap(), ExitStatus::ConfigError);
    }

    #[test]
    fn zero_limits_from_flags() {
        let cli =
            Cli::try_parse_from(["zipscan", "/nonexistent-zipscan-dir", "--max-content-size", "0"])
                .unwrap();
        let (opts, _) = setup_opts(&cli).unwrap();
        assert_eq!(opts.max_content_size, None);
    }
}

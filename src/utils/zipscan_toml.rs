//! Load `.zipscan.toml` from the scanned directory (CLI only). Lib callers build [`ScanOpts`] directly.

use serde::Deserialize;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::ScanError;
use crate::utils::config::PackagePaths;
use crate::{MatchTarget, ScanOpts, StageOrder};

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ZipscanToml {
    #[serde(default)]
    settings: ScanSection,
}

#[derive(Debug, Default, Deserialize)]
struct ScanSection {
    pattern: Option<String>,
    content: Option<String>,
    search_content: Option<bool>,
    filter: Option<Vec<String>>,
    jobs: Option<usize>,
    match_path: Option<bool>,
    order: Option<String>,
    max_content_size: Option<u64>,
    channel_cap: Option<usize>,
    verbose: Option<bool>,
}

/// Load `.zipscan.toml` from `dir`. `Ok(None)` when there is no such file; a file that
/// exists but cannot be read or parsed is a config error.
pub(crate) fn load_zipscan_toml(dir: &Path) -> Result<Option<ZipscanToml>, ScanError> {
    let path = dir.join(PackagePaths::get().config_filename());
    let s = match std::fs::read_to_string(&path) {
        Ok(s) => s,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(config_file_error(path, e)),
    };
    parse_zipscan_toml(&s)
        .map(Some)
        .map_err(|e| config_file_error(path, e))
}

pub(crate) fn parse_zipscan_toml(s: &str) -> Result<ZipscanToml, toml::de::Error> {
    toml::from_str(s)
}

fn config_file_error(path: PathBuf, err: impl std::fmt::Display) -> ScanError {
    ScanError::ConfigFile {
        path,
        message: err.to_string(),
    }
}

/// Overwrite opts field from file when present.
macro_rules! apply_file_opt {
    ($sec:expr, $opts:expr, $sec_field:ident => $opts_field:ident) => {
        if let Some(v) = $sec.$sec_field.clone() {
            $opts.$opts_field = v;
        }
    };
}

/// Apply file config to opts (only fields present in the file). Call before applying CLI.
/// Returns the file's `verbose` setting (false when absent), or a config error for a bad `order`.
pub(crate) fn apply_file_to_opts(file: &ZipscanToml, opts: &mut ScanOpts) -> Result<bool, ScanError> {
    let sec = &file.settings;
    apply_file_opt!(sec, opts, pattern => name_pattern);
    apply_file_opt!(sec, opts, content => content_pattern);
    apply_file_opt!(sec, opts, search_content => content_search);
    apply_file_opt!(sec, opts, filter => filters);
    apply_file_opt!(sec, opts, channel_cap => channel_cap);
    if let Some(j) = sec.jobs {
        opts.parallelism = Some(j);
    }
    if let Some(max) = sec.max_content_size {
        opts.max_content_size = (max > 0).then_some(max);
    }
    if let Some(match_path) = sec.match_path {
        opts.match_target = if match_path {
            MatchTarget::Path
        } else {
            MatchTarget::Name
        };
    }
    if let Some(ref order) = sec.order {
        opts.stage_order = order.parse::<StageOrder>().map_err(|message| ScanError::ConfigFile {
            path: PathBuf::from(PackagePaths::get().config_filename()),
            message,
        })?;
    }
    Ok(sec.verbose.unwrap_or(false))
}

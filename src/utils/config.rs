//! Application configuration constants.
//! Tuning and defaults in one place.

use std::sync::OnceLock;

// ---- Package / paths (from CARGO_PKG_NAME, cached) ----

/// Package-derived names: built once from `CARGO_PKG_NAME`, then cached.
pub struct PackagePaths {
    config_filename: String,
}

static PACKAGE_PATHS: OnceLock<PackagePaths> = OnceLock::new();

impl PackagePaths {
    /// Build and cache names from `CARGO_PKG_NAME`. Called once on first use.
    pub fn get() -> &'static PackagePaths {
        PACKAGE_PATHS.get_or_init(|| {
            let pkg = env!("CARGO_PKG_NAME");
            PackagePaths {
                config_filename: format!(".{pkg}.toml"),
            }
        })
    }

    /// Per-directory settings file, e.g. `.zipscan.toml`.
    pub fn config_filename(&self) -> &str {
        &self.config_filename
    }
}

// ---- CLI defaults ----

/// Defaults shared by the CLI and [`ScanOpts`](crate::ScanOpts).
pub struct DefaultPatterns;

impl DefaultPatterns {
    pub const ROOT: &'static str = ".";
    /// Every name matches.
    pub const NAME: &'static str = ".*";
    /// Empty content only.
    pub const CONTENT: &'static str = "^$";
}

// ---- Worker threads ----

/// Thread limits for the stages.
/// Use [`WorkerThreadLimits::current()`] to fill `all_threads` from rayon.
#[derive(Clone, Copy, Debug, Default)]
pub struct WorkerThreadLimits {
    /// Available threads (from rayon); set by [`WorkerThreadLimits::current()`].
    pub all_threads: usize,
}

impl WorkerThreadLimits {
    /// Enumerator, filter, name matcher, and reporter always run one worker.
    pub const SERIAL_THREADS: usize = 1;

    /// Build limits with `all_threads` set from `rayon::current_num_threads()`.
    pub fn current() -> Self {
        Self {
            all_threads: rayon::current_num_threads(),
        }
    }
}

// ---- Content scanning ----

/// Content read tuning.
pub struct ContentConsts;

impl ContentConsts {
    /// Default cap on bytes held in memory per content scan. 64 MiB.
    /// Larger files and members are skipped unless the limit is raised or disabled.
    pub const DEFAULT_MAX_CONTENT_SIZE: u64 = 64 * 1024 * 1024;
}

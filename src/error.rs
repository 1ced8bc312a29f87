use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    // Config
    #[error("invalid regular expression '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("invalid filter glob '{pattern}': {source}")]
    InvalidGlob {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("root directory not found: {}", .0.display())]
    RootNotFound(PathBuf),

    #[error("invalid config file {}: {message}", path.display())]
    ConfigFile { path: PathBuf, message: String },

    // Runtime
    #[error("stage '{stage}' panicked")]
    StagePanicked { stage: &'static str },

    #[error("failed to spawn worker for stage '{stage}'")]
    Spawn {
        stage: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error at {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ScanError {
    /// Configuration errors are reported before any pipeline thread starts.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidPattern { .. }
                | Self::InvalidGlob { .. }
                | Self::RootNotFound(_)
                | Self::ConfigFile { .. }
        )
    }
}

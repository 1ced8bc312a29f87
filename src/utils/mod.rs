pub mod config;
pub mod fd_limit;
pub mod logger;
pub mod zipscan_toml;

pub use config::*;
pub use fd_limit::{FDS_PER_WORKER, max_open_fds, max_workers_by_fd_limit};
pub use logger::setup_logging;

//! Zipscan CLI: print paths (and archive@member paths) whose name or content matches.

use clap::Parser;
use std::process::ExitCode;
use std::time::Instant;
use zipscan::ExitStatus;
use zipscan::engine::{Cli, handle_run};

fn main() -> ExitCode {
    let start_time = Instant::now();
    let cli = Cli::parse();
    let status = match handle_run(&cli) {
        Ok(status) => status,
        Err(e) => {
            log::error!("{:#}", e);
            ExitStatus::Failed
        }
    };
    log::debug!("Total time: {:?}", start_time.elapsed());
    ExitCode::from(status.code() as u8)
}

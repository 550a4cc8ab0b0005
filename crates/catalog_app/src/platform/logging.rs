//! Logging setup for the catalog terminal app.
//!
//! File output goes to `./catalog.log` in the current working directory, which
//! keeps the interactive table readable.

use std::path::Path;

use catalog_logging::LogDestination;
use log::LevelFilter;

const LOG_FILE: &str = "./catalog.log";

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LogTarget {
    Terminal,
    File,
    Both,
}

impl From<LogTarget> for LogDestination {
    fn from(target: LogTarget) -> Self {
        match target {
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::File => LogDestination::File,
            LogTarget::Both => LogDestination::Both,
        }
    }
}

pub fn initialize(target: LogTarget, verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    catalog_logging::initialize(target.into(), level, Path::new(LOG_FILE));
}

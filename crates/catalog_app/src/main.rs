use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

mod platform;

use platform::logging::LogTarget;

/// Live, filterable view of the game catalog.
#[derive(Debug, Parser)]
#[command(name = "catalog", version, about)]
struct Cli {
    /// RON file with API, push and debounce settings.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Where log output goes.
    #[arg(long, value_enum, default_value_t = LogTarget::File)]
    log: LogTarget,

    /// Log at debug level.
    #[arg(short, long)]
    verbose: bool,

    /// Do not subscribe to enrichment updates.
    #[arg(long)]
    no_push: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    platform::logging::initialize(cli.log, cli.verbose);

    let config = platform::config::load(cli.config.as_deref()).context("loading configuration")?;
    platform::run_app(config, !cli.no_push)
}

//! SecureStore CLI entry point.

use clap::Parser;
use securestore_cli::{load_config_for, logging, run, Cli};

fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Logging settings live in the config file, so load it first
    let config = load_config_for(&cli)?;
    logging::init(cli.verbose, &config.logging);

    run(cli, config)
}

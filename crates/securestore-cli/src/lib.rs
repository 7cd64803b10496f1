//! SecureStore command-line interface.

pub mod commands;
pub mod logging;

use std::path::Path;

use clap::{Parser, Subcommand};
use securestore::{GenericPassword, Queryable, SecureStore};
use securestore_core::config::Config;
use securestore_core::{paths, ConfigError};

/// SecureStore - secrets in the platform credential store
#[derive(Parser)]
#[command(name = "securestore")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase logging verbosity
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file
    #[arg(short, long, env = "SECURESTORE_CONFIG", global = true)]
    pub config: Option<std::path::PathBuf>,

    /// Use a generic-password namespace for this service instead of the configured one
    #[arg(short, long, global = true)]
    pub service: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Store a value (prompts for it when not given)
    Set(commands::items::SetArgs),

    /// Print a stored value
    Get {
        /// Item key
        key: String,
    },

    /// Remove a stored value
    Remove {
        /// Item key
        key: String,
    },

    /// Remove every value in the namespace
    Clear {
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Configuration management
    Config(commands::config::ConfigArgs),

    /// Show version information
    Version,
}

impl Commands {
    /// Commands that can run before the config file exists.
    fn tolerates_missing_config(&self) -> bool {
        matches!(
            self,
            Commands::Config(commands::config::ConfigArgs {
                command: commands::config::ConfigCommand::Init { .. }
                    | commands::config::ConfigCommand::Path,
            })
        )
    }
}

/// Load the config file at `path`, or the default one.
///
/// An explicit path must exist unless `allow_missing` is set, in which case
/// a missing file yields [`Config::from_env_defaults`]. A missing default
/// file always falls back to defaults.
pub fn load_config(path: Option<&Path>, allow_missing: bool) -> anyhow::Result<Config> {
    let config = match path {
        Some(path) => match Config::load(path) {
            Err(ConfigError::NotFound(_)) if allow_missing => Config::from_env_defaults(),
            other => other?,
        },
        None => Config::load_or_default(),
    };
    Ok(config)
}

/// Load the config the parsed command needs.
pub fn load_config_for(cli: &Cli) -> anyhow::Result<Config> {
    load_config(cli.config.as_deref(), cli.command.tolerates_missing_config())
}

/// Resolve the namespace: `--service` wins over the config file.
pub fn resolve_queryable(service: Option<&str>, config: &Config) -> anyhow::Result<Queryable> {
    if let Some(service) = service {
        if service.trim().is_empty() {
            anyhow::bail!("--service must not be empty");
        }
        return Ok(GenericPassword::new(service).into());
    }

    match &config.namespace {
        Some(namespace) => Ok(Queryable::from_config(namespace)?),
        None => {
            let path = paths::config_file()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|e: ConfigError| e.to_string());
            anyhow::bail!(
                "No namespace configured. Pass --service <name> or add a `namespace` section to {}",
                path
            )
        }
    }
}

/// Run the CLI with the given arguments.
pub fn run(cli: Cli, config: Config) -> anyhow::Result<()> {
    let open_store = || -> anyhow::Result<SecureStore> {
        let queryable = resolve_queryable(cli.service.as_deref(), &config)?;
        tracing::debug!(namespace = %queryable, "opening store");
        Ok(SecureStore::with_default_backend(queryable))
    };

    match cli.command {
        Commands::Set(ref args) => commands::items::set(&open_store()?, args),
        Commands::Get { ref key } => commands::items::get(&open_store()?, key),
        Commands::Remove { ref key } => commands::items::remove(&open_store()?, key),
        Commands::Clear { yes } => commands::items::clear(&open_store()?, yes),
        Commands::Config(ref args) => commands::config::run(args, &config, cli.config.as_deref()),
        Commands::Version => {
            println!("securestore {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

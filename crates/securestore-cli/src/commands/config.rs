//! Configuration management commands.

use std::path::{Path, PathBuf};

use clap::Args;
use securestore::Queryable;
use securestore_core::config::Config;
use securestore_core::paths;

/// Config command arguments.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(clap::Subcommand)]
pub enum ConfigCommand {
    /// Show configuration
    Show,

    /// Get a configuration value
    Get {
        /// Configuration key (dot-separated path, e.g. `namespace.service`)
        key: String,
    },

    /// Write the current configuration to the config file
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },

    /// Show configuration file path
    Path,

    /// Validate configuration, including the namespace it describes
    Validate,
}

fn config_path(explicit: Option<&Path>) -> anyhow::Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path.to_path_buf()),
        None => Ok(paths::config_file()?),
    }
}

/// Look up a dot-separated key in the serialized configuration.
fn lookup(config: &Config, key: &str) -> anyhow::Result<serde_json::Value> {
    let json = serde_json::to_value(config)?;
    let value = key
        .split('.')
        .try_fold(&json, |acc, part| acc.get(part))
        .cloned();
    value.ok_or_else(|| anyhow::anyhow!("Key not found: {}", key))
}

/// Run the config command against the loaded `config`.
pub fn run(args: &ConfigArgs, config: &Config, path: Option<&Path>) -> anyhow::Result<()> {
    match &args.command {
        ConfigCommand::Show => {
            println!("{}", serde_json::to_string_pretty(config)?);
        }

        ConfigCommand::Get { key } => {
            let value = lookup(config, key)?;
            println!("{}", serde_json::to_string_pretty(&value)?);
        }

        ConfigCommand::Init { force } => {
            if path.is_none() {
                paths::ensure_dirs()?;
            }
            let path = config_path(path)?;
            if path.exists() && !force {
                anyhow::bail!(
                    "Config file already exists at {}. Use --force to overwrite.",
                    path.display()
                );
            }

            config.validate()?;
            config.save(&path)?;
            tracing::info!(path = %path.display(), "wrote config file");
            println!("Configuration written to {}", path.display());
        }

        ConfigCommand::Path => {
            println!("{}", config_path(path)?.display());
        }

        ConfigCommand::Validate => {
            config.validate()?;
            match &config.namespace {
                Some(namespace) => {
                    let queryable = Queryable::from_config(namespace)?;
                    println!("Configuration is valid (namespace: {}).", queryable);
                }
                None => println!("Configuration is valid (no namespace configured)."),
            }
        }
    }

    Ok(())
}

//! Tracing subscriber setup.

use securestore_core::config::{LogFormat, LoggingConfig};
use securestore_core::env;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter directive for the given verbosity and configured level.
///
/// `-v` selects debug and `-vv` trace for the SecureStore crates; otherwise
/// the configured level applies.
pub fn directive(verbose: u8, config: &LoggingConfig) -> String {
    let level = match verbose {
        0 => config.level.as_str(),
        1 => "debug",
        _ => "trace",
    };
    format!("securestore={level},securestore_cli={level}")
}

/// Install the global subscriber. `SECURESTORE_LOG` overrides everything else.
///
/// Logs go to stderr so `get` output on stdout stays pipeable.
pub fn init(verbose: u8, config: &LoggingConfig) {
    let filter = EnvFilter::try_new(env::get_var_or(
        env::vars::SECURESTORE_LOG,
        &directive(verbose, config),
    ))
    .unwrap_or_else(|_| EnvFilter::new(directive(verbose, config)));

    let registry = tracing_subscriber::registry().with(filter);
    match config.format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

//! Environment variable handling.

use std::env;

/// Get an environment variable, returning None if not set or empty.
pub fn get_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
pub fn get_var_or(name: &str, default: &str) -> String {
    get_var(name).unwrap_or_else(|| default.to_string())
}

/// Environment variable names read by SecureStore.
pub mod vars {
    /// SecureStore home directory override.
    pub const SECURESTORE_HOME: &str = "SECURESTORE_HOME";

    /// Log filter directive, e.g. `securestore=debug`.
    pub const SECURESTORE_LOG: &str = "SECURESTORE_LOG";

    /// Log output format (`pretty` or `json`).
    pub const SECURESTORE_LOG_FORMAT: &str = "SECURESTORE_LOG_FORMAT";

    /// Service name for a generic-password namespace when no config file exists.
    pub const SECURESTORE_SERVICE: &str = "SECURESTORE_SERVICE";
}

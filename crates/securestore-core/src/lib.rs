//! # securestore-core
//!
//! Shared building blocks for the SecureStore crates:
//!
//! - **Configuration**: loading, validation, and persistence of the JSON5 config file
//! - **Utilities**: path resolution and environment handling

pub mod config;
pub mod env;
pub mod error;
pub mod paths;

// Re-exports for convenience
pub use config::Config;
pub use error::{ConfigError, Result};

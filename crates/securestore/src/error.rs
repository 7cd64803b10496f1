//! Error types for credential store operations.

use securestore_core::ConfigError;
use thiserror::Error;

use crate::backend::OsStatus;

/// Errors that can occur during secure store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("Decoding error: {0}")]
    Decoding(String),

    #[error("Credential store unavailable (status {status}): {message}")]
    StoreUnavailable { status: OsStatus, message: String },

    #[error("Found {count} records for item '{key}', expected at most one")]
    Ambiguous { key: String, count: usize },
}

impl StoreError {
    /// Raw backend status, when the error came from the backend.
    pub fn status(&self) -> Option<OsStatus> {
        match self {
            Self::StoreUnavailable { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether retrying the call later may succeed (locked store, pending
    /// user prompt, canceled authorization).
    pub fn is_transient(&self) -> bool {
        self.status().is_some_and(|s| s.is_transient())
    }
}

impl From<ConfigError> for StoreError {
    fn from(e: ConfigError) -> Self {
        Self::InvalidConfiguration(e.to_string())
    }
}

/// Convenience result alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

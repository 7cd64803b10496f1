//! Configuration schema definitions.

use serde::{Deserialize, Serialize};

/// Main SecureStore configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Credential namespace the store operates on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<NamespaceConfig>,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Credential namespace section.
///
/// Values are kept as written in the file. Protocol and authentication type
/// names, and the port range, are checked when the namespace is turned into
/// a queryable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NamespaceConfig {
    /// Application secrets scoped by a service name.
    GenericPassword {
        /// Service name.
        service: String,

        /// Keychain access group shared between applications.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        access_group: Option<String>,
    },

    /// Network-service secrets scoped by endpoint details.
    InternetPassword {
        /// Server host name.
        server: String,

        /// Server port.
        port: i64,

        /// Resource path on the server.
        #[serde(default)]
        path: String,

        /// Security domain (realm).
        #[serde(default)]
        security_domain: String,

        /// Protocol name, e.g. `https`.
        protocol: String,

        /// Authentication scheme name, e.g. `http_basic`.
        authentication_type: String,

        /// Keychain access group shared between applications.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        access_group: Option<String>,
    },
}

impl NamespaceConfig {
    /// Generic-password namespace for `service`.
    pub fn generic(service: impl Into<String>) -> Self {
        Self::GenericPassword {
            service: service.into(),
            access_group: None,
        }
    }

    /// Short name of the namespace kind, as written in the config file.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::GenericPassword { .. } => "generic_password",
            Self::InternetPassword { .. } => "internet_password",
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level.
    #[serde(default)]
    pub level: LogLevel,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

/// Log level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Level name as understood by `tracing` filter directives.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

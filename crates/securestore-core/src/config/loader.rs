//! Configuration loading and persistence.

use super::{Config, LogFormat, LogLevel, NamespaceConfig};
use crate::env;
use crate::error::ConfigError;
use crate::paths;
use std::fs;
use std::path::Path;

impl Config {
    /// Load configuration from the default path.
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = paths::config_file()?;
        Self::load(&path)
    }

    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from a string.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        json5::from_str(content).map_err(|e| ConfigError::Json5(e.to_string()))
    }

    /// Save configuration to a file path.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = self.to_json5()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Write atomically
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, &content)?;
        fs::rename(&temp_path, path)?;

        Ok(())
    }

    /// Serialize to JSON5 string.
    pub fn to_json5(&self) -> Result<String, ConfigError> {
        // json5 has no serializer; plain JSON is valid JSON5
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Validate the configuration, collecting all errors before returning.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        match &self.namespace {
            Some(NamespaceConfig::GenericPassword {
                service,
                access_group,
            }) => {
                if service.trim().is_empty() {
                    errors.push("Generic password namespace requires a service name".to_string());
                }
                if access_group.as_deref().is_some_and(|g| g.trim().is_empty()) {
                    errors.push("Access group must not be empty when set".to_string());
                }
            }
            Some(NamespaceConfig::InternetPassword {
                server,
                port,
                protocol,
                authentication_type,
                access_group,
                ..
            }) => {
                if server.trim().is_empty() {
                    errors.push("Internet password namespace requires a server".to_string());
                }
                if !(0..=i64::from(u16::MAX)).contains(port) {
                    errors.push(format!("Port must be 0-65535, got {}", port));
                }
                if protocol.trim().is_empty() {
                    errors.push("Internet password namespace requires a protocol".to_string());
                }
                if authentication_type.trim().is_empty() {
                    errors.push(
                        "Internet password namespace requires an authentication_type".to_string(),
                    );
                }
                if access_group.as_deref().is_some_and(|g| g.trim().is_empty()) {
                    errors.push("Access group must not be empty when set".to_string());
                }
            }
            None => {}
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors.join("; ")))
        }
    }

    /// Load configuration from the default path, falling back to defaults if no file exists.
    ///
    /// A missing file yields [`Config::from_env_defaults`]; an unreadable or
    /// malformed one yields plain defaults.
    pub fn load_or_default() -> Self {
        match Self::load_default() {
            Ok(config) => config,
            Err(ConfigError::NotFound(_)) => Self::from_env_defaults(),
            Err(e) => {
                tracing::warn!("ignoring unusable config file: {e}");
                Self::default()
            }
        }
    }

    /// Create a Config from defaults, enhanced by environment variables.
    ///
    /// `SECURESTORE_SERVICE` selects a generic-password namespace and
    /// `SECURESTORE_LOG_FORMAT=json` switches to JSON log output.
    pub fn from_env_defaults() -> Self {
        let mut config = Self::default();

        if let Some(service) = env::get_var(env::vars::SECURESTORE_SERVICE) {
            config.namespace = Some(NamespaceConfig::generic(service));
        }

        if env::get_var(env::vars::SECURESTORE_LOG_FORMAT).as_deref() == Some("json") {
            config.logging.format = LogFormat::Json;
        }

        config
    }
}

/// Builder for creating configurations programmatically.
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new config builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a generic-password namespace for `service`.
    pub fn generic_password(mut self, service: impl Into<String>) -> Self {
        self.config.namespace = Some(NamespaceConfig::generic(service));
        self
    }

    /// Use an explicit namespace.
    pub fn namespace(mut self, namespace: NamespaceConfig) -> Self {
        self.config.namespace = Some(namespace);
        self
    }

    /// Set the log level.
    pub fn log_level(mut self, level: LogLevel) -> Self {
        self.config.logging.level = level;
        self
    }

    /// Set the log output format.
    pub fn log_format(mut self, format: LogFormat) -> Self {
        self.config.logging.format = format;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> Config {
        self.config
    }
}

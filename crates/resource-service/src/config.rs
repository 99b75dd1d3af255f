//! Configuration management for the resource service.
//!
//! Sources, lowest precedence first:
//! 1. Default values (hardcoded)
//! 2. Configuration file (YAML, TOML or JSON, picked by extension)
//! 3. Environment variables with the `RESOURCE_` prefix and `__` as the nested key separator
//!
//! # Example
//!
//! ```ignore
//! use resource_service::config::ServiceConfig;
//!
//! // File plus env overrides
//! let config = ServiceConfig::load(Some("service.yaml"))?;
//!
//! // Env only, e.g. RESOURCE_SERVER__PORT=9000
//! let config = ServiceConfig::load(None::<&str>)?;
//! ```

use config::{Config, ConfigError, Environment, File, FileFormat, FileSourceFile, Source};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Service configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct ServiceConfig {
    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub store: StoreSettings,

    #[serde(default)]
    pub auth: AuthSettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Server network settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ServerSettings {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Largest accepted request body
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            body_limit_bytes: default_body_limit(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_body_limit() -> usize {
    crate::http::DEFAULT_BODY_LIMIT
}

/// Store actor settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct StoreSettings {
    /// Request channel capacity of each store.
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            buffer_size: default_buffer_size(),
        }
    }
}

fn default_buffer_size() -> usize {
    32
}

/// Caller identification settings.
///
/// Authentication happens upstream; the proxy forwards the caller's roles in one header.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct AuthSettings {
    /// Header carrying a comma-separated role list, e.g. `x-roles: USER,ADMIN`.
    #[serde(default = "default_role_header")]
    pub role_header: String,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            role_header: default_role_header(),
        }
    }
}

fn default_role_header() -> String {
    "x-roles".to_string()
}

/// Logging settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct LoggingSettings {
    /// Default filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// One JSON object per line instead of the compact format.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Configuration loading errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] ConfigError),

    #[error("configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("invalid configuration: {message}")]
    Invalid { message: String },
}

impl ServiceConfig {
    /// Loads defaults, then `path` if given, then `RESOURCE_*` environment overrides.
    pub fn load<P: AsRef<Path>>(path: Option<P>) -> Result<Self, ConfigLoadError> {
        match path {
            Some(path) => {
                let path = path.as_ref();
                if !path.exists() {
                    return Err(ConfigLoadError::FileNotFound {
                        path: path.display().to_string(),
                    });
                }
                Self::from_sources(Some(File::from(path)))
            }
            None => Self::from_sources(None::<File<FileSourceFile, FileFormat>>),
        }
    }

    /// Layers `file` (if any) and the environment over the defaults, then validates.
    pub fn from_sources<S>(file: Option<S>) -> Result<Self, ConfigLoadError>
    where
        S: Source + Send + Sync + 'static,
    {
        let mut builder =
            Config::builder().add_source(Config::try_from(&ServiceConfig::default())?);
        if let Some(file) = file {
            builder = builder.add_source(file);
        }
        let config = builder
            // RESOURCE_SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("RESOURCE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let service_config: ServiceConfig = config.try_deserialize()?;
        service_config.validate()?;
        Ok(service_config)
    }

    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.server.port == 0 {
            return Err(ConfigLoadError::Invalid {
                message: "server.port must be greater than 0".to_string(),
            });
        }
        if self.store.buffer_size == 0 {
            return Err(ConfigLoadError::Invalid {
                message: "store.buffer_size must be greater than 0".to_string(),
            });
        }
        if self.auth.role_header.trim().is_empty() {
            return Err(ConfigLoadError::Invalid {
                message: "auth.role_header must not be empty".to_string(),
            });
        }
        if axum::http::HeaderName::from_bytes(self.auth.role_header.as_bytes()).is_err() {
            return Err(ConfigLoadError::Invalid {
                message: format!(
                    "auth.role_header is not a valid header name: {}",
                    self.auth.role_header
                ),
            });
        }
        Ok(())
    }

    /// `host:port` for the listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

//! Application configuration module
//!
//! Provides the configuration consumed by the server. Values come from a TOML file,
//! from environment variables (which override the file), or from the builder in tests.
//!
//! # Keys
//!
//! | TOML key | Environment variable | Default |
//! |---|---|---|
//! | `database_url` | `DATABASE_URL` | none (database disabled) |
//! | `jwt_secret` | `JWT_SECRET` | development secret, logged as a warning |
//! | `server_port` | `SERVER_PORT` | `3000` |
//! | `notification_function_url` | `NOTIFICATION_FUNCTION_URL` | none (log only) |
//! | `notification_function_key` | `NOTIFICATION_FUNCTION_KEY` | none |
//! | `geocode_base_url` | `GEOCODE_BASE_URL` | `https://api-adresse.data.gouv.fr` |
//! | `public_base_url` | `PUBLIC_BASE_URL` | `http://localhost:3000` |

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Default port the HTTP server binds to
pub const DEFAULT_SERVER_PORT: u16 = 3000;

/// Public French address API
pub const DEFAULT_GEOCODE_BASE_URL: &str = "https://api-adresse.data.gouv.fr";

/// Base URL used in links sent by email when nothing is configured
pub const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost:3000";

const DEVELOPMENT_JWT_SECRET: &str = "interphone-development-secret";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// PostgreSQL connection string
    pub database_url: Option<String>,
    /// HS256 signing secret for session tokens
    pub jwt_secret: String,
    /// Port for the HTTP listener
    pub server_port: u16,
    /// Email function endpoint; when absent notifications are only logged
    pub notification_function_url: Option<String>,
    /// Bearer key sent to the email function
    pub notification_function_key: Option<String>,
    /// Base URL of the geocoding API
    pub geocode_base_url: String,
    /// Public URL of the service, used in password reset links
    pub public_base_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            jwt_secret: DEVELOPMENT_JWT_SECRET.to_string(),
            server_port: DEFAULT_SERVER_PORT,
            notification_function_url: None,
            notification_function_key: None,
            geocode_base_url: DEFAULT_GEOCODE_BASE_URL.to_string(),
            public_base_url: DEFAULT_PUBLIC_BASE_URL.to_string(),
        }
    }
}

/// On-disk representation; every key is optional
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    database_url: Option<String>,
    jwt_secret: Option<String>,
    server_port: Option<u16>,
    notification_function_url: Option<String>,
    notification_function_key: Option<String>,
    geocode_base_url: Option<String>,
    public_base_url: Option<String>,
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::builder().apply_env(|key| std::env::var(key).ok())?.build()
    }

    /// Parse a TOML document
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Self::builder().apply_toml(contents)?.build()
    }

    /// Load a TOML file, then let environment variables override it
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
        Self::builder()
            .apply_toml(&contents)?
            .apply_env(|key| std::env::var(key).ok())?
            .build()
    }

    /// Whether the signing secret is the built-in development value
    pub fn uses_development_secret(&self) -> bool {
        self.jwt_secret == DEVELOPMENT_JWT_SECRET
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.trim().is_empty() {
            return Err(ConfigError::MissingValue("jwt_secret"));
        }
        if self.server_port == 0 {
            return Err(ConfigError::InvalidValue {
                key: "server_port",
                message: "must be greater than zero".to_string(),
            });
        }
        for url in [
            Some(&self.geocode_base_url),
            Some(&self.public_base_url),
            self.notification_function_url.as_ref(),
        ]
        .into_iter()
        .flatten()
        {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::InvalidUrl(url.clone()));
            }
        }
        Ok(())
    }
}

/// Builder for AppConfig
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    database_url: Option<String>,
    jwt_secret: Option<String>,
    server_port: Option<u16>,
    notification_function_url: Option<String>,
    notification_function_key: Option<String>,
    geocode_base_url: Option<String>,
    public_base_url: Option<String>,
}

impl AppConfigBuilder {
    /// Set the database URL
    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.database_url = Some(url.into());
        self
    }

    /// Set the session signing secret
    pub fn jwt_secret(mut self, secret: impl Into<String>) -> Self {
        self.jwt_secret = Some(secret.into());
        self
    }

    /// Set the listener port
    pub fn server_port(mut self, port: u16) -> Self {
        self.server_port = Some(port);
        self
    }

    /// Set the email function endpoint
    pub fn notification_function_url(mut self, url: impl Into<String>) -> Self {
        self.notification_function_url = Some(url.into());
        self
    }

    /// Set the email function bearer key
    pub fn notification_function_key(mut self, key: impl Into<String>) -> Self {
        self.notification_function_key = Some(key.into());
        self
    }

    /// Set the geocoding API base URL
    pub fn geocode_base_url(mut self, url: impl Into<String>) -> Self {
        self.geocode_base_url = Some(url.into());
        self
    }

    /// Set the public base URL
    pub fn public_base_url(mut self, url: impl Into<String>) -> Self {
        self.public_base_url = Some(url.into());
        self
    }

    fn apply_toml(mut self, contents: &str) -> Result<Self, ConfigError> {
        let file: FileConfig =
            toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
        self.database_url = file.database_url.or(self.database_url);
        self.jwt_secret = file.jwt_secret.or(self.jwt_secret);
        self.server_port = file.server_port.or(self.server_port);
        self.notification_function_url =
            file.notification_function_url.or(self.notification_function_url);
        self.notification_function_key =
            file.notification_function_key.or(self.notification_function_key);
        self.geocode_base_url = file.geocode_base_url.or(self.geocode_base_url);
        self.public_base_url = file.public_base_url.or(self.public_base_url);
        Ok(self)
    }

    /// Overlay values from a variable lookup (normally `std::env::var`)
    pub fn apply_env<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(value) = get("DATABASE_URL") {
            self.database_url = Some(value);
        }
        if let Some(value) = get("JWT_SECRET") {
            self.jwt_secret = Some(value);
        }
        if let Some(value) = get("SERVER_PORT") {
            let port = value.trim().parse::<u16>().map_err(|e| ConfigError::InvalidValue {
                key: "SERVER_PORT",
                message: e.to_string(),
            })?;
            self.server_port = Some(port);
        }
        if let Some(value) = get("NOTIFICATION_FUNCTION_URL") {
            self.notification_function_url = Some(value);
        }
        if let Some(value) = get("NOTIFICATION_FUNCTION_KEY") {
            self.notification_function_key = Some(value);
        }
        if let Some(value) = get("GEOCODE_BASE_URL") {
            self.geocode_base_url = Some(value);
        }
        if let Some(value) = get("PUBLIC_BASE_URL") {
            self.public_base_url = Some(value);
        }
        Ok(self)
    }

    /// Build the configuration
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        let defaults = AppConfig::default();
        let config = AppConfig {
            database_url: self.database_url,
            jwt_secret: self.jwt_secret.unwrap_or(defaults.jwt_secret),
            server_port: self.server_port.unwrap_or(defaults.server_port),
            notification_function_url: self.notification_function_url,
            notification_function_key: self.notification_function_key,
            geocode_base_url: trim_slash(self.geocode_base_url.unwrap_or(defaults.geocode_base_url)),
            public_base_url: trim_slash(self.public_base_url.unwrap_or(defaults.public_base_url)),
        };
        config.validate()?;
        Ok(config)
    }
}

fn trim_slash(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("missing value: {0}")]
    MissingValue(&'static str),
    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: &'static str, message: String },
    #[error("failed to parse configuration: {0}")]
    Parse(String),
    #[error("failed to read configuration: {0}")]
    Io(String),
}

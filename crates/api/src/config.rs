// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Server configuration module
//!
//! This module provides configuration structures and logic for the custody gateway,
//! supporting different environments, validation of configuration parameters and
//! the per-backend credentials.

use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    time::Duration,
};

use anyhow::{Result, anyhow, ensure};
use config::{Config, ConfigError, Environment as ConfigEnv, File};
use custody_backends::{
    AnchorageConfig, CoinRegistry, DEFAULT_ANCHORAGE_BASE_URL, DEFAULT_DIRECT_REST_BASE_URL,
    DEFAULT_LEGACY_SDK_BASE_URL, DirectRestConfig, LegacySdkConfig,
};
use custody_client::{CoinInfo, TokenConfig};
use serde::{Deserialize, Deserializer, Serialize, de};

use crate::error::{ServerError, ServerResult};

/// Legacy variable holding the bearer token of both SDK-style and direct REST backends
pub const ACCESS_TOKEN_ENV: &str = "ACCESS_TOKEN";

/// Legacy variable holding the vault backend's API key
pub const ANCHORAGE_API_KEY_ENV: &str = "ANCHORAGE_API_KEY";

/// A validated server port that ensures the value is appropriate for the environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ServerPort {
    port: u16,
    environment: Environment,
}

impl ServerPort {
    /// Create a new `ServerPort`, ensuring it's valid for the given environment
    ///
    /// # Errors
    ///
    /// Returns an error if the port is 0 in non-testing environments
    pub fn new(port: u16, environment: Environment) -> Result<Self> {
        if port == 0 && environment != Environment::Testing {
            return Err(anyhow!("port cannot be 0 in non-testing environments"));
        }
        Ok(Self { port, environment })
    }

    /// Create a safe default port for development
    pub const fn default_development() -> Self {
        Self {
            port: 3000,
            environment: Environment::Development,
        }
    }

    /// Create a safe testing port (port 0)
    pub const fn testing() -> Self {
        Self {
            port: 0,
            environment: Environment::Testing,
        }
    }

    /// Get the port value
    pub fn value(&self) -> u16 {
        self.port
    }
}

impl<'de> Deserialize<'de> for ServerPort {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let port = u16::deserialize(deserializer)?;
        // Validated against the environment once loading is complete
        Ok(Self {
            port,
            environment: Environment::Development,
        })
    }
}

/// A validated timeout duration in seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeoutSeconds(Duration);

impl TimeoutSeconds {
    /// Create a new `TimeoutSeconds`, ensuring the value is within valid bounds
    ///
    /// # Errors
    ///
    /// Returns an error if timeout is 0 or greater than 300 seconds
    pub fn new(seconds: u64) -> Result<Self> {
        ensure!(seconds != 0, "timeout must be greater than 0");
        ensure!(seconds <= 300, "timeout cannot exceed 300");
        Ok(Self(Duration::from_secs(seconds)))
    }

    /// Create a safe default timeout (30 seconds)
    pub const fn default_value() -> Self {
        Self(Duration::from_secs(30))
    }

    /// Create a safe testing timeout (5 seconds)
    pub const fn testing() -> Self {
        Self(Duration::from_secs(5))
    }

    /// Get the timeout value
    pub fn value(&self) -> Duration {
        self.0
    }

    /// Get the timeout value in whole seconds
    pub fn as_secs(&self) -> u64 {
        self.0.as_secs()
    }
}

impl<'de> Deserialize<'de> for TimeoutSeconds {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let seconds = u64::deserialize(deserializer)?;
        Self::new(seconds).map_err(|e| de::Error::custom(e.to_string()))
    }
}

impl Default for TimeoutSeconds {
    fn default() -> Self {
        Self::default_value()
    }
}

/// Environment types for configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Production environment
    Production,
    /// Development environment
    Development,
    /// Testing environment
    Testing,
}

/// Connection settings of a bearer-token backend (SDK-style or direct REST)
///
/// The backend is enabled only when `access_token` is non-blank.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BearerBackendConfig {
    /// Base URL of the backend's REST API, the backend default when blank
    pub base_url: String,
    /// Bearer access token
    #[serde(skip_serializing)]
    pub access_token: String,
    /// Per-request timeout
    pub timeout_seconds: TimeoutSeconds,
}

impl BearerBackendConfig {
    /// Whether a credential is configured
    pub fn is_enabled(&self) -> bool {
        !self.access_token.trim().is_empty()
    }

    fn base_url_or<'a>(&'a self, default: &'a str) -> &'a str {
        if self.base_url.trim().is_empty() {
            default
        } else {
            &self.base_url
        }
    }

    /// Settings of the SDK-style adapter, `None` when disabled
    ///
    /// # Errors
    ///
    /// Returns `ServerError::Config` if the base URL or token is unusable
    pub fn legacy_sdk(&self) -> ServerResult<Option<LegacySdkConfig>> {
        if !self.is_enabled() {
            return Ok(None);
        }
        LegacySdkConfig::new(self.access_token.as_str())
            .and_then(|config| config.with_base_url(self.base_url_or(DEFAULT_LEGACY_SDK_BASE_URL)))
            .map(|config| Some(config.with_timeout(self.timeout_seconds.as_secs())))
            .map_err(|message| ServerError::Config {
                message: format!("legacy-sdk backend: {message}"),
            })
    }

    /// Settings of the direct REST adapter, `None` when disabled
    ///
    /// # Errors
    ///
    /// Returns `ServerError::Config` if the base URL or token is unusable
    pub fn direct_rest(&self) -> ServerResult<Option<DirectRestConfig>> {
        if !self.is_enabled() {
            return Ok(None);
        }
        DirectRestConfig::new(self.access_token.as_str())
            .and_then(|config| {
                config.with_base_url(self.base_url_or(DEFAULT_DIRECT_REST_BASE_URL))
            })
            .map(|config| Some(config.with_timeout(self.timeout_seconds.as_secs())))
            .map_err(|message| ServerError::Config {
                message: format!("direct-rest backend: {message}"),
            })
    }
}

/// Connection settings of the vault backend
///
/// The backend is enabled only when `api_key` is non-blank.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnchorageBackendConfig {
    /// Base URL of the vault API, the provider's staging host when blank
    pub base_url: String,
    /// API access key
    #[serde(skip_serializing)]
    pub api_key: String,
    /// Per-request timeout
    pub timeout_seconds: TimeoutSeconds,
}

impl AnchorageBackendConfig {
    /// Whether a credential is configured
    pub fn is_enabled(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// Settings of the vault adapter, `None` when disabled
    ///
    /// # Errors
    ///
    /// Returns `ServerError::Config` if the base URL or key is unusable
    pub fn anchorage(&self) -> ServerResult<Option<AnchorageConfig>> {
        if !self.is_enabled() {
            return Ok(None);
        }
        let base_url = if self.base_url.trim().is_empty() {
            DEFAULT_ANCHORAGE_BASE_URL
        } else {
            &self.base_url
        };
        AnchorageConfig::new(self.api_key.as_str())
            .and_then(|config| config.with_base_url(base_url))
            .map(|config| Some(config.with_timeout(self.timeout_seconds.as_secs())))
            .map_err(|message| ServerError::Config {
                message: format!("anchorage backend: {message}"),
            })
    }
}

/// Custody backend section of the server configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendsConfig {
    /// SDK-style backend
    pub legacy_sdk: BearerBackendConfig,
    /// Direct REST backend
    pub direct_rest: BearerBackendConfig,
    /// Vault backend
    pub anchorage: AnchorageBackendConfig,
    /// Coins registered on top of the builtin set
    pub coins: Vec<CoinInfo>,
    /// Tokens registered on top of the builtin set
    pub tokens: Vec<TokenConfig>,
}

impl BackendsConfig {
    /// Builtin coin registry extended with the configured coins and tokens
    pub fn coin_registry(&self) -> CoinRegistry {
        let registry = self
            .coins
            .iter()
            .cloned()
            .fold(CoinRegistry::builtin(), CoinRegistry::with_coin);
        self.tokens
            .iter()
            .cloned()
            .fold(registry, CoinRegistry::with_token)
    }
}

/// Server configuration for different environments
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    pub host: IpAddr,
    /// Server port (validated for environment compatibility)
    pub port: ServerPort,
    /// Request timeout in seconds (validated range: 1-300)
    pub timeout_seconds: TimeoutSeconds,
    /// Environment type
    pub environment: Environment,
    /// Custody backend connections
    #[serde(default)]
    pub backends: BackendsConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: ServerPort::default_development(),
            timeout_seconds: TimeoutSeconds::default(),
            environment: Environment::Development,
            backends: BackendsConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Create configuration from environment variables and optional configuration files
    ///
    /// # Errors
    ///
    /// Returns `ServerError::Config` if configuration is invalid or cannot be loaded.
    pub fn from_env() -> ServerResult<Self> {
        Self::load().map_err(|e| ServerError::Config {
            message: format!("failed to load configuration: {e}"),
        })
    }

    /// Load configuration using the config crate with hierarchical sources
    ///
    /// Configuration is loaded in the following order (later sources override earlier ones):
    /// 1. Default values, including `ACCESS_TOKEN` and `ANCHORAGE_API_KEY` when set
    /// 2. Configuration file (config.json)
    /// 3. Environment-specific files (config.{env}.json)
    /// 4. Environment variables with the `SERVER__` prefix, `__` separating nested keys
    ///    (e.g. `SERVER__BACKENDS__ANCHORAGE__API_KEY`)
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if configuration cannot be loaded or is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let env_var = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());
        let access_token = std::env::var(ACCESS_TOKEN_ENV).unwrap_or_default();
        let anchorage_api_key = std::env::var(ANCHORAGE_API_KEY_ENV).unwrap_or_default();

        let mut config_builder = Config::builder()
            .set_default("host", "127.0.0.1")?
            .set_default("port", 3000)?
            .set_default("timeout_seconds", 30)?
            .set_default("environment", "development")?
            .set_default("backends.legacy_sdk.access_token", access_token.as_str())?
            .set_default("backends.direct_rest.access_token", access_token.as_str())?
            .set_default("backends.anchorage.api_key", anchorage_api_key)?
            .add_source(File::with_name("config.json").required(false))
            .add_source(
                File::with_name(&format!("config.{}.json", env_var.to_lowercase())).required(false),
            )
            .add_source(
                ConfigEnv::with_prefix("SERVER")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            );

        if std::env::var("ENVIRONMENT").is_ok() {
            config_builder = config_builder.set_override("environment", env_var.to_lowercase())?;
        }

        let config = config_builder.build()?;
        let mut server_config: Self = config.try_deserialize()?;

        server_config.port = ServerPort::new(server_config.port.value(), server_config.environment)
            .map_err(|e| ConfigError::Message(format!("invalid port configuration: {e}")))?;

        Ok(server_config)
    }

    /// Create configuration optimized for testing, with every backend disabled
    pub fn for_testing() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: ServerPort::testing(),
            timeout_seconds: TimeoutSeconds::testing(),
            environment: Environment::Testing,
            backends: BackendsConfig::default(),
        }
    }

    /// Replace the backend section
    #[must_use]
    pub fn with_backends(mut self, backends: BackendsConfig) -> Self {
        self.backends = backends;
        self
    }

    /// Get socket address for binding
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port.value())
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Production => write!(f, "production"),
            Environment::Development => write!(f, "development"),
            Environment::Testing => write!(f, "testing"),
        }
    }
}

// chain-porter-config/src/config.rs
// ============================================================================
// Module: Configuration Model
// Description: TOML-backed configuration for server and collaborators.
// Purpose: Load and validate all runtime settings in one pass.
// Dependencies: serde, toml, url
// ============================================================================

//! ## Overview
//! [`PorterConfig`] is the single source of configuration truth. `load` reads
//! a TOML file with size and encoding checks, then `validate` enforces
//! internal consistency before anything else starts. Missing config files
//! fall back to testnet defaults so a bare `serve` works out of the box.

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::networks;
use crate::signer::SignerConfig;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration file name resolved from the working directory.
const DEFAULT_CONFIG_NAME: &str = "chain-porter.toml";
/// Maximum accepted configuration file size.
const MAX_CONFIG_FILE_SIZE: usize = 256 * 1024;
/// Default stdio frame size limit.
const DEFAULT_MAX_BODY_BYTES: usize = 4 * 1024 * 1024;
/// Default collaborator HTTP timeout in milliseconds.
const DEFAULT_HTTP_TIMEOUT_MS: u64 = 10_000;
/// Default user agent for collaborator HTTP requests.
const DEFAULT_USER_AGENT: &str = "chain-porter/0.1";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file I/O failure.
    #[error("config io error: {0}")]
    Io(String),
    /// Configuration file parse failure.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Configuration contents are invalid.
    #[error("config invalid: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Root Config
// ============================================================================

/// Root configuration for the Chain Porter server.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PorterConfig {
    /// Transport limits.
    #[serde(default)]
    pub server: ServerConfig,
    /// Chain network parameters.
    #[serde(default = "networks::testnet")]
    pub network: NetworkConfig,
    /// Storage gateway endpoint settings.
    #[serde(default)]
    pub storage: StorageGatewayConfig,
    /// Weather API settings.
    #[serde(default)]
    pub weather: WeatherConfig,
    /// Pinning service settings.
    #[serde(default)]
    pub pinning: PinningConfig,
    /// Local text store settings.
    #[serde(default)]
    pub text_store: TextStoreSettings,
    /// Signing material resolution settings.
    #[serde(default)]
    pub signer: SignerConfig,
}

impl Default for PorterConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            network: networks::testnet(),
            storage: StorageGatewayConfig::default(),
            weather: WeatherConfig::default(),
            pinning: PinningConfig::default(),
            text_store: TextStoreSettings::default(),
            signer: SignerConfig::default(),
        }
    }
}

impl PorterConfig {
    /// Loads configuration from an explicit path or the default location.
    ///
    /// A missing default file yields testnet defaults; an explicit path must
    /// exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read, parsed, or
    /// validated.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_NAME);
                if !default.exists() {
                    let config = Self::default();
                    config.validate()?;
                    return Ok(config);
                }
                default
            }
        };
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.network.validate()?;
        self.storage.validate()?;
        self.weather.validate()?;
        self.pinning.validate()?;
        self.text_store.validate()?;
        self.signer.validate().map_err(|err| ConfigError::Invalid(err.to_string()))?;
        Ok(())
    }
}

// ============================================================================
// SECTION: Server Config
// ============================================================================

/// Transport limits for the stdio session.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Maximum allowed request frame size in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl ServerConfig {
    /// Validates transport limits.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_body_bytes == 0 {
            return Err(ConfigError::Invalid("server.max_body_bytes must be non-zero".to_string()));
        }
        Ok(())
    }
}

/// Returns the default stdio frame size limit.
const fn default_max_body_bytes() -> usize {
    DEFAULT_MAX_BODY_BYTES
}

// ============================================================================
// SECTION: Network Config
// ============================================================================

/// Chain network parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NetworkConfig {
    /// Chain identifier expected from the RPC endpoint.
    pub chain_id: String,
    /// RPC endpoint base URL.
    pub rpc_endpoint: String,
    /// Address prefix for derived wallet addresses.
    pub address_prefix: String,
    /// Fee token denomination in micro units.
    pub fee_denom: String,
    /// Flat fee amount in micro units charged per broadcast.
    pub fee_amount: u64,
    /// Gas limit attached to broadcasts.
    pub gas_limit: u64,
}

impl NetworkConfig {
    /// Validates network parameters.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.chain_id.is_empty() {
            return Err(ConfigError::Invalid("network.chain_id must be non-empty".to_string()));
        }
        if self.address_prefix.is_empty() {
            return Err(ConfigError::Invalid(
                "network.address_prefix must be non-empty".to_string(),
            ));
        }
        if self.fee_denom.is_empty() {
            return Err(ConfigError::Invalid("network.fee_denom must be non-empty".to_string()));
        }
        validate_endpoint("network.rpc_endpoint", &self.rpc_endpoint)
    }
}

// ============================================================================
// SECTION: Collaborator Configs
// ============================================================================

/// Storage gateway endpoint settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StorageGatewayConfig {
    /// Storage gateway base URL.
    pub endpoint: String,
    /// Request timeout in milliseconds.
    #[serde(default = "default_http_timeout_ms")]
    pub timeout_ms: u64,
    /// User agent for gateway requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for StorageGatewayConfig {
    fn default() -> Self {
        Self {
            endpoint: networks::TESTNET_STORAGE_GATEWAY.to_string(),
            timeout_ms: DEFAULT_HTTP_TIMEOUT_MS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl StorageGatewayConfig {
    /// Validates gateway settings.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_ms == 0 {
            return Err(ConfigError::Invalid("storage.timeout_ms must be non-zero".to_string()));
        }
        validate_endpoint("storage.endpoint", &self.endpoint)
    }
}

/// Weather API settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WeatherConfig {
    /// Weather API base URL.
    pub endpoint: String,
    /// Request timeout in milliseconds.
    #[serde(default = "default_http_timeout_ms")]
    pub timeout_ms: u64,
    /// User agent for weather requests; the upstream API requires one.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.weather.gov".to_string(),
            timeout_ms: DEFAULT_HTTP_TIMEOUT_MS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl WeatherConfig {
    /// Validates weather settings.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid("weather.user_agent must be non-empty".to_string()));
        }
        validate_endpoint("weather.endpoint", &self.endpoint)
    }
}

/// Pinning service settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PinningConfig {
    /// Pinning service base URL.
    pub endpoint: String,
    /// Environment variable holding the bearer token, if the service
    /// requires one.
    #[serde(default)]
    pub token_env: Option<String>,
    /// Request timeout in milliseconds.
    #[serde(default = "default_http_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for PinningConfig {
    fn default() -> Self {
        Self {
            endpoint: networks::TESTNET_PINNING_SERVICE.to_string(),
            token_env: None,
            timeout_ms: DEFAULT_HTTP_TIMEOUT_MS,
        }
    }
}

impl PinningConfig {
    /// Validates pinning settings.
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(token_env) = &self.token_env
            && token_env.is_empty()
        {
            return Err(ConfigError::Invalid(
                "pinning.token_env must be non-empty when set".to_string(),
            ));
        }
        validate_endpoint("pinning.endpoint", &self.endpoint)
    }

    /// Resolves the bearer token from the configured environment variable.
    #[must_use]
    pub fn resolve_token(&self) -> Option<String> {
        self.token_env.as_ref().and_then(|name| env::var(name).ok())
    }
}

/// Local text store settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TextStoreSettings {
    /// Path to the text store database file.
    pub path: PathBuf,
    /// Busy timeout in milliseconds for store connections.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

impl Default for TextStoreSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/text_store.db"),
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }
}

impl TextStoreSettings {
    /// Validates store settings.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("text_store.path must be non-empty".to_string()));
        }
        Ok(())
    }
}

/// Returns the default busy timeout for store connections.
const fn default_busy_timeout_ms() -> u64 {
    5_000
}

/// Returns the default collaborator HTTP timeout.
const fn default_http_timeout_ms() -> u64 {
    DEFAULT_HTTP_TIMEOUT_MS
}

/// Returns the default user agent for collaborator requests.
fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Validates that an endpoint is an absolute http(s) URL.
fn validate_endpoint(field: &str, endpoint: &str) -> Result<(), ConfigError> {
    let url = Url::parse(endpoint)
        .map_err(|_| ConfigError::Invalid(format!("{field} must be a valid URL")))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Invalid(format!("{field} must use http or https")));
    }
    Ok(())
}

// ============================================================================
// SECTION: Tests
// ============================================================================

// crates/tracelens-config/src/config.rs
// ============================================================================
// Module: TraceLens Configuration
// Description: Configuration loading and validation for TraceLens.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: serde, thiserror, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size limits and
//! validated fail-closed before any server or client is built. API keys are
//! never stored in the file; the config names the environment variable that
//! carries the key and resolution happens at client construction.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "tracelens.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "TRACELENS_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: u64 = 1024 * 1024;
/// Default environment variable holding the platform API key.
pub const DEFAULT_API_KEY_ENV: &str = "TRACELENS_API_KEY";
/// Default platform API endpoint.
pub(crate) const DEFAULT_ENDPOINT: &str = "https://api.tracelens.io";
/// Default outbound request timeout in milliseconds.
pub(crate) const DEFAULT_TIMEOUT_MS: u64 = 30_000;
/// Minimum outbound request timeout in milliseconds.
pub(crate) const MIN_TIMEOUT_MS: u64 = 100;
/// Maximum outbound request timeout in milliseconds.
pub(crate) const MAX_TIMEOUT_MS: u64 = 120_000;
/// Default maximum platform API response size in bytes.
pub(crate) const DEFAULT_MAX_RESPONSE_BYTES: usize = 4 * 1024 * 1024;
/// Maximum allowed platform API response size in bytes.
pub(crate) const MAX_MAX_RESPONSE_BYTES: usize = 64 * 1024 * 1024;
/// Default user agent for outbound platform API requests.
pub(crate) const DEFAULT_USER_AGENT: &str = "tracelens/0.1";
/// Default maximum JSON-RPC request body size in bytes.
pub(crate) const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;
/// Maximum allowed JSON-RPC request body size in bytes.
pub(crate) const MAX_MAX_BODY_BYTES: usize = 16 * 1024 * 1024;
/// Maximum number of server auth tokens.
pub(crate) const MAX_AUTH_TOKENS: usize = 64;
/// Minimum length of a server auth token.
pub(crate) const MIN_AUTH_TOKEN_LENGTH: usize = 16;
/// Maximum length of a server auth token.
pub(crate) const MAX_AUTH_TOKEN_LENGTH: usize = 256;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// TraceLens MCP server configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TracelensConfig {
    /// Platform API connection configuration.
    #[serde(default)]
    pub api: ApiConfig,
    /// Server transport configuration.
    #[serde(default)]
    pub server: ServerConfig,
}

/// Platform API connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Platform API endpoint URL.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Environment variable holding the platform API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// Allow cleartext HTTP endpoints (disabled by default).
    #[serde(default)]
    pub allow_http: bool,
    /// Outbound request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Maximum platform API response size in bytes.
    #[serde(default = "default_max_response_bytes")]
    pub max_response_bytes: usize,
    /// User agent string for outbound requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key_env: default_api_key_env(),
            allow_http: false,
            timeout_ms: default_timeout_ms(),
            max_response_bytes: default_max_response_bytes(),
            user_agent: default_user_agent(),
        }
    }
}

/// Server transport selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServerTransport {
    /// JSON-RPC over framed stdin/stdout.
    #[default]
    Stdio,
    /// JSON-RPC over HTTP POST.
    Http,
}

/// Server authentication mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServerAuthMode {
    /// No authentication; only safe for trusted local transports.
    LocalOnly,
    /// Bearer token authentication for HTTP callers.
    BearerToken,
}

/// Server authentication configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerAuthConfig {
    /// Authentication mode.
    pub mode: ServerAuthMode,
    /// Accepted bearer tokens when mode is `bearer_token`.
    #[serde(default)]
    pub tokens: Vec<String>,
}

/// Server transport configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Transport used to serve JSON-RPC requests.
    #[serde(default)]
    pub transport: ServerTransport,
    /// Bind address for the HTTP transport.
    #[serde(default)]
    pub bind: Option<String>,
    /// Maximum JSON-RPC request body size in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
    /// Optional authentication policy for HTTP callers.
    #[serde(default)]
    pub auth: Option<ServerAuthConfig>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            transport: ServerTransport::Stdio,
            bind: None,
            max_body_bytes: default_max_body_bytes(),
            auth: None,
        }
    }
}

// ============================================================================
// SECTION: Serde Defaults
// ============================================================================

/// Returns the default platform API endpoint.
fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

/// Returns the default API key environment variable name.
fn default_api_key_env() -> String {
    DEFAULT_API_KEY_ENV.to_string()
}

/// Returns the default request timeout.
const fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

/// Returns the default response size limit.
const fn default_max_response_bytes() -> usize {
    DEFAULT_MAX_RESPONSE_BYTES
}

/// Returns the default user agent.
fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

/// Returns the default request body size limit.
const fn default_max_body_bytes() -> usize {
    DEFAULT_MAX_BODY_BYTES
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The named config file does not exist.
    #[error("config file not found: {0}")]
    NotFound(String),
    /// Reading the config file failed.
    #[error("failed to read config file: {0}")]
    Io(String),
    /// The config file exceeds the size limit.
    #[error("config file too large: {size} bytes exceeds {limit}")]
    TooLarge {
        /// Observed file size in bytes.
        size: u64,
        /// Maximum allowed file size in bytes.
        limit: u64,
    },
    /// Parsing the config file failed.
    #[error("failed to parse config: {0}")]
    Parse(String),
    /// A validation rule rejected the config.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Loading
// ============================================================================

/// Resolves the config path from an explicit argument, the environment, or
/// the default filename.
#[must_use]
pub fn resolve_config_path(explicit: Option<&Path>) -> PathBuf {
    explicit.map_or_else(
        || {
            env::var(CONFIG_ENV_VAR)
                .map_or_else(|_| PathBuf::from(DEFAULT_CONFIG_NAME), PathBuf::from)
        },
        Path::to_path_buf,
    )
}

/// Loads and validates configuration.
///
/// An explicit or environment-supplied path must exist. When only the
/// default filename is in play and no such file exists, built-in defaults
/// are used so the server can run from environment variables alone.
///
/// # Errors
///
/// Returns [`ConfigError`] when the file is missing, oversized, unparsable,
/// or fails validation.
pub fn load_config(explicit: Option<&Path>) -> Result<TracelensConfig, ConfigError> {
    let required = explicit.is_some() || env::var(CONFIG_ENV_VAR).is_ok();
    let path = resolve_config_path(explicit);
    if !path.exists() {
        if required {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let config = TracelensConfig::default();
        config.validate()?;
        return Ok(config);
    }
    let config = load_config_file(&path)?;
    config.validate()?;
    Ok(config)
}

/// Reads and parses a config file without validating it.
///
/// # Errors
///
/// Returns [`ConfigError`] when the file cannot be read or parsed.
pub fn load_config_file(path: &Path) -> Result<TracelensConfig, ConfigError> {
    let metadata = fs::metadata(path).map_err(|err| ConfigError::Io(err.to_string()))?;
    if metadata.len() > MAX_CONFIG_FILE_SIZE {
        return Err(ConfigError::TooLarge {
            size: metadata.len(),
            limit: MAX_CONFIG_FILE_SIZE,
        });
    }
    let text = fs::read_to_string(path).map_err(|err| ConfigError::Io(err.to_string()))?;
    toml::from_str(&text).map_err(|err| ConfigError::Parse(err.to_string()))
}

// ============================================================================
// SECTION: Validation
// ============================================================================

impl TracelensConfig {
    /// Validates the configuration fail-closed.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] on the first rule violation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.api.validate()?;
        self.server.validate()
    }
}

impl ApiConfig {
    /// Validates the platform API configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] on the first rule violation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.endpoint.is_empty() {
            return Err(ConfigError::Invalid("api.endpoint must not be empty".to_string()));
        }
        if self.endpoint.chars().any(char::is_whitespace) {
            return Err(ConfigError::Invalid(
                "api.endpoint must not contain whitespace".to_string(),
            ));
        }
        let https = self.endpoint.starts_with("https://");
        let http = self.endpoint.starts_with("http://");
        if !https && !http {
            return Err(ConfigError::Invalid(
                "api.endpoint must use http(s) scheme".to_string(),
            ));
        }
        if http && !self.allow_http {
            return Err(ConfigError::Invalid(
                "api.endpoint uses cleartext http without api.allow_http".to_string(),
            ));
        }
        if self.api_key_env.is_empty()
            || !self.api_key_env.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
        {
            return Err(ConfigError::Invalid(
                "api.api_key_env must be a non-empty environment variable name".to_string(),
            ));
        }
        if self.timeout_ms < MIN_TIMEOUT_MS || self.timeout_ms > MAX_TIMEOUT_MS {
            return Err(ConfigError::Invalid(format!(
                "api.timeout_ms must be between {MIN_TIMEOUT_MS} and {MAX_TIMEOUT_MS}"
            )));
        }
        if self.max_response_bytes == 0 || self.max_response_bytes > MAX_MAX_RESPONSE_BYTES {
            return Err(ConfigError::Invalid(format!(
                "api.max_response_bytes must be between 1 and {MAX_MAX_RESPONSE_BYTES}"
            )));
        }
        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid("api.user_agent must not be empty".to_string()));
        }
        Ok(())
    }
}

impl ServerConfig {
    /// Validates the server transport configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] on the first rule violation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_body_bytes == 0 || self.max_body_bytes > MAX_MAX_BODY_BYTES {
            return Err(ConfigError::Invalid(format!(
                "server.max_body_bytes must be between 1 and {MAX_MAX_BODY_BYTES}"
            )));
        }
        match self.transport {
            ServerTransport::Stdio => {
                if self.bind.is_some() {
                    return Err(ConfigError::Invalid(
                        "server.bind is only valid for the http transport".to_string(),
                    ));
                }
            }
            ServerTransport::Http => {
                let bind = self.bind.as_ref().ok_or_else(|| {
                    ConfigError::Invalid(
                        "server.bind is required for the http transport".to_string(),
                    )
                })?;
                if bind.parse::<SocketAddr>().is_err() {
                    return Err(ConfigError::Invalid(
                        "server.bind must be a socket address".to_string(),
                    ));
                }
            }
        }
        if let Some(auth) = self.auth.as_ref() {
            auth.validate(self.transport)?;
        }
        Ok(())
    }
}

impl ServerAuthConfig {
    /// Validates the authentication policy for the selected transport.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] on the first rule violation.
    pub fn validate(&self, transport: ServerTransport) -> Result<(), ConfigError> {
        match self.mode {
            ServerAuthMode::LocalOnly => {
                if !self.tokens.is_empty() {
                    return Err(ConfigError::Invalid(
                        "server.auth.tokens must be empty in local_only mode".to_string(),
                    ));
                }
            }
            ServerAuthMode::BearerToken => {
                if transport != ServerTransport::Http {
                    return Err(ConfigError::Invalid(
                        "bearer_token auth requires the http transport".to_string(),
                    ));
                }
                if self.tokens.is_empty() || self.tokens.len() > MAX_AUTH_TOKENS {
                    return Err(ConfigError::Invalid(format!(
                        "server.auth.tokens must hold between 1 and {MAX_AUTH_TOKENS} tokens"
                    )));
                }
                for token in &self.tokens {
                    let length = token.len();
                    if length < MIN_AUTH_TOKEN_LENGTH || length > MAX_AUTH_TOKEN_LENGTH {
                        return Err(ConfigError::Invalid(format!(
                            "server.auth.tokens entries must be between \
                             {MIN_AUTH_TOKEN_LENGTH} and {MAX_AUTH_TOKEN_LENGTH} bytes"
                        )));
                    }
                    if !token.chars().all(|ch| ch.is_ascii_graphic()) {
                        return Err(ConfigError::Invalid(
                            "server.auth.tokens entries must be printable ascii".to_string(),
                        ));
                    }
                }
            }
        }
        Ok(())
    }
}

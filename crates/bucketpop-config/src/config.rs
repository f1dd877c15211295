// crates/bucketpop-config/src/config.rs
// ============================================================================
// Module: bucketpop Configuration
// Description: Configuration loading and validation for provider resolution.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: bucketpop-core, serde, toml, url
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Exactly one resolver mode is configured per deployment. Missing or invalid
//! configuration fails closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fmt;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use bucketpop_core::CredentialBundle;
use serde::Deserialize;
use serde::Deserializer;
use thiserror::Error;
use url::Url;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "bucketpop.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "BUCKETPOP_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Minimum allowed authority timeout in milliseconds.
pub const MIN_AUTHORITY_TIMEOUT_MS: u64 = 100;
/// Maximum allowed authority timeout in milliseconds.
pub const MAX_AUTHORITY_TIMEOUT_MS: u64 = 60_000;
/// Default authority request timeout in milliseconds.
pub(crate) const DEFAULT_AUTHORITY_TIMEOUT_MS: u64 = 5_000;
/// Default maximum HTTP authority response size in bytes.
pub(crate) const DEFAULT_MAX_RESPONSE_BYTES: usize = 64 * 1024;
/// Maximum allowed HTTP authority response size in bytes.
pub const MAX_RESPONSE_BYTES_LIMIT: usize = 1024 * 1024;
/// Default user agent for HTTP authority requests.
pub(crate) const DEFAULT_USER_AGENT: &str = "bucketpop/0.1";

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// bucketpop resolver configuration file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    /// The single resolution strategy for this deployment.
    pub resolver: ResolverConfig,
}

impl AuthConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// The path is taken from `path`, then [`CONFIG_ENV_VAR`], then
    /// `bucketpop.toml` in the working directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::parse(content)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
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
        self.resolver.validate()
    }
}

/// Resolution strategy selection.
///
/// # Invariants
/// - Exactly one strategy is active; strategies are never chained.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ResolverConfig {
    /// Fixed user/password pair.
    Static(StaticResolverConfig),
    /// Self-authenticating signed tokens.
    Token(TokenResolverConfig),
    /// Remote HTTP authority consulted with Basic credentials.
    Http(HttpResolverConfig),
    /// Remote serverless function consulted with a JSON payload.
    Function(FunctionResolverConfig),
}

impl ResolverConfig {
    /// Returns a stable label for the configured mode.
    #[must_use]
    pub const fn mode_label(&self) -> &'static str {
        match self {
            Self::Static(_) => "static",
            Self::Token(_) => "token",
            Self::Http(_) => "http",
            Self::Function(_) => "function",
        }
    }

    /// Validates the selected strategy configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the strategy configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            Self::Static(config) => config.validate(),
            Self::Token(config) => config.validate(),
            Self::Http(config) => config.validate(),
            Self::Function(config) => config.validate(),
        }
    }
}

/// Static credential configuration.
///
/// # Invariants
/// - `user` and `password` are non-empty.
/// - A missing `bundle` resolves logins to an empty placeholder mailbox.
#[derive(Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StaticResolverConfig {
    /// Accepted user name.
    pub user: String,
    /// Accepted password.
    pub password: String,
    /// Optional store bundle for successful logins.
    #[serde(default, deserialize_with = "strict_bundle")]
    pub bundle: Option<CredentialBundle>,
}

impl StaticResolverConfig {
    /// Validates static credential configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty("resolver.user", &self.user)?;
        require_non_empty("resolver.password", &self.password)
    }
}

impl fmt::Debug for StaticResolverConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticResolverConfig")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("bundle", &self.bundle)
            .finish()
    }
}

/// Signed-token configuration.
///
/// # Invariants
/// - `secret` is non-empty.
/// - `issuer` and `audience` are checked only when set.
#[derive(Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TokenResolverConfig {
    /// Shared HMAC secret used to verify tokens.
    pub secret: String,
    /// Required `iss` claim.
    #[serde(default)]
    pub issuer: Option<String>,
    /// Required `aud` claim.
    #[serde(default)]
    pub audience: Option<String>,
}

impl TokenResolverConfig {
    /// Validates token configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty("resolver.secret", &self.secret)?;
        if let Some(issuer) = &self.issuer {
            require_non_empty("resolver.issuer", issuer)?;
        }
        if let Some(audience) = &self.audience {
            require_non_empty("resolver.audience", audience)?;
        }
        Ok(())
    }
}

impl fmt::Debug for TokenResolverConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenResolverConfig")
            .field("secret", &"<redacted>")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .finish()
    }
}

/// HTTP authority configuration.
///
/// # Invariants
/// - `url` is absolute, https unless `allow_http`, and carries no credentials.
/// - Timeouts are within [`MIN_AUTHORITY_TIMEOUT_MS`, `MAX_AUTHORITY_TIMEOUT_MS`].
/// - `max_response_bytes` is within (0, [`MAX_RESPONSE_BYTES_LIMIT`]].
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HttpResolverConfig {
    /// Authority URL receiving the GET request.
    pub url: String,
    /// Whole-request timeout in milliseconds.
    #[serde(default = "default_authority_timeout_ms")]
    pub timeout_ms: u64,
    /// Connect timeout in milliseconds; defaults to the request timeout.
    #[serde(default)]
    pub connect_timeout_ms: Option<u64>,
    /// Maximum accepted response body size in bytes.
    #[serde(default = "default_max_response_bytes")]
    pub max_response_bytes: usize,
    /// Allow cleartext `http://` authorities.
    #[serde(default)]
    pub allow_http: bool,
    /// User agent for outbound requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl HttpResolverConfig {
    /// Creates a config for `url` with default limits.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout_ms: DEFAULT_AUTHORITY_TIMEOUT_MS,
            connect_timeout_ms: None,
            max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES,
            allow_http: false,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// Returns the whole-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Returns the connect timeout.
    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms.unwrap_or(self.timeout_ms))
    }

    /// Validates HTTP authority configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_authority_url(&self.url, self.allow_http)?;
        validate_timeout("resolver.timeout_ms", self.timeout_ms)?;
        if let Some(connect) = self.connect_timeout_ms {
            validate_timeout("resolver.connect_timeout_ms", connect)?;
        }
        if self.max_response_bytes == 0 || self.max_response_bytes > MAX_RESPONSE_BYTES_LIMIT {
            return Err(ConfigError::Invalid(format!(
                "resolver.max_response_bytes must be between 1 and {MAX_RESPONSE_BYTES_LIMIT}"
            )));
        }
        require_non_empty("resolver.user_agent", &self.user_agent)
    }
}

/// Serverless function configuration.
///
/// # Invariants
/// - `function` is a non-empty function name or ARN.
/// - `timeout_ms` is within the authority timeout bounds.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FunctionResolverConfig {
    /// Function name or ARN to invoke.
    pub function: String,
    /// Invocation timeout in milliseconds.
    #[serde(default = "default_authority_timeout_ms")]
    pub timeout_ms: u64,
    /// Region override; defaults to the ambient SDK configuration.
    #[serde(default)]
    pub region: Option<String>,
    /// Endpoint override for compatible local emulators.
    #[serde(default)]
    pub endpoint_url: Option<String>,
}

impl FunctionResolverConfig {
    /// Creates a config for `function` with the default timeout.
    #[must_use]
    pub fn new(function: impl Into<String>) -> Self {
        Self {
            function: function.into(),
            timeout_ms: DEFAULT_AUTHORITY_TIMEOUT_MS,
            region: None,
            endpoint_url: None,
        }
    }

    /// Returns the invocation timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Validates function configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty("resolver.function", &self.function)?;
        validate_timeout("resolver.timeout_ms", self.timeout_ms)?;
        if let Some(region) = &self.region {
            require_non_empty("resolver.region", region)?;
        }
        if let Some(endpoint) = &self.endpoint_url {
            Url::parse(endpoint).map_err(|_| {
                ConfigError::Invalid("resolver.endpoint_url must be a valid url".to_string())
            })?;
        }
        Ok(())
    }
}

/// Bundle table as written in configuration.
///
/// # Invariants
/// - Unknown keys are rejected, unlike the lenient wire form of
///   [`CredentialBundle`].
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct BundleTable {
    /// Access key identifier.
    #[serde(default, alias = "awsAccessKeyID")]
    access_key_id: String,
    /// Secret access key.
    #[serde(default, alias = "awsSecretAccessKey")]
    secret_access_key: String,
    /// Temporary session token.
    #[serde(default, alias = "awsSessionToken")]
    session_token: String,
    /// Store region.
    #[serde(default)]
    region: String,
    /// Bucket name.
    #[serde(default)]
    bucket: String,
    /// Key prefix.
    #[serde(default)]
    prefix: String,
}

impl From<BundleTable> for CredentialBundle {
    fn from(table: BundleTable) -> Self {
        Self {
            access_key_id: table.access_key_id,
            secret_access_key: table.secret_access_key,
            session_token: table.session_token,
            region: table.region,
            bucket: table.bucket,
            prefix: table.prefix,
        }
    }
}

/// Decodes an optional `[resolver.bundle]` table, rejecting unknown keys.
fn strict_bundle<'de, D>(deserializer: D) -> Result<Option<CredentialBundle>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<BundleTable>::deserialize(deserializer)?.map(CredentialBundle::from))
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Default authority timeout in milliseconds.
const fn default_authority_timeout_ms() -> u64 {
    DEFAULT_AUTHORITY_TIMEOUT_MS
}

/// Default maximum HTTP response size in bytes.
const fn default_max_response_bytes() -> usize {
    DEFAULT_MAX_RESPONSE_BYTES
}

/// Default outbound user agent.
fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from the argument or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates the resolved path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Rejects empty or whitespace-only values.
fn require_non_empty(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    Ok(())
}

/// Validates a timeout against the authority bounds.
fn validate_timeout(field: &str, value: u64) -> Result<(), ConfigError> {
    if !(MIN_AUTHORITY_TIMEOUT_MS ..= MAX_AUTHORITY_TIMEOUT_MS).contains(&value) {
        return Err(ConfigError::Invalid(format!(
            "{field} must be between {MIN_AUTHORITY_TIMEOUT_MS} and {MAX_AUTHORITY_TIMEOUT_MS}"
        )));
    }
    Ok(())
}

/// Validates the authority URL scheme and rejects embedded credentials.
fn validate_authority_url(raw: &str, allow_http: bool) -> Result<(), ConfigError> {
    let url = Url::parse(raw)
        .map_err(|_| ConfigError::Invalid("resolver.url must be a valid url".to_string()))?;
    match url.scheme() {
        "https" => {}
        "http" if allow_http => {}
        "http" => {
            return Err(ConfigError::Invalid(
                "resolver.url uses http but allow_http is false".to_string(),
            ));
        }
        _ => return Err(ConfigError::Invalid("resolver.url has unsupported scheme".to_string())),
    }
    if url.host_str().is_none() {
        return Err(ConfigError::Invalid("resolver.url host required".to_string()));
    }
    if !url.username().is_empty() || url.password().is_some() {
        return Err(ConfigError::Invalid(
            "resolver.url must not embed credentials".to_string(),
        ));
    }
    Ok(())
}

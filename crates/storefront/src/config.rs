//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront
//! - `SANITY_PROJECT_ID` - Sanity project ID hosting the product catalog
//! - `SHIPMENT_RATES_URL` - Endpoint that quotes shipping rates for an address
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `SANITY_DATASET` - Dataset name (default: production)
//! - `SANITY_API_VERSION` - Query API version (default: 2021-08-31)
//! - `SANITY_USE_CDN` - Query the CDN host (default: true)
//! - `SANITY_API_URL` - Override the query host (proxies, local stubs)
//! - `SANITY_TOKEN` - Read token for private datasets
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your_",
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Catalog (Sanity) configuration
    pub sanity: SanityConfig,
    /// Shipping rate endpoint configuration
    pub shipment: ShipmentConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Sanity content API configuration.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct SanityConfig {
    /// Project ID (first label of the API host)
    pub project_id: String,
    /// Dataset name
    pub dataset: String,
    /// API version date, without the leading `v`
    pub api_version: String,
    /// Use the cached CDN host instead of the live API
    pub use_cdn: bool,
    /// Explicit API base URL, replacing the project host
    pub api_url: Option<String>,
    /// Read token for private datasets
    pub token: Option<SecretString>,
}

impl std::fmt::Debug for SanityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SanityConfig")
            .field("project_id", &self.project_id)
            .field("dataset", &self.dataset)
            .field("api_version", &self.api_version)
            .field("use_cdn", &self.use_cdn)
            .field("api_url", &self.api_url)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Shipping rate endpoint configuration.
#[derive(Debug, Clone)]
pub struct ShipmentConfig {
    /// URL receiving `POST` requests with a shipping address
    pub rates_url: Url,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid, or
    /// if the Sanity token looks like a placeholder.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string())
            })?;
        let port = get_env_or_default("STOREFRONT_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_string(), e.to_string())
            })?;
        let base_url = get_required_env("STOREFRONT_BASE_URL")?;

        Ok(Self {
            host,
            port,
            base_url,
            sanity: SanityConfig::from_env()?,
            shipment: ShipmentConfig::from_env()?,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the storefront is served over HTTPS.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl SanityConfig {
    /// Load the catalog configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `SANITY_PROJECT_ID` is missing, a value is
    /// malformed, or the token looks like a placeholder.
    pub fn from_env() -> Result<Self, ConfigError> {
        let use_cdn = parse_bool("SANITY_USE_CDN", &get_env_or_default("SANITY_USE_CDN", "true"))?;
        let token = get_optional_env("SANITY_TOKEN")
            .map(|value| {
                validate_secret_strength(&value, "SANITY_TOKEN")?;
                Ok::<_, ConfigError>(SecretString::from(value))
            })
            .transpose()?;

        let config = Self {
            project_id: get_required_env("SANITY_PROJECT_ID")?,
            dataset: get_env_or_default("SANITY_DATASET", "production"),
            api_version: get_env_or_default("SANITY_API_VERSION", "2021-08-31")
                .trim_start_matches('v')
                .to_string(),
            use_cdn,
            api_url: get_optional_env("SANITY_API_URL"),
            token,
        };

        // Fail at startup rather than on the first catalog request.
        config.query_url().map_err(|e| {
            ConfigError::InvalidEnvVar("SANITY_API_URL".to_string(), e.to_string())
        })?;

        Ok(config)
    }

    /// Base URL of the query API host.
    #[must_use]
    pub fn api_host(&self) -> String {
        self.api_url.clone().unwrap_or_else(|| {
            let host = if self.use_cdn { "apicdn" } else { "api" };
            format!("https://{}.{host}.sanity.io", self.project_id)
        })
    }

    /// Full URL of the GROQ query endpoint for the configured dataset.
    ///
    /// # Errors
    ///
    /// Returns an error if the host does not form a valid URL.
    pub fn query_url(&self) -> Result<Url, url::ParseError> {
        let host = self.api_host();
        let base = Url::parse(&format!("{}/", host.trim_end_matches('/')))?;
        base.join(&format!(
            "v{}/data/query/{}",
            self.api_version, self.dataset
        ))
    }
}

impl ShipmentConfig {
    /// Load the rate endpoint configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `SHIPMENT_RATES_URL` is missing or not a URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw = get_required_env("SHIPMENT_RATES_URL")?;
        let rates_url = Url::parse(&raw).map_err(|e| {
            ConfigError::InvalidEnvVar("SHIPMENT_RATES_URL".to_string(), e.to_string())
        })?;
        Ok(Self { rates_url })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable, treating empty values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse a boolean flag value.
fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("expected a boolean, got '{other}'"),
        )),
    }
}

/// Validate that a secret is not a placeholder copied from a sample `.env`.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    Ok(())
}

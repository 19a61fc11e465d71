//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `LESSON_SHOP_API_URL` - Base URL of the storefront API
//!   (default: `http://127.0.0.1:3000`)

use thiserror::Error;
use url::Url;

const DEFAULT_API_URL: &str = "http://127.0.0.1:3000";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("API URL must be http or https: {0}")]
    UnsupportedScheme(String),
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL every endpoint is resolved against. Always ends with `/`.
    pub base_url: Url,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `LESSON_SHOP_API_URL` is not a valid http(s) URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let raw = std::env::var("LESSON_SHOP_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.into());
        Self::new(&raw)
    }

    /// Build a configuration for an explicit base URL.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `base_url` is not a valid http(s) URL.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        let mut url = Url::parse(base_url).map_err(|e| {
            ConfigError::InvalidEnvVar("LESSON_SHOP_API_URL".to_string(), e.to_string())
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme(base_url.to_string()));
        }

        // `Url::join` replaces the last path segment unless the path ends in '/'
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }

        Ok(Self { base_url: url })
    }
}

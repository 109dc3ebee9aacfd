//! Configuration types for the Sevalla API SDK.
//!
//! This module provides the configuration used to construct a
//! [`SevallaClient`](crate::SevallaClient).
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`ClientConfig`]: The immutable configuration held by a client
//! - [`ClientConfigBuilder`]: A builder that applies options in call order
//! - [`ApiKey`]: A validated API key newtype with masked debug output
//! - [`BaseUrl`]: A validated base URL that request paths resolve against
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use sevalla_api::{ApiKey, ClientConfig};
//!
//! let config = ClientConfig::builder()
//!     .api_key(ApiKey::new("my-api-key").unwrap())
//!     .timeout(Duration::from_secs(10))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.base_url().as_ref(), "https://api.sevalla.com/v2/");
//! ```

mod newtypes;

use std::time::Duration;

pub use newtypes::{ApiKey, BaseUrl};

use crate::error::ConfigError;

/// Default root of the Sevalla API.
///
/// The trailing slash keeps the `/v2/` prefix when relative paths are joined.
pub const DEFAULT_BASE_URL: &str = "https://api.sevalla.com/v2/";

/// Default per-request timeout applied to the built-in transport.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// SDK version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Returns the default `User-Agent` header value.
#[must_use]
pub fn default_user_agent() -> String {
    format!("sevalla-rust/{SDK_VERSION}")
}

/// Configuration for a Sevalla API client.
///
/// A `ClientConfig` is immutable once built. It holds the base URL, the
/// optional credential, the user agent, and the HTTP transport that every
/// request is sent through.
///
/// # Thread Safety
///
/// `ClientConfig` is `Clone`, `Send`, and `Sync`. Cloning is cheap since the
/// transport is reference counted internally.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    base_url: BaseUrl,
    api_key: Option<ApiKey>,
    user_agent: String,
    timeout: Duration,
    http_client: reqwest::Client,
}

impl ClientConfig {
    /// Creates a new builder for constructing a `ClientConfig`.
    #[must_use]
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    /// Returns the base URL.
    #[must_use]
    pub const fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    /// Returns the API key, if configured.
    #[must_use]
    pub const fn api_key(&self) -> Option<&ApiKey> {
        self.api_key.as_ref()
    }

    /// Returns the user agent sent with every request.
    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Returns the timeout applied to the built-in transport.
    ///
    /// This has no effect when a custom transport was supplied through
    /// [`ClientConfigBuilder::http_client`].
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the HTTP transport.
    #[must_use]
    pub const fn http_client(&self) -> &reqwest::Client {
        &self.http_client
    }
}

// Verify ClientConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ClientConfig>();
};

/// Builder for constructing [`ClientConfig`] instances.
///
/// Every setter overwrites the field it touches, so when the same option is
/// set twice the later call wins. Values are validated in [`build`](Self::build),
/// which means only the final value of each option is checked.
///
/// # Defaults
///
/// - `base_url`: [`DEFAULT_BASE_URL`]
/// - `api_key`: `None` (no `Authorization` header is sent)
/// - `user_agent`: `sevalla-rust/<version>`
/// - `timeout`: [`DEFAULT_TIMEOUT`]
/// - `http_client`: a rustls-backed `reqwest::Client` using `timeout`
///
/// # Example
///
/// ```rust
/// use sevalla_api::{ApiKey, ClientConfig};
///
/// let config = ClientConfig::builder()
///     .base_url("https://staging.example.com/v2/")
///     .api_key(ApiKey::new("key").unwrap())
///     .user_agent("my-deployer/1.0")
///     .build()
///     .unwrap();
///
/// assert_eq!(config.user_agent(), "my-deployer/1.0");
/// ```
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    base_url: Option<String>,
    api_key: Option<ApiKey>,
    user_agent: Option<String>,
    timeout: Option<Duration>,
    http_client: Option<reqwest::Client>,
}

impl ClientConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key used for bearer authentication.
    #[must_use]
    pub fn api_key(mut self, key: ApiKey) -> Self {
        if self.api_key.is_some() {
            tracing::debug!("Client config overriding previously set API key");
        }
        self.api_key = Some(key);
        self
    }

    /// Sets the base URL that request paths are resolved against.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        if let Some(previous) = &self.base_url {
            tracing::debug!("Client config overriding base URL {} with {}", previous, url);
        }
        self.base_url = Some(url);
        self
    }

    /// Sets the `User-Agent` header value.
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Sets the timeout used by the built-in transport.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets a custom HTTP transport.
    ///
    /// The client is used as-is; configure its timeout and connection pool
    /// before passing it in.
    #[must_use]
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Builds the [`ClientConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] if the base URL is malformed,
    /// [`ConfigError::InvalidUserAgent`] if the user agent is not a valid
    /// header value, or [`ConfigError::HttpClient`] if the default transport
    /// cannot be created.
    pub fn build(self) -> Result<ClientConfig, ConfigError> {
        let base_url = BaseUrl::new(self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL))?;

        let user_agent = self.user_agent.unwrap_or_else(default_user_agent);
        if user_agent.is_empty() || reqwest::header::HeaderValue::from_str(&user_agent).is_err() {
            return Err(ConfigError::InvalidUserAgent { user_agent });
        }

        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);
        let http_client = match self.http_client {
            Some(client) => client,
            None => reqwest::Client::builder()
                .use_rustls_tls()
                .timeout(timeout)
                .build()
                .map_err(|e| ConfigError::HttpClient {
                    reason: e.to_string(),
                })?,
        };

        Ok(ClientConfig {
            base_url,
            api_key: self.api_key,
            user_agent,
            timeout,
            http_client,
        })
    }
}

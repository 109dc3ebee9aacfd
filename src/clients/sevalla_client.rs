//! The top-level Sevalla API client.

use std::time::Duration;

use crate::clients::HttpClient;
use crate::config::{ApiKey, ClientConfig, ClientConfigBuilder};
use crate::error::ConfigError;
use crate::rest::resources::{Applications, Databases, Deployments, Pipelines, StaticSites};

/// Client for the Sevalla platform API.
///
/// `SevallaClient` owns an [`HttpClient`] and hands out borrowed method sets
/// for each resource family. It is cheap to clone and safe to share between
/// tasks.
///
/// # Example
///
/// ```rust
/// use sevalla_api::{ApiKey, SevallaClient};
///
/// let client = SevallaClient::builder()
///     .api_key(ApiKey::new("my-api-key").unwrap())
///     .build()
///     .unwrap();
///
/// assert_eq!(client.http().base_url().as_ref(), "https://api.sevalla.com/v2/");
/// ```
#[derive(Clone, Debug)]
pub struct SevallaClient {
    config: ClientConfig,
    http: HttpClient,
}

// Verify SevallaClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<SevallaClient>();
};

impl SevallaClient {
    /// Creates a client from a built configuration.
    #[must_use]
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            http: HttpClient::new(config),
            config: config.clone(),
        }
    }

    /// Creates a builder that applies options in call order.
    #[must_use]
    pub fn builder() -> SevallaClientBuilder {
        SevallaClientBuilder::default()
    }

    /// Returns the configuration the client was built with.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Returns the underlying request builder and pipeline.
    ///
    /// Use it to reach endpoints that have no typed method.
    #[must_use]
    pub const fn http(&self) -> &HttpClient {
        &self.http
    }

    /// Application operations.
    #[must_use]
    pub const fn applications(&self) -> Applications<'_> {
        Applications::new(&self.http)
    }

    /// Database and backup operations.
    #[must_use]
    pub const fn databases(&self) -> Databases<'_> {
        Databases::new(&self.http)
    }

    /// Static site operations.
    #[must_use]
    pub const fn static_sites(&self) -> StaticSites<'_> {
        StaticSites::new(&self.http)
    }

    /// Deployment operations.
    #[must_use]
    pub const fn deployments(&self) -> Deployments<'_> {
        Deployments::new(&self.http)
    }

    /// Pipeline and pipeline run operations.
    #[must_use]
    pub const fn pipelines(&self) -> Pipelines<'_> {
        Pipelines::new(&self.http)
    }
}

/// Builder for [`SevallaClient`].
///
/// Accepts the same options as [`ClientConfigBuilder`].
#[derive(Debug, Default)]
pub struct SevallaClientBuilder {
    config: ClientConfigBuilder,
}

impl SevallaClientBuilder {
    /// Sets the API key sent as a bearer token.
    #[must_use]
    pub fn api_key(self, key: ApiKey) -> Self {
        Self {
            config: self.config.api_key(key),
        }
    }

    /// Overrides the base URL.
    #[must_use]
    pub fn base_url(self, url: impl Into<String>) -> Self {
        Self {
            config: self.config.base_url(url),
        }
    }

    /// Overrides the `User-Agent` header.
    #[must_use]
    pub fn user_agent(self, user_agent: impl Into<String>) -> Self {
        Self {
            config: self.config.user_agent(user_agent),
        }
    }

    /// Sets the timeout of the built-in transport.
    #[must_use]
    pub fn timeout(self, timeout: Duration) -> Self {
        Self {
            config: self.config.timeout(timeout),
        }
    }

    /// Replaces the built-in transport.
    #[must_use]
    pub fn http_client(self, client: reqwest::Client) -> Self {
        Self {
            config: self.config.http_client(client),
        }
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the final base URL or user agent is
    /// invalid, or if the built-in transport cannot be created.
    pub fn build(self) -> Result<SevallaClient, ConfigError> {
        let config = self.config.build()?;
        Ok(SevallaClient::new(&config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let client = SevallaClient::builder().build().unwrap();
        assert_eq!(
            client.http().base_url().as_ref(),
            "https://api.sevalla.com/v2/"
        );
        assert!(client.config().api_key().is_none());
        assert!(client.http().user_agent().starts_with("sevalla-rust/"));
    }

    #[test]
    fn test_builder_forwards_options() {
        let client = SevallaClient::builder()
            .base_url("http://localhost:8080/api/")
            .user_agent("my-tool/1.0")
            .timeout(Duration::from_secs(5))
            .api_key(ApiKey::new("k").unwrap())
            .build()
            .unwrap();

        assert_eq!(client.http().base_url().as_ref(), "http://localhost:8080/api/");
        assert_eq!(client.http().user_agent(), "my-tool/1.0");
        assert_eq!(client.config().timeout(), Duration::from_secs(5));
        assert!(client.config().api_key().is_some());
    }

    #[test]
    fn test_builder_rejects_invalid_base_url() {
        let result = SevallaClient::builder().base_url("not a url").build();
        assert!(matches!(result, Err(ConfigError::InvalidBaseUrl { .. })));
    }

    #[test]
    fn test_new_from_config() {
        let config = ClientConfig::builder()
            .base_url("https://example.test/v9/")
            .build()
            .unwrap();
        let client = SevallaClient::new(&config);
        assert_eq!(client.http().base_url().as_ref(), "https://example.test/v9/");
    }
}

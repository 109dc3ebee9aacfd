//! Validated newtype wrappers for configuration values.
//!
//! This module provides type-safe wrappers around string values that validate
//! their contents on construction. Invalid values are rejected with clear error messages.

use crate::error::ConfigError;
use std::fmt;
use url::Url;

/// A validated Sevalla API key.
///
/// This newtype ensures the key is non-empty and masks its value in debug
/// output so that it never ends up in logs.
///
/// # Example
///
/// ```rust
/// use sevalla_api::ApiKey;
///
/// let key = ApiKey::new("my-api-key").unwrap();
/// assert_eq!(key.as_ref(), "my-api-key");
/// assert_eq!(format!("{:?}", key), "ApiKey(*****)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Creates a new validated API key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyApiKey`] if the key is empty.
    pub fn new(key: impl Into<String>) -> Result<Self, ConfigError> {
        let key = key.into();
        if key.is_empty() {
            return Err(ConfigError::EmptyApiKey);
        }
        Ok(Self(key))
    }

    /// Returns the value of the `Authorization` header for this key.
    #[must_use]
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl AsRef<str> for ApiKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(*****)")
    }
}

/// A validated base URL that request paths are resolved against.
///
/// Only absolute `http` and `https` URLs are accepted. Relative request
/// paths are resolved with standard URL-reference semantics, so a base of
/// `https://api.sevalla.com/v2/` and a path of `applications` yield
/// `https://api.sevalla.com/v2/applications`. Without the trailing slash the
/// last path segment of the base would be replaced.
///
/// # Example
///
/// ```rust
/// use sevalla_api::BaseUrl;
///
/// let base = BaseUrl::new("https://api.example.com/v2/").unwrap();
/// assert_eq!(base.as_ref(), "https://api.example.com/v2/");
/// assert!(BaseUrl::new("ftp://files.example.com").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BaseUrl(Url);

impl BaseUrl {
    /// Creates a new validated base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] if the value does not parse
    /// or does not use the `http` or `https` scheme.
    pub fn new(url: impl AsRef<str>) -> Result<Self, ConfigError> {
        let raw = url.as_ref().trim();
        let invalid = || ConfigError::InvalidBaseUrl {
            url: raw.to_string(),
        };

        let parsed = Url::parse(raw).map_err(|_| invalid())?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.cannot_be_a_base() {
            return Err(invalid());
        }

        Ok(Self(parsed))
    }

    /// Returns the parsed URL.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.0
    }

    /// Resolves a relative reference against this base.
    ///
    /// # Errors
    ///
    /// Returns the parser error if `path` cannot be resolved.
    pub fn join(&self, path: &str) -> Result<Url, url::ParseError> {
        self.0.join(path)
    }
}

impl AsRef<str> for BaseUrl {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

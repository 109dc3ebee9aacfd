//! Configuration error types for the Sevalla API SDK.
//!
//! This module contains the error type returned while assembling a client
//! configuration. Errors produced by API calls live in
//! [`clients::Error`](crate::clients::Error).
//!
//! # Error Handling
//!
//! All configuration constructors return `Result<T, ConfigError>` so that a
//! misconfigured client fails at construction time instead of on the first
//! request.
//!
//! # Example
//!
//! ```rust
//! use sevalla_api::{ApiKey, ConfigError};
//!
//! let result = ApiKey::new("");
//! assert!(matches!(result, Err(ConfigError::EmptyApiKey)));
//! ```

use thiserror::Error;

/// Errors that can occur during SDK configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// API key cannot be empty.
    #[error("API key cannot be empty. Please provide a valid Sevalla API key.")]
    EmptyApiKey,

    /// Base URL is invalid.
    #[error("Invalid base URL '{url}'. Expected an absolute http or https URL (e.g., 'https://api.sevalla.com/v2/').")]
    InvalidBaseUrl {
        /// The invalid URL that was provided.
        url: String,
    },

    /// User agent cannot be used as a header value.
    #[error("Invalid user agent '{user_agent}'. The value must be non-empty visible ASCII.")]
    InvalidUserAgent {
        /// The rejected user agent.
        user_agent: String,
    },

    /// The default HTTP transport could not be created.
    #[error("Failed to create HTTP client: {reason}")]
    HttpClient {
        /// Description of the underlying failure.
        reason: String,
    },
}

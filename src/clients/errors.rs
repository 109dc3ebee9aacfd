//! Error types for Sevalla API calls.
//!
//! # Error Handling
//!
//! Every API call returns `Result<_, Error>`. The variants fall into three
//! groups:
//!
//! - **API errors** ([`Error::Api`], [`Error::RateLimited`]): the server
//!   answered with a non-2xx status. These carry an [`ApiError`] with the
//!   exact status code, and are the only errors the classification
//!   predicates such as [`Error::is_not_found`] answer `true` for.
//! - **Transport errors** ([`Error::Transport`], [`Error::Timeout`],
//!   [`Error::Cancelled`]): no response was obtained.
//! - **Local errors** ([`Error::InvalidUrl`], [`Error::Encode`],
//!   [`Error::Query`], [`Error::Decode`], [`Error::Io`],
//!   [`Error::Validation`], [`Error::Config`]): the request could not be
//!   built or a successful response could not be read.
//!
//! Nothing is retried internally. Callers decide whether to retry based on
//! the classification.
//!
//! # Example
//!
//! ```rust,ignore
//! use sevalla_api::{Error, RequestContext};
//!
//! match client.applications().get(&RequestContext::default(), "app-1").await {
//!     Ok(app) => println!("{} is {:?}", app.name, app.state),
//!     Err(e) if e.is_not_found() => println!("no such application"),
//!     Err(Error::RateLimited(e)) => println!("retry in {:?}", e.retry_after),
//!     Err(e) => return Err(e.into()),
//! }
//! ```

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::clients::http_response::HttpResponse;
use crate::error::ConfigError;
use crate::rest::resources::null_as_default;

/// A field-level error reported by the API.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ErrorDetail {
    /// The request field the error refers to.
    #[serde(deserialize_with = "null_as_default")]
    pub field: String,
    /// Machine-readable error code.
    #[serde(deserialize_with = "null_as_default")]
    pub code: String,
    /// Human-readable description.
    #[serde(deserialize_with = "null_as_default")]
    pub message: String,
}

/// Wire shape of an error body.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    request_id: Option<String>,
    #[serde(default)]
    errors: Option<Vec<ErrorDetail>>,
}

/// Error returned when the API responds with a non-2xx status.
///
/// The message, code, request id and field errors are read from the JSON
/// error body. When the body is not in that shape, the raw body text becomes
/// the message so that no error information is lost.
///
/// # Example
///
/// ```rust
/// use std::collections::HashMap;
/// use sevalla_api::clients::{ApiError, HttpResponse};
///
/// let response = HttpResponse::new(404, HashMap::new());
/// let error = ApiError::from_response(
///     response,
///     br#"{"message":"Application not found","code":"RESOURCE_NOT_FOUND"}"#,
/// );
///
/// assert_eq!(error.message, "Application not found");
/// assert_eq!(error.code.as_deref(), Some("RESOURCE_NOT_FOUND"));
/// assert!(error.is_not_found());
/// assert_eq!(
///     error.to_string(),
///     "sevalla: RESOURCE_NOT_FOUND (404) - Application not found"
/// );
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiError {
    /// The HTTP status code of the response.
    pub status: u16,
    /// Human-readable message.
    pub message: String,
    /// Machine-readable error code, if provided.
    pub code: Option<String>,
    /// Request identifier, from the body or the `X-Request-Id` header.
    pub request_id: Option<String>,
    /// Field-level errors, if provided.
    pub errors: Vec<ErrorDetail>,
    /// The response envelope, including pagination and rate limit state.
    pub response: Box<HttpResponse>,
}

impl ApiError {
    /// Builds an `ApiError` from a response envelope and its raw body.
    #[must_use]
    pub fn from_response(response: HttpResponse, body: &[u8]) -> Self {
        let header_request_id = response.request_id().map(String::from);

        let (message, code, request_id, errors) = match serde_json::from_slice::<ErrorBody>(body)
        {
            Ok(parsed) => (
                parsed.message,
                parsed.code.filter(|c| !c.is_empty()),
                parsed.request_id.filter(|id| !id.is_empty()),
                parsed.errors.unwrap_or_default(),
            ),
            Err(_) => (
                String::from_utf8_lossy(body).into_owned(),
                None,
                None,
                Vec::new(),
            ),
        };

        Self {
            status: response.code,
            message,
            code,
            request_id: request_id.or(header_request_id),
            errors,
            response: Box::new(response),
        }
    }

    /// Returns `true` for 404 Not Found.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        self.status == 404
    }

    /// Returns `true` for 400 Bad Request.
    #[must_use]
    pub const fn is_bad_request(&self) -> bool {
        self.status == 400
    }

    /// Returns `true` for 401 Unauthorized.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        self.status == 401
    }

    /// Returns `true` for 403 Forbidden.
    #[must_use]
    pub const fn is_forbidden(&self) -> bool {
        self.status == 403
    }

    /// Returns `true` for 409 Conflict.
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        self.status == 409
    }

    /// Returns `true` for 422 Unprocessable Entity.
    #[must_use]
    pub const fn is_unprocessable_entity(&self) -> bool {
        self.status == 422
    }

    /// Returns `true` for 429 Too Many Requests.
    #[must_use]
    pub const fn is_rate_limited(&self) -> bool {
        self.status == 429
    }

    /// Returns `true` for any status in 400..=499.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        self.status >= 400 && self.status <= 499
    }

    /// Returns `true` for any status in 500..=599.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        self.status >= 500 && self.status <= 599
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.code, &self.request_id) {
            (Some(code), _) => write!(f, "sevalla: {code} ({}) - {}", self.status, self.message),
            (None, Some(request_id)) => write!(
                f,
                "sevalla: {} - {} (request_id: {request_id})",
                self.status, self.message
            ),
            (None, None) => write!(f, "sevalla: {} - {}", self.status, self.message),
        }
    }
}

impl std::error::Error for ApiError {}

/// Error returned for 429 Too Many Requests.
///
/// Carries the delay from the `Retry-After` header, when the server sent one,
/// for callers that implement their own backoff.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RateLimitError {
    /// The underlying API error.
    pub error: ApiError,
    /// How long the server asked the caller to wait.
    pub retry_after: Option<Duration>,
}

impl RateLimitError {
    /// Wraps an API error, reading `Retry-After` from its response.
    #[must_use]
    pub fn from_api_error(error: ApiError) -> Self {
        let retry_after = error.response.retry_after();
        Self { error, retry_after }
    }
}

impl fmt::Display for RateLimitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = self.retry_after.map_or(0, |d| d.as_secs());
        write!(
            f,
            "rate limited: retry after {secs} seconds - {}",
            self.error.message
        )
    }
}

impl std::error::Error for RateLimitError {}

/// Error returned when a call is rejected before any request is sent.
///
/// # Example
///
/// ```rust
/// use sevalla_api::clients::ValidationError;
///
/// let error = ValidationError::new("id", "must not be empty");
/// assert_eq!(error.to_string(), "validation error: id - must not be empty");
/// ```
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("validation error: {field} - {message}")]
pub struct ValidationError {
    /// The offending field.
    pub field: String,
    /// What is wrong with it.
    pub message: String,
}

impl ValidationError {
    /// Creates a new validation error.
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Unified error type for all Sevalla API calls.
#[derive(Debug, Error)]
pub enum Error {
    /// A non-2xx response other than 429.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A 429 response.
    #[error(transparent)]
    RateLimited(#[from] RateLimitError),

    /// Network, DNS, TLS or transport-level timeout failure.
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The request context deadline elapsed before the exchange finished.
    #[error("Request timed out after {timeout:?}")]
    Timeout {
        /// The deadline that elapsed.
        timeout: Duration,
    },

    /// The request context was cancelled.
    #[error("Request was cancelled")]
    Cancelled,

    /// The request path could not be resolved against the base URL.
    #[error("Invalid URL path '{path}': {source}")]
    InvalidUrl {
        /// The path that failed to resolve.
        path: String,
        /// The parser error.
        #[source]
        source: url::ParseError,
    },

    /// The request body could not be encoded as JSON.
    #[error("Failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// The query options could not be encoded.
    #[error("Failed to encode query string: {0}")]
    Query(#[from] serde_urlencoded::ser::Error),

    /// A successful response body could not be decoded.
    #[error("Failed to decode response body (status {}): {source}", .response.code)]
    Decode {
        /// The JSON error.
        #[source]
        source: serde_json::Error,
        /// The response envelope, kept so status and pagination stay available.
        response: Box<HttpResponse>,
    },

    /// Writing a raw response body to the caller's sink failed.
    #[error("Failed to write response body: {0}")]
    Io(#[from] std::io::Error),

    /// Local validation failed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Client configuration failed.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl Error {
    /// Returns the API error for [`Error::Api`] and [`Error::RateLimited`].
    #[must_use]
    pub const fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api(error) | Self::RateLimited(RateLimitError { error, .. }) => Some(error),
            _ => None,
        }
    }

    /// Returns the response envelope, if a response was received.
    #[must_use]
    pub fn response(&self) -> Option<&HttpResponse> {
        match self {
            Self::Decode { response, .. } => Some(response.as_ref()),
            _ => self.api_error().map(|e| e.response.as_ref()),
        }
    }

    /// Returns the HTTP status of an API error.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        self.api_error().map(|e| e.status)
    }

    fn status_matches(&self, predicate: fn(&ApiError) -> bool) -> bool {
        self.api_error().is_some_and(predicate)
    }

    /// Returns `true` if this is an API error with status 404.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status_matches(ApiError::is_not_found)
    }

    /// Returns `true` if this is an API error with status 400.
    #[must_use]
    pub fn is_bad_request(&self) -> bool {
        self.status_matches(ApiError::is_bad_request)
    }

    /// Returns `true` if this is an API error with status 401.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status_matches(ApiError::is_unauthorized)
    }

    /// Returns `true` if this is an API error with status 403.
    #[must_use]
    pub fn is_forbidden(&self) -> bool {
        self.status_matches(ApiError::is_forbidden)
    }

    /// Returns `true` if this is an API error with status 409.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        self.status_matches(ApiError::is_conflict)
    }

    /// Returns `true` if this is an API error with status 422.
    #[must_use]
    pub fn is_unprocessable_entity(&self) -> bool {
        self.status_matches(ApiError::is_unprocessable_entity)
    }

    /// Returns `true` if this is an API error with status 429.
    #[must_use]
    pub fn is_rate_limited(&self) -> bool {
        self.status_matches(ApiError::is_rate_limited)
    }

    /// Returns `true` if this is an API error with a status in 400..=499.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        self.status_matches(ApiError::is_client_error)
    }

    /// Returns `true` if this is an API error with a status in 500..=599.
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status_matches(ApiError::is_server_error)
    }

    /// Returns `true` if the context deadline or the transport timed out.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Timeout { .. } => true,
            Self::Transport(e) => e.is_timeout(),
            _ => false,
        }
    }

    /// Returns `true` if the request context was cancelled.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

// Verify Error is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Error>();
};

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn api_error(status: u16, body: &[u8]) -> ApiError {
        ApiError::from_response(HttpResponse::new(status, HashMap::new()), body)
    }

    #[test]
    fn test_api_error_parses_documented_shape() {
        let error = api_error(
            422,
            br#"{"message":"Validation failed","code":"VALIDATION","request_id":"req-9","errors":[{"field":"name","code":"required","message":"is required"}]}"#,
        );

        assert_eq!(error.status, 422);
        assert_eq!(error.message, "Validation failed");
        assert_eq!(error.code.as_deref(), Some("VALIDATION"));
        assert_eq!(error.request_id.as_deref(), Some("req-9"));
        assert_eq!(
            error.errors,
            vec![ErrorDetail {
                field: "name".to_string(),
                code: "required".to_string(),
                message: "is required".to_string(),
            }]
        );
    }

    #[test]
    fn test_api_error_falls_back_to_raw_body() {
        let error = api_error(502, b"<html>Bad Gateway</html>");
        assert_eq!(error.message, "<html>Bad Gateway</html>");
        assert!(error.code.is_none());
        assert!(error.errors.is_empty());

        // JSON without the required message field is not the documented shape
        let error = api_error(500, br#"{"error":"boom"}"#);
        assert_eq!(error.message, r#"{"error":"boom"}"#);
    }

    #[test]
    fn test_api_error_tolerates_null_detail_fields() {
        let error = api_error(
            422,
            br#"{"message":"Validation failed","code":"invalid","request_id":"req-7","errors":[{"field":null,"code":"blank","message":null}]}"#,
        );
        assert_eq!(error.message, "Validation failed");
        assert_eq!(error.code.as_deref(), Some("invalid"));
        assert_eq!(error.request_id.as_deref(), Some("req-7"));
        assert_eq!(
            error.errors,
            vec![ErrorDetail {
                field: String::new(),
                code: "blank".to_string(),
                message: String::new(),
            }]
        );
    }

    #[test]
    fn test_api_error_empty_body() {
        let error = api_error(503, b"");
        assert_eq!(error.message, "");
        assert_eq!(error.to_string(), "sevalla: 503 - ");
    }

    #[test]
    fn test_api_error_request_id_from_header() {
        let mut headers = HashMap::new();
        headers.insert("x-request-id".to_string(), vec!["hdr-1".to_string()]);
        let error = ApiError::from_response(
            HttpResponse::new(500, headers),
            br#"{"message":"oops"}"#,
        );
        assert_eq!(error.request_id.as_deref(), Some("hdr-1"));
    }

    #[test]
    fn test_api_error_display_formats() {
        let with_code = api_error(404, br#"{"message":"gone","code":"NOT_FOUND"}"#);
        assert_eq!(with_code.to_string(), "sevalla: NOT_FOUND (404) - gone");

        let with_request_id = api_error(500, br#"{"message":"oops","request_id":"r-1"}"#);
        assert_eq!(
            with_request_id.to_string(),
            "sevalla: 500 - oops (request_id: r-1)"
        );

        let plain = api_error(400, br#"{"message":"bad"}"#);
        assert_eq!(plain.to_string(), "sevalla: 400 - bad");
    }

    #[test]
    fn test_status_predicates() {
        assert!(api_error(404, b"").is_not_found());
        assert!(api_error(400, b"").is_bad_request());
        assert!(api_error(401, b"").is_unauthorized());
        assert!(api_error(403, b"").is_forbidden());
        assert!(api_error(409, b"").is_conflict());
        assert!(api_error(422, b"").is_unprocessable_entity());
        assert!(api_error(429, b"").is_rate_limited());
        assert!(!api_error(500, b"").is_not_found());
    }

    #[test]
    fn test_client_and_server_error_ranges() {
        assert!(!api_error(399, b"").is_client_error());
        assert!(api_error(400, b"").is_client_error());
        assert!(api_error(499, b"").is_client_error());
        assert!(!api_error(500, b"").is_client_error());

        assert!(!api_error(499, b"").is_server_error());
        assert!(api_error(500, b"").is_server_error());
        assert!(api_error(599, b"").is_server_error());
        assert!(!api_error(600, b"").is_server_error());
    }

    #[test]
    fn test_predicates_are_idempotent() {
        let error = Error::Api(api_error(404, b""));
        assert_eq!(error.is_not_found(), error.is_not_found());
        assert!(error.is_not_found());
        assert!(error.is_not_found());
        assert_eq!(error.status(), Some(404));
    }

    #[test]
    fn test_predicates_false_for_non_api_errors() {
        let errors = [
            Error::Cancelled,
            Error::Timeout {
                timeout: Duration::from_secs(1),
            },
            Error::Validation(ValidationError::new("id", "must not be empty")),
            Error::Io(std::io::Error::new(std::io::ErrorKind::Other, "disk full")),
        ];

        for error in &errors {
            assert!(!error.is_not_found());
            assert!(!error.is_client_error());
            assert!(!error.is_server_error());
            assert!(!error.is_rate_limited());
            assert!(error.api_error().is_none());
            assert!(error.status().is_none());
        }
    }

    #[test]
    fn test_rate_limit_error_reads_retry_after() {
        let mut headers = HashMap::new();
        headers.insert("retry-after".to_string(), vec!["12".to_string()]);
        let error = ApiError::from_response(
            HttpResponse::new(429, headers),
            br#"{"message":"slow down"}"#,
        );

        let rate_limited = RateLimitError::from_api_error(error);
        assert_eq!(rate_limited.retry_after, Some(Duration::from_secs(12)));
        assert_eq!(
            rate_limited.to_string(),
            "rate limited: retry after 12 seconds - slow down"
        );

        let error = Error::RateLimited(rate_limited);
        assert!(error.is_rate_limited());
        assert!(error.is_client_error());
        assert_eq!(error.response().map(|r| r.code), Some(429));
    }

    #[test]
    fn test_validation_error_display() {
        let error = Error::from(ValidationError::new("id", "must not be empty"));
        assert_eq!(error.to_string(), "validation error: id - must not be empty");
    }

    #[test]
    fn test_cancelled_and_timeout_are_distinguishable() {
        let cancelled = Error::Cancelled;
        let timed_out = Error::Timeout {
            timeout: Duration::from_millis(50),
        };

        assert!(cancelled.is_cancelled());
        assert!(!cancelled.is_timeout());
        assert!(timed_out.is_timeout());
        assert!(!timed_out.is_cancelled());
    }
}

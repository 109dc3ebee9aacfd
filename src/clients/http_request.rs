//! HTTP request types for the Sevalla API SDK.
//!
//! Requests are produced by the builder methods on
//! [`HttpClient`](crate::clients::HttpClient) and arrive fully resolved and
//! authenticated.

use std::collections::HashMap;
use std::fmt;

use url::Url;

/// HTTP methods used by the Sevalla API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// HTTP GET method for retrieving resources.
    Get,
    /// HTTP POST method for creating resources and triggering actions.
    Post,
    /// HTTP PUT method for replacing settings.
    Put,
    /// HTTP PATCH method for partial updates.
    Patch,
    /// HTTP DELETE method for removing resources.
    Delete,
}

impl HttpMethod {
    /// Returns the uppercase method name as sent on the wire.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Self::GET,
            HttpMethod::Post => Self::POST,
            HttpMethod::Put => Self::PUT,
            HttpMethod::Patch => Self::PATCH,
            HttpMethod::Delete => Self::DELETE,
        }
    }
}

/// An outgoing request to the Sevalla API.
///
/// Built fresh for each call. The URL is absolute and the headers already
/// include authentication, so the request can be sent as-is.
///
/// # Example
///
/// ```rust
/// use sevalla_api::{ApiKey, HttpMethod, SevallaClient};
///
/// let client = SevallaClient::builder()
///     .base_url("https://api.example.com/v2/")
///     .api_key(ApiKey::new("tok").unwrap())
///     .build()
///     .unwrap();
///
/// let request = client.http().new_request(HttpMethod::Get, "applications/42").unwrap();
/// assert_eq!(request.url.as_str(), "https://api.example.com/v2/applications/42");
/// assert_eq!(request.header("authorization"), Some("Bearer tok"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpRequest {
    /// The HTTP method.
    pub method: HttpMethod,
    /// The resolved absolute URL, including any query string.
    pub url: Url,
    /// Request headers.
    pub headers: HashMap<String, String>,
    /// The encoded request body, if any.
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    /// Creates a request with no headers and no body.
    #[must_use]
    pub fn new(method: HttpMethod, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HashMap::new(),
            body: None,
        }
    }

    /// Returns a header value, matching the name case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Returns the body as UTF-8 text, if present and valid.
    #[must_use]
    pub fn body_str(&self) -> Option<&str> {
        self.body
            .as_deref()
            .and_then(|body| std::str::from_utf8(body).ok())
    }
}

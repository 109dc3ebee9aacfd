//! HTTP response types for the Sevalla API SDK.
//!
//! This module provides the [`HttpResponse`] envelope and the metadata types
//! parsed from response headers.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use url::Url;

/// Page numbers parsed from the `Link` header.
///
/// A value of `0` means the server did not advertise that page.
///
/// # Example
///
/// ```rust
/// use sevalla_api::clients::Pagination;
///
/// let pages = Pagination::parse_link_header(
///     r#"<https://api.sevalla.com/v2/applications?page=3>; rel="next", <https://api.sevalla.com/v2/applications?page=9>; rel="last""#,
/// );
/// assert_eq!(pages.next_page, 3);
/// assert_eq!(pages.last_page, 9);
/// assert_eq!(pages.prev_page, 0);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pagination {
    /// The next page number.
    pub next_page: u32,
    /// The previous page number.
    pub prev_page: u32,
    /// The first page number.
    pub first_page: u32,
    /// The last page number.
    pub last_page: u32,
}

impl Pagination {
    /// Parses page numbers from a `Link` header value.
    ///
    /// The header format is `<url>; rel="next", <url>; rel="prev"`. Each
    /// entry contributes the `page` query parameter of its URL. Entries that
    /// do not have exactly two segments, whose URL cannot be parsed, whose
    /// `page` is missing or not numeric, or that lack a `rel` are skipped
    /// without affecting the other entries.
    #[must_use]
    pub fn parse_link_header(header_value: &str) -> Self {
        let mut result = Self::default();

        for link in header_value.split(',') {
            let segments: Vec<&str> = link.split(';').collect();
            if segments.len() != 2 {
                continue;
            }

            let url = segments[0].trim().trim_start_matches('<').trim_end_matches('>');
            let Some(page) = Self::page_from_url(url) else {
                continue;
            };

            let Some((key, rel)) = segments[1].trim().split_once('=') else {
                continue;
            };
            if key.trim() != "rel" {
                continue;
            }

            match rel.trim().trim_matches('"') {
                "next" => result.next_page = page,
                "prev" => result.prev_page = page,
                "first" => result.first_page = page,
                "last" => result.last_page = page,
                _ => {}
            }
        }

        result
    }

    /// Returns `true` if a next page was advertised.
    #[must_use]
    pub const fn has_next_page(&self) -> bool {
        self.next_page != 0
    }

    /// Returns `true` if a previous page was advertised.
    #[must_use]
    pub const fn has_prev_page(&self) -> bool {
        self.prev_page != 0
    }

    /// Extracts the `page` query parameter from an absolute or relative URL.
    fn page_from_url(raw: &str) -> Option<u32> {
        let url = match Url::parse(raw) {
            Ok(url) => url,
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                Url::parse("http://link.invalid/").ok()?.join(raw).ok()?
            }
            Err(_) => return None,
        };

        url.query_pairs()
            .find(|(key, _)| key == "page")
            .and_then(|(_, value)| value.parse().ok())
    }
}

/// Rate limit information parsed from the `X-RateLimit-*` headers.
///
/// Fields stay at their defaults when the server does not send the
/// corresponding header or sends a value that cannot be parsed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rate {
    /// Requests allowed per window (`X-RateLimit-Limit`).
    pub limit: u32,
    /// Requests left in the current window (`X-RateLimit-Remaining`).
    pub remaining: u32,
    /// When the window resets (`X-RateLimit-Reset`, Unix seconds).
    pub reset: Option<DateTime<Utc>>,
}

impl Rate {
    /// Parses rate limit headers from a lowercase-keyed header map.
    #[must_use]
    pub fn from_headers(headers: &HashMap<String, Vec<String>>) -> Self {
        let first = |name: &str| {
            headers
                .get(name)
                .and_then(|values| values.first())
                .map(|value| value.trim())
        };

        Self {
            limit: first("x-ratelimit-limit")
                .and_then(|v| v.parse().ok())
                .unwrap_or_default(),
            remaining: first("x-ratelimit-remaining")
                .and_then(|v| v.parse().ok())
                .unwrap_or_default(),
            reset: first("x-ratelimit-reset")
                .and_then(|v| v.parse::<i64>().ok())
                .and_then(|secs| Utc.timestamp_opt(secs, 0).single()),
        }
    }
}

/// A response envelope from the Sevalla API.
///
/// Built for every response that arrives, error responses included, so the
/// status code, pagination and rate limit state remain available to callers
/// after a failure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub code: u16,
    /// Response headers with lowercase names (headers may have multiple values).
    pub headers: HashMap<String, Vec<String>>,
    /// Page numbers from the `Link` header.
    pub pagination: Pagination,
    /// Rate limit state from the `X-RateLimit-*` headers.
    pub rate: Rate,
}

impl HttpResponse {
    /// Creates a new `HttpResponse` with automatic header parsing.
    ///
    /// - `Link` -> `pagination`
    /// - `X-RateLimit-Limit`, `X-RateLimit-Remaining`, `X-RateLimit-Reset` -> `rate`
    #[must_use]
    pub fn new(code: u16, headers: HashMap<String, Vec<String>>) -> Self {
        let pagination = headers
            .get("link")
            .map(|values| Pagination::parse_link_header(&values.join(",")))
            .unwrap_or_default();

        let rate = Rate::from_headers(&headers);

        Self {
            code,
            headers,
            pagination,
            rate,
        }
    }

    /// Returns `true` if the response status code is in the 2xx range.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.code >= 200 && self.code <= 299
    }

    /// Returns the first value of a header, matching the name case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns the `X-Request-Id` header value, if present.
    ///
    /// Include this ID when reporting problems to Sevalla support.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.header("x-request-id")
    }

    /// Returns the delay requested by the `Retry-After` header.
    ///
    /// Both the delta-seconds and the HTTP-date forms are understood. A date
    /// in the past yields a zero duration.
    #[must_use]
    pub fn retry_after(&self) -> Option<Duration> {
        let value = self.header("retry-after")?.trim();

        if let Ok(secs) = value.parse::<u64>() {
            return Some(Duration::from_secs(secs));
        }

        let at = DateTime::parse_from_rfc2822(value).ok()?;
        let delta = at.with_timezone(&Utc) - Utc::now();
        Some(delta.to_std().unwrap_or(Duration::ZERO))
    }
}

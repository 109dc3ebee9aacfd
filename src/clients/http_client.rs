//! HTTP client for Sevalla API communication.
//!
//! This module provides the [`HttpClient`] type, which builds authenticated
//! requests and runs them through the response pipeline.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::clients::context::RequestContext;
use crate::clients::errors::{ApiError, Error, RateLimitError};
use crate::clients::http_request::{HttpMethod, HttpRequest};
use crate::clients::http_response::HttpResponse;
use crate::config::{ApiKey, BaseUrl, ClientConfig};
use crate::rest::ResourceResponse;

const APPLICATION_JSON: &str = "application/json";

/// HTTP client for making requests to the Sevalla API.
///
/// The client handles:
/// - Resolving relative paths against the configured base URL
/// - Default headers including `User-Agent` and bearer authentication
/// - JSON body and query string encoding
/// - Status classification and error body decoding
/// - Pagination and rate limit header parsing
///
/// There is no retry logic. Every failure is returned to the caller.
///
/// # Thread Safety
///
/// `HttpClient` is `Send + Sync` and holds no mutable state, so a single
/// instance can serve any number of concurrent calls.
///
/// # Example
///
/// ```rust,ignore
/// use sevalla_api::{HttpMethod, RequestContext, SevallaClient};
///
/// let client = SevallaClient::builder().build()?;
/// let request = client.http().new_request(HttpMethod::Get, "applications/app-1")?;
/// let response = client.http().execute(&RequestContext::default(), request).await?;
/// println!("status {}", response.code);
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    /// The transport.
    client: reqwest::Client,
    /// Root that request paths resolve against.
    base_url: BaseUrl,
    /// Credential for the `Authorization` header.
    api_key: Option<ApiKey>,
    /// Value of the `User-Agent` header.
    user_agent: String,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a new HTTP client from a configuration.
    #[must_use]
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            client: config.http_client().clone(),
            base_url: config.base_url().clone(),
            api_key: config.api_key().cloned(),
            user_agent: config.user_agent().to_string(),
        }
    }

    /// Returns the base URL for this client.
    #[must_use]
    pub const fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    /// Returns the user agent sent with every request.
    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Builds a request with no body.
    ///
    /// `path` is resolved against the base URL as a relative reference. A
    /// path starting with `/` replaces the base path; any other path is
    /// appended to the base's last directory.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] if the path cannot be resolved.
    pub fn new_request(&self, method: HttpMethod, path: &str) -> Result<HttpRequest, Error> {
        let url = self.base_url.join(path).map_err(|source| Error::InvalidUrl {
            path: path.to_string(),
            source,
        })?;

        let mut request = HttpRequest::new(method, url);
        request
            .headers
            .insert("User-Agent".to_string(), self.user_agent.clone());
        request
            .headers
            .insert("Accept".to_string(), APPLICATION_JSON.to_string());
        if let Some(key) = &self.api_key {
            request
                .headers
                .insert("Authorization".to_string(), key.bearer());
        }

        Ok(request)
    }

    /// Builds a request with a JSON body.
    ///
    /// The body is encoded with `serde_json`, which leaves `<`, `>` and `&`
    /// unescaped, and `Content-Type: application/json` is set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] if the path cannot be resolved, or
    /// [`Error::Encode`] if the body cannot be serialized.
    pub fn new_request_with_body<B>(
        &self,
        method: HttpMethod,
        path: &str,
        body: &B,
    ) -> Result<HttpRequest, Error>
    where
        B: Serialize + ?Sized,
    {
        let mut request = self.new_request(method, path)?;
        let encoded = serde_json::to_vec(body).map_err(Error::Encode)?;
        request
            .headers
            .insert("Content-Type".to_string(), APPLICATION_JSON.to_string());
        request.body = Some(encoded);
        Ok(request)
    }

    /// Builds a request whose query string is encoded from `options`.
    ///
    /// Options are serialized with `serde_urlencoded`. Fields skipped by
    /// their serde attributes (the `Option::is_none` fields of the option
    /// types in this crate) are left out. The encoded string replaces any
    /// query present in `path`. With `None`, the request is identical to
    /// [`new_request`](Self::new_request). No body is attached.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] if the path cannot be resolved, or
    /// [`Error::Query`] if the options cannot be encoded.
    pub fn new_request_with_query<Q>(
        &self,
        method: HttpMethod,
        path: &str,
        options: Option<&Q>,
    ) -> Result<HttpRequest, Error>
    where
        Q: Serialize + ?Sized,
    {
        let mut request = self.new_request(method, path)?;
        if let Some(options) = options {
            let encoded = serde_urlencoded::to_string(options)?;
            request
                .url
                .set_query(if encoded.is_empty() { None } else { Some(&encoded) });
        }
        Ok(request)
    }

    /// Sends a request and classifies the response, discarding the body.
    ///
    /// # Errors
    ///
    /// - [`Error::Transport`], [`Error::Timeout`] or [`Error::Cancelled`] if
    ///   no response was obtained
    /// - [`Error::Api`] or [`Error::RateLimited`] for non-2xx responses
    pub async fn execute(
        &self,
        ctx: &RequestContext,
        request: HttpRequest,
    ) -> Result<HttpResponse, Error> {
        let (response, body) = self.send(ctx, request).await?;
        Self::check_response(response, &body)
    }

    /// Sends a request and decodes a successful JSON body.
    ///
    /// The payload is `None` for `204 No Content` and for a success status
    /// with an empty body.
    ///
    /// # Errors
    ///
    /// Everything [`execute`](Self::execute) returns, plus [`Error::Decode`]
    /// when a non-empty success body is not valid JSON for `T`. The decode
    /// error carries the response envelope.
    pub async fn execute_json<T>(
        &self,
        ctx: &RequestContext,
        request: HttpRequest,
    ) -> Result<ResourceResponse<Option<T>>, Error>
    where
        T: DeserializeOwned,
    {
        let (response, body) = self.send(ctx, request).await?;
        let response = Self::check_response(response, &body)?;

        if response.code == 204 || body.iter().all(u8::is_ascii_whitespace) {
            return Ok(ResourceResponse::new(None, response));
        }

        match serde_json::from_slice(&body) {
            Ok(data) => Ok(ResourceResponse::new(Some(data), response)),
            Err(source) => Err(Error::Decode {
                source,
                response: Box::new(response),
            }),
        }
    }

    /// Sends a request and decodes a successful JSON body into `destination`.
    ///
    /// `destination` is left untouched for `204 No Content` and for an empty
    /// success body.
    ///
    /// # Errors
    ///
    /// Same as [`execute_json`](Self::execute_json).
    pub async fn execute_into<T>(
        &self,
        ctx: &RequestContext,
        request: HttpRequest,
        destination: &mut T,
    ) -> Result<HttpResponse, Error>
    where
        T: DeserializeOwned,
    {
        let (data, response) = self.execute_json::<T>(ctx, request).await?.into_parts();
        if let Some(data) = data {
            *destination = data;
        }
        Ok(response)
    }

    /// Sends a request and copies a successful body verbatim into `writer`.
    ///
    /// Nothing is written for `204 No Content`.
    ///
    /// # Errors
    ///
    /// Everything [`execute`](Self::execute) returns, plus [`Error::Io`] if
    /// writing fails.
    pub async fn execute_to_writer<W>(
        &self,
        ctx: &RequestContext,
        request: HttpRequest,
        writer: &mut W,
    ) -> Result<HttpResponse, Error>
    where
        W: std::io::Write + ?Sized,
    {
        let (response, body) = self.send(ctx, request).await?;
        let response = Self::check_response(response, &body)?;

        if response.code != 204 {
            writer.write_all(&body)?;
            writer.flush()?;
        }

        Ok(response)
    }

    /// Runs the exchange under the context and reads the whole body.
    async fn send(
        &self,
        ctx: &RequestContext,
        request: HttpRequest,
    ) -> Result<(HttpResponse, Vec<u8>), Error> {
        tracing::debug!(method = %request.method, url = %request.url, "Sending Sevalla API request");

        let (response, body) = ctx.run(self.exchange(request)).await?;

        tracing::debug!(
            status = response.code,
            request_id = response.request_id().unwrap_or_default(),
            "Received Sevalla API response"
        );

        Ok((response, body))
    }

    async fn exchange(&self, request: HttpRequest) -> Result<(HttpResponse, Vec<u8>), Error> {
        let mut req_builder = self.client.request(request.method.into(), request.url);
        for (key, value) in &request.headers {
            req_builder = req_builder.header(key, value);
        }
        if let Some(body) = request.body {
            req_builder = req_builder.body(body);
        }

        let res = req_builder.send().await?;
        let code = res.status().as_u16();
        let headers = Self::parse_response_headers(res.headers());
        let body = res.bytes().await?.to_vec();

        Ok((HttpResponse::new(code, headers), body))
    }

    /// Classifies a response by status code.
    fn check_response(response: HttpResponse, body: &[u8]) -> Result<HttpResponse, Error> {
        if response.is_ok() {
            return Ok(response);
        }

        let error = ApiError::from_response(response, body);
        if error.is_rate_limited() {
            let error = RateLimitError::from_api_error(error);
            tracing::warn!(
                retry_after = ?error.retry_after,
                remaining = error.error.response.rate.remaining,
                "Sevalla API rate limit reached"
            );
            return Err(Error::RateLimited(error));
        }

        tracing::debug!(status = error.status, code = ?error.code, "Sevalla API returned an error");
        Err(Error::Api(error))
    }

    /// Parses response headers into a `HashMap` with lowercase names.
    fn parse_response_headers(
        headers: &reqwest::header::HeaderMap,
    ) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }
}

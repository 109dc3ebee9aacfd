//! HTTP client types for Sevalla API communication.
//!
//! This module provides the transport layer every resource operation goes
//! through: building authenticated requests, running them under a
//! [`RequestContext`], classifying responses, and decoding bodies.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`SevallaClient`]: The top-level client handing out resource method sets
//! - [`HttpClient`]: Request builder and response pipeline
//! - [`HttpRequest`]: A request ready to be sent
//! - [`HttpResponse`]: The envelope of a received response, with parsed
//!   [`Pagination`] and [`Rate`]
//! - [`HttpMethod`]: Supported HTTP methods
//! - [`RequestContext`]: Per-call deadline and cancellation
//! - [`Error`]: Every failure a call can produce, with classification
//!   predicates such as [`Error::is_not_found`]
//!
//! # Example
//!
//! ```rust,ignore
//! use sevalla_api::{HttpMethod, RequestContext, SevallaClient};
//!
//! let client = SevallaClient::builder().api_key(key).build()?;
//! let ctx = RequestContext::default();
//!
//! // Reach an endpoint without a typed method
//! let request = client.http().new_request(HttpMethod::Get, "companies")?;
//! let companies = client.http().execute_json::<serde_json::Value>(&ctx, request).await?;
//! ```
//!
//! # Error Classification
//!
//! Non-2xx responses never surface as success:
//!
//! - **429**: [`Error::RateLimited`], with the `Retry-After` delay when present
//! - **Other non-2xx**: [`Error::Api`], with message, code, request ID and
//!   field errors decoded from the body when it is JSON
//!
//! No request is retried automatically.

mod context;
mod errors;
mod http_client;
mod http_request;
mod http_response;
mod sevalla_client;

pub use context::{CancellationReceiver, CancellationToken, RequestContext};
pub use errors::{ApiError, Error, ErrorDetail, RateLimitError, ValidationError};
pub use http_client::HttpClient;
pub use http_request::{HttpMethod, HttpRequest};
pub use http_response::{HttpResponse, Pagination, Rate};
pub use sevalla_client::{SevallaClient, SevallaClientBuilder};

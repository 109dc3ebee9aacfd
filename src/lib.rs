//! # Sevalla API Rust SDK
//!
//! A Rust SDK for the Sevalla platform API, providing type-safe
//! configuration, a request builder and response pipeline, and typed method
//! sets for every Sevalla resource family.
//!
//! ## Overview
//!
//! This SDK provides:
//! - Type-safe configuration via [`ClientConfig`] and [`ClientConfigBuilder`]
//! - Validated newtypes for the API key and base URL
//! - Bearer authentication and JSON encoding for every request
//! - `Link` header pagination and `X-RateLimit-*` header parsing
//! - Structured API errors with classification predicates
//! - Per-call deadlines and cancellation via [`RequestContext`]
//! - Applications, databases, static sites, deployments and pipelines
//!
//! ## Quick Start
//!
//! ```rust
//! use sevalla_api::{ApiKey, SevallaClient};
//!
//! let client = SevallaClient::builder()
//!     .api_key(ApiKey::new("your-api-key").unwrap())
//!     .build()
//!     .unwrap();
//! ```
//!
//! ## Making Calls
//!
//! ```rust,ignore
//! use sevalla_api::rest::resources::{ListOptions, ScaleApplicationRequest};
//! use sevalla_api::RequestContext;
//!
//! let ctx = RequestContext::default();
//!
//! let apps = client
//!     .applications()
//!     .list(&ctx, Some(&ListOptions::new().per_page(20)))
//!     .await?;
//!
//! for app in apps.iter() {
//!     println!("{} is {:?}", app.name, app.state);
//! }
//!
//! println!("{} requests left", apps.rate().remaining);
//!
//! client
//!     .applications()
//!     .scale(&ctx, "app-123", &ScaleApplicationRequest { replicas: 3, plan: None })
//!     .await?;
//! ```
//!
//! ## Error Handling
//!
//! ```rust,ignore
//! match client.databases().get(&ctx, "db-123").await {
//!     Ok(db) => println!("{}", db.name),
//!     Err(err) if err.is_not_found() => println!("no such database"),
//!     Err(sevalla_api::Error::RateLimited(limit)) => {
//!         tokio::time::sleep(limit.retry_after.unwrap_or_default()).await;
//!     }
//!     Err(err) => return Err(err.into()),
//! }
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: configuration is passed explicitly
//! - **Fail-fast validation**: newtypes and the builder validate on construction
//! - **Thread-safe**: all public types are `Send + Sync`
//! - **Async-first**: designed for use with the Tokio runtime
//! - **No hidden retries**: every failure is returned to the caller

pub mod clients;
pub mod config;
pub mod error;
pub mod rest;

// Re-export public types at crate root for convenience
pub use config::{ApiKey, BaseUrl, ClientConfig, ClientConfigBuilder};
pub use error::ConfigError;

// Re-export HTTP client types
pub use clients::{
    ApiError, CancellationReceiver, CancellationToken, Error, ErrorDetail, HttpClient, HttpMethod,
    HttpRequest, HttpResponse, Pagination, Rate, RateLimitError, RequestContext, SevallaClient,
    SevallaClientBuilder, ValidationError,
};

// Re-export REST types
pub use rest::ResourceResponse;

//! Typed access to Sevalla resources.
//!
//! This module provides:
//!
//! - **[`ResourceResponse<T>`]**: A Deref-based wrapper pairing decoded data
//!   with its response envelope
//! - **[`resources`]**: The resource families and their method sets
//!
//! # Example
//!
//! ```rust,ignore
//! use sevalla_api::rest::ResourceResponse;
//! use sevalla_api::rest::resources::Application;
//!
//! let app: ResourceResponse<Application> = client.applications().get(&ctx, "app-123").await?;
//! println!("{} ({})", app.name, app.request_id().unwrap_or("-")); // Deref to Application
//! ```

pub mod resources;
mod response;

pub use response::ResourceResponse;

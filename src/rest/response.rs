//! Response wrapper for resource operations.
//!
//! This module provides [`ResourceResponse<T>`], which pairs decoded resource
//! data with the [`HttpResponse`] envelope it arrived in. The wrapper
//! implements `Deref` for ergonomic access to the inner data.
//!
//! # Deref Pattern
//!
//! ```rust,ignore
//! let apps = client.applications().list(&ctx, None).await?;
//!
//! // Vec methods via Deref
//! for app in apps.iter() {
//!     println!("{}", app.name);
//! }
//!
//! // Pagination from the envelope
//! if apps.has_next_page() {
//!     let next = ListOptions::new().page(apps.next_page());
//!     // ...
//! }
//!
//! // Take ownership of inner data
//! let apps: Vec<Application> = apps.into_inner();
//! ```

use std::ops::{Deref, DerefMut};

use crate::clients::{HttpResponse, Pagination, Rate};

/// A decoded resource together with its response envelope.
///
/// # Example
///
/// ```rust
/// use std::collections::HashMap;
/// use sevalla_api::clients::HttpResponse;
/// use sevalla_api::rest::ResourceResponse;
///
/// let mut headers = HashMap::new();
/// headers.insert(
///     "link".to_string(),
///     vec![r#"<https://api.sevalla.com/v2/applications?page=2>; rel="next""#.to_string()],
/// );
///
/// let response = ResourceResponse::new(vec!["a", "b"], HttpResponse::new(200, headers));
/// assert_eq!(response.len(), 2);
/// assert!(response.has_next_page());
/// assert_eq!(response.next_page(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceResponse<T> {
    data: T,
    response: HttpResponse,
}

impl<T> ResourceResponse<T> {
    /// Creates a new `ResourceResponse`.
    #[must_use]
    pub const fn new(data: T, response: HttpResponse) -> Self {
        Self { data, response }
    }

    /// Consumes the response and returns the inner data.
    #[must_use]
    pub fn into_inner(self) -> T {
        self.data
    }

    /// Consumes the response and returns the data and the envelope.
    #[must_use]
    pub fn into_parts(self) -> (T, HttpResponse) {
        (self.data, self.response)
    }

    /// Returns a reference to the inner data.
    #[must_use]
    pub const fn data(&self) -> &T {
        &self.data
    }

    /// Returns the response envelope.
    #[must_use]
    pub const fn response(&self) -> &HttpResponse {
        &self.response
    }

    /// Returns the HTTP status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.response.code
    }

    /// Returns the pagination parsed from the `Link` header.
    #[must_use]
    pub const fn pagination(&self) -> &Pagination {
        &self.response.pagination
    }

    /// Returns `true` if there is a next page of results.
    #[must_use]
    pub const fn has_next_page(&self) -> bool {
        self.response.pagination.has_next_page()
    }

    /// Returns the next page number, or `0` if there is none.
    #[must_use]
    pub const fn next_page(&self) -> u32 {
        self.response.pagination.next_page
    }

    /// Returns the rate limit state.
    #[must_use]
    pub const fn rate(&self) -> &Rate {
        &self.response.rate
    }

    /// Returns the request ID from the response headers.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.response.request_id()
    }

    /// Maps the inner data to a new type, keeping the envelope.
    #[must_use]
    pub fn map<U, F>(self, f: F) -> ResourceResponse<U>
    where
        F: FnOnce(T) -> U,
    {
        ResourceResponse {
            data: f(self.data),
            response: self.response,
        }
    }
}

impl<T: Default> ResourceResponse<Option<T>> {
    /// Replaces a missing payload (204 or empty body) with `T::default()`.
    #[must_use]
    pub fn unwrap_or_default(self) -> ResourceResponse<T> {
        self.map(Option::unwrap_or_default)
    }
}

impl<T> Deref for ResourceResponse<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

impl<T> DerefMut for ResourceResponse<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.data
    }
}

// Verify ResourceResponse is Send + Sync when T is Send + Sync
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ResourceResponse<String>>();
    assert_send_sync::<ResourceResponse<Vec<String>>>();
};

//! Static site resource implementation.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::clients::{Error, HttpClient, HttpMethod, HttpResponse, RequestContext};
use crate::rest::resources::common::{
    null_as_default, path_segment, ApplicationState, ListOptions, Region,
};
use crate::rest::resources::Deployment;
use crate::rest::ResourceResponse;

/// A static site built from a Git repository and served from the CDN.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct StaticSite {
    /// The unique identifier of the site.
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    /// Display name.
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    /// Lifecycle state.
    pub state: Option<ApplicationState>,
    /// Git repository the site is built from.
    #[serde(deserialize_with = "null_as_default")]
    pub repository_url: String,
    /// Branch that is deployed.
    #[serde(deserialize_with = "null_as_default")]
    pub branch: String,
    /// Deployment region.
    #[serde(rename = "location")]
    pub region: Option<Region>,
    /// Build command.
    pub build_command: Option<String>,
    /// Directory holding the build output.
    pub output_directory: Option<String>,
    /// Build-time environment variables.
    #[serde(deserialize_with = "null_as_default")]
    pub environment_variables: HashMap<String, String>,
    /// Public URL.
    pub url: Option<String>,
    /// Custom domains attached to the site.
    #[serde(deserialize_with = "null_as_default")]
    pub custom_domains: Vec<String>,
    /// Whether pushes to `branch` deploy automatically.
    #[serde(deserialize_with = "null_as_default")]
    pub auto_deploy: bool,
    /// Whether the CDN is enabled.
    #[serde(deserialize_with = "null_as_default")]
    pub cdn_enabled: bool,
    /// Whether TLS is enabled.
    #[serde(deserialize_with = "null_as_default")]
    pub ssl_enabled: bool,
    /// When the site was created.
    pub created_at: Option<DateTime<Utc>>,
    /// When the site was last updated.
    pub updated_at: Option<DateTime<Utc>>,
    /// The most recent deployment.
    pub last_deployment_id: Option<String>,
}

/// Payload for [`StaticSites::create`].
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct CreateStaticSiteRequest {
    /// Display name.
    pub name: String,
    /// Git repository to build from.
    pub repository_url: String,
    /// Branch to deploy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    /// Deployment region.
    #[serde(rename = "location", skip_serializing_if = "Option::is_none")]
    pub region: Option<Region>,
    /// Build command.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_command: Option<String>,
    /// Directory holding the build output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_directory: Option<String>,
    /// Build-time environment variables.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment_variables: Option<HashMap<String, String>>,
    /// Deploy automatically on push.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_deploy: Option<bool>,
    /// Enable the CDN.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cdn_enabled: Option<bool>,
    /// Enable TLS.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssl_enabled: Option<bool>,
}

impl CreateStaticSiteRequest {
    /// Creates a request with the two required fields set.
    #[must_use]
    pub fn new(name: impl Into<String>, repository_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            repository_url: repository_url.into(),
            ..Self::default()
        }
    }
}

/// Method set for the `static-sites` resource family.
#[derive(Debug, Clone, Copy)]
pub struct StaticSites<'a> {
    client: &'a HttpClient,
}

impl<'a> StaticSites<'a> {
    pub(crate) const fn new(client: &'a HttpClient) -> Self {
        Self { client }
    }

    /// Lists static sites.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] if the request fails or the response is not 2xx.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        options: Option<&ListOptions>,
    ) -> Result<ResourceResponse<Vec<StaticSite>>, Error> {
        let request = self
            .client
            .new_request_with_query(HttpMethod::Get, "static-sites", options)?;
        Ok(self.client.execute_json(ctx, request).await?.unwrap_or_default())
    }

    /// Retrieves a static site.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an empty `id`, otherwise as [`list`](Self::list).
    pub async fn get(
        &self,
        ctx: &RequestContext,
        id: &str,
    ) -> Result<ResourceResponse<StaticSite>, Error> {
        let path = format!("static-sites/{}", path_segment("id", id)?);
        let request = self.client.new_request(HttpMethod::Get, &path)?;
        Ok(self.client.execute_json(ctx, request).await?.unwrap_or_default())
    }

    /// Creates a static site.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] if the request fails or the response is not 2xx.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        create: &CreateStaticSiteRequest,
    ) -> Result<ResourceResponse<StaticSite>, Error> {
        let request = self
            .client
            .new_request_with_body(HttpMethod::Post, "static-sites", create)?;
        Ok(self.client.execute_json(ctx, request).await?.unwrap_or_default())
    }

    /// Deletes a static site.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an empty `id`, otherwise as [`list`](Self::list).
    pub async fn delete(&self, ctx: &RequestContext, id: &str) -> Result<HttpResponse, Error> {
        let path = format!("static-sites/{}", path_segment("id", id)?);
        let request = self.client.new_request(HttpMethod::Delete, &path)?;
        self.client.execute(ctx, request).await
    }

    /// Builds and publishes the configured branch.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an empty `id`, otherwise as [`list`](Self::list).
    pub async fn deploy(
        &self,
        ctx: &RequestContext,
        id: &str,
    ) -> Result<ResourceResponse<Deployment>, Error> {
        let path = format!("static-sites/{}/deployments", path_segment("id", id)?);
        let request = self.client.new_request(HttpMethod::Post, &path)?;
        Ok(self.client.execute_json(ctx, request).await?.unwrap_or_default())
    }
}

//! Application resource implementation.
//!
//! This module provides the [`Application`] resource and the
//! [`Applications`] method set for managing Sevalla applications: lifecycle
//! (create, scale, start, stop, restart), deployments and rollbacks, custom
//! domains, CDN settings, environment variables, logs and usage.
//!
//! # Example
//!
//! ```rust,ignore
//! use sevalla_api::rest::resources::{CreateApplicationRequest, Plan, Region};
//! use sevalla_api::RequestContext;
//!
//! let ctx = RequestContext::default();
//! let app = client
//!     .applications()
//!     .create(
//!         &ctx,
//!         &CreateApplicationRequest {
//!             region: Some(Region::UsCentral1),
//!             plan: Some(Plan::Starter),
//!             ..CreateApplicationRequest::new("api", "https://github.com/acme/api")
//!         },
//!     )
//!     .await?;
//!
//! let deployment = client.applications().deploy(&ctx, &app.id).await?;
//! println!("deployment {} is {:?}", deployment.id, deployment.state);
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::clients::{Error, HttpClient, HttpMethod, HttpResponse, RequestContext};
use crate::rest::resources::common::{
    null_as_default, path_segment, ApplicationState, EnabledBody, ListOptions, LogOptions,
    LogsBody, Plan, Region, Usage, UsageOptions,
};
use crate::rest::resources::Deployment;
use crate::rest::ResourceResponse;

/// A Sevalla application.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Application {
    /// The unique identifier of the application.
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    /// Display name.
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    /// Lifecycle state.
    pub state: Option<ApplicationState>,
    /// Git repository the application is built from.
    #[serde(deserialize_with = "null_as_default")]
    pub repository_url: String,
    /// Branch that is deployed.
    #[serde(deserialize_with = "null_as_default")]
    pub branch: String,
    /// Deployment region.
    #[serde(rename = "location")]
    pub region: Option<Region>,
    /// Compute plan.
    #[serde(rename = "pod_size")]
    pub plan: Option<Plan>,
    /// Number of running instances.
    #[serde(deserialize_with = "null_as_default")]
    pub replicas: u32,
    /// Environment variables.
    #[serde(deserialize_with = "null_as_default")]
    pub environment_variables: HashMap<String, String>,
    /// Build command override.
    pub build_command: Option<String>,
    /// Start command override.
    pub start_command: Option<String>,
    /// Port the application listens on.
    pub port: Option<u16>,
    /// Public URL.
    pub url: Option<String>,
    /// Custom domains attached to the application.
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
    /// When the application was created.
    pub created_at: Option<DateTime<Utc>>,
    /// When the application was last updated.
    pub updated_at: Option<DateTime<Utc>>,
    /// The most recent deployment.
    pub last_deployment_id: Option<String>,
    /// Free-form metadata.
    #[serde(deserialize_with = "null_as_default")]
    pub metadata: HashMap<String, serde_json::Value>,
}

/// Payload for [`Applications::create`].
///
/// Optional fields left as `None` are omitted from the request body.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct CreateApplicationRequest {
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
    /// Compute plan.
    #[serde(rename = "pod_size", skip_serializing_if = "Option::is_none")]
    pub plan: Option<Plan>,
    /// Number of instances.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replicas: Option<u32>,
    /// Environment variables.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment_variables: Option<HashMap<String, String>>,
    /// Build command override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_command: Option<String>,
    /// Start command override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_command: Option<String>,
    /// Port the application listens on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
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

impl CreateApplicationRequest {
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

/// Partial update for [`Applications::update`].
///
/// `None` leaves a field unchanged. `Some` sends the value even when it is
/// zero or `false`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct UpdateApplicationRequest {
    /// New display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New branch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    /// New compute plan.
    #[serde(rename = "pod_size", skip_serializing_if = "Option::is_none")]
    pub plan: Option<Plan>,
    /// New instance count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replicas: Option<u32>,
    /// Replacement environment variables.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment_variables: Option<HashMap<String, String>>,
    /// New build command.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_command: Option<String>,
    /// New start command.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_command: Option<String>,
    /// New port.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    /// Toggle automatic deploys.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_deploy: Option<bool>,
}

/// Payload for [`Applications::scale`].
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ScaleApplicationRequest {
    /// Target instance count. Always sent, including `0`.
    pub replicas: u32,
    /// Optional plan change.
    #[serde(rename = "pod_size", skip_serializing_if = "Option::is_none")]
    pub plan: Option<Plan>,
}

#[derive(Debug, Serialize)]
struct AddDomainBody<'a> {
    domain: &'a str,
}

/// Method set for the `applications` resource family.
///
/// Obtained from [`SevallaClient::applications`](crate::SevallaClient::applications).
#[derive(Debug, Clone, Copy)]
pub struct Applications<'a> {
    client: &'a HttpClient,
}

impl<'a> Applications<'a> {
    pub(crate) const fn new(client: &'a HttpClient) -> Self {
        Self { client }
    }

    /// Lists applications.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] if the request fails or the response is not 2xx.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        options: Option<&ListOptions>,
    ) -> Result<ResourceResponse<Vec<Application>>, Error> {
        let request = self
            .client
            .new_request_with_query(HttpMethod::Get, "applications", options)?;
        Ok(self.client.execute_json(ctx, request).await?.unwrap_or_default())
    }

    /// Retrieves an application.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an empty `id`, otherwise as [`list`](Self::list).
    pub async fn get(
        &self,
        ctx: &RequestContext,
        id: &str,
    ) -> Result<ResourceResponse<Application>, Error> {
        let path = format!("applications/{}", path_segment("id", id)?);
        let request = self.client.new_request(HttpMethod::Get, &path)?;
        Ok(self.client.execute_json(ctx, request).await?.unwrap_or_default())
    }

    /// Creates an application.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] if the request fails or the response is not 2xx.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        create: &CreateApplicationRequest,
    ) -> Result<ResourceResponse<Application>, Error> {
        let request = self
            .client
            .new_request_with_body(HttpMethod::Post, "applications", create)?;
        Ok(self.client.execute_json(ctx, request).await?.unwrap_or_default())
    }

    /// Applies a partial update.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an empty `id`, otherwise as [`list`](Self::list).
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: &str,
        update: &UpdateApplicationRequest,
    ) -> Result<ResourceResponse<Application>, Error> {
        let path = format!("applications/{}", path_segment("id", id)?);
        let request = self
            .client
            .new_request_with_body(HttpMethod::Patch, &path, update)?;
        Ok(self.client.execute_json(ctx, request).await?.unwrap_or_default())
    }

    /// Deletes an application.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an empty `id`, otherwise as [`list`](Self::list).
    pub async fn delete(&self, ctx: &RequestContext, id: &str) -> Result<HttpResponse, Error> {
        let path = format!("applications/{}", path_segment("id", id)?);
        let request = self.client.new_request(HttpMethod::Delete, &path)?;
        self.client.execute(ctx, request).await
    }

    /// Changes the instance count and optionally the plan.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an empty `id`, otherwise as [`list`](Self::list).
    pub async fn scale(
        &self,
        ctx: &RequestContext,
        id: &str,
        scale: &ScaleApplicationRequest,
    ) -> Result<ResourceResponse<Application>, Error> {
        let path = format!("applications/{}/scale", path_segment("id", id)?);
        let request = self
            .client
            .new_request_with_body(HttpMethod::Post, &path, scale)?;
        Ok(self.client.execute_json(ctx, request).await?.unwrap_or_default())
    }

    /// Starts a new deployment of the configured branch.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an empty `id`, otherwise as [`list`](Self::list).
    pub async fn deploy(
        &self,
        ctx: &RequestContext,
        id: &str,
    ) -> Result<ResourceResponse<Deployment>, Error> {
        let path = format!("applications/{}/deployments", path_segment("id", id)?);
        let request = self.client.new_request(HttpMethod::Post, &path)?;
        Ok(self.client.execute_json(ctx, request).await?.unwrap_or_default())
    }

    /// Restarts every instance.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an empty `id`, otherwise as [`list`](Self::list).
    pub async fn restart(&self, ctx: &RequestContext, id: &str) -> Result<HttpResponse, Error> {
        self.action(ctx, id, "restart").await
    }

    /// Stops the application.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an empty `id`, otherwise as [`list`](Self::list).
    pub async fn stop(&self, ctx: &RequestContext, id: &str) -> Result<HttpResponse, Error> {
        self.action(ctx, id, "stop").await
    }

    /// Starts a stopped application.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an empty `id`, otherwise as [`list`](Self::list).
    pub async fn start(&self, ctx: &RequestContext, id: &str) -> Result<HttpResponse, Error> {
        self.action(ctx, id, "start").await
    }

    async fn action(
        &self,
        ctx: &RequestContext,
        id: &str,
        action: &str,
    ) -> Result<HttpResponse, Error> {
        let path = format!("applications/{}/{action}", path_segment("id", id)?);
        let request = self.client.new_request(HttpMethod::Post, &path)?;
        self.client.execute(ctx, request).await
    }

    /// Retrieves runtime logs.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an empty `id`, otherwise as [`list`](Self::list).
    pub async fn logs(
        &self,
        ctx: &RequestContext,
        id: &str,
        options: Option<&LogOptions>,
    ) -> Result<ResourceResponse<String>, Error> {
        let path = format!("applications/{}/logs", path_segment("id", id)?);
        let request = self
            .client
            .new_request_with_query(HttpMethod::Get, &path, options)?;
        let body = self
            .client
            .execute_json::<LogsBody>(ctx, request)
            .await?
            .unwrap_or_default();
        Ok(body.map(|body| body.logs))
    }

    /// Lists the deployments of an application.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an empty `id`, otherwise as [`list`](Self::list).
    pub async fn list_deployments(
        &self,
        ctx: &RequestContext,
        id: &str,
        options: Option<&ListOptions>,
    ) -> Result<ResourceResponse<Vec<Deployment>>, Error> {
        let path = format!("applications/{}/deployments", path_segment("id", id)?);
        let request = self
            .client
            .new_request_with_query(HttpMethod::Get, &path, options)?;
        Ok(self.client.execute_json(ctx, request).await?.unwrap_or_default())
    }

    /// Retrieves one deployment of an application.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an empty identifier, otherwise as [`list`](Self::list).
    pub async fn get_deployment(
        &self,
        ctx: &RequestContext,
        app_id: &str,
        deployment_id: &str,
    ) -> Result<ResourceResponse<Deployment>, Error> {
        let path = format!(
            "applications/{}/deployments/{}",
            path_segment("app_id", app_id)?,
            path_segment("deployment_id", deployment_id)?
        );
        let request = self.client.new_request(HttpMethod::Get, &path)?;
        Ok(self.client.execute_json(ctx, request).await?.unwrap_or_default())
    }

    /// Cancels a running deployment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an empty identifier, otherwise as [`list`](Self::list).
    pub async fn cancel_deployment(
        &self,
        ctx: &RequestContext,
        app_id: &str,
        deployment_id: &str,
    ) -> Result<HttpResponse, Error> {
        let path = format!(
            "applications/{}/deployments/{}/cancel",
            path_segment("app_id", app_id)?,
            path_segment("deployment_id", deployment_id)?
        );
        let request = self.client.new_request(HttpMethod::Post, &path)?;
        self.client.execute(ctx, request).await
    }

    /// Attaches a custom domain.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an empty `id` or `domain`, otherwise as [`list`](Self::list).
    pub async fn add_custom_domain(
        &self,
        ctx: &RequestContext,
        id: &str,
        domain: &str,
    ) -> Result<HttpResponse, Error> {
        path_segment("domain", domain)?;
        let path = format!("applications/{}/domains", path_segment("id", id)?);
        let request = self.client.new_request_with_body(
            HttpMethod::Post,
            &path,
            &AddDomainBody { domain },
        )?;
        self.client.execute(ctx, request).await
    }

    /// Detaches a custom domain.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an empty `id` or `domain`, otherwise as [`list`](Self::list).
    pub async fn remove_custom_domain(
        &self,
        ctx: &RequestContext,
        id: &str,
        domain: &str,
    ) -> Result<HttpResponse, Error> {
        let path = format!(
            "applications/{}/domains/{}",
            path_segment("id", id)?,
            path_segment("domain", domain)?
        );
        let request = self.client.new_request(HttpMethod::Delete, &path)?;
        self.client.execute(ctx, request).await
    }

    /// Enables or disables the CDN.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an empty `id`, otherwise as [`list`](Self::list).
    pub async fn update_cdn_settings(
        &self,
        ctx: &RequestContext,
        id: &str,
        enabled: bool,
    ) -> Result<HttpResponse, Error> {
        let path = format!("applications/{}/cdn", path_segment("id", id)?);
        let request =
            self.client
                .new_request_with_body(HttpMethod::Put, &path, &EnabledBody { enabled })?;
        self.client.execute(ctx, request).await
    }

    /// Retrieves usage metrics.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an empty `id`, otherwise as [`list`](Self::list).
    pub async fn usage(
        &self,
        ctx: &RequestContext,
        id: &str,
        options: Option<&UsageOptions>,
    ) -> Result<ResourceResponse<Usage>, Error> {
        let path = format!("applications/{}/usage", path_segment("id", id)?);
        let request = self
            .client
            .new_request_with_query(HttpMethod::Get, &path, options)?;
        Ok(self.client.execute_json(ctx, request).await?.unwrap_or_default())
    }

    /// Replaces the environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an empty `id`, otherwise as [`list`](Self::list).
    pub async fn set_environment_variables(
        &self,
        ctx: &RequestContext,
        id: &str,
        variables: &HashMap<String, String>,
    ) -> Result<HttpResponse, Error> {
        let path = format!("applications/{}/env", path_segment("id", id)?);
        let request = self
            .client
            .new_request_with_body(HttpMethod::Put, &path, variables)?;
        self.client.execute(ctx, request).await
    }

    /// Retrieves the environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an empty `id`, otherwise as [`list`](Self::list).
    pub async fn environment_variables(
        &self,
        ctx: &RequestContext,
        id: &str,
    ) -> Result<ResourceResponse<HashMap<String, String>>, Error> {
        let path = format!("applications/{}/env", path_segment("id", id)?);
        let request = self.client.new_request(HttpMethod::Get, &path)?;
        Ok(self.client.execute_json(ctx, request).await?.unwrap_or_default())
    }

    /// Redeploys a previous deployment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an empty identifier, otherwise as [`list`](Self::list).
    pub async fn rollback(
        &self,
        ctx: &RequestContext,
        app_id: &str,
        deployment_id: &str,
    ) -> Result<ResourceResponse<Deployment>, Error> {
        let path = format!(
            "applications/{}/rollback/{}",
            path_segment("app_id", app_id)?,
            path_segment("deployment_id", deployment_id)?
        );
        let request = self.client.new_request(HttpMethod::Post, &path)?;
        Ok(self.client.execute_json(ctx, request).await?.unwrap_or_default())
    }
}

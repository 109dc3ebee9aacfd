//! Deployment resource implementation.
//!
//! Deployments are created by [`Applications::deploy`](crate::rest::resources::Applications::deploy),
//! [`Applications::rollback`](crate::rest::resources::Applications::rollback) and
//! [`StaticSites::deploy`](crate::rest::resources::StaticSites::deploy). The
//! [`Deployments`] method set addresses them directly by ID.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::clients::{Error, HttpClient, HttpMethod, HttpResponse, RequestContext};
use crate::rest::resources::common::{
    null_as_default, path_segment, ListOptions, LogOptions, LogsBody, Status,
};
use crate::rest::ResourceResponse;

/// A single build and rollout of an application or static site.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Deployment {
    /// The unique identifier of the deployment.
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    /// The application being deployed, if any.
    pub application_id: Option<String>,
    /// The static site being deployed, if any.
    pub static_site_id: Option<String>,
    /// Progress of the deployment.
    pub state: Option<Status>,
    /// Commit being deployed.
    pub commit_sha: Option<String>,
    /// Message of that commit.
    pub commit_message: Option<String>,
    /// Branch being deployed.
    pub branch: Option<String>,
    /// Output of the build phase.
    pub build_logs: Option<String>,
    /// Output of the running release.
    pub runtime_logs: Option<String>,
    /// Failure reason.
    pub error_message: Option<String>,
    /// When the deployment started.
    pub started_at: Option<DateTime<Utc>>,
    /// When the deployment finished.
    pub completed_at: Option<DateTime<Utc>>,
    /// Wall time in seconds.
    pub duration_seconds: Option<u64>,
}

impl Deployment {
    /// Returns `true` once the deployment has stopped changing.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        matches!(
            self.state,
            Some(Status::Success | Status::Failed | Status::Cancelled)
        )
    }
}

/// Method set for the `deployments` resource family.
#[derive(Debug, Clone, Copy)]
pub struct Deployments<'a> {
    client: &'a HttpClient,
}

impl<'a> Deployments<'a> {
    pub(crate) const fn new(client: &'a HttpClient) -> Self {
        Self { client }
    }

    /// Retrieves a deployment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an empty `id`, [`Error::Api`] for
    /// non-2xx responses, or a transport error.
    pub async fn get(
        &self,
        ctx: &RequestContext,
        id: &str,
    ) -> Result<ResourceResponse<Deployment>, Error> {
        let path = format!("deployments/{}", path_segment("id", id)?);
        let request = self.client.new_request(HttpMethod::Get, &path)?;
        Ok(self.client.execute_json(ctx, request).await?.unwrap_or_default())
    }

    /// Lists deployments across all applications and sites.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] if the request fails or the response is not 2xx.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        options: Option<&ListOptions>,
    ) -> Result<ResourceResponse<Vec<Deployment>>, Error> {
        let request = self
            .client
            .new_request_with_query(HttpMethod::Get, "deployments", options)?;
        Ok(self.client.execute_json(ctx, request).await?.unwrap_or_default())
    }

    /// Retrieves the build and runtime logs of a deployment.
    ///
    /// # Errors
    ///
    /// Same as [`get`](Self::get).
    pub async fn logs(
        &self,
        ctx: &RequestContext,
        id: &str,
        options: Option<&LogOptions>,
    ) -> Result<ResourceResponse<String>, Error> {
        let path = format!("deployments/{}/logs", path_segment("id", id)?);
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

    /// Cancels a deployment that has not finished.
    ///
    /// # Errors
    ///
    /// Same as [`get`](Self::get).
    pub async fn cancel(&self, ctx: &RequestContext, id: &str) -> Result<HttpResponse, Error> {
        let path = format!("deployments/{}/cancel", path_segment("id", id)?);
        let request = self.client.new_request(HttpMethod::Post, &path)?;
        self.client.execute(ctx, request).await
    }
}

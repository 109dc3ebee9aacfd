//! Pipeline resource implementation.
//!
//! A [`Pipeline`] is an ordered set of [`PipelineStep`]s triggered by a Git
//! event or by hand. Each execution is a [`PipelineRun`].
//!
//! # Example
//!
//! ```rust,ignore
//! use sevalla_api::rest::resources::{CreatePipelineRequest, PipelineStep};
//!
//! let pipeline = client
//!     .pipelines()
//!     .create(
//!         &ctx,
//!         &CreatePipelineRequest {
//!             name: "ci".to_string(),
//!             enabled: true,
//!             trigger: "push".to_string(),
//!             branch: "main".to_string(),
//!             steps: vec![PipelineStep::new("test", "cargo test")],
//!             ..CreatePipelineRequest::default()
//!         },
//!     )
//!     .await?;
//!
//! let run = client.pipelines().run(&ctx, &pipeline.id).await?;
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::clients::{Error, HttpClient, HttpMethod, HttpResponse, RequestContext};
use crate::rest::resources::common::{
    null_as_default, path_segment, ListOptions, LogOptions, LogsBody, Status,
};
use crate::rest::ResourceResponse;

/// A CI/CD pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Pipeline {
    /// The unique identifier of the pipeline.
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    /// Display name.
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    /// Whether triggers start runs.
    #[serde(deserialize_with = "null_as_default")]
    pub enabled: bool,
    /// Event that starts a run, such as `push`.
    #[serde(deserialize_with = "null_as_default")]
    pub trigger: String,
    /// Branch the trigger watches.
    #[serde(deserialize_with = "null_as_default")]
    pub branch: String,
    /// Steps in execution order.
    #[serde(deserialize_with = "null_as_default")]
    pub steps: Vec<PipelineStep>,
    /// Environment shared by every step.
    #[serde(deserialize_with = "null_as_default")]
    pub environment: HashMap<String, String>,
    /// When the pipeline was created.
    pub created_at: Option<DateTime<Utc>>,
    /// When the pipeline was last updated.
    pub updated_at: Option<DateTime<Utc>>,
    /// Free-form metadata.
    #[serde(deserialize_with = "null_as_default")]
    pub metadata: HashMap<String, serde_json::Value>,
}

/// One step of a pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct PipelineStep {
    /// Step name, unique within the pipeline.
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    /// Shell command to run.
    #[serde(deserialize_with = "null_as_default")]
    pub command: String,
    /// Container image. The platform default is used when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Per-step time limit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<u32>,
    /// How many times a failing step is retried.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retries: Option<u32>,
    /// Names of steps that must succeed first.
    #[serde(
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub depends_on: Vec<String>,
}

impl PipelineStep {
    /// Creates a step with a name and a command.
    #[must_use]
    pub fn new(name: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            command: command.into(),
            ..Self::default()
        }
    }
}

/// One execution of a pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct PipelineRun {
    /// The unique identifier of the run.
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    /// The pipeline that was run.
    #[serde(deserialize_with = "null_as_default")]
    pub pipeline_id: String,
    /// Progress of the run.
    pub state: Option<Status>,
    /// Branch the run checked out.
    pub branch: Option<String>,
    /// Commit the run checked out.
    pub commit_sha: Option<String>,
    /// When the run started.
    pub started_at: Option<DateTime<Utc>>,
    /// When the run finished.
    pub completed_at: Option<DateTime<Utc>>,
    /// Wall time in seconds.
    pub duration_seconds: Option<u64>,
    /// Per-step results.
    #[serde(deserialize_with = "null_as_default")]
    pub steps: Vec<PipelineRunStep>,
}

/// The result of one step within a run.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct PipelineRunStep {
    /// Step name.
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    /// Progress of the step.
    pub state: Option<Status>,
    /// Captured output.
    pub output: Option<String>,
    /// Failure reason.
    pub error_message: Option<String>,
    /// When the step started.
    pub started_at: Option<DateTime<Utc>>,
    /// When the step finished.
    pub completed_at: Option<DateTime<Utc>>,
}

/// Payload for [`Pipelines::create`].
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct CreatePipelineRequest {
    /// Display name.
    pub name: String,
    /// Whether triggers start runs.
    pub enabled: bool,
    /// Event that starts a run.
    pub trigger: String,
    /// Branch the trigger watches.
    pub branch: String,
    /// Steps in execution order.
    pub steps: Vec<PipelineStep>,
    /// Environment shared by every step.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<HashMap<String, String>>,
    /// Free-form metadata.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, serde_json::Value>>,
}

/// Partial update for [`Pipelines::update`].
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct UpdatePipelineRequest {
    /// New display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Enable or disable triggers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// New trigger.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger: Option<String>,
    /// New branch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    /// Replacement steps.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps: Option<Vec<PipelineStep>>,
    /// Replacement environment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<HashMap<String, String>>,
    /// Replacement metadata.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, serde_json::Value>>,
}

/// Method set for the `pipelines` resource family.
#[derive(Debug, Clone, Copy)]
pub struct Pipelines<'a> {
    client: &'a HttpClient,
}

impl<'a> Pipelines<'a> {
    pub(crate) const fn new(client: &'a HttpClient) -> Self {
        Self { client }
    }

    /// Lists pipelines.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] if the request fails or the response is not 2xx.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        options: Option<&ListOptions>,
    ) -> Result<ResourceResponse<Vec<Pipeline>>, Error> {
        let request = self
            .client
            .new_request_with_query(HttpMethod::Get, "pipelines", options)?;
        Ok(self.client.execute_json(ctx, request).await?.unwrap_or_default())
    }

    /// Retrieves a pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an empty `id`, otherwise as [`list`](Self::list).
    pub async fn get(
        &self,
        ctx: &RequestContext,
        id: &str,
    ) -> Result<ResourceResponse<Pipeline>, Error> {
        let path = format!("pipelines/{}", path_segment("id", id)?);
        let request = self.client.new_request(HttpMethod::Get, &path)?;
        Ok(self.client.execute_json(ctx, request).await?.unwrap_or_default())
    }

    /// Creates a pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] if the request fails or the response is not 2xx.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        create: &CreatePipelineRequest,
    ) -> Result<ResourceResponse<Pipeline>, Error> {
        let request = self
            .client
            .new_request_with_body(HttpMethod::Post, "pipelines", create)?;
        Ok(self.client.execute_json(ctx, request).await?.unwrap_or_default())
    }

    /// Updates a pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an empty `id`, otherwise as [`list`](Self::list).
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: &str,
        update: &UpdatePipelineRequest,
    ) -> Result<ResourceResponse<Pipeline>, Error> {
        let path = format!("pipelines/{}", path_segment("id", id)?);
        let request = self
            .client
            .new_request_with_body(HttpMethod::Put, &path, update)?;
        Ok(self.client.execute_json(ctx, request).await?.unwrap_or_default())
    }

    /// Deletes a pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an empty `id`, otherwise as [`list`](Self::list).
    pub async fn delete(&self, ctx: &RequestContext, id: &str) -> Result<HttpResponse, Error> {
        let path = format!("pipelines/{}", path_segment("id", id)?);
        let request = self.client.new_request(HttpMethod::Delete, &path)?;
        self.client.execute(ctx, request).await
    }

    /// Starts a run by hand.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an empty `id`, otherwise as [`list`](Self::list).
    pub async fn run(
        &self,
        ctx: &RequestContext,
        id: &str,
    ) -> Result<ResourceResponse<PipelineRun>, Error> {
        let path = format!("pipelines/{}/runs", path_segment("id", id)?);
        let request = self.client.new_request(HttpMethod::Post, &path)?;
        Ok(self.client.execute_json(ctx, request).await?.unwrap_or_default())
    }

    /// Lists the runs of a pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an empty `id`, otherwise as [`list`](Self::list).
    pub async fn list_runs(
        &self,
        ctx: &RequestContext,
        id: &str,
        options: Option<&ListOptions>,
    ) -> Result<ResourceResponse<Vec<PipelineRun>>, Error> {
        let path = format!("pipelines/{}/runs", path_segment("id", id)?);
        let request = self
            .client
            .new_request_with_query(HttpMethod::Get, &path, options)?;
        Ok(self.client.execute_json(ctx, request).await?.unwrap_or_default())
    }

    /// Retrieves one run.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an empty identifier, otherwise as [`list`](Self::list).
    pub async fn get_run(
        &self,
        ctx: &RequestContext,
        id: &str,
        run_id: &str,
    ) -> Result<ResourceResponse<PipelineRun>, Error> {
        let path = run_path(id, run_id, "")?;
        let request = self.client.new_request(HttpMethod::Get, &path)?;
        Ok(self.client.execute_json(ctx, request).await?.unwrap_or_default())
    }

    /// Cancels a run that has not finished.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an empty identifier, otherwise as [`list`](Self::list).
    pub async fn cancel_run(
        &self,
        ctx: &RequestContext,
        id: &str,
        run_id: &str,
    ) -> Result<HttpResponse, Error> {
        let path = run_path(id, run_id, "/cancel")?;
        let request = self.client.new_request(HttpMethod::Post, &path)?;
        self.client.execute(ctx, request).await
    }

    /// Retrieves the combined output of a run.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an empty identifier, otherwise as [`list`](Self::list).
    pub async fn run_logs(
        &self,
        ctx: &RequestContext,
        id: &str,
        run_id: &str,
        options: Option<&LogOptions>,
    ) -> Result<ResourceResponse<String>, Error> {
        let path = run_path(id, run_id, "/logs")?;
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

    /// Starts a new run with the same inputs as a previous one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an empty identifier, otherwise as [`list`](Self::list).
    pub async fn retry_run(
        &self,
        ctx: &RequestContext,
        id: &str,
        run_id: &str,
    ) -> Result<ResourceResponse<PipelineRun>, Error> {
        let path = run_path(id, run_id, "/retry")?;
        let request = self.client.new_request(HttpMethod::Post, &path)?;
        Ok(self.client.execute_json(ctx, request).await?.unwrap_or_default())
    }
}

fn run_path(id: &str, run_id: &str, suffix: &str) -> Result<String, Error> {
    Ok(format!(
        "pipelines/{}/runs/{}{suffix}",
        path_segment("id", id)?,
        path_segment("run_id", run_id)?
    ))
}

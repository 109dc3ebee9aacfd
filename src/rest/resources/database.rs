//! Database resource implementation.
//!
//! This module provides the [`Database`] and [`Backup`] resources and the
//! [`Databases`] method set: provisioning, credentials, backups and
//! restores, usage metrics and public access.
//!
//! # Example
//!
//! ```rust,ignore
//! use sevalla_api::rest::resources::{CreateBackupRequest, CreateDatabaseRequest, Engine};
//!
//! let db = client
//!     .databases()
//!     .create(&ctx, &CreateDatabaseRequest::new("orders", Engine::PostgreSql))
//!     .await?;
//!
//! let backup = client
//!     .databases()
//!     .create_backup(&ctx, &db.id, &CreateBackupRequest::default())
//!     .await?;
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::clients::{Error, HttpClient, HttpMethod, HttpResponse, RequestContext};
use crate::rest::resources::common::{
    null_as_default, path_segment, BackupType, EnabledBody, Engine, ListOptions, Plan, Region,
    Status, Usage, UsageOptions,
};
use crate::rest::ResourceResponse;

/// A managed database.
///
/// `username` and `password` are only populated by
/// [`Databases::credentials`] and [`Databases::reset_password`].
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Database {
    /// The unique identifier of the database.
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    /// Display name.
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    /// Database engine.
    #[serde(rename = "type")]
    pub engine: Option<Engine>,
    /// Engine version.
    #[serde(deserialize_with = "null_as_default")]
    pub version: String,
    /// Deployment region.
    #[serde(rename = "location")]
    pub region: Option<Region>,
    /// Compute plan.
    #[serde(rename = "size")]
    pub plan: Option<Plan>,
    /// Allocated storage in gigabytes.
    #[serde(deserialize_with = "null_as_default")]
    pub storage_gb: u32,
    /// Whether automatic backups are enabled.
    #[serde(deserialize_with = "null_as_default")]
    pub backups_enabled: bool,
    /// Connection URL reachable from the internet, when public access is on.
    pub public_url: Option<String>,
    /// Connection URL reachable from other Sevalla services.
    pub internal_url: Option<String>,
    /// Login user.
    pub username: Option<String>,
    /// Login password.
    pub password: Option<String>,
    /// Whether TLS is required.
    #[serde(deserialize_with = "null_as_default")]
    pub ssl_enabled: bool,
    /// When the database was created.
    pub created_at: Option<DateTime<Utc>>,
    /// When the database was last updated.
    pub updated_at: Option<DateTime<Utc>>,
    /// Free-form metadata.
    #[serde(deserialize_with = "null_as_default")]
    pub metadata: HashMap<String, serde_json::Value>,
}

/// A database backup.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Backup {
    /// The unique identifier of the backup.
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    /// The database the backup belongs to.
    #[serde(deserialize_with = "null_as_default")]
    pub database_id: String,
    /// How the backup was taken.
    #[serde(rename = "type")]
    pub backup_type: Option<BackupType>,
    /// Size of the archive.
    #[serde(deserialize_with = "null_as_default")]
    pub size_bytes: i64,
    /// Progress of the backup.
    pub status: Option<Status>,
    /// Temporary download link.
    pub download_url: Option<String>,
    /// When `download_url` stops working.
    pub expires_at: Option<DateTime<Utc>>,
    /// When the backup was taken.
    pub created_at: Option<DateTime<Utc>>,
}

/// Payload for [`Databases::create`].
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct CreateDatabaseRequest {
    /// Display name.
    pub name: String,
    /// Database engine.
    #[serde(rename = "type")]
    pub engine: Engine,
    /// Engine version. The server picks the latest when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Deployment region.
    #[serde(rename = "location", skip_serializing_if = "Option::is_none")]
    pub region: Option<Region>,
    /// Compute plan.
    #[serde(rename = "size", skip_serializing_if = "Option::is_none")]
    pub plan: Option<Plan>,
    /// Allocated storage in gigabytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_gb: Option<u32>,
    /// Enable automatic backups.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backups_enabled: Option<bool>,
    /// Require TLS.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssl_enabled: Option<bool>,
}

impl CreateDatabaseRequest {
    /// Creates a request with the two required fields set.
    #[must_use]
    pub fn new(name: impl Into<String>, engine: Engine) -> Self {
        Self {
            name: name.into(),
            engine,
            ..Self::default()
        }
    }
}

/// Partial update for [`Databases::update`].
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct UpdateDatabaseRequest {
    /// New display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New compute plan.
    #[serde(rename = "size", skip_serializing_if = "Option::is_none")]
    pub plan: Option<Plan>,
    /// New storage allocation in gigabytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_gb: Option<u32>,
    /// Toggle automatic backups.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backups_enabled: Option<bool>,
    /// Require TLS.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssl_enabled: Option<bool>,
}

/// Payload for [`Databases::create_backup`].
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct CreateBackupRequest {
    /// Backup kind. Defaults to manual on the server.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub backup_type: Option<BackupType>,
    /// Free-form note.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
struct RestoreBody<'a> {
    backup_id: &'a str,
}

/// Method set for the `databases` resource family.
#[derive(Debug, Clone, Copy)]
pub struct Databases<'a> {
    client: &'a HttpClient,
}

impl<'a> Databases<'a> {
    pub(crate) const fn new(client: &'a HttpClient) -> Self {
        Self { client }
    }

    /// Lists databases.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] if the request fails or the response is not 2xx.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        options: Option<&ListOptions>,
    ) -> Result<ResourceResponse<Vec<Database>>, Error> {
        let request = self
            .client
            .new_request_with_query(HttpMethod::Get, "databases", options)?;
        Ok(self.client.execute_json(ctx, request).await?.unwrap_or_default())
    }

    /// Retrieves a database.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an empty `id`, otherwise as [`list`](Self::list).
    pub async fn get(
        &self,
        ctx: &RequestContext,
        id: &str,
    ) -> Result<ResourceResponse<Database>, Error> {
        let path = format!("databases/{}", path_segment("id", id)?);
        let request = self.client.new_request(HttpMethod::Get, &path)?;
        Ok(self.client.execute_json(ctx, request).await?.unwrap_or_default())
    }

    /// Provisions a database.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] if the request fails or the response is not 2xx.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        create: &CreateDatabaseRequest,
    ) -> Result<ResourceResponse<Database>, Error> {
        let request = self
            .client
            .new_request_with_body(HttpMethod::Post, "databases", create)?;
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
        update: &UpdateDatabaseRequest,
    ) -> Result<ResourceResponse<Database>, Error> {
        let path = format!("databases/{}", path_segment("id", id)?);
        let request = self
            .client
            .new_request_with_body(HttpMethod::Patch, &path, update)?;
        Ok(self.client.execute_json(ctx, request).await?.unwrap_or_default())
    }

    /// Deletes a database.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an empty `id`, otherwise as [`list`](Self::list).
    pub async fn delete(&self, ctx: &RequestContext, id: &str) -> Result<HttpResponse, Error> {
        let path = format!("databases/{}", path_segment("id", id)?);
        let request = self.client.new_request(HttpMethod::Delete, &path)?;
        self.client.execute(ctx, request).await
    }

    /// Retrieves the database with its login credentials populated.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an empty `id`, otherwise as [`list`](Self::list).
    pub async fn credentials(
        &self,
        ctx: &RequestContext,
        id: &str,
    ) -> Result<ResourceResponse<Database>, Error> {
        let path = format!("databases/{}/credentials", path_segment("id", id)?);
        let request = self.client.new_request(HttpMethod::Get, &path)?;
        Ok(self.client.execute_json(ctx, request).await?.unwrap_or_default())
    }

    /// Rotates the password and returns the new credentials.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an empty `id`, otherwise as [`list`](Self::list).
    pub async fn reset_password(
        &self,
        ctx: &RequestContext,
        id: &str,
    ) -> Result<ResourceResponse<Database>, Error> {
        let path = format!("databases/{}/reset-password", path_segment("id", id)?);
        let request = self.client.new_request(HttpMethod::Post, &path)?;
        Ok(self.client.execute_json(ctx, request).await?.unwrap_or_default())
    }

    /// Lists the backups of a database.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an empty `id`, otherwise as [`list`](Self::list).
    pub async fn list_backups(
        &self,
        ctx: &RequestContext,
        id: &str,
        options: Option<&ListOptions>,
    ) -> Result<ResourceResponse<Vec<Backup>>, Error> {
        let path = format!("databases/{}/backups", path_segment("id", id)?);
        let request = self
            .client
            .new_request_with_query(HttpMethod::Get, &path, options)?;
        Ok(self.client.execute_json(ctx, request).await?.unwrap_or_default())
    }

    /// Takes a backup.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an empty `id`, otherwise as [`list`](Self::list).
    pub async fn create_backup(
        &self,
        ctx: &RequestContext,
        id: &str,
        create: &CreateBackupRequest,
    ) -> Result<ResourceResponse<Backup>, Error> {
        let path = format!("databases/{}/backups", path_segment("id", id)?);
        let request = self
            .client
            .new_request_with_body(HttpMethod::Post, &path, create)?;
        Ok(self.client.execute_json(ctx, request).await?.unwrap_or_default())
    }

    /// Retrieves one backup.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an empty identifier, otherwise as [`list`](Self::list).
    pub async fn get_backup(
        &self,
        ctx: &RequestContext,
        id: &str,
        backup_id: &str,
    ) -> Result<ResourceResponse<Backup>, Error> {
        let path = format!(
            "databases/{}/backups/{}",
            path_segment("id", id)?,
            path_segment("backup_id", backup_id)?
        );
        let request = self.client.new_request(HttpMethod::Get, &path)?;
        Ok(self.client.execute_json(ctx, request).await?.unwrap_or_default())
    }

    /// Deletes a backup.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an empty identifier, otherwise as [`list`](Self::list).
    pub async fn delete_backup(
        &self,
        ctx: &RequestContext,
        id: &str,
        backup_id: &str,
    ) -> Result<HttpResponse, Error> {
        let path = format!(
            "databases/{}/backups/{}",
            path_segment("id", id)?,
            path_segment("backup_id", backup_id)?
        );
        let request = self.client.new_request(HttpMethod::Delete, &path)?;
        self.client.execute(ctx, request).await
    }

    /// Restores the database from one of its backups.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an empty identifier, otherwise as [`list`](Self::list).
    pub async fn restore_from_backup(
        &self,
        ctx: &RequestContext,
        id: &str,
        backup_id: &str,
    ) -> Result<HttpResponse, Error> {
        path_segment("backup_id", backup_id)?;
        let path = format!("databases/{}/restore", path_segment("id", id)?);
        let request = self.client.new_request_with_body(
            HttpMethod::Post,
            &path,
            &RestoreBody { backup_id },
        )?;
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
        let path = format!("databases/{}/usage", path_segment("id", id)?);
        let request = self
            .client
            .new_request_with_query(HttpMethod::Get, &path, options)?;
        Ok(self.client.execute_json(ctx, request).await?.unwrap_or_default())
    }

    /// Allows connections from outside Sevalla.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an empty `id`, otherwise as [`list`](Self::list).
    pub async fn enable_public_access(
        &self,
        ctx: &RequestContext,
        id: &str,
    ) -> Result<ResourceResponse<Database>, Error> {
        self.set_public_access(ctx, id, true).await
    }

    /// Restricts connections to Sevalla services.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an empty `id`, otherwise as [`list`](Self::list).
    pub async fn disable_public_access(
        &self,
        ctx: &RequestContext,
        id: &str,
    ) -> Result<ResourceResponse<Database>, Error> {
        self.set_public_access(ctx, id, false).await
    }

    async fn set_public_access(
        &self,
        ctx: &RequestContext,
        id: &str,
        enabled: bool,
    ) -> Result<ResourceResponse<Database>, Error> {
        let path = format!("databases/{}/public-access", path_segment("id", id)?);
        let request =
            self.client
                .new_request_with_body(HttpMethod::Put, &path, &EnabledBody { enabled })?;
        Ok(self.client.execute_json(ctx, request).await?.unwrap_or_default())
    }
}

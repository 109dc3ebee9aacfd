//! Sevalla resource families.
//!
//! Each family has a data type mirroring the JSON the API returns, request
//! types for the operations that take a body, and a borrowed method set
//! obtained from [`SevallaClient`](crate::SevallaClient):
//!
//! | Family | Method set | Accessor |
//! |--------|------------|----------|
//! | [`Application`] | [`Applications`] | `client.applications()` |
//! | [`Database`], [`Backup`] | [`Databases`] | `client.databases()` |
//! | [`StaticSite`] | [`StaticSites`] | `client.static_sites()` |
//! | [`Deployment`] | [`Deployments`] | `client.deployments()` |
//! | [`Pipeline`], [`PipelineRun`] | [`Pipelines`] | `client.pipelines()` |
//!
//! Every operation takes a [`RequestContext`](crate::RequestContext) first
//! and returns either a [`ResourceResponse`](crate::rest::ResourceResponse)
//! wrapping the decoded payload or, for operations without one, the bare
//! [`HttpResponse`](crate::clients::HttpResponse).
//!
//! # Example
//!
//! ```rust,ignore
//! use sevalla_api::rest::resources::ListOptions;
//! use sevalla_api::RequestContext;
//!
//! let ctx = RequestContext::default();
//! let mut options = ListOptions::new().per_page(50);
//!
//! loop {
//!     let page = client.databases().list(&ctx, Some(&options)).await?;
//!     for db in page.iter() {
//!         println!("{} ({:?})", db.name, db.engine);
//!     }
//!     if !page.has_next_page() {
//!         break;
//!     }
//!     options = options.page(page.next_page());
//! }
//! ```

mod application;
mod common;
mod database;
mod deployment;
mod pipeline;
mod static_site;

pub use application::{
    Application, Applications, CreateApplicationRequest, ScaleApplicationRequest,
    UpdateApplicationRequest,
};
pub use common::{
    ApplicationState, BackupType, Engine, ListOptions, LogOptions, Plan, Region, Status, Usage,
    UsageOptions,
};
pub use database::{
    Backup, CreateBackupRequest, CreateDatabaseRequest, Database, Databases,
    UpdateDatabaseRequest,
};
pub use deployment::{Deployment, Deployments};
pub use pipeline::{
    CreatePipelineRequest, Pipeline, PipelineRun, PipelineRunStep, PipelineStep, Pipelines,
    UpdatePipelineRequest,
};
pub use static_site::{CreateStaticSiteRequest, StaticSite, StaticSites};

pub(crate) use common::null_as_default;

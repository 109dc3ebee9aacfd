//! Types shared by several resource families.
//!
//! This module holds the string-valued enumerations used on the wire, the
//! list and filter option types that are encoded into query strings, and the
//! usage metrics record returned for applications and databases.

use std::borrow::Cow;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::clients::{Error, ValidationError};

/// Declares a closed set of wire strings with a pass-through `Other` variant.
///
/// Known values map to variants. Anything else the server sends is kept in
/// `Other` and serialized back unchanged, so new values never fail decoding.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident => $wire:literal,
            )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                $variant,
            )+
            /// A value not known to this version of the SDK.
            Other(String),
        }

        impl $name {
            /// Returns the wire representation.
            #[must_use]
            pub fn as_str(&self) -> &str {
                match self {
                    $(Self::$variant => $wire,)+
                    Self::Other(value) => value.as_str(),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                match value {
                    $($wire => Self::$variant,)+
                    other => Self::Other(other.to_string()),
                }
            }
        }

        impl FromStr for $name {
            type Err = Infallible;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self::from(s))
            }
        }

        impl Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                let value = Cow::<'de, str>::deserialize(deserializer)?;
                Ok(Self::from(value.as_ref()))
            }
        }
    };
}

wire_enum! {
    /// A deployment region.
    pub enum Region {
        /// Iowa, United States.
        UsCentral1 => "us-central1",
        /// South Carolina, United States.
        UsEast1 => "us-east1",
        /// Belgium.
        EuropeWest1 => "europe-west1",
        /// Mumbai, India.
        AsiaSouth1 => "asia-south1",
    }
}

wire_enum! {
    /// A compute plan tier, sent as `pod_size`.
    pub enum Plan {
        /// Hobby tier.
        Hobby => "hobby",
        /// Starter tier.
        Starter => "starter",
        /// Pro tier.
        Pro => "pro",
        /// Business tier.
        Business => "business",
        /// Enterprise tier.
        Enterprise => "enterprise",
    }
}

wire_enum! {
    /// The lifecycle state of an application or static site.
    pub enum ApplicationState {
        /// Serving traffic.
        Running => "running",
        /// A deployment is rolling out.
        Deploying => "deploying",
        /// The last build or deployment failed.
        Failed => "failed",
        /// Stopped by the user.
        Stopped => "stopped",
        /// Created but not yet built.
        Pending => "pending",
        /// A build is in progress.
        Building => "building",
    }
}

wire_enum! {
    /// A database engine.
    pub enum Engine {
        /// PostgreSQL.
        PostgreSql => "postgresql",
        /// MySQL.
        MySql => "mysql",
        /// MongoDB.
        MongoDb => "mongodb",
        /// Redis.
        Redis => "redis",
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::PostgreSql
    }
}

wire_enum! {
    /// The status of a deployment, a pipeline run, or a pipeline run step.
    pub enum Status {
        /// Waiting to start.
        Queued => "queued",
        /// Building.
        Building => "building",
        /// Rolling out.
        Deploying => "deploying",
        /// Finished successfully.
        Success => "success",
        /// Finished with an error.
        Failed => "failed",
        /// Cancelled before finishing.
        Cancelled => "cancelled",
    }
}

wire_enum! {
    /// How a database backup was created.
    pub enum BackupType {
        /// Requested by a user.
        Manual => "manual",
        /// Taken on the automatic schedule.
        Automatic => "automatic",
    }
}

/// Deserializes `null` as `T::default()`.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Validates and percent-encodes an identifier embedded in a path.
///
/// `.` and `..` are rejected because URL resolution treats them as dot
/// segments, escaped or not.
pub(crate) fn path_segment<'a>(field: &str, value: &'a str) -> Result<Cow<'a, str>, Error> {
    if value.is_empty() {
        return Err(ValidationError::new(field, "must not be empty").into());
    }
    if value == "." || value == ".." {
        return Err(ValidationError::new(field, "must not be a dot segment").into());
    }
    Ok(urlencoding::encode(value))
}

/// Options for list operations.
///
/// Only the fields that are set are sent.
///
/// # Example
///
/// ```rust
/// use sevalla_api::rest::resources::ListOptions;
///
/// let options = ListOptions::new().page(2).per_page(50).company_id("c-1");
/// assert_eq!(
///     serde_urlencoded::to_string(&options).unwrap(),
///     "page=2&per_page=50&company_id=c-1"
/// );
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListOptions {
    /// 1-based page number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// Items per page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
    /// Field to sort by.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    /// Sort direction, `asc` or `desc`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
    /// Restrict results to one company.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_id: Option<String>,
}

impl ListOptions {
    /// Creates empty options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the page number.
    #[must_use]
    pub const fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Sets the page size.
    #[must_use]
    pub const fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = Some(per_page);
        self
    }

    /// Sets the sort field.
    #[must_use]
    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    /// Sets the sort direction.
    #[must_use]
    pub fn order(mut self, order: impl Into<String>) -> Self {
        self.order = Some(order.into());
        self
    }

    /// Sets the company filter.
    #[must_use]
    pub fn company_id(mut self, company_id: impl Into<String>) -> Self {
        self.company_id = Some(company_id.into());
        self
    }
}

/// Options for application log retrieval.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogOptions {
    /// Number of trailing lines to return.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lines: Option<u32>,
}

impl LogOptions {
    /// Requests the last `lines` lines.
    #[must_use]
    pub const fn lines(lines: u32) -> Self {
        Self { lines: Some(lines) }
    }
}

/// Options for usage metrics.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageOptions {
    /// Reporting period, for example `day`, `week` or `month`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
}

impl UsageOptions {
    /// Requests metrics for a period.
    #[must_use]
    pub fn period(period: impl Into<String>) -> Self {
        Self {
            period: Some(period.into()),
        }
    }
}

/// Resource usage metrics for an application or a database.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Usage {
    /// The application measured, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_id: Option<String>,
    /// The database measured, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_id: Option<String>,
    /// The reporting period.
    #[serde(deserialize_with = "null_as_default")]
    pub period: String,
    /// CPU usage.
    #[serde(deserialize_with = "null_as_default")]
    pub cpu_usage: f64,
    /// Memory usage.
    #[serde(deserialize_with = "null_as_default")]
    pub memory_usage: f64,
    /// Storage usage.
    #[serde(deserialize_with = "null_as_default")]
    pub storage_usage: f64,
    /// Bytes transferred.
    #[serde(deserialize_with = "null_as_default")]
    pub bandwidth_bytes: i64,
    /// Requests served.
    #[serde(deserialize_with = "null_as_default")]
    pub request_count: i64,
    /// Start of the period.
    pub start_time: Option<DateTime<Utc>>,
    /// End of the period.
    pub end_time: Option<DateTime<Utc>>,
}

/// Body of the log endpoints.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct LogsBody {
    #[serde(deserialize_with = "null_as_default")]
    pub logs: String,
}

/// Body of the single-flag toggle endpoints.
#[derive(Debug, Serialize)]
pub(crate) struct EnabledBody {
    pub enabled: bool,
}

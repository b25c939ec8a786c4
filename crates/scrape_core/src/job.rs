use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Opaque, server-assigned job identifier.
pub type JobId = String;

/// Lifecycle of a remote scrape job: pending -> in_progress -> completed | failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Failed,
    /// A status string this client does not know about.
    #[serde(other)]
    Unknown,
}

impl JobStatus {
    /// No further transitions happen after a terminal status.
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }

    pub fn is_active(self) -> bool {
        matches!(self, JobStatus::Pending | JobStatus::InProgress)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::InProgress => "in_progress",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
            JobStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Client-side view of one job.
///
/// `url` and `created_at` are set locally when the job is submitted; the server
/// read endpoint does not return them. Every other field the server sends is
/// kept in `fields` and written back out unchanged.
///
/// A payload without `status` reads as pending but does not count as
/// reporting one; see [`JobRecord::has_status`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "WireJobRecord")]
pub struct JobRecord {
    pub job_id: JobId,
    pub status: JobStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(rename = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
    #[serde(skip)]
    status_reported: bool,
}

#[derive(Deserialize)]
struct WireJobRecord {
    job_id: JobId,
    #[serde(default)]
    status: Option<JobStatus>,
    #[serde(default)]
    url: Option<String>,
    #[serde(rename = "createdAt", default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

impl From<WireJobRecord> for JobRecord {
    fn from(wire: WireJobRecord) -> Self {
        Self {
            job_id: wire.job_id,
            status: wire.status.unwrap_or_default(),
            url: wire.url,
            created_at: wire.created_at,
            fields: wire.fields,
            status_reported: wire.status.is_some(),
        }
    }
}

impl JobRecord {
    pub fn new(job_id: impl Into<JobId>, status: JobStatus) -> Self {
        Self {
            job_id: job_id.into(),
            status,
            url: None,
            created_at: None,
            fields: Map::new(),
            status_reported: true,
        }
    }

    /// False for a server payload that carried no `status` field.
    pub fn has_status(&self) -> bool {
        self.status_reported
    }

    /// Shallow merge: every field present in `fresh` overwrites ours, fields
    /// absent from `fresh` are left alone. `job_id` is the identity and is
    /// never rewritten.
    pub fn merge_from(&mut self, fresh: &JobRecord) {
        if fresh.status_reported {
            self.status = fresh.status;
            self.status_reported = true;
        }
        if let Some(url) = &fresh.url {
            self.url = Some(url.clone());
        }
        if let Some(created_at) = fresh.created_at {
            self.created_at = Some(created_at);
        }
        for (key, value) in &fresh.fields {
            self.fields.insert(key.clone(), value.clone());
        }
    }

    pub fn message(&self) -> Option<&str> {
        self.fields.get("message").and_then(Value::as_str)
    }

    pub fn output_directory(&self) -> Option<&str> {
        self.fields.get("output_directory").and_then(Value::as_str)
    }

    pub fn total_pages_scraped(&self) -> u64 {
        self.fields
            .get("total_pages_scraped")
            .and_then(Value::as_u64)
            .unwrap_or(0)
    }

    pub fn errors(&self) -> Vec<String> {
        self.typed_field("errors").unwrap_or_default()
    }

    pub fn pages(&self) -> Vec<PageData> {
        self.typed_field("pages").unwrap_or_default()
    }

    pub fn sitemap(&self) -> Option<SitemapData> {
        self.typed_field("sitemap")
    }

    /// Flat JSON object form, as used by exports.
    pub fn to_json_object(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }

    // Null and malformed values read as absent.
    fn typed_field<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.fields
            .get(key)
            .filter(|value| !value.is_null())
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ImageData {
    pub url: String,
    #[serde(default)]
    pub alt_text: Option<String>,
    #[serde(default)]
    pub downloaded_path: Option<String>,
}

/// One scraped page as reported by a completed job.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PageData {
    pub url: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub clean_text: String,
    #[serde(default)]
    pub images: Vec<ImageData>,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
    #[serde(default)]
    pub scraped_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SitemapData {
    #[serde(default)]
    pub total_urls: u64,
    #[serde(default)]
    pub urls: Vec<String>,
    #[serde(default)]
    pub structure: BTreeMap<String, Vec<String>>,
}

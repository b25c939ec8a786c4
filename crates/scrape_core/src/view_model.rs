use chrono::{DateTime, Utc};

use crate::{JobId, JobStatus};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JobsViewModel {
    pub jobs: Vec<JobRowView>,
    pub active_count: usize,
    pub completed_count: usize,
    pub failed_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRowView {
    pub job_id: JobId,
    pub url: String,
    pub domain: String,
    pub status: JobStatus,
    pub created_at: Option<DateTime<Utc>>,
    pub message: Option<String>,
    pub pages_scraped: u64,
}

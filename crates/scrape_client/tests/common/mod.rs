#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use scrape_client::{
    ApiError, ApiFailureKind, HealthResponse, JobListResponse, JobService, RetryRequest,
};
use scrape_core::{JobRecord, JobStatus, ScrapeRequest};
use serde_json::Map;

/// In-memory service answering from per-operation scripts.
///
/// Status reads are scripted per job id; the last scripted answer repeats, so
/// a loop that keeps reading past the end of its script is still counted.
#[derive(Default)]
pub struct ScriptedService {
    health: Mutex<VecDeque<Result<HealthResponse, ApiError>>>,
    creates: Mutex<VecDeque<Result<JobRecord, ApiError>>>,
    reads: Mutex<HashMap<String, VecDeque<Result<JobRecord, ApiError>>>>,
    lists: Mutex<VecDeque<Result<JobListResponse, ApiError>>>,
    deletes: Mutex<VecDeque<Result<(), ApiError>>>,
    retries: Mutex<VecDeque<Result<JobRecord, ApiError>>>,
    read_counts: Mutex<HashMap<String, usize>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_health(&self, answer: Result<HealthResponse, ApiError>) {
        self.health.lock().unwrap().push_back(answer);
    }

    pub fn push_create(&self, answer: Result<JobRecord, ApiError>) {
        self.creates.lock().unwrap().push_back(answer);
    }

    pub fn push_read(&self, job_id: &str, answer: Result<JobRecord, ApiError>) {
        self.reads
            .lock()
            .unwrap()
            .entry(job_id.to_string())
            .or_default()
            .push_back(answer);
    }

    pub fn push_statuses(&self, job_id: &str, statuses: &[JobStatus]) {
        for status in statuses {
            self.push_read(job_id, Ok(job(job_id, *status)));
        }
    }

    pub fn push_list(&self, answer: Result<JobListResponse, ApiError>) {
        self.lists.lock().unwrap().push_back(answer);
    }

    pub fn push_delete(&self, answer: Result<(), ApiError>) {
        self.deletes.lock().unwrap().push_back(answer);
    }

    pub fn push_retry(&self, answer: Result<JobRecord, ApiError>) {
        self.retries.lock().unwrap().push_back(answer);
    }

    pub fn read_count(&self, job_id: &str) -> usize {
        self.read_counts
            .lock()
            .unwrap()
            .get(job_id)
            .copied()
            .unwrap_or(0)
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record_call(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

fn next<T>(queue: &Mutex<VecDeque<Result<T, ApiError>>>, what: &str) -> Result<T, ApiError> {
    queue
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or_else(|| Err(unscripted(what)))
}

fn unscripted(what: &str) -> ApiError {
    ApiError::new(ApiFailureKind::Network, format!("no scripted answer for {what}"))
}

#[async_trait::async_trait]
impl JobService for ScriptedService {
    async fn health(&self) -> Result<HealthResponse, ApiError> {
        self.record_call("health".to_string());
        next(&self.health, "health")
    }

    async fn create_job(&self, request: &ScrapeRequest) -> Result<JobRecord, ApiError> {
        self.record_call(format!("create {}", request.url));
        next(&self.creates, "create")
    }

    async fn get_job(&self, job_id: &str) -> Result<JobRecord, ApiError> {
        self.record_call(format!("read {job_id}"));
        *self
            .read_counts
            .lock()
            .unwrap()
            .entry(job_id.to_string())
            .or_default() += 1;
        let mut reads = self.reads.lock().unwrap();
        let Some(script) = reads.get_mut(job_id) else {
            return Err(unscripted(job_id));
        };
        if script.len() > 1 {
            script.pop_front().unwrap()
        } else {
            script
                .front()
                .cloned()
                .unwrap_or_else(|| Err(unscripted(job_id)))
        }
    }

    async fn delete_job(&self, job_id: &str) -> Result<(), ApiError> {
        self.record_call(format!("delete {job_id}"));
        next(&self.deletes, "delete")
    }

    async fn list_jobs(&self) -> Result<JobListResponse, ApiError> {
        self.record_call("list".to_string());
        next(&self.lists, "list")
    }

    async fn retry_urls(&self, request: &RetryRequest) -> Result<JobRecord, ApiError> {
        self.record_call(format!("retry {} {}", request.job_id, request.urls.join(" ")));
        next(&self.retries, "retry")
    }
}

pub fn job(job_id: &str, status: JobStatus) -> JobRecord {
    JobRecord::new(job_id, status)
}

pub fn summary(job_id: &str, status: JobStatus, url: &str) -> JobRecord {
    let mut record = JobRecord::new(job_id, status);
    record.url = Some(url.to_string());
    record
}

pub fn http_error(code: u16, detail: Option<&str>) -> ApiError {
    ApiError::new(ApiFailureKind::HttpStatus(code), format!("status {code}"))
        .with_detail(detail.map(ToOwned::to_owned))
}

pub fn healthy(status: &str) -> HealthResponse {
    HealthResponse {
        status: status.to_string(),
        extra: Map::new(),
    }
}

pub fn request(url: &str) -> ScrapeRequest {
    ScrapeRequest::new(url, "token-0123456789")
}

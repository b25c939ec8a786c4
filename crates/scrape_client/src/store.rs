use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::Utc;
use futures_util::future::try_join_all;
use scrape_core::{JobCollection, JobId, JobRecord, JobsViewModel, ScrapeRequest};
use scrape_logging::{scrape_debug, scrape_error, scrape_info, scrape_warn};
use tokio_util::sync::CancellationToken;

use crate::poll::{NewPoll, PollRegistry, Registration};
use crate::{lock, ApiError, JobService, PollHandle, PollOutcome, RetryRequest, DEFAULT_POLL_INTERVAL};

/// Shown when a failed create call carries no server detail.
pub const START_FAILED_FALLBACK: &str = "Failed to start scraping";

#[derive(Debug, Default)]
struct StoreState {
    jobs: JobCollection,
    current_job: Option<JobId>,
    is_api_healthy: bool,
    is_loading: bool,
    error: Option<String>,
}

/// Client-side source of truth for known jobs.
///
/// Every call to the remote service goes through here, and the store keeps its
/// collection in step with the answers. Clones share the same state.
///
/// A status read and the merge of its answer are separate steps: a job deleted
/// in between is simply not updated. The state lock is never held across an
/// `.await`.
#[derive(Clone)]
pub struct JobStore {
    service: Arc<dyn JobService>,
    state: Arc<Mutex<StoreState>>,
    polls: Arc<PollRegistry>,
    poll_interval: Duration,
}

impl JobStore {
    pub fn new(service: Arc<dyn JobService>) -> Self {
        Self {
            service,
            state: Arc::new(Mutex::new(StoreState::default())),
            polls: Arc::new(PollRegistry::default()),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Interval used for the polling that submissions and retries start.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Updates `is_api_healthy`. Failures only read as unhealthy.
    pub async fn check_api_health(&self) {
        let healthy = match self.service.health().await {
            Ok(response) => response.is_healthy(),
            Err(err) => {
                scrape_warn!("API health check failed: {}", err);
                false
            }
        };
        self.state().is_api_healthy = healthy;
    }

    /// Submits a scrape job and starts polling it in the background.
    ///
    /// The returned record is already at the front of the collection. The poll
    /// loop is detached: its result is only observable through the store (or
    /// [`JobStore::poll_handle`]). On failure `error` holds the server detail
    /// or [`START_FAILED_FALLBACK`] and the collection is untouched.
    pub async fn start_scraping(&self, request: ScrapeRequest) -> Result<JobRecord, ApiError> {
        {
            let mut state = self.state();
            state.is_loading = true;
            state.error = None;
        }

        let created = self.create_job(&request).await;

        let mut state = self.state();
        state.is_loading = false;
        match created {
            Ok(mut job) => {
                job.url = Some(request.url);
                job.created_at = Some(Utc::now());
                state.jobs.insert_front(job.clone());
                drop(state);

                scrape_info!("Started job {} for {}", job.job_id, job.url.as_deref().unwrap_or(""));
                self.poll_job_status(&job.job_id, self.poll_interval);
                Ok(job)
            }
            Err(err) => {
                scrape_error!("Failed to start scraping {}: {}", request.url, err);
                state.error = Some(err.detail_or(START_FAILED_FALLBACK));
                Err(err)
            }
        }
    }

    async fn create_job(&self, request: &ScrapeRequest) -> Result<JobRecord, ApiError> {
        request.validate()?;
        self.service.create_job(request).await
    }

    /// Reads a job and merges the answer into the local record, if there is
    /// one. The server's record is returned either way.
    pub async fn get_job_status(&self, job_id: &str) -> Result<JobRecord, ApiError> {
        match self.service.get_job(job_id).await {
            Ok(job) => {
                self.state().jobs.merge(job_id, &job);
                Ok(job)
            }
            Err(err) => {
                scrape_error!("Failed to get job status for {}: {}", job_id, err);
                Err(err)
            }
        }
    }

    /// Polls `job_id` every `interval` until it is completed or failed.
    ///
    /// The next read is scheduled only once the previous one has finished. A
    /// failed read ends the loop. If a live loop already polls this job, a
    /// handle to it is returned and no second loop starts. Must be called
    /// from within a Tokio runtime.
    pub fn poll_job_status(&self, job_id: &str, interval: Duration) -> PollHandle {
        let NewPoll {
            handle,
            generation,
            report,
        } = match self.polls.register(job_id) {
            Registration::Existing(handle) => {
                scrape_debug!("Job {} is already being polled", job_id);
                return handle;
            }
            Registration::New(poll) => poll,
        };

        let store = self.clone();
        let token = handle.token().clone();
        let job_id = job_id.to_string();
        tokio::spawn(async move {
            let outcome = store.run_poll_loop(&job_id, interval, &token).await;
            store.polls.finish(&job_id, generation);
            let _ = report.send(Some(outcome));
        });
        handle
    }

    async fn run_poll_loop(
        &self,
        job_id: &str,
        interval: Duration,
        token: &CancellationToken,
    ) -> PollOutcome {
        loop {
            let read = tokio::select! {
                biased;
                _ = token.cancelled() => return PollOutcome::Cancelled,
                read = self.get_job_status(job_id) => read,
            };
            match read {
                Ok(job) if job.status.is_terminal() => {
                    scrape_info!("Job {} finished: {}", job_id, job.status);
                    return PollOutcome::Terminal(job.status);
                }
                Ok(job) => scrape_debug!("Job {} is {}", job_id, job.status),
                Err(err) => {
                    scrape_error!("Polling error for job {}: {}", job_id, err);
                    return PollOutcome::Failed(err.to_string());
                }
            }

            tokio::select! {
                biased;
                _ = token.cancelled() => return PollOutcome::Cancelled,
                _ = tokio::time::sleep(interval) => {}
            }
        }
    }

    /// Handle to the live poll loop for `job_id`, if any.
    pub fn poll_handle(&self, job_id: &str) -> Option<PollHandle> {
        self.polls.get(job_id)
    }

    /// Stops the poll loop for `job_id`. Returns false when none was running.
    pub fn cancel_poll(&self, job_id: &str) -> bool {
        self.polls.cancel(job_id)
    }

    pub fn cancel_all_polls(&self) {
        self.polls.cancel_all();
    }

    /// Job ids with a live poll loop, sorted.
    pub fn active_polls(&self) -> Vec<JobId> {
        self.polls.active()
    }

    /// Replaces the collection with a detailed read of every job the server
    /// lists, in list order. Any failure leaves the collection as it was.
    pub async fn load_all_jobs(&self) {
        match self.fetch_all_jobs().await {
            Ok(jobs) => {
                scrape_info!("Loaded {} jobs", jobs.len());
                self.state().jobs.replace_all(jobs);
            }
            Err(err) => scrape_error!("Failed to load jobs: {}", err),
        }
    }

    async fn fetch_all_jobs(&self) -> Result<Vec<JobRecord>, ApiError> {
        let listing = self.service.list_jobs().await?;
        // Read directly: the collection is only touched once every read succeeded.
        let details = try_join_all(
            listing
                .jobs
                .iter()
                .map(|summary| self.service.get_job(&summary.job_id)),
        )
        .await?;

        // The summary carries the url, which the detail read does not.
        Ok(listing
            .jobs
            .into_iter()
            .zip(details)
            .map(|(mut summary, detail)| {
                summary.merge_from(&detail);
                summary
            })
            .collect())
    }

    /// Deletes the job remotely, then locally. Its poll loop, if any, stops.
    pub async fn delete_job(&self, job_id: &str) -> Result<(), ApiError> {
        if let Err(err) = self.service.delete_job(job_id).await {
            scrape_error!("Failed to delete job {}: {}", job_id, err);
            return Err(err);
        }

        self.polls.cancel(job_id);
        let mut state = self.state();
        state.jobs.remove(job_id);
        if state.current_job.as_deref() == Some(job_id) {
            state.current_job = None;
        }
        scrape_info!("Deleted job {}", job_id);
        Ok(())
    }

    /// Asks the service to scrape `urls` of `job_id` again and resumes polling.
    pub async fn retry_failed_urls(
        &self,
        job_id: &str,
        urls: Vec<String>,
    ) -> Result<JobRecord, ApiError> {
        let request = RetryRequest {
            job_id: job_id.to_string(),
            urls,
        };
        match self.service.retry_urls(&request).await {
            Ok(job) => {
                scrape_info!("Retrying {} urls of job {}", request.urls.len(), job_id);
                self.poll_job_status(job_id, self.poll_interval);
                Ok(job)
            }
            Err(err) => {
                scrape_error!("Failed to retry URLs for job {}: {}", job_id, err);
                Err(err)
            }
        }
    }

    pub fn jobs(&self) -> Vec<JobRecord> {
        self.state().jobs.to_vec()
    }

    pub fn job(&self, job_id: &str) -> Option<JobRecord> {
        self.state().jobs.get(job_id).cloned()
    }

    /// Pending and in-progress jobs.
    pub fn active_jobs(&self) -> Vec<JobRecord> {
        self.state().jobs.active().into_iter().cloned().collect()
    }

    pub fn completed_jobs(&self) -> Vec<JobRecord> {
        self.state().jobs.completed().into_iter().cloned().collect()
    }

    pub fn failed_jobs(&self) -> Vec<JobRecord> {
        self.state().jobs.failed().into_iter().cloned().collect()
    }

    pub fn view(&self) -> JobsViewModel {
        self.state().jobs.view()
    }

    pub fn select_job(&self, job_id: Option<JobId>) {
        self.state().current_job = job_id;
    }

    /// The selected job, if it is still in the collection.
    pub fn current_job(&self) -> Option<JobRecord> {
        let state = self.state();
        let job_id = state.current_job.as_deref()?;
        state.jobs.get(job_id).cloned()
    }

    pub fn is_api_healthy(&self) -> bool {
        self.state().is_api_healthy
    }

    pub fn is_loading(&self) -> bool {
        self.state().is_loading
    }

    pub fn error(&self) -> Option<String> {
        self.state().error.clone()
    }

    fn state(&self) -> MutexGuard<'_, StoreState> {
        lock(&self.state)
    }
}

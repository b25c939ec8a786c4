use crate::view_model::{JobRowView, JobsViewModel};
use crate::{get_domain_from_url, JobRecord, JobStatus};

/// Ordered job collection, most recent first.
///
/// Holds at most one record per `job_id`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct JobCollection {
    jobs: Vec<JobRecord>,
}

impl JobCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &JobRecord> {
        self.jobs.iter()
    }

    pub fn get(&self, job_id: &str) -> Option<&JobRecord> {
        self.jobs.iter().find(|job| job.job_id == job_id)
    }

    pub fn to_vec(&self) -> Vec<JobRecord> {
        self.jobs.clone()
    }

    /// Inserts at the front. A record already held under the same id is dropped.
    pub fn insert_front(&mut self, record: JobRecord) {
        self.jobs.retain(|job| job.job_id != record.job_id);
        self.jobs.insert(0, record);
    }

    /// Merges `fresh` into the record held under `job_id`. Returns false when
    /// no such record exists; nothing is inserted in that case.
    pub fn merge(&mut self, job_id: &str, fresh: &JobRecord) -> bool {
        match self.jobs.iter_mut().find(|job| job.job_id == job_id) {
            Some(existing) => {
                existing.merge_from(fresh);
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, job_id: &str) -> Option<JobRecord> {
        let index = self.jobs.iter().position(|job| job.job_id == job_id)?;
        Some(self.jobs.remove(index))
    }

    /// Replaces everything, keeping the given order. Later duplicates of an id
    /// are discarded.
    pub fn replace_all(&mut self, records: Vec<JobRecord>) {
        let mut jobs: Vec<JobRecord> = Vec::with_capacity(records.len());
        for record in records {
            if !jobs.iter().any(|job| job.job_id == record.job_id) {
                jobs.push(record);
            }
        }
        self.jobs = jobs;
    }

    pub fn active(&self) -> Vec<&JobRecord> {
        self.filter(JobStatus::is_active)
    }

    pub fn completed(&self) -> Vec<&JobRecord> {
        self.filter(|status| status == JobStatus::Completed)
    }

    pub fn failed(&self) -> Vec<&JobRecord> {
        self.filter(|status| status == JobStatus::Failed)
    }

    fn filter(&self, keep: impl Fn(JobStatus) -> bool) -> Vec<&JobRecord> {
        self.jobs.iter().filter(|job| keep(job.status)).collect()
    }

    pub fn view(&self) -> JobsViewModel {
        JobsViewModel {
            jobs: self.jobs.iter().map(JobRowView::from_record).collect(),
            active_count: self.active().len(),
            completed_count: self.completed().len(),
            failed_count: self.failed().len(),
        }
    }
}

impl JobRowView {
    fn from_record(record: &JobRecord) -> Self {
        let url = record.url.clone().unwrap_or_default();
        Self {
            job_id: record.job_id.clone(),
            domain: if url.is_empty() {
                String::new()
            } else {
                get_domain_from_url(&url)
            },
            url,
            status: record.status,
            created_at: record.created_at,
            message: record.message().map(ToOwned::to_owned),
            pages_scraped: record.total_pages_scraped(),
        }
    }
}

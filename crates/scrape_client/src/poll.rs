use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use scrape_core::{JobId, JobStatus};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::lock;

/// How a polling loop ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// The job reached `completed` or `failed`.
    Terminal(JobStatus),
    /// A status read failed; the loop does not retry.
    Failed(String),
    Cancelled,
}

/// Handle to a background polling loop.
///
/// Dropping the handle does not stop the loop; call [`PollHandle::cancel`].
/// Several handles may refer to the same loop.
#[derive(Debug, Clone)]
pub struct PollHandle {
    job_id: JobId,
    token: CancellationToken,
    outcome: watch::Receiver<Option<PollOutcome>>,
}

impl PollHandle {
    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.borrow().is_some()
    }

    /// The outcome, if the loop has ended.
    pub fn outcome(&self) -> Option<PollOutcome> {
        self.outcome.borrow().clone()
    }

    /// Waits for the loop to end.
    pub async fn finished(&mut self) -> PollOutcome {
        match self.outcome.wait_for(Option::is_some).await {
            Ok(outcome) => (*outcome).clone().unwrap_or(PollOutcome::Cancelled),
            // The loop task went away without reporting (runtime shutdown).
            Err(_) => PollOutcome::Cancelled,
        }
    }

    pub(crate) fn token(&self) -> &CancellationToken {
        &self.token
    }
}

pub(crate) enum Registration {
    /// A live loop already polls this job.
    Existing(PollHandle),
    New(NewPoll),
}

pub(crate) struct NewPoll {
    pub(crate) handle: PollHandle,
    pub(crate) generation: u64,
    pub(crate) report: watch::Sender<Option<PollOutcome>>,
}

struct PollEntry {
    generation: u64,
    handle: PollHandle,
}

/// In-flight polling loops keyed by job id; at most one live loop per job.
#[derive(Default)]
pub(crate) struct PollRegistry {
    next_generation: AtomicU64,
    entries: Mutex<HashMap<JobId, PollEntry>>,
}

impl PollRegistry {
    pub(crate) fn register(&self, job_id: &str) -> Registration {
        let mut entries = lock(&self.entries);
        if let Some(entry) = entries.get(job_id) {
            if !entry.handle.is_cancelled() && !entry.handle.is_finished() {
                return Registration::Existing(entry.handle.clone());
            }
        }

        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        let (report, outcome) = watch::channel(None);
        let handle = PollHandle {
            job_id: job_id.to_string(),
            token: CancellationToken::new(),
            outcome,
        };
        entries.insert(
            job_id.to_string(),
            PollEntry {
                generation,
                handle: handle.clone(),
            },
        );
        Registration::New(NewPoll {
            handle,
            generation,
            report,
        })
    }

    /// Called by a loop on exit. A newer loop registered under the same id is
    /// left alone.
    pub(crate) fn finish(&self, job_id: &str, generation: u64) {
        let mut entries = lock(&self.entries);
        if entries
            .get(job_id)
            .is_some_and(|entry| entry.generation == generation)
        {
            entries.remove(job_id);
        }
    }

    pub(crate) fn get(&self, job_id: &str) -> Option<PollHandle> {
        lock(&self.entries)
            .get(job_id)
            .filter(|entry| !entry.handle.is_cancelled())
            .map(|entry| entry.handle.clone())
    }

    pub(crate) fn cancel(&self, job_id: &str) -> bool {
        match lock(&self.entries).get(job_id) {
            Some(entry) if !entry.handle.is_cancelled() => {
                entry.handle.cancel();
                true
            }
            _ => false,
        }
    }

    pub(crate) fn cancel_all(&self) {
        for entry in lock(&self.entries).values() {
            entry.handle.cancel();
        }
    }

    pub(crate) fn active(&self) -> Vec<JobId> {
        let mut ids: Vec<JobId> = lock(&self.entries)
            .iter()
            .filter(|(_, entry)| !entry.handle.is_cancelled() && !entry.handle.is_finished())
            .map(|(id, _)| id.clone())
            .collect();
        ids.sort();
        ids
    }
}

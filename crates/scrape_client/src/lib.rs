//! Scrape client: remote job service access, the job store and its polling,
//! notifications and file/clipboard side effects.
mod clipboard;
mod debounce;
mod export;
mod notify;
mod persist;
mod poll;
mod service;
mod settings;
mod store;
mod types;

use std::sync::{Mutex, MutexGuard, PoisonError};

pub use clipboard::{copy_to_clipboard, Clipboard, CommandClipboard};
pub use debounce::Debounce;
pub use export::{
    download_csv, download_json, export_job, export_jobs, job_export_filename, ExportError,
    ExportFormat, DEFAULT_CSV_FILENAME, DEFAULT_JSON_FILENAME,
};
pub use notify::Notifications;
pub use persist::{ensure_dir, save_file, PersistError};
pub use poll::{PollHandle, PollOutcome};
pub use service::{JobService, ReqwestJobService};
pub use settings::{
    resolve_base_url, ApiSettings, API_URL_ENV, DEFAULT_API_PREFIX, DEFAULT_ORIGIN,
    DEFAULT_POLL_INTERVAL,
};
pub use store::{JobStore, START_FAILED_FALLBACK};
pub use types::{ApiError, ApiFailureKind, HealthResponse, JobListResponse, RetryRequest};

// State behind these locks stays consistent even if a holder panicked.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

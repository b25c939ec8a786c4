use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use scrape_core::{to_csv, to_pretty_json, url_to_directory_name, JobRecord, PageData};
use scrape_logging::scrape_info;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::persist::{save_file, PersistError};

pub const DEFAULT_JSON_FILENAME: &str = "data.json";
pub const DEFAULT_CSV_FILENAME: &str = "data.csv";

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("persist error: {0}")]
    Persist(#[from] PersistError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn default_filename(self) -> &'static str {
        match self {
            ExportFormat::Json => DEFAULT_JSON_FILENAME,
            ExportFormat::Csv => DEFAULT_CSV_FILENAME,
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::Csv => write!(f, "csv"),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            other => Err(format!("unknown export format {other:?} (expected json or csv)")),
        }
    }
}

/// Saves `data` as pretty JSON to `{dir}/{filename}`.
pub fn download_json<T: Serialize + ?Sized>(
    data: &T,
    dir: &Path,
    filename: &str,
) -> Result<PathBuf, ExportError> {
    let json = to_pretty_json(data)?;
    let path = save_file(dir, filename, json.as_bytes())?;
    scrape_info!("Saved JSON export to {:?}", path);
    Ok(path)
}

/// Saves flat records as CSV to `{dir}/{filename}`. No records give an empty file.
pub fn download_csv(
    records: &[Map<String, Value>],
    dir: &Path,
    filename: &str,
) -> Result<PathBuf, ExportError> {
    let csv = to_csv(records);
    let path = save_file(dir, filename, csv.as_bytes())?;
    scrape_info!("Saved CSV export ({} rows) to {:?}", records.len(), path);
    Ok(path)
}

/// Exports job records in `format`, named `filename` or the format's default.
pub fn export_jobs(
    jobs: &[JobRecord],
    format: ExportFormat,
    dir: &Path,
    filename: Option<&str>,
) -> Result<PathBuf, ExportError> {
    let filename = filename.unwrap_or(format.default_filename());
    match format {
        ExportFormat::Json => download_json(jobs, dir, filename),
        ExportFormat::Csv => {
            let records: Vec<Map<String, Value>> =
                jobs.iter().map(JobRecord::to_json_object).collect();
            download_csv(&records, dir, filename)
        }
    }
}

/// Default export name for one job: its site as a directory-safe name, or the
/// job id when the job has no url.
pub fn job_export_filename(job: &JobRecord, format: ExportFormat) -> String {
    let stem = job
        .url
        .as_deref()
        .map(url_to_directory_name)
        .filter(|name| !name.trim_matches('.').is_empty())
        .unwrap_or_else(|| job.job_id.clone());
    format!("{stem}.{format}")
}

/// Exports a single job. JSON holds the whole record; CSV has one row per
/// scraped page.
pub fn export_job(
    job: &JobRecord,
    format: ExportFormat,
    dir: &Path,
    filename: Option<&str>,
) -> Result<PathBuf, ExportError> {
    let filename = match filename {
        Some(name) => name.to_string(),
        None => job_export_filename(job, format),
    };
    match format {
        ExportFormat::Json => download_json(job, dir, &filename),
        ExportFormat::Csv => {
            let rows: Vec<Map<String, Value>> = job.pages().iter().map(page_row).collect();
            download_csv(&rows, dir, &filename)
        }
    }
}

fn page_row(page: &PageData) -> Map<String, Value> {
    let mut row = Map::new();
    row.insert("url".into(), Value::from(page.url.as_str()));
    row.insert("title".into(), page.title.clone().map_or(Value::Null, Value::from));
    row.insert(
        "word_count".into(),
        Value::from(page.clean_text.split_whitespace().count()),
    );
    row.insert("image_count".into(), Value::from(page.images.len()));
    row.insert(
        "scraped_at".into(),
        page.scraped_at.clone().map_or(Value::Null, Value::from),
    );
    row
}

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use scrape_client::ExportFormat;

/// Command-line client for the scrape job service.
#[derive(Debug, Parser)]
#[command(name = "scrape-client")]
#[command(version)]
#[command(about = "Submit, watch and export remote scrape jobs", long_about = None)]
pub struct Cli {
    /// API base URL (e.g. http://localhost:8000/api/v1)
    #[arg(long = "api-url", env = "SCRAPER_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Directory holding the config file
    #[arg(long = "config-dir", default_value = ".", global = true)]
    pub config_dir: PathBuf,

    /// Poll interval in milliseconds
    #[arg(long = "poll-interval-ms", global = true)]
    pub poll_interval_ms: Option<u64>,

    /// Also write logs to ./scrape_client.log
    #[arg(long = "log-file", global = true)]
    pub log_file: bool,

    /// Enable debug logging
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check whether the service reports itself healthy
    Health,
    /// Submit a new scrape job
    Submit {
        url: String,
        /// Authorization token (falls back to the saved one)
        #[arg(long)]
        token: Option<String>,
        #[arg(long = "max-depth")]
        max_depth: Option<u8>,
        /// Skip image downloads
        #[arg(long = "no-images")]
        no_images: bool,
        /// Keep polling until the job finishes
        #[arg(long)]
        wait: bool,
    },
    /// Show all jobs the service knows about
    List,
    /// Render a route: `/` for the job list, `/job/<id>` for one job
    Open { route: String },
    /// Show one job
    Show { job_id: String },
    /// Delete a job
    Delete { job_id: String },
    /// Scrape some URLs of a job again
    Retry {
        job_id: String,
        #[arg(required = true)]
        urls: Vec<String>,
        #[arg(long)]
        wait: bool,
    },
    /// Poll a job until it completes or fails
    Watch { job_id: String },
    /// Export all jobs, or one job's results, to a file
    Export {
        #[arg(long, default_value = "json")]
        format: ExportFormat,
        /// Export only this job, named after its site by default
        #[arg(long)]
        job: Option<String>,
        /// File name inside the export directory
        #[arg(long)]
        output: Option<String>,
        /// Directory to write to (defaults to the configured one)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
    /// Copy a job's output directory (or its id) to the clipboard
    Copy { job_id: String },
    /// Save settings to the config file
    Config {
        #[arg(long)]
        token: Option<String>,
        #[arg(long = "max-depth")]
        max_depth: Option<u8>,
        #[arg(long = "include-images")]
        include_images: Option<bool>,
        #[arg(long = "export-dir")]
        export_dir: Option<PathBuf>,
    },
}

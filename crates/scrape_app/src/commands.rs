use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use scrape_client::{
    copy_to_clipboard, export_job, export_jobs, CommandClipboard, JobService, JobStore,
    Notifications, PollOutcome, ReqwestJobService,
};
use scrape_core::{JobStatus, Route, ScrapeRequest};
use scrape_logging::scrape_info;

use crate::cli::{Cli, Command};
use crate::config::{load_config, save_config, ClientConfig};
use crate::views::{render_job_detail, render_job_list, render_notification};

/// One command invocation: loaded config, the store and the notification list.
pub struct App {
    config: ClientConfig,
    config_dir: PathBuf,
    store: JobStore,
    notifications: Notifications,
}

impl App {
    /// Builds the app from `cli`: config file first, then env/flags on top.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let mut config = load_config(&cli.config_dir);
        if let Some(interval) = cli.poll_interval_ms {
            config.poll_interval_ms = interval;
        }
        let settings = config.api_settings(cli.api_url.as_deref());
        scrape_info!("Using API at {}", settings.base_url);
        let service = ReqwestJobService::new(settings).context("failed to build HTTP client")?;
        Ok(Self::with_service(
            config,
            cli.config_dir.clone(),
            Arc::new(service),
        ))
    }

    pub fn with_service(
        config: ClientConfig,
        config_dir: PathBuf,
        service: Arc<dyn JobService>,
    ) -> Self {
        let store = JobStore::new(service).with_poll_interval(config.poll_interval());
        Self {
            config,
            config_dir,
            store,
            notifications: Notifications::new(),
        }
    }

    pub fn store(&self) -> &JobStore {
        &self.store
    }

    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    /// Runs `command` and returns the text to print.
    pub async fn run(&mut self, command: Command) -> Result<String> {
        match command {
            Command::Health => self.health().await,
            Command::Submit {
                url,
                token,
                max_depth,
                no_images,
                wait,
            } => {
                let token = token
                    .or_else(|| self.config.authorization_token.clone())
                    .context("no authorization token: pass --token or save one with `config`")?;
                let request = ScrapeRequest::new(url, token)
                    .with_max_depth(max_depth.unwrap_or(self.config.max_depth))
                    .with_images(self.config.include_images && !no_images);
                self.submit(request, wait).await
            }
            Command::List => self.open(&Route::JobList).await,
            Command::Open { route } => match Route::parse(&route) {
                Some(route) => self.open(&route).await,
                None => bail!("no page at {route:?}; try / or /job/<id>"),
            },
            Command::Show { job_id } => self.open(&Route::JobDetail { id: job_id }).await,
            Command::Delete { job_id } => self.delete(&job_id).await,
            Command::Retry { job_id, urls, wait } => self.retry(&job_id, urls, wait).await,
            Command::Watch { job_id } => self.watch(&job_id).await,
            Command::Export {
                format,
                job,
                output,
                dir,
            } => {
                let dir = dir.unwrap_or_else(|| self.config.export_dir.clone());
                let path = match job {
                    Some(job_id) => {
                        let job = self.store.get_job_status(&job_id).await?;
                        let job = self.store.job(&job_id).unwrap_or(job);
                        export_job(&job, format, &dir, output.as_deref())?
                    }
                    None => {
                        self.store.load_all_jobs().await;
                        export_jobs(&self.store.jobs(), format, &dir, output.as_deref())?
                    }
                };
                self.notifications
                    .success(format!("Exported to {}", path.display()), None);
                Ok(String::new())
            }
            Command::Copy { job_id } => {
                let job = self.store.get_job_status(&job_id).await?;
                let text = job.output_directory().unwrap_or(job.job_id.as_str()).to_string();
                if copy_to_clipboard(&CommandClipboard::platform_default(), &text) {
                    self.notifications.success(format!("Copied {text}"), None);
                } else {
                    self.notifications.error("Failed to copy to clipboard", None);
                }
                Ok(String::new())
            }
            Command::Config {
                token,
                max_depth,
                include_images,
                export_dir,
            } => {
                if let Some(token) = token {
                    self.config.authorization_token = Some(token);
                }
                if let Some(depth) = max_depth {
                    self.config.max_depth = depth;
                }
                if let Some(include) = include_images {
                    self.config.include_images = include;
                }
                if let Some(dir) = export_dir {
                    self.config.export_dir = dir;
                }
                let path = save_config(&self.config_dir, &self.config)?;
                self.notifications
                    .success(format!("Saved settings to {}", path.display()), None);
                Ok(String::new())
            }
        }
    }

    async fn health(&self) -> Result<String> {
        self.store.check_api_health().await;
        if self.store.is_api_healthy() {
            Ok("API is healthy\n".to_string())
        } else {
            self.notifications.error("API is not reachable or unhealthy", None);
            Ok(String::new())
        }
    }

    async fn submit(&self, request: ScrapeRequest, wait: bool) -> Result<String> {
        match self.store.start_scraping(request).await {
            Ok(job) => {
                self.notifications
                    .success(format!("Started scraping job {}", job.job_id), None);
                if wait {
                    return self.wait_for(&job.job_id).await;
                }
                Ok(render_job_detail(&job))
            }
            Err(err) => {
                let message = self.store.error().unwrap_or_else(|| err.to_string());
                self.notifications.error(message, None);
                Err(err.into())
            }
        }
    }

    async fn open(&self, route: &Route) -> Result<String> {
        match route {
            Route::JobList => {
                self.store.load_all_jobs().await;
                Ok(render_job_list(&self.store.view()))
            }
            Route::JobDetail { id } => {
                self.store.select_job(Some(id.clone()));
                let job = self.store.get_job_status(id).await?;
                Ok(render_job_detail(&self.store.current_job().unwrap_or(job)))
            }
        }
    }

    async fn delete(&self, job_id: &str) -> Result<String> {
        self.store.delete_job(job_id).await?;
        self.notifications.success(format!("Deleted job {job_id}"), None);
        Ok(String::new())
    }

    async fn retry(&self, job_id: &str, urls: Vec<String>, wait: bool) -> Result<String> {
        let count = urls.len();
        self.store.retry_failed_urls(job_id, urls).await?;
        self.notifications
            .info(format!("Retrying {count} URLs of job {job_id}"), None);
        if wait {
            return self.wait_for(job_id).await;
        }
        Ok(String::new())
    }

    async fn watch(&self, job_id: &str) -> Result<String> {
        self.store.get_job_status(job_id).await?;
        self.store.poll_job_status(job_id, self.store.poll_interval());
        self.wait_for(job_id).await
    }

    async fn wait_for(&self, job_id: &str) -> Result<String> {
        let Some(mut handle) = self.store.poll_handle(job_id) else {
            let job = self.store.get_job_status(job_id).await?;
            return Ok(render_job_detail(&job));
        };

        let canceller = handle.clone();
        let outcome = tokio::select! {
            outcome = handle.finished() => outcome,
            _ = tokio::signal::ctrl_c() => {
                canceller.cancel();
                PollOutcome::Cancelled
            }
        };
        match outcome {
            PollOutcome::Terminal(status) => {
                // Jobs watched without being submitted here are not in the collection.
                let job = match self.store.job(job_id) {
                    Some(job) => job,
                    None => self.store.get_job_status(job_id).await?,
                };
                if status == JobStatus::Failed {
                    self.notifications.error(format!("Job {job_id} failed"), None);
                } else {
                    self.notifications
                        .success(format!("Job {job_id} completed"), None);
                }
                Ok(render_job_detail(&job))
            }
            PollOutcome::Failed(reason) => bail!("stopped polling job {job_id}: {reason}"),
            PollOutcome::Cancelled => {
                self.notifications.warning(format!("Stopped watching job {job_id}"), None);
                Ok(String::new())
            }
        }
    }

    /// Notifications still showing, one per line.
    pub fn drain_notifications(&self) -> Vec<String> {
        let lines = self
            .notifications
            .list()
            .iter()
            .map(render_notification)
            .collect();
        self.notifications.clear();
        lines
    }
}

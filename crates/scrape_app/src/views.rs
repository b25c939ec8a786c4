//! Plain-text renderings of the job list and job detail pages.

use std::fmt::Write;

use scrape_core::{
    calculate_reading_time, format_bytes, format_timestamp, get_domain_from_url, truncate,
    JobRecord, JobsViewModel, Notification, DEFAULT_BYTE_DECIMALS,
};

const PREVIEW_LENGTH: usize = 80;
const ID_WIDTH: usize = 36;

pub fn render_job_list(view: &JobsViewModel) -> String {
    if view.jobs.is_empty() {
        return "No jobs yet.\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} jobs ({} active, {} completed, {} failed)",
        view.jobs.len(),
        view.active_count,
        view.completed_count,
        view.failed_count
    );
    let _ = writeln!(
        out,
        "{:<ID_WIDTH$}  {:<11}  {:<24}  {:<22}  {:>5}",
        "ID", "STATUS", "DOMAIN", "CREATED", "PAGES"
    );
    for row in &view.jobs {
        let created = row
            .created_at
            .map(|ts| format_timestamp(ts, true))
            .unwrap_or_else(|| "N/A".to_string());
        let _ = writeln!(
            out,
            "{:<ID_WIDTH$}  {:<11}  {:<24}  {:<22}  {:>5}",
            row.job_id,
            row.status.as_str(),
            truncate(&row.domain, 21),
            created,
            row.pages_scraped
        );
        if let Some(message) = &row.message {
            let _ = writeln!(out, "    {}", truncate(message, PREVIEW_LENGTH));
        }
    }
    out
}

pub fn render_job_detail(job: &JobRecord) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Job {}", job.job_id);
    let _ = writeln!(out, "  Status:   {}", job.status);
    if let Some(url) = &job.url {
        let _ = writeln!(out, "  URL:      {url}");
        let _ = writeln!(out, "  Domain:   {}", get_domain_from_url(url));
    }
    let created = job
        .created_at
        .map(|ts| format_timestamp(ts, true))
        .unwrap_or_else(|| "N/A".to_string());
    let _ = writeln!(out, "  Created:  {created}");
    if let Some(message) = job.message() {
        let _ = writeln!(out, "  Message:  {message}");
    }
    if let Some(dir) = job.output_directory() {
        let _ = writeln!(out, "  Output:   {dir}");
    }
    let _ = writeln!(out, "  Pages:    {}", job.total_pages_scraped());

    if let Some(sitemap) = job.sitemap() {
        let _ = writeln!(out, "  Sitemap:  {} urls", sitemap.total_urls);
    }

    let pages = job.pages();
    if !pages.is_empty() {
        let _ = writeln!(out, "Scraped pages:");
        for page in &pages {
            let title = page.title.as_deref().unwrap_or("(untitled)");
            let _ = writeln!(
                out,
                "  - {} <{}>, {} min read, {}, {} images",
                title,
                page.url,
                calculate_reading_time(&page.clean_text),
                format_bytes(page.clean_text.len() as u64, DEFAULT_BYTE_DECIMALS),
                page.images.len()
            );
            if !page.clean_text.trim().is_empty() {
                let _ = writeln!(out, "    {}", truncate(page.clean_text.trim(), PREVIEW_LENGTH));
            }
        }
    }

    let errors = job.errors();
    if !errors.is_empty() {
        let _ = writeln!(out, "Failed URLs ({}):", errors.len());
        for url in &errors {
            let _ = writeln!(out, "  - {url}");
        }
    }
    out
}

pub fn render_notification(notification: &Notification) -> String {
    format!("[{}] {}", notification.kind, notification.message)
}

//! Display helpers for job data. All functions are pure.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use url::Url;

pub const DEFAULT_BYTE_DECIMALS: usize = 2;
pub const DEFAULT_TRUNCATE_LENGTH: usize = 100;
pub const WORDS_PER_MINUTE: usize = 200;

const BYTE_UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];
const ELLIPSIS: &str = "...";

/// Formats a date string as `Oct 19, 2026, 02:30 PM` (UTC).
///
/// Empty input gives `N/A`, input that parses as neither RFC 3339, a naive
/// date-time nor a plain `YYYY-MM-DD` date gives `Invalid Date`.
pub fn format_date(input: &str, include_time: bool) -> String {
    let input = input.trim();
    if input.is_empty() {
        return "N/A".to_string();
    }
    match parse_date(input) {
        Some(timestamp) => format_timestamp(timestamp, include_time),
        None => "Invalid Date".to_string(),
    }
}

pub fn format_timestamp(timestamp: DateTime<Utc>, include_time: bool) -> String {
    let pattern = if include_time {
        "%b %-d, %Y, %I:%M %p"
    } else {
        "%b %-d, %Y"
    };
    timestamp.format(pattern).to_string()
}

fn parse_date(input: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(input) {
        return Some(parsed.with_timezone(&Utc));
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, pattern) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Human readable byte size in base 1024, e.g. `1536 -> "1.5 KB"`.
///
/// The scaled value is rounded to `decimals` places and trailing zeros are
/// dropped.
pub fn format_bytes(bytes: u64, decimals: usize) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut unit = 0;
    let mut scaled = bytes;
    while scaled >= 1024 && unit < BYTE_UNITS.len() - 1 {
        scaled /= 1024;
        unit += 1;
    }

    let value = bytes as f64 / 1024f64.powi(unit as i32);
    let rendered = format!("{value:.decimals$}");
    let trimmed = if rendered.contains('.') {
        rendered.trim_end_matches('0').trim_end_matches('.')
    } else {
        rendered.as_str()
    };
    format!("{trimmed} {}", BYTE_UNITS[unit])
}

/// Hostname without a leading `www.`; the input itself when it is not a URL
/// with a host.
pub fn get_domain_from_url(url: &str) -> String {
    let Ok(parsed) = Url::parse(url) else {
        return url.to_string();
    };
    match parsed.host_str() {
        Some(host) if !host.is_empty() => host.strip_prefix("www.").unwrap_or(host).to_string(),
        _ => url.to_string(),
    }
}

/// Cuts `text` to `length` characters and appends `...` when it was longer.
pub fn truncate(text: &str, length: usize) -> String {
    if text.is_empty() {
        return String::new();
    }
    match text.char_indices().nth(length) {
        None => text.to_string(),
        Some((cut, _)) => format!("{}{ELLIPSIS}", &text[..cut]),
    }
}

/// Minutes needed to read `text` at 200 words per minute, rounded up.
pub fn calculate_reading_time(text: &str) -> usize {
    text.split_whitespace().count().div_ceil(WORDS_PER_MINUTE)
}

/// Filesystem-safe name for a URL's site, e.g. `https://www.a.com:8080/x -> a.com_8080`.
pub fn url_to_directory_name(url: &str) -> String {
    let site = match Url::parse(url) {
        Ok(parsed) => match (parsed.host_str(), parsed.port()) {
            (Some(host), Some(port)) => format!("{host}:{port}"),
            (Some(host), None) => host.to_string(),
            (None, _) => url.to_string(),
        },
        Err(_) => url.to_string(),
    };
    let site = site.strip_prefix("www.").unwrap_or(&site);
    site.chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '_' | '-' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

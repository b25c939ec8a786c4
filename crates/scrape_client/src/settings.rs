use std::time::Duration;

pub const DEFAULT_ORIGIN: &str = "http://localhost:8000";
pub const DEFAULT_API_PREFIX: &str = "/api/v1";
/// Environment variable overriding the API base URL.
pub const API_URL_ENV: &str = "SCRAPER_API_URL";
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: format!("{DEFAULT_ORIGIN}{DEFAULT_API_PREFIX}"),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl ApiSettings {
    /// Defaults with `SCRAPER_API_URL` applied when it is set and non-empty.
    pub fn from_env() -> Self {
        Self::default().with_env_override(std::env::var(API_URL_ENV).ok().as_deref())
    }

    pub fn with_env_override(self, value: Option<&str>) -> Self {
        match value.map(str::trim).filter(|v| !v.is_empty()) {
            Some(raw) => self.with_base_url(raw),
            None => self,
        }
    }

    pub fn with_base_url(mut self, raw: &str) -> Self {
        self.base_url = resolve_base_url(raw);
        self
    }
}

/// A base URL starting with `/` is taken relative to [`DEFAULT_ORIGIN`].
/// Trailing slashes are dropped.
pub fn resolve_base_url(raw: &str) -> String {
    let raw = raw.trim().trim_end_matches('/');
    if raw.starts_with('/') || raw.is_empty() {
        format!("{DEFAULT_ORIGIN}{raw}")
    } else {
        raw.to_string()
    }
}

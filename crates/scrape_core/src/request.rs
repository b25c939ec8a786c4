use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

pub const MIN_DEPTH: u8 = 1;
pub const MAX_DEPTH: u8 = 10;
pub const MIN_TOKEN_LEN: usize = 10;

/// Body of a create-job call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeRequest {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_images: Option<bool>,
    pub authorization_token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("invalid url {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("max_depth must be between {MIN_DEPTH} and {MAX_DEPTH}, got {0}")]
    DepthOutOfRange(u8),
    #[error("authorization token must be at least {MIN_TOKEN_LEN} characters")]
    TokenTooShort,
}

impl ScrapeRequest {
    pub fn new(url: impl Into<String>, authorization_token: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_depth: None,
            include_images: None,
            authorization_token: authorization_token.into(),
        }
    }

    pub fn with_max_depth(mut self, depth: u8) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub fn with_images(mut self, include: bool) -> Self {
        self.include_images = Some(include);
        self
    }

    /// Mirrors the checks the service applies, so obviously bad requests never
    /// leave the client.
    pub fn validate(&self) -> Result<(), RequestError> {
        let invalid = |reason: &str| RequestError::InvalidUrl {
            url: self.url.clone(),
            reason: reason.to_string(),
        };
        let parsed = Url::parse(&self.url).map_err(|err| invalid(&err.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid("scheme must be http or https"));
        }
        if parsed.host_str().map_or(true, str::is_empty) {
            return Err(invalid("missing host"));
        }
        if let Some(depth) = self.max_depth {
            if !(MIN_DEPTH..=MAX_DEPTH).contains(&depth) {
                return Err(RequestError::DepthOutOfRange(depth));
            }
        }
        if self.authorization_token.chars().count() < MIN_TOKEN_LEN {
            return Err(RequestError::TokenTooShort);
        }
        Ok(())
    }
}

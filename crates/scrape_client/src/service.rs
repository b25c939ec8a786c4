use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::RequestBuilder;
use scrape_core::{JobRecord, ScrapeRequest};
use scrape_logging::{scrape_debug, scrape_error};
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::{ApiError, ApiFailureKind, ApiSettings, HealthResponse, JobListResponse, RetryRequest};

/// The remote scrape service. Ground truth for job state lives behind this.
#[async_trait::async_trait]
pub trait JobService: Send + Sync {
    async fn health(&self) -> Result<HealthResponse, ApiError>;

    async fn create_job(&self, request: &ScrapeRequest) -> Result<JobRecord, ApiError>;

    async fn get_job(&self, job_id: &str) -> Result<JobRecord, ApiError>;

    async fn delete_job(&self, job_id: &str) -> Result<(), ApiError>;

    async fn list_jobs(&self) -> Result<JobListResponse, ApiError>;

    async fn retry_urls(&self, request: &RetryRequest) -> Result<JobRecord, ApiError>;
}

/// JSON-over-HTTP client for the scrape service.
#[derive(Debug, Clone)]
pub struct ReqwestJobService {
    settings: ApiSettings,
    client: reqwest::Client,
}

impl ReqwestJobService {
    pub fn new(settings: ApiSettings) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::new(ApiFailureKind::Network, err.to_string()))?;

        Ok(Self { settings, client })
    }

    pub fn settings(&self) -> &ApiSettings {
        &self.settings
    }

    /// `{base_url}/{segments...}` with each segment percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let invalid = |reason: String| {
            ApiError::new(
                ApiFailureKind::InvalidUrl,
                format!("{}: {reason}", self.settings.base_url),
            )
        };
        let mut url = Url::parse(&self.settings.base_url).map_err(|err| invalid(err.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| invalid("cannot be a base url".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, builder: RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let response = builder.send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        scrape_debug!("{} {}", status.as_u16(), response.url());
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let detail = extract_detail(&body);
        scrape_error!(
            "API Error: {} {}",
            status,
            detail.as_deref().unwrap_or(body.as_str())
        );
        Err(ApiError::new(ApiFailureKind::HttpStatus(status.as_u16()), status.to_string())
            .with_detail(detail))
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let response = self.send(builder).await?;
        response.json::<T>().await.map_err(|err| {
            scrape_error!("API Error: undecodable response body: {}", err);
            ApiError::new(ApiFailureKind::Decode, err.to_string())
        })
    }
}

#[async_trait::async_trait]
impl JobService for ReqwestJobService {
    async fn health(&self) -> Result<HealthResponse, ApiError> {
        let url = self.endpoint(&["health"])?;
        self.send_json(self.client.get(url)).await
    }

    async fn create_job(&self, request: &ScrapeRequest) -> Result<JobRecord, ApiError> {
        let url = self.endpoint(&["scrape"])?;
        self.send_json(self.client.post(url).json(request)).await
    }

    async fn get_job(&self, job_id: &str) -> Result<JobRecord, ApiError> {
        let url = self.endpoint(&["scrape", job_id])?;
        self.send_json(self.client.get(url)).await
    }

    async fn delete_job(&self, job_id: &str) -> Result<(), ApiError> {
        let url = self.endpoint(&["scrape", job_id])?;
        self.send(self.client.delete(url)).await.map(|_| ())
    }

    async fn list_jobs(&self) -> Result<JobListResponse, ApiError> {
        let url = self.endpoint(&["jobs"])?;
        self.send_json(self.client.get(url)).await
    }

    async fn retry_urls(&self, request: &RetryRequest) -> Result<JobRecord, ApiError> {
        let url = self.endpoint(&["scrape", request.job_id.as_str(), "retry"])?;
        self.send_json(self.client.post(url).json(request)).await
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    scrape_error!("API Error: {}", err);
    if err.is_timeout() {
        return ApiError::new(ApiFailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return ApiError::new(ApiFailureKind::Decode, err.to_string());
    }
    ApiError::new(ApiFailureKind::Network, err.to_string())
}

/// Pulls `detail` out of an error body. Validation errors carry a list of
/// `{msg}` objects instead of a string; their messages are joined.
fn extract_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        Value::String(text) => Some(text.clone()),
        Value::Array(items) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            (!messages.is_empty()).then(|| messages.join("; "))
        }
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

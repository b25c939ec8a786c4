use std::time::Duration;

use pretty_assertions::assert_eq;
use scrape_client::{
    resolve_base_url, ApiFailureKind, ApiSettings, JobService, ReqwestJobService, RetryRequest,
};
use scrape_core::{JobStatus, ScrapeRequest};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn service_for(server: &MockServer) -> ReqwestJobService {
    scrape_logging::initialize_for_tests();
    let settings = ApiSettings::default().with_base_url(&format!("{}/api/v1", server.uri()));
    ReqwestJobService::new(settings).expect("client builds")
}

#[tokio::test]
async fn health_reads_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "healthy",
            "version": "1.0.0"
        })))
        .mount(&server)
        .await;

    let health = service_for(&server).health().await.unwrap();
    assert!(health.is_healthy());
    assert_eq!(health.extra.get("version"), Some(&json!("1.0.0")));
}

#[tokio::test]
async fn create_job_posts_request_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/scrape"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "url": "https://example.com",
            "max_depth": 2,
            "include_images": false,
            "authorization_token": "token-0123456789"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "job_id": "abc",
            "status": "pending",
            "message": "Job created"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = ScrapeRequest::new("https://example.com", "token-0123456789")
        .with_max_depth(2)
        .with_images(false);
    let job = service_for(&server).create_job(&request).await.unwrap();
    assert_eq!(job.job_id, "abc");
    assert_eq!(job.status, JobStatus::Pending);
    assert_eq!(job.message(), Some("Job created"));
}

#[tokio::test]
async fn get_job_decodes_detail_fields() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/scrape/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "job_id": "abc",
            "status": "completed",
            "output_directory": "/data/example_com",
            "total_pages_scraped": 4,
            "errors": ["https://example.com/broken"]
        })))
        .mount(&server)
        .await;

    let job = service_for(&server).get_job("abc").await.unwrap();
    assert_eq!(job.status, JobStatus::Completed);
    assert_eq!(job.output_directory(), Some("/data/example_com"));
    assert_eq!(job.total_pages_scraped(), 4);
    assert_eq!(job.errors(), vec!["https://example.com/broken".to_string()]);
}

#[tokio::test]
async fn error_status_carries_server_detail() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/scrape/missing"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "detail": "Job not found" })),
        )
        .mount(&server)
        .await;

    let err = service_for(&server).get_job("missing").await.unwrap_err();
    assert_eq!(err.kind, ApiFailureKind::HttpStatus(404));
    assert_eq!(err.detail.as_deref(), Some("Job not found"));
}

#[tokio::test]
async fn error_status_without_json_body_has_no_detail() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/scrape/abc"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = service_for(&server).delete_job("abc").await.unwrap_err();
    assert_eq!(err.kind, ApiFailureKind::HttpStatus(500));
    assert_eq!(err.detail, None);
    assert_eq!(err.detail_or("fallback"), "fallback");
}

#[tokio::test]
async fn delete_job_accepts_any_success_body() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/scrape/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "deleted" })))
        .expect(1)
        .mount(&server)
        .await;

    service_for(&server).delete_job("abc").await.unwrap();
}

#[tokio::test]
async fn list_jobs_keeps_server_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/jobs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_jobs": 2,
            "jobs": [
                { "job_id": "b", "status": "in_progress", "url": "https://b.test" },
                { "job_id": "a", "status": "failed", "url": "https://a.test", "message": "boom" }
            ]
        })))
        .mount(&server)
        .await;

    let listing = service_for(&server).list_jobs().await.unwrap();
    assert_eq!(listing.total_jobs, Some(2));
    let ids: Vec<_> = listing.jobs.iter().map(|j| j.job_id.as_str()).collect();
    assert_eq!(ids, vec!["b", "a"]);
    assert_eq!(listing.jobs[0].status, JobStatus::InProgress);
    assert_eq!(listing.jobs[1].url.as_deref(), Some("https://a.test"));
}

#[tokio::test]
async fn retry_posts_to_job_retry_path() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/scrape/abc/retry"))
        .and(body_json(json!({
            "job_id": "abc",
            "urls": ["https://a.test/x", "https://a.test/y"]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "job_id": "abc",
            "status": "pending"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = RetryRequest {
        job_id: "abc".to_string(),
        urls: vec!["https://a.test/x".to_string(), "https://a.test/y".to_string()],
    };
    let job = service_for(&server).retry_urls(&request).await.unwrap();
    assert_eq!(job.status, JobStatus::Pending);
}

#[tokio::test]
async fn undecodable_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/jobs"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = service_for(&server).list_jobs().await.unwrap_err();
    assert_eq!(err.kind, ApiFailureKind::Decode);
}

#[tokio::test]
async fn slow_response_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/health"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "status": "healthy" }))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    scrape_logging::initialize_for_tests();
    let mut settings = ApiSettings::default().with_base_url(&format!("{}/api/v1", server.uri()));
    settings.request_timeout = Duration::from_millis(100);
    let service = ReqwestJobService::new(settings).unwrap();

    let err = service.health().await.unwrap_err();
    assert_eq!(err.kind, ApiFailureKind::Timeout);
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() {
    scrape_logging::initialize_for_tests();
    let settings = ApiSettings::default().with_base_url("http://127.0.0.1:9/api/v1");
    let service = ReqwestJobService::new(settings).unwrap();

    let err = service.health().await.unwrap_err();
    assert!(matches!(
        err.kind,
        ApiFailureKind::Network | ApiFailureKind::Timeout
    ));
}

#[test]
fn base_url_resolution() {
    assert_eq!(resolve_base_url("https://api.test/v1/"), "https://api.test/v1");
    assert_eq!(resolve_base_url("/api/v2"), "http://localhost:8000/api/v2");
    assert_eq!(
        ApiSettings::default().base_url,
        "http://localhost:8000/api/v1"
    );
    assert_eq!(
        ApiSettings::default().with_env_override(Some("  ")).base_url,
        "http://localhost:8000/api/v1"
    );
    assert_eq!(
        ApiSettings::default()
            .with_env_override(Some("https://scraper.test/api"))
            .base_url,
        "https://scraper.test/api"
    );
    assert_eq!(
        ApiSettings::default().request_timeout,
        Duration::from_secs(30)
    );
}

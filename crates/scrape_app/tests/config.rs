use std::fs;
use std::path::PathBuf;

use pretty_assertions::assert_eq;
use scrape_app::{load_config, save_config, ClientConfig, CONFIG_FILENAME};

#[test]
fn missing_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = load_config(dir.path());
    assert_eq!(config, ClientConfig::default());
    assert_eq!(config.max_depth, 3);
    assert!(config.include_images);
}

#[test]
fn malformed_file_gives_defaults() {
    scrape_logging::initialize_for_tests();
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(CONFIG_FILENAME), "(max_depth: \"deep\"").unwrap();
    assert_eq!(load_config(dir.path()), ClientConfig::default());
}

#[test]
fn saved_config_is_loaded_back() {
    let dir = tempfile::tempdir().unwrap();
    let config = ClientConfig {
        api_url: Some("https://scraper.test/api/v1".to_string()),
        authorization_token: Some("token-0123456789".to_string()),
        max_depth: 5,
        include_images: false,
        poll_interval_ms: 500,
        export_dir: PathBuf::from("exports"),
    };

    let path = save_config(dir.path(), &config).unwrap();
    assert_eq!(path, dir.path().join(CONFIG_FILENAME));
    assert_eq!(load_config(dir.path()), config);
}

#[test]
fn partial_file_fills_in_defaults() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(CONFIG_FILENAME), "(max_depth: 7)").unwrap();

    let config = load_config(dir.path());
    assert_eq!(config.max_depth, 7);
    assert_eq!(config.poll_interval_ms, 2000);
    assert_eq!(config.authorization_token, None);
}

#[test]
fn override_url_wins_over_saved_url() {
    let config = ClientConfig {
        api_url: Some("https://saved.test/api/v1".to_string()),
        ..ClientConfig::default()
    };
    assert_eq!(config.api_settings(None).base_url, "https://saved.test/api/v1");
    assert_eq!(
        config.api_settings(Some("/api/v2")).base_url,
        "http://localhost:8000/api/v2"
    );
    assert_eq!(
        ClientConfig::default().api_settings(None).base_url,
        "http://localhost:8000/api/v1"
    );
}

// Tests for configuration loading

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use txscrape_core::config::{
    ConfigError, URL_ENV_VAR, choose_url, expand_path, load_selectors,
};
use txscrape_scanner::Selectors;

// ============================================================================
// URL resolution
// ============================================================================

#[test]
fn test_explicit_url_wins_over_environment() {
    let url = choose_url(
        Some("https://explorer.test/profile/0xabc"),
        Some("https://other.test/".to_string()),
        URL_ENV_VAR,
    )
    .unwrap();
    assert_eq!(url.as_str(), "https://explorer.test/profile/0xabc");
}

#[test]
fn test_environment_url_used_when_no_flag() {
    let url = choose_url(None, Some(" https://explorer.test/ \n".to_string()), URL_ENV_VAR).unwrap();
    assert_eq!(url.host_str(), Some("explorer.test"));
}

#[test]
fn test_missing_url_names_variable() {
    let err = choose_url(None, None, URL_ENV_VAR).unwrap_err();
    assert!(matches!(err, ConfigError::MissingUrl("url")));
    assert!(err.to_string().contains("'url'"));
}

#[test]
fn test_invalid_url_is_rejected() {
    let err = choose_url(Some("not a url"), None, URL_ENV_VAR).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidUrl { .. }));
}

// ============================================================================
// Paths
// ============================================================================

#[test]
fn test_expand_path_without_tilde_is_unchanged() {
    assert_eq!(expand_path("out/response.json"), PathBuf::from("out/response.json"));
}

#[test]
fn test_expand_path_with_tilde_leaves_no_tilde() {
    let expanded = expand_path("~/response.json");
    assert!(expanded.ends_with("response.json"));
    assert!(!expanded.to_string_lossy().starts_with('~'));
}

// ============================================================================
// Selector overrides
// ============================================================================

#[test]
fn test_no_selectors_file_gives_defaults() {
    assert_eq!(load_selectors(None).unwrap(), Selectors::default());
}

#[test]
fn test_selectors_file_overrides_some_fields() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let path = dir.path().join("selectors.json");
    fs::write(&path, r#"{"data_row": "tbody > tr", "metadata_value": "strong"}"#)?;

    let selectors = load_selectors(Some(&path))?;

    assert_eq!(selectors.data_row, "tbody > tr");
    assert_eq!(selectors.metadata_value, "strong");
    assert_eq!(selectors.header_row, Selectors::default().header_row);
    Ok(())
}

#[test]
fn test_invalid_selectors_file_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("selectors.json");
    fs::write(&path, "{ not json").unwrap();

    let err = load_selectors(Some(&path)).unwrap_err();
    assert!(matches!(err, ConfigError::SelectorsJson { .. }));
}

#[test]
fn test_missing_selectors_file_is_rejected() {
    let dir = TempDir::new().unwrap();
    let err = load_selectors(Some(&dir.path().join("absent.json"))).unwrap_err();
    assert!(matches!(err, ConfigError::SelectorsIo { .. }));
}

use super::*;

use std::collections::HashMap;

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn defaults_point_at_local_service() {
    let settings = Settings::default();
    assert_eq!(settings.endpoint, "http://127.0.0.1:8000/recognize");
    assert_eq!(settings.upload_field, "file");
    assert_eq!(settings.log_filter, "info");
    assert!(settings.endpoint_url().is_ok());
}

#[test]
fn file_values_override_defaults() {
    let mut settings = Settings::default();
    apply_file_overrides(
        &mut settings,
        "endpoint = \"https://recognizer.example/recognize\"\nupload_field = \"image\"\n",
    )
    .expect("parse");
    assert_eq!(settings.endpoint, "https://recognizer.example/recognize");
    assert_eq!(settings.upload_field, "image");
    assert_eq!(settings.log_filter, "info");
}

#[test]
fn prefixed_env_wins_over_plain_env() {
    let mut settings = Settings::default();
    apply_env_overrides(
        &mut settings,
        env(&[
            ("RECOGNIZER_ENDPOINT", "http://plain:1/recognize"),
            ("APP__ENDPOINT", "http://prefixed:2/recognize"),
            ("APP__LOG_FILTER", "client_core=debug"),
        ]),
    );
    assert_eq!(settings.endpoint, "http://prefixed:2/recognize");
    assert_eq!(settings.log_filter, "client_core=debug");
}

#[test]
fn rejects_non_http_endpoint() {
    let settings = Settings {
        endpoint: "ftp://example.com/recognize".into(),
        ..Settings::default()
    };
    assert!(settings.endpoint_url().is_err());

    let settings = Settings {
        endpoint: "not a url".into(),
        ..Settings::default()
    };
    assert!(settings.endpoint_url().is_err());
}

#[test]
fn loads_explicit_settings_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("custom.toml");
    fs::write(&path, "endpoint = \"http://10.0.0.5:9000/recognize\"\n").expect("write");

    let settings = load_settings_with(Some(&path), env(&[])).expect("load");
    assert_eq!(settings.endpoint, "http://10.0.0.5:9000/recognize");
    assert_eq!(settings.upload_field, "file");

    let settings = load_settings_with(
        Some(&path),
        env(&[("RECOGNIZER_ENDPOINT", "http://override:1/recognize")]),
    )
    .expect("load");
    assert_eq!(settings.endpoint, "http://override:1/recognize");
}

#[test]
fn missing_explicit_settings_file_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = load_settings_with(Some(&dir.path().join("absent.toml")), env(&[]))
        .expect_err("missing file");
    assert!(err.to_string().contains("absent.toml"));
}

#[test]
fn malformed_settings_file_is_an_error() {
    let mut settings = Settings::default();
    assert!(apply_file_overrides(&mut settings, "endpoint = [").is_err());
}

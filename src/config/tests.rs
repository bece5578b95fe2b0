use super::{AppConfig, DEFAULT_CHORD_WINDOW_MS};
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

fn temp_spec_path(tag: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    std::env::temp_dir().join(format!("modeterm_form_{tag}_{nanos}.json"))
}

#[test]
fn defaults_are_valid() {
    let mut cfg = AppConfig::parse_from(["test-app"]);
    assert!(cfg.validate().is_ok());
    assert_eq!(cfg.chord_window_ms, DEFAULT_CHORD_WINDOW_MS);
    assert_eq!(cfg.chord_window(), Duration::from_millis(200));
    assert!(cfg.autosave_interval().is_none());
}

#[test]
fn rejects_chord_window_out_of_bounds() {
    let mut cfg = AppConfig::parse_from(["test-app", "--chord-window-ms", "10"]);
    assert!(cfg.validate().is_err());

    let mut cfg = AppConfig::parse_from(["test-app", "--chord-window-ms", "5000"]);
    assert!(cfg.validate().is_err());
}

#[test]
fn accepts_chord_window_bounds() {
    let mut cfg = AppConfig::parse_from(["test-app", "--chord-window-ms", "50"]);
    assert!(cfg.validate().is_ok());

    let mut cfg = AppConfig::parse_from(["test-app", "--chord-window-ms", "1000"]);
    assert!(cfg.validate().is_ok());
}

#[test]
fn autosave_interval_follows_flag() {
    let mut cfg = AppConfig::parse_from(["test-app", "--autosave-secs", "30"]);
    assert!(cfg.validate().is_ok());
    assert_eq!(cfg.autosave_interval(), Some(Duration::from_secs(30)));

    let mut cfg = AppConfig::parse_from(["test-app", "--autosave-secs", "100000"]);
    assert!(cfg.validate().is_err());
}

#[test]
fn no_logs_overrides_logs() {
    let cfg = AppConfig::parse_from(["test-app", "--logs", "--no-logs"]);
    assert!(!cfg.logging_enabled());

    let cfg = AppConfig::parse_from(["test-app", "--log-timings"]);
    assert!(cfg.logging_enabled());
}

#[test]
fn rejects_missing_form_spec() {
    let missing = temp_spec_path("missing");
    let mut cfg = AppConfig::parse_from([
        "test-app".to_string(),
        "--form-spec".to_string(),
        missing.display().to_string(),
    ]);
    let err = cfg.validate().expect_err("missing spec should fail");
    assert!(err.to_string().contains("does not exist"));
}

#[test]
fn rejects_form_spec_without_fields() {
    let path = temp_spec_path("empty");
    fs::write(&path, r#"{"title":"Empty","fields":[]}"#).expect("write spec");
    let mut cfg = AppConfig::parse_from([
        "test-app".to_string(),
        "--form-spec".to_string(),
        path.display().to_string(),
    ]);
    assert!(cfg.validate().is_err());
    let _ = fs::remove_file(path);
}

#[test]
fn loads_form_spec_from_json() {
    let path = temp_spec_path("valid");
    fs::write(
        &path,
        r#"{
            "title": "Signup",
            "fields": [
                {"kind": "text", "label": "Name"},
                {"kind": "number", "label": "Age", "min": 0, "max": 120, "default": 18},
                {"kind": "checkbox", "label": "Terms"},
                {"kind": "list", "label": "Lang", "options": ["Go", "Rust"]}
            ]
        }"#,
    )
    .expect("write spec");
    let mut cfg = AppConfig::parse_from([
        "test-app".to_string(),
        "--form-spec".to_string(),
        path.display().to_string(),
    ]);
    cfg.validate().expect("valid spec");
    let spec = cfg.load_form_spec().expect("load spec");
    assert_eq!(spec.title, "Signup");
    assert_eq!(spec.fields.len(), 4);
    let _ = fs::remove_file(path);
}

#[test]
fn default_form_spec_without_flag() {
    let cfg = AppConfig::parse_from(["test-app"]);
    let spec = cfg.load_form_spec().expect("default spec");
    assert_eq!(spec.fields.len(), 4);
}

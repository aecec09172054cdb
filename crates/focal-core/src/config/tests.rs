//! Tests for configuration module.

use super::*;

fn fixture_path() -> String {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/focal.toml").to_string()
}

#[test_log::test]
fn test_default_settings_are_valid() {
    let settings = Settings::default();
    settings.validate().expect("defaults should validate");

    assert_eq!(settings.display.first_weekday, 0);
    assert!(settings.display.timezone.is_none());
    assert_eq!(settings.refresh.interval_secs, NOW_REFRESH_INTERVAL_SECS);
    assert_eq!(
        settings.recurrence.max_iterations,
        DEFAULT_MAX_RECURRENCE_ITERATIONS
    );
}

#[test]
fn test_validate_rejects_out_of_range_weekday() {
    let mut settings = Settings::default();
    settings.display.first_weekday = 7;

    let err = settings.validate().expect_err("weekday 7 is invalid");
    assert!(matches!(err, CoreError::ConfigError(_)));
}

#[test]
fn test_validate_rejects_zero_limits() {
    let mut settings = Settings::default();
    settings.recurrence.max_iterations = 0;
    assert!(settings.validate().is_err());

    let mut settings = Settings::default();
    settings.refresh.interval_secs = 0;
    assert!(settings.validate().is_err());
}

#[test_log::test]
fn test_load_from_file_overrides_defaults() {
    let settings = Settings::load_with(Some(&fixture_path())).expect("fixture should load");

    assert_eq!(settings.display.timezone.as_deref(), Some("Europe/Berlin"));
    assert_eq!(settings.display.first_weekday, 1);
    assert_eq!(settings.recurrence.max_iterations, 5000);
    assert_eq!(settings.logging.level, "trace");
    // Not present in the file, falls back to the default
    assert_eq!(settings.refresh.interval_secs, NOW_REFRESH_INTERVAL_SECS);
}

#[test]
fn test_load_missing_explicit_file_fails() {
    let result = Settings::load_with(Some("/nonexistent/focal-settings.toml"));
    assert!(result.is_err());
}

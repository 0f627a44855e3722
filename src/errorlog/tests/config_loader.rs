use errorlog::{ConfigLoader, OutputLevel};
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_load_settings_from_file() {
    let mut file = NamedTempFile::with_suffix(".toml").unwrap();
    writeln!(
        file,
        r#"
enabled_environments = ["production"]

[reporting]
dsn = "https://key@sentry.example.com/42"
environment = "production"
release = "2026.10.1"
deny_urls = ["^https://internal\\."]
traces_sample_rate = 0.25

[log_output]
production = "error"
"#
    )
    .unwrap();

    let settings = ConfigLoader::load_file(file.path()).unwrap();

    assert_eq!(settings.reporting.release, "2026.10.1");
    assert_eq!(settings.reporting.traces_sample_rate, 0.25);
    assert_eq!(settings.reporting.deny_urls, vec!["^https://internal\\.".to_string()]);
    assert_eq!(
        settings.log_output.unwrap()["production"],
        OutputLevel::Error
    );
}

#[test]
fn test_missing_file_is_reported_with_path() {
    let error = ConfigLoader::load_file(std::path::Path::new("/nonexistent/errorlog.toml"))
        .unwrap_err();

    assert!(format!("{error:#}").contains("/nonexistent/errorlog.toml"));
}

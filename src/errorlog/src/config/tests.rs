use crate::config::ConfigLoader;
use crate::constants::{DEFAULT_ENVIRONMENT, DEFAULT_TRACES_SAMPLE_RATE};
use crate::policy::OutputLevel;

#[test]
fn test_default_config() {
    let settings = ConfigLoader::load_default_config().unwrap();

    assert_eq!(settings.reporting.environment, DEFAULT_ENVIRONMENT);
    assert_eq!(settings.reporting.release, env!("CARGO_PKG_VERSION"));
    assert_eq!(settings.reporting.dsn, "");
    assert_eq!(settings.reporting.traces_sample_rate, DEFAULT_TRACES_SAMPLE_RATE);
    assert!(settings.reporting.deny_urls.is_empty());
    assert!(settings.enabled_environments.is_none());
    assert!(settings.log_output.is_none());
}

#[test]
fn test_overrides_from_toml() {
    let settings = ConfigLoader::from_toml_str(
        r#"
        enabled_environments = ["prod", "staging"]

        [reporting]
        dsn = "https://key@sentry.example.com/1"
        environment = "prod"
        https_proxy = "http://proxy:3128"
        deny_urls = ["localhost"]

        [log_output]
        prod = "error"
        staging = "full"
        "#,
    )
    .unwrap();

    assert_eq!(settings.reporting.environment, "prod");
    assert_eq!(settings.reporting.dsn, "https://key@sentry.example.com/1");
    assert_eq!(settings.reporting.https_proxy.as_deref(), Some("http://proxy:3128"));
    assert!(settings.reporting.http_proxy.is_none());
    assert_eq!(settings.reporting.deny_urls, vec!["localhost".to_string()]);
    assert_eq!(
        settings.enabled_environments,
        Some(vec!["prod".to_string(), "staging".to_string()])
    );

    let log_output = settings.log_output.unwrap();
    assert_eq!(log_output["prod"], OutputLevel::Error);
    assert_eq!(log_output["staging"], OutputLevel::Full);
}

#[test]
fn test_invalid_output_level_is_rejected() {
    let result = ConfigLoader::from_toml_str(
        r#"
        [log_output]
        prod = "loud"
        "#,
    );

    assert!(result.is_err());
}

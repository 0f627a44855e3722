use anyhow::{Context, Result};
use config::builder::DefaultState;
use config::{Config as RConfig, ConfigBuilder, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::constants::{DEFAULT_ENVIRONMENT, DEFAULT_TRACES_SAMPLE_RATE};
use crate::policy::OutputLevel;

/// Backend settings supplied once at `init`.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ReportingConfig {
    pub dsn: String,
    pub environment: String,
    pub release: String,
    #[serde(default)]
    pub http_proxy: Option<String>,
    #[serde(default)]
    pub https_proxy: Option<String>,
    /// Regex patterns; events raised from matching URLs are dropped.
    #[serde(default)]
    pub deny_urls: Vec<String>,
    #[serde(default = "default_traces_sample_rate")]
    pub traces_sample_rate: f32,
}

fn default_traces_sample_rate() -> f32 {
    DEFAULT_TRACES_SAMPLE_RATE
}

impl ReportingConfig {
    pub fn new(
        dsn: impl Into<String>,
        environment: impl Into<String>,
        release: impl Into<String>,
    ) -> Self {
        Self {
            dsn: dsn.into(),
            environment: environment.into(),
            release: release.into(),
            http_proxy: None,
            https_proxy: None,
            deny_urls: Vec::new(),
            traces_sample_rate: DEFAULT_TRACES_SAMPLE_RATE,
        }
    }
}

/// Everything `ErrorLog::init` takes, in one deserializable value.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ErrorLogSettings {
    pub reporting: ReportingConfig,
    #[serde(default)]
    pub enabled_environments: Option<Vec<String>>,
    #[serde(default)]
    pub log_output: Option<HashMap<String, OutputLevel>>,
}

pub struct ConfigLoader;

impl ConfigLoader {
    fn builder() -> Result<ConfigBuilder<DefaultState>> {
        let builder = RConfig::builder()
            .set_default("reporting.dsn", "")?
            .set_default("reporting.environment", DEFAULT_ENVIRONMENT)?
            .set_default("reporting.release", env!("CARGO_PKG_VERSION"))?
            .set_default(
                "reporting.traces_sample_rate",
                f64::from(DEFAULT_TRACES_SAMPLE_RATE),
            )?;

        Ok(builder)
    }

    /// Settings with nothing but the defaults applied.
    pub fn load_default_config() -> Result<ErrorLogSettings> {
        Self::builder()?
            .build()?
            .try_deserialize()
            .context("failed to build default errorlog settings")
    }

    pub fn from_toml_str(contents: &str) -> Result<ErrorLogSettings> {
        Self::builder()?
            .add_source(File::from_str(contents, FileFormat::Toml))
            .build()
            .context("failed to read errorlog settings")?
            .try_deserialize()
            .context("failed to parse errorlog settings")
    }

    pub fn load_file(path: &Path) -> Result<ErrorLogSettings> {
        Self::builder()?
            .add_source(File::from(path).format(FileFormat::Toml))
            .build()
            .with_context(|| format!("failed to read config file {}", path.display()))?
            .try_deserialize()
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }
}

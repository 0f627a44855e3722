//! Environment gating: whether the backend receives anything, and how much is
//! echoed locally.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Local echo verbosity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputLevel {
    /// No local echo at all.
    #[default]
    #[serde(alias = "none")]
    Off,
    /// Startup notice and captured exceptions only.
    #[serde(alias = "errors-only")]
    Error,
    /// Everything, including breadcrumbs, users and requests.
    Full,
}

impl OutputLevel {
    pub fn is_off(self) -> bool {
        self == OutputLevel::Off
    }

    pub fn is_full(self) -> bool {
        self == OutputLevel::Full
    }
}

/// Reporting is active unless an allow-list is given and does not name the
/// current environment.
pub fn is_enabled(environment: &str, allow_list: Option<&[String]>) -> bool {
    match allow_list {
        None => true,
        Some(environments) => environments.iter().any(|e| e == environment),
    }
}

pub fn resolve_verbosity(
    environment: &str,
    output_table: Option<&HashMap<String, OutputLevel>>,
) -> OutputLevel {
    output_table
        .and_then(|table| table.get(environment).copied())
        .unwrap_or_default()
}

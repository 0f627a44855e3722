//! Local echo of reported data.

use crate::constants::LOG_TARGET;
use crate::{error_message, warning_message};
use colored::Colorize;
use serde_json::Value;

/// Where the facade echoes what it reports.
#[cfg_attr(test, mockall::automock)]
pub trait Echo: Send + Sync {
    fn warn(&self, label: &str, payload: &Value);
    fn error(&self, label: &str, payload: &Value);
}

/// Emits `tracing` events under the `errorlog` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEcho;

impl Echo for TracingEcho {
    fn warn(&self, label: &str, payload: &Value) {
        tracing::warn!(target: LOG_TARGET, payload = %payload, "{label}");
    }

    fn error(&self, label: &str, payload: &Value) {
        tracing::error!(target: LOG_TARGET, payload = %payload, "{label}");
    }
}

/// Prints colored lines to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleEcho;

impl ConsoleEcho {
    fn render(label: &str, payload: &Value) -> String {
        if payload.is_null() {
            label.to_string()
        } else {
            format!("{label} {payload}")
        }
    }
}

impl Echo for ConsoleEcho {
    fn warn(&self, label: &str, payload: &Value) {
        warning_message!("{}", Self::render(label, payload));
    }

    fn error(&self, label: &str, payload: &Value) {
        error_message!("{}", Self::render(label, payload));
    }
}

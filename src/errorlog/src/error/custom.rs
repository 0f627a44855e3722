use super::{ErrorLevel, ReportableError};
use serde_json::Value;
use std::borrow::Cow;
use std::fmt;

/// Application error carrying a stable key, an optional level and free-form data.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomError {
    message: String,
    key: String,
    level: Option<ErrorLevel>,
    data: Option<Value>,
}

impl CustomError {
    pub fn new(message: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            key: key.into(),
            level: None,
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_level(mut self, level: ErrorLevel) -> Self {
        self.level = Some(level);
        self
    }
}

impl fmt::Display for CustomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for CustomError {}

impl ReportableError for CustomError {
    fn name(&self) -> Cow<'_, str> {
        Cow::Borrowed("CustomError")
    }

    fn key(&self) -> Option<&str> {
        Some(&self.key)
    }

    fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    fn level(&self) -> Option<ErrorLevel> {
        self.level
    }
}

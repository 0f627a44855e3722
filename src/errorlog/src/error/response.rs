use super::ReportableError;
use serde::Serialize;
use serde_json::Value;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use typed_builder::TypedBuilder;

/// The outbound request that produced a [`ResponseError`].
#[derive(Debug, Clone, PartialEq, Serialize, TypedBuilder)]
pub struct RequestConfig {
    #[builder(setter(into))]
    pub method: String,
    #[builder(default, setter(strip_option, into))]
    pub base_url: Option<String>,
    #[builder(setter(into))]
    pub url: String,
    #[builder(default)]
    pub data: Value,
    #[builder(default)]
    pub headers: BTreeMap<String, String>,
}

impl RequestConfig {
    /// `"<METHOD> <base_url><url>"`, e.g. `"POST https://api.example.com/jobs"`.
    pub fn route(&self) -> String {
        format!(
            "{} {}{}",
            self.method.to_uppercase(),
            self.base_url.as_deref().unwrap_or_default(),
            self.url
        )
    }
}

/// What came back from the server.
#[derive(Debug, Clone, PartialEq, Serialize, TypedBuilder)]
pub struct ResponseSnapshot {
    pub status: u16,
    #[builder(default)]
    pub headers: BTreeMap<String, String>,
    #[builder(default)]
    pub data: Value,
}

impl ResponseSnapshot {
    /// `data.key`, when the body carries a string key.
    pub fn body_key(&self) -> Option<&str> {
        self.data.get("key").and_then(Value::as_str)
    }

    /// `data.message`, when the body carries a string message.
    pub fn body_message(&self) -> Option<&str> {
        self.data.get("message").and_then(Value::as_str)
    }
}

/// A failed outbound HTTP call.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseError {
    message: String,
    config: RequestConfig,
    response: ResponseSnapshot,
}

impl ResponseError {
    pub fn new(message: impl Into<String>, config: RequestConfig, response: ResponseSnapshot) -> Self {
        Self {
            message: message.into(),
            config,
            response,
        }
    }
}

impl fmt::Display for ResponseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ResponseError {}

impl ReportableError for ResponseError {
    fn name(&self) -> Cow<'_, str> {
        Cow::Borrowed("ResponseError")
    }

    fn request_config(&self) -> Option<&RequestConfig> {
        Some(&self.config)
    }

    fn response(&self) -> Option<&ResponseSnapshot> {
        Some(&self.response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_route_without_base_url() {
        let config = RequestConfig::builder().method("get").url("/jobs/1").build();
        assert_eq!(config.route(), "GET /jobs/1");
    }

    #[test]
    fn test_body_fields_must_be_strings() {
        let response = ResponseSnapshot::builder()
            .status(400)
            .data(json!({ "key": 12, "message": "bad" }))
            .build();

        assert_eq!(response.body_key(), None);
        assert_eq!(response.body_message(), Some("bad"));
    }
}

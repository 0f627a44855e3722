use super::{ErrorLevel, ReportableError};
use crate::constants::RESPONSE_ERROR_KEY;
use crate::context::{prepare_context_data, ContextData};
use serde::Serialize;
use serde_json::{json, Value};

/// Report-ready description of a caught error.
///
/// `data` is the structured payload kept for the backend; `prepared_data` is
/// the same payload flattened for breadcrumbs and local echo.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedError {
    pub key: Option<String>,
    pub name: String,
    pub message: String,
    pub level: ErrorLevel,
    pub data: Option<Value>,
    pub prepared_data: Option<ContextData>,
}

impl NormalizedError {
    pub fn from_error(error: &dyn ReportableError, level_override: Option<ErrorLevel>) -> Self {
        let message = error.message();
        let level = level_override.or(error.level()).unwrap_or_default();

        let mut key = error.key().map(str::to_string);
        let mut data = error.data().filter(|d| !d.is_null()).cloned();
        let mut name = error.name().into_owned();

        // HTTP failures keep their diagnostics in the response, so that wins
        // over anything set on the error itself.
        if let (Some(config), Some(response)) = (error.request_config(), error.response()) {
            data = Some(json!({
                "requestData": config.data,
                "requestHeaders": config.headers,
                "responseData": response.data,
                "responseHeaders": response.headers,
                "route": config.route(),
                "status": response.status,
            }));

            let response_key = response.body_key().unwrap_or(RESPONSE_ERROR_KEY).to_string();
            let found_message = response.body_message().unwrap_or(&message);
            name = format!("{response_key}: {found_message}");
            key = Some(response_key);
        }

        let prepared_data = data.as_ref().map(|d| prepare_context_data(Some(d)));

        Self {
            key,
            name,
            message,
            level,
            data,
            prepared_data,
        }
    }
}

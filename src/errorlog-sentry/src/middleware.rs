use crate::request::{read_json_body, request_info};
use crate::ServerErrorLog;
use axum::extract::{Request, State};
use axum::http::{HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use sentry::{Hub, SentryFutureExt};
use serde_json::{Map, Value};
use std::sync::Arc;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Correlation id of the current request, stored in request extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

impl RequestId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Reuses the inbound `X-Request-Id` or mints a v4 UUID, exposes it as a
/// [`RequestId`] extension and echoes it on the response.
pub async fn request_id(mut request: Request, next: Next) -> Response {
    let id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    request.extensions_mut().insert(RequestId(id.clone()));

    let mut response = next.run(request).await;

    match HeaderValue::from_str(&id) {
        Ok(value) => {
            response.headers_mut().insert(REQUEST_ID_HEADER, value);
        }
        Err(e) => tracing::warn!(error = %e, "request id is not a valid header value"),
    }

    response
}

/// Reports every request through `error_log.request` and finishes its
/// transaction with the response status once the handler has run.
///
/// Each request runs on its own hub forked from the current one, so the
/// request extras and user never leak onto events raised elsewhere. JSON
/// bodies are buffered (see [`read_json_body`]) and reported as `Body`.
///
/// Install it inside [`request_id`] so the id is already in place.
pub async fn report_request(
    State(error_log): State<Arc<ServerErrorLog>>,
    request: Request,
    next: Next,
) -> Response {
    let (request, body) = match read_json_body(request).await {
        Ok(read) => read,
        Err(e) => {
            tracing::warn!(error = %e, "failed to read request body");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    let mut info = request_info(&request);
    info.body = body;

    let hub = Arc::new(Hub::new_from_top(Hub::current()));
    let transaction = Hub::run(Arc::clone(&hub), || error_log.request(&info));

    let response = next.run(request).bind_hub(Arc::clone(&hub)).await;

    if let Some(transaction) = transaction {
        let mut data = Map::new();
        data.insert(
            "status".to_string(),
            Value::from(response.status().as_u16()),
        );
        Hub::run(hub, || error_log.finish_transaction(transaction, Some(&data)));
    }

    response
}

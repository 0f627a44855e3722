use crate::middleware::RequestId;
use axum::body::Body;
use axum::http::{header, Request};
use errorlog::{RequestInfo, UserParams};
use serde_json::{Map, Value};

/// Largest JSON body buffered for reporting.
pub const MAX_REPORTED_BODY_BYTES: usize = 64 * 1024;

/// Identity of the authenticated caller. Insert it into request extensions
/// from auth middleware and it is reported alongside the request.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportedUser(pub UserParams);

/// Snapshot of an axum request for `ErrorLog::request`.
///
/// `params` holds the decoded query string. The body is left as `null`
/// since it has not been read yet; see [`read_json_body`].
pub fn request_info<B>(request: &Request<B>) -> RequestInfo {
    let uri = request.uri();
    let original_url = uri
        .path_and_query()
        .map(|path_and_query| path_and_query.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());

    RequestInfo {
        method: request.method().as_str().to_string(),
        original_url,
        body: Value::Null,
        params: query_params(uri.query()),
        id: request
            .extensions()
            .get::<RequestId>()
            .map(|id| id.0.clone()),
        user: request
            .extensions()
            .get::<ReportedUser>()
            .map(|user| user.0.clone()),
    }
}

/// Buffers a JSON body announced with a `Content-Length` of at most
/// [`MAX_REPORTED_BODY_BYTES`] and hands back an equivalent request together
/// with the parsed body. Any other request passes through with a `null` body.
///
/// A body that is not valid JSON is reported as its (lossy) text.
pub async fn read_json_body(
    request: Request<Body>,
) -> Result<(Request<Body>, Value), axum::Error> {
    if !has_reportable_json_body(&request) {
        return Ok((request, Value::Null));
    }

    let (parts, body) = request.into_parts();
    let bytes = axum::body::to_bytes(body, MAX_REPORTED_BODY_BYTES).await?;
    let value = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));

    Ok((Request::from_parts(parts, Body::from(bytes)), value))
}

fn has_reportable_json_body<B>(request: &Request<B>) -> bool {
    let headers = request.headers();

    let is_json = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|content_type| content_type.starts_with("application/json"));

    let fits = headers
        .get(header::CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|length| length.parse::<usize>().ok())
        .is_some_and(|length| length > 0 && length <= MAX_REPORTED_BODY_BYTES);

    is_json && fits
}

fn query_params(query: Option<&str>) -> Value {
    let params: Map<String, Value> = query
        .map(|query| {
            url::form_urlencoded::parse(query.as_bytes())
                .map(|(key, value)| (key.into_owned(), Value::String(value.into_owned())))
                .collect()
        })
        .unwrap_or_default();

    Value::Object(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_info_from_request() {
        let mut user = UserParams::new();
        user.insert("id".to_string(), json!("42"));

        let request = Request::builder()
            .method("POST")
            .uri("/jobs/7?verbose=true&name=a%20b")
            .extension(RequestId("abc".to_string()))
            .extension(ReportedUser(user.clone()))
            .body(())
            .unwrap();

        let info = request_info(&request);

        assert_eq!(info.method, "POST");
        assert_eq!(info.original_url, "/jobs/7?verbose=true&name=a%20b");
        assert_eq!(info.params, json!({ "verbose": "true", "name": "a b" }));
        assert_eq!(info.body, Value::Null);
        assert_eq!(info.id.as_deref(), Some("abc"));
        assert_eq!(info.user, Some(user));
        assert_eq!(info.transaction_name(), "POST /jobs/7?verbose=true&name=a%20b");
    }

    #[test]
    fn test_request_info_without_extensions() {
        let request = Request::builder().uri("/health").body(()).unwrap();

        let info = request_info(&request);

        assert_eq!(info.method, "GET");
        assert_eq!(info.original_url, "/health");
        assert_eq!(info.params, json!({}));
        assert!(info.id.is_none());
        assert!(info.user.is_none());
    }

    fn json_post(body: &str, content_type: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/jobs")
            .header(header::CONTENT_TYPE, content_type)
            .header(header::CONTENT_LENGTH, body.len())
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_json_body_is_read_and_kept() {
        let request = json_post(r#"{"name":"sync"}"#, "application/json");

        let (request, body) = read_json_body(request).await.unwrap();

        assert_eq!(body, json!({ "name": "sync" }));
        let bytes = axum::body::to_bytes(request.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(bytes, r#"{"name":"sync"}"#.as_bytes());
    }

    #[tokio::test]
    async fn test_invalid_json_body_is_reported_as_text() {
        let request = json_post("{not json", "application/json; charset=utf-8");

        let (_, body) = read_json_body(request).await.unwrap();

        assert_eq!(body, json!("{not json"));
    }

    #[tokio::test]
    async fn test_non_json_body_is_left_unread() {
        let request = json_post("name=sync", "application/x-www-form-urlencoded");

        let (request, body) = read_json_body(request).await.unwrap();

        assert_eq!(body, Value::Null);
        let bytes = axum::body::to_bytes(request.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(bytes, "name=sync".as_bytes());
    }

    #[test]
    fn test_oversized_or_unsized_body_is_not_reportable() {
        let unsized_request = Request::builder()
            .header(header::CONTENT_TYPE, "application/json")
            .body(())
            .unwrap();
        let oversized = Request::builder()
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::CONTENT_LENGTH, MAX_REPORTED_BODY_BYTES + 1)
            .body(())
            .unwrap();

        assert!(!has_reportable_json_body(&unsized_request));
        assert!(!has_reportable_json_body(&oversized));
    }
}

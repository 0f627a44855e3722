//! Server-side binding of the `errorlog` facade: the `sentry` SDK as backend,
//! plus axum middleware for request correlation and per-request reporting.

mod backend;
mod middleware;
mod request;

pub use backend::{SentryBackend, SentryTransaction};
pub use middleware::{report_request, request_id, RequestId, REQUEST_ID_HEADER};
pub use request::{read_json_body, request_info, ReportedUser, MAX_REPORTED_BODY_BYTES};

pub use errorlog::throw_error;

use errorlog::ErrorLog;

pub type ServerErrorLog = ErrorLog<SentryBackend>;

/// A facade bound to a fresh [`SentryBackend`], ready for `init`.
pub fn error_log() -> ServerErrorLog {
    ErrorLog::new(SentryBackend::new())
}

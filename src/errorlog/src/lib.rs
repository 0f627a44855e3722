//! Error reporting adapter.
//!
//! `ErrorLog` gives application code one stable reporting surface and decides,
//! per deployment environment, whether anything reaches the error-tracking
//! backend and how much is echoed locally. The backend itself is injected as a
//! [`BackendClient`] so the vendor SDK never leaks into callers.

pub mod backend;
pub mod config;
pub mod constants;
pub mod context;
pub mod echo;
pub mod error;
mod error_log;
pub mod logging;
pub mod message;
pub mod policy;
pub mod request;

pub use backend::{
    BackendClient, BackendScope, BackendTransaction, Breadcrumb, ClientInit, ScopeCallback,
    UserParams,
};
pub use config::{ConfigLoader, ErrorLogSettings, ReportingConfig};
pub use context::{prepare_context_data, ContextData};
pub use echo::{ConsoleEcho, Echo, TracingEcho};
pub use error::{
    CustomError, ErrorLevel, NormalizedError, ReportableError, RequestConfig, ResponseError,
    ResponseSnapshot,
};
pub use error_log::ErrorLog;
pub use policy::{is_enabled, resolve_verbosity, OutputLevel};
pub use request::{RequestInfo, TransactionParams};

// re-export for convenient use with `message`
pub use colored::Colorize;

/// Hands the given error straight back as `Err`, unchanged.
///
/// Lets call sites end a branch with `return throw_error(err)` while keeping
/// the exact error value (no copy, no wrapping) for whoever handles it next.
pub fn throw_error<T, E>(error: E) -> Result<T, E> {
    Err(error)
}

//! The narrow capability the facade needs from an error-tracking SDK.

use crate::config::ReportingConfig;
use crate::context::ContextData;
use crate::error::ErrorLevel;
use crate::request::TransactionParams;
use serde::Serialize;
use serde_json::{Map, Value};

/// User identity forwarded to the backend (`id`, `email`, `username`, ...).
pub type UserParams = Map<String, Value>;

/// Deferred scope work handed to [`BackendClient::with_scope`].
///
/// Scheduled, never awaited: the facade returns as soon as it has handed the
/// callback over and makes no assumption about when it runs.
pub type ScopeCallback = Box<dyn FnOnce(&mut dyn BackendScope) + Send + 'static>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Breadcrumb {
    pub message: String,
    pub data: ContextData,
}

/// Everything the backend needs to start: the reporting config plus the
/// integrations accumulated on the facade.
#[derive(Debug, Clone)]
pub struct ClientInit<I> {
    pub config: ReportingConfig,
    pub integrations: Vec<I>,
}

pub trait BackendScope {
    fn add_breadcrumb(&mut self, breadcrumb: Breadcrumb);
    fn set_tag(&mut self, key: &str, value: &str);
    fn set_level(&mut self, level: ErrorLevel);
}

pub trait BackendTransaction {
    fn set_data(&mut self, key: &str, value: Value);
    fn finish(self);
}

pub trait BackendClient: Send + Sync + 'static {
    /// Platform integration objects passed through to `init`.
    type Integration: Clone + Send + Sync;
    type Transaction: BackendTransaction;

    fn init(&self, options: ClientInit<Self::Integration>);
    fn set_user(&self, user: &UserParams);
    fn set_extra(&self, key: &str, value: Value);
    fn add_breadcrumb(&self, breadcrumb: Breadcrumb);
    fn capture_exception(&self, error: &(dyn std::error::Error + Send + Sync + 'static));
    fn with_scope(&self, callback: ScopeCallback);
    fn start_transaction(&self, params: &TransactionParams) -> Self::Transaction;
}

//! Recording stand-in for a real SDK.

use crate::backend::{
    BackendClient, BackendScope, BackendTransaction, Breadcrumb, ClientInit, ScopeCallback,
    UserParams,
};
use crate::error::{CustomError, ErrorLevel};
use crate::request::TransactionParams;
use serde_json::Value;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq)]
pub(super) enum Call {
    Init {
        environment: String,
        integrations: Vec<String>,
    },
    SetUser(UserParams),
    SetExtra(String, Value),
    AddBreadcrumb(Breadcrumb),
    ScopeBreadcrumb(Breadcrumb),
    SetTag(String, String),
    SetLevel(ErrorLevel),
    CaptureException {
        message: String,
        custom: Option<CustomError>,
    },
    StartTransaction(TransactionParams),
    TransactionData(String, Value),
    FinishTransaction(String),
}

type CallLog = Arc<Mutex<Vec<Call>>>;

#[derive(Default)]
pub(super) struct FakeBackend {
    calls: CallLog,
    defer_scopes: bool,
    pending: Mutex<Vec<ScopeCallback>>,
}

impl FakeBackend {
    /// Holds scope callbacks until `run_pending` is called.
    pub fn deferred() -> Self {
        Self {
            defer_scopes: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn run_pending(&self) {
        let pending = std::mem::take(&mut *self.pending.lock().unwrap());
        for callback in pending {
            callback(&mut FakeScope(Arc::clone(&self.calls)));
        }
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

struct FakeScope(CallLog);

impl BackendScope for FakeScope {
    fn add_breadcrumb(&mut self, breadcrumb: Breadcrumb) {
        self.0.lock().unwrap().push(Call::ScopeBreadcrumb(breadcrumb));
    }

    fn set_tag(&mut self, key: &str, value: &str) {
        self.0
            .lock()
            .unwrap()
            .push(Call::SetTag(key.to_string(), value.to_string()));
    }

    fn set_level(&mut self, level: ErrorLevel) {
        self.0.lock().unwrap().push(Call::SetLevel(level));
    }
}

pub(super) struct FakeTransaction {
    name: String,
    calls: CallLog,
}

impl BackendTransaction for FakeTransaction {
    fn set_data(&mut self, key: &str, value: Value) {
        self.calls
            .lock()
            .unwrap()
            .push(Call::TransactionData(key.to_string(), value));
    }

    fn finish(self) {
        self.calls
            .lock()
            .unwrap()
            .push(Call::FinishTransaction(self.name));
    }
}

impl BackendClient for FakeBackend {
    type Integration = String;
    type Transaction = FakeTransaction;

    fn init(&self, options: ClientInit<String>) {
        self.record(Call::Init {
            environment: options.config.environment,
            integrations: options.integrations,
        });
    }

    fn set_user(&self, user: &UserParams) {
        self.record(Call::SetUser(user.clone()));
    }

    fn set_extra(&self, key: &str, value: Value) {
        self.record(Call::SetExtra(key.to_string(), value));
    }

    fn add_breadcrumb(&self, breadcrumb: Breadcrumb) {
        self.record(Call::AddBreadcrumb(breadcrumb));
    }

    fn capture_exception(&self, error: &(dyn std::error::Error + Send + Sync + 'static)) {
        self.record(Call::CaptureException {
            message: error.to_string(),
            custom: error.downcast_ref::<CustomError>().cloned(),
        });
    }

    fn with_scope(&self, callback: ScopeCallback) {
        if self.defer_scopes {
            self.pending.lock().unwrap().push(callback);
        } else {
            callback(&mut FakeScope(Arc::clone(&self.calls)));
        }
    }

    fn start_transaction(&self, params: &TransactionParams) -> FakeTransaction {
        self.record(Call::StartTransaction(params.clone()));
        FakeTransaction {
            name: params.name.clone(),
            calls: Arc::clone(&self.calls),
        }
    }
}

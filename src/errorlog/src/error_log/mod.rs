use crate::backend::{BackendClient, BackendTransaction, Breadcrumb, ClientInit, UserParams};
use crate::config::{ErrorLogSettings, ReportingConfig};
use crate::constants::{
    ERROR_DATA_BREADCRUMB, ERROR_KEY_TAG, EXTRA_BODY, EXTRA_METHOD, EXTRA_PARAMS,
    EXTRA_REQUEST_ID, EXTRA_ROUTE, HTTP_REQUEST_OP,
};
use crate::context::{prepare_context_data, to_indented_json};
use crate::echo::{Echo, TracingEcho};
use crate::error::{ErrorLevel, NormalizedError, ReportableError};
use crate::policy::{is_enabled, resolve_verbosity, OutputLevel};
use crate::request::{RequestInfo, TransactionParams};
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

#[cfg(test)]
mod fake_backend;

const ON_LABEL: &str = "ErrorLog on";
const USER_LABEL: &str = "ErrorLog user:";
const CONTEXT_LABEL: &str = "ErrorLog context:";
const REQUEST_LABEL: &str = "ErrorLog request:";
const ERROR_CONTEXT_LABEL: &str = "ErrorLog error context:";
const ERROR_LABEL: &str = "ErrorLog error:";
const TRANSACTION_LABEL: &str = "ErrorLog transaction:";

struct InstanceState<I> {
    enabled: bool,
    verbosity: OutputLevel,
    integrations: Vec<I>,
}

impl<I> Default for InstanceState<I> {
    fn default() -> Self {
        Self {
            enabled: true,
            verbosity: OutputLevel::Off,
            integrations: Vec::new(),
        }
    }
}

/// The reporting facade.
///
/// Build one at startup, call [`ErrorLog::init`] once, then share it (it is
/// `Send + Sync`). Until `init` runs, reporting is enabled and the local echo
/// is off. No method ever fails or panics on bad input.
pub struct ErrorLog<C: BackendClient> {
    client: Arc<C>,
    echo: Box<dyn Echo>,
    state: RwLock<InstanceState<C::Integration>>,
}

impl<C: BackendClient> ErrorLog<C> {
    pub fn new(client: C) -> Self {
        Self::from_shared(Arc::new(client))
    }

    pub fn from_shared(client: Arc<C>) -> Self {
        Self {
            client,
            echo: Box::new(TracingEcho),
            state: RwLock::new(InstanceState::default()),
        }
    }

    pub fn with_echo(mut self, echo: impl Echo + 'static) -> Self {
        self.echo = Box::new(echo);
        self
    }

    /// Platform integrations always passed to the backend's `init`.
    pub fn with_integrations(mut self, integrations: Vec<C::Integration>) -> Self {
        self.state
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .integrations
            .extend(integrations);
        self
    }

    pub fn client(&self) -> &Arc<C> {
        &self.client
    }

    pub fn is_enabled(&self) -> bool {
        self.snapshot().0
    }

    pub fn verbosity(&self) -> OutputLevel {
        self.snapshot().1
    }

    fn snapshot(&self) -> (bool, OutputLevel) {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        (state.enabled, state.verbosity)
    }

    /// Queue an integration for the next `init`.
    pub fn add_integration(&self, integration: C::Integration) {
        self.state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .integrations
            .push(integration);
    }

    pub fn init(
        &self,
        config: ReportingConfig,
        allow_list: Option<&[String]>,
        output_table: Option<&HashMap<String, OutputLevel>>,
    ) {
        let enabled = is_enabled(&config.environment, allow_list);
        let verbosity = resolve_verbosity(&config.environment, output_table);

        let integrations = {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            state.enabled = enabled;
            state.verbosity = verbosity;
            state.integrations.clone()
        };

        debug!(
            environment = %config.environment,
            enabled,
            verbosity = ?verbosity,
            integrations = integrations.len(),
            "Initializing error log"
        );

        if enabled {
            self.client.init(ClientInit {
                config,
                integrations,
            });
        }

        if !verbosity.is_off() {
            self.echo.warn(ON_LABEL, &Value::Null);
        }
    }

    pub fn init_with_settings(&self, settings: &ErrorLogSettings) {
        self.init(
            settings.reporting.clone(),
            settings.enabled_environments.as_deref(),
            settings.log_output.as_ref(),
        );
    }

    pub fn set_user(&self, params: &UserParams) {
        let (enabled, verbosity) = self.snapshot();

        if enabled {
            self.client.set_user(params);
        }

        if verbosity.is_full() {
            self.echo.warn(USER_LABEL, &Value::Object(params.clone()));
        }
    }

    /// Leave a breadcrumb built from `message` and the flattened `data`.
    pub fn context(&self, message: &str, data: Option<&Value>) {
        let (enabled, verbosity) = self.snapshot();
        let prepared_data = prepare_context_data(data);

        if verbosity.is_full() {
            self.echo.warn(
                CONTEXT_LABEL,
                &json!({ "message": message, "data": prepared_data }),
            );
        }

        if enabled {
            self.client.add_breadcrumb(Breadcrumb {
                message: message.to_string(),
                data: prepared_data,
            });
        }
    }

    /// Attach the request to the current backend scope and open a
    /// transaction for it. Returns `None` while reporting is disabled.
    pub fn request(&self, req: &RequestInfo) -> Option<C::Transaction> {
        let (enabled, verbosity) = self.snapshot();

        let transaction = if enabled {
            self.client
                .set_extra(EXTRA_METHOD, Value::String(req.method.clone()));
            self.client
                .set_extra(EXTRA_ROUTE, Value::String(req.original_url.clone()));
            self.client
                .set_extra(EXTRA_BODY, Value::String(to_indented_json(&req.body)));
            self.client
                .set_extra(EXTRA_PARAMS, Value::String(to_indented_json(&req.params)));

            if let Some(id) = &req.id {
                self.client
                    .set_extra(EXTRA_REQUEST_ID, Value::String(id.clone()));
            }

            if let Some(user) = &req.user {
                self.client.set_user(user);
            }

            let params = TransactionParams {
                name: req.transaction_name(),
                op: HTTP_REQUEST_OP.to_string(),
                description: None,
            };
            Some(self.client.start_transaction(&params))
        } else {
            None
        };

        if verbosity.is_full() {
            self.echo.warn(
                REQUEST_LABEL,
                &json!({
                    "Body": req.body,
                    "Method": req.method,
                    "RequestId": req.id,
                    "Route": req.original_url,
                    "User": req.user,
                }),
            );
        }

        transaction
    }

    /// Report a caught error.
    ///
    /// The scope work (breadcrumb, `error.key` tag, level, capture of the
    /// original error) is handed to the backend and not awaited: it may still
    /// be pending when this returns.
    pub fn exception<E: ReportableError>(&self, error: E, level_override: Option<ErrorLevel>) {
        let (enabled, verbosity) = self.snapshot();
        let normalized = NormalizedError::from_error(&error, level_override);
        let error = Arc::new(error);

        if enabled {
            let client = Arc::clone(&self.client);
            let reported = Arc::clone(&error);
            let key = normalized.key.clone().filter(|key| !key.is_empty());
            let prepared_data = normalized.prepared_data.clone();
            let level = normalized.level;

            self.client.with_scope(Box::new(move |scope| {
                if let Some(data) = prepared_data {
                    scope.add_breadcrumb(Breadcrumb {
                        message: ERROR_DATA_BREADCRUMB.to_string(),
                        data,
                    });
                }

                if let Some(key) = &key {
                    scope.set_tag(ERROR_KEY_TAG, key);
                }

                scope.set_level(level);

                client.capture_exception(&*reported);
            }));
        }

        if !verbosity.is_off() {
            self.echo.error(
                ERROR_CONTEXT_LABEL,
                &json!({
                    "data": normalized.prepared_data,
                    "key": normalized.key,
                    "level": normalized.level,
                    "message": normalized.message,
                    "name": normalized.name,
                }),
            );
            self.echo
                .error(ERROR_LABEL, &Value::String(format!("{error:?}")));
        }
    }

    /// Open a backend transaction. Returns `None` while reporting is disabled.
    pub fn transaction(&self, params: &TransactionParams) -> Option<C::Transaction> {
        let (enabled, verbosity) = self.snapshot();

        if !verbosity.is_off() {
            self.echo.warn(
                TRANSACTION_LABEL,
                &serde_json::to_value(params).unwrap_or_default(),
            );
        }

        enabled.then(|| self.client.start_transaction(params))
    }

    pub fn finish_transaction(
        &self,
        mut transaction: C::Transaction,
        data: Option<&Map<String, Value>>,
    ) {
        for (key, value) in data.into_iter().flatten() {
            transaction.set_data(key, value.clone());
        }

        transaction.finish();
    }
}

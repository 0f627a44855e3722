use errorlog::{
    BackendClient, BackendScope, BackendTransaction, Breadcrumb, ClientInit, ErrorLevel,
    ScopeCallback, TransactionParams, UserParams,
};
use regex::Regex;
use serde_json::Value;
use sentry::protocol::{Event, User};
use sentry::types::Dsn;
use sentry::{ClientInitGuard, ClientOptions, Hub, Integration, Level, TransactionContext};
use std::borrow::Cow;
use std::sync::{Arc, Mutex, PoisonError};

/// [`BackendClient`] backed by the process-wide `sentry` hub.
///
/// Every call goes through `Hub::current()`, so the thread's active hub (the
/// main hub in production, a test hub under `sentry::test`) receives it.
#[derive(Default)]
pub struct SentryBackend {
    guard: Mutex<Option<ClientInitGuard>>,
}

impl SentryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn client_options(options: ClientInit<Arc<dyn Integration>>) -> ClientOptions {
        let ClientInit {
            config,
            integrations,
        } = options;
        let deny_urls = compile_deny_urls(&config.deny_urls);

        let mut client_options = ClientOptions {
            dsn: parse_dsn(&config.dsn),
            environment: Some(Cow::Owned(config.environment)),
            release: Some(Cow::Owned(config.release)),
            http_proxy: config.http_proxy.map(Cow::Owned),
            https_proxy: config.https_proxy.map(Cow::Owned),
            traces_sample_rate: config.traces_sample_rate,
            ..Default::default()
        };
        client_options.integrations.extend(integrations);

        if !deny_urls.is_empty() {
            client_options.before_send = Some(Arc::new(move |event: Event<'static>| {
                if is_denied(&deny_urls, &event) {
                    None
                } else {
                    Some(event)
                }
            }));
        }

        client_options
    }
}

fn parse_dsn(dsn: &str) -> Option<Dsn> {
    if dsn.is_empty() {
        return None;
    }

    match dsn.parse() {
        Ok(dsn) => Some(dsn),
        Err(e) => {
            tracing::warn!(error = %e, "invalid Sentry DSN, error tracking disabled");
            None
        }
    }
}

fn compile_deny_urls(patterns: &[String]) -> Vec<Regex> {
    patterns
        .iter()
        .filter_map(|pattern| match Regex::new(pattern) {
            Ok(regex) => Some(regex),
            Err(e) => {
                tracing::warn!(pattern = %pattern, error = %e, "skipping invalid deny_urls pattern");
                None
            }
        })
        .collect()
}

fn is_denied(deny_urls: &[Regex], event: &Event<'_>) -> bool {
    event
        .request
        .as_ref()
        .and_then(|request| request.url.as_ref())
        .is_some_and(|url| deny_urls.iter().any(|regex| regex.is_match(url.as_str())))
}

fn to_sentry_level(level: ErrorLevel) -> Level {
    match level {
        ErrorLevel::Debug => Level::Debug,
        ErrorLevel::Info => Level::Info,
        ErrorLevel::Warning => Level::Warning,
        ErrorLevel::Error => Level::Error,
        ErrorLevel::Fatal => Level::Fatal,
    }
}

fn to_sentry_breadcrumb(breadcrumb: Breadcrumb) -> sentry::Breadcrumb {
    sentry::Breadcrumb {
        message: Some(breadcrumb.message),
        data: breadcrumb
            .data
            .into_iter()
            .map(|(key, value)| (key, Value::String(value)))
            .collect(),
        ..Default::default()
    }
}

/// Well-known keys fill the typed fields; everything else lands in `other`.
fn to_sentry_user(params: &UserParams) -> User {
    let mut user = User::default();

    for (key, value) in params {
        let text = || {
            value
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| value.to_string())
        };

        match key.as_str() {
            "id" => user.id = Some(text()),
            "email" => user.email = Some(text()),
            "username" => user.username = Some(text()),
            _ => {
                user.other.insert(key.clone(), value.clone());
            }
        }
    }

    user
}

struct SentryScope<'a> {
    hub: &'a Hub,
}

impl BackendScope for SentryScope<'_> {
    fn add_breadcrumb(&mut self, breadcrumb: Breadcrumb) {
        self.hub.add_breadcrumb(to_sentry_breadcrumb(breadcrumb));
    }

    fn set_tag(&mut self, key: &str, value: &str) {
        self.hub.configure_scope(|scope| scope.set_tag(key, value));
    }

    fn set_level(&mut self, level: ErrorLevel) {
        self.hub
            .configure_scope(|scope| scope.set_level(Some(to_sentry_level(level))));
    }
}

pub struct SentryTransaction(sentry::Transaction);

impl BackendTransaction for SentryTransaction {
    fn set_data(&mut self, key: &str, value: Value) {
        self.0.set_data(key, value);
    }

    fn finish(self) {
        self.0.finish();
    }
}

impl BackendClient for SentryBackend {
    type Integration = Arc<dyn Integration>;
    type Transaction = SentryTransaction;

    fn init(&self, options: ClientInit<Self::Integration>) {
        let guard = sentry::init(Self::client_options(options));
        *self.guard.lock().unwrap_or_else(PoisonError::into_inner) = Some(guard);
    }

    fn set_user(&self, user: &UserParams) {
        let user = to_sentry_user(user);
        Hub::current().configure_scope(|scope| scope.set_user(Some(user)));
    }

    fn set_extra(&self, key: &str, value: Value) {
        Hub::current().configure_scope(|scope| scope.set_extra(key, value));
    }

    fn add_breadcrumb(&self, breadcrumb: Breadcrumb) {
        Hub::current().add_breadcrumb(to_sentry_breadcrumb(breadcrumb));
    }

    fn capture_exception(&self, error: &(dyn std::error::Error + Send + Sync + 'static)) {
        Hub::current().capture_error(error);
    }

    /// Runs the callback inside a freshly pushed scope, popped afterwards.
    fn with_scope(&self, callback: ScopeCallback) {
        let hub = Hub::current();
        let _scope_guard = hub.push_scope();
        callback(&mut SentryScope { hub: &hub });
    }

    fn start_transaction(&self, params: &TransactionParams) -> SentryTransaction {
        let context = TransactionContext::new(&params.name, &params.op);
        let transaction = Hub::current().start_transaction(context);

        if let Some(description) = &params.description {
            transaction.set_data("description", Value::String(description.clone()));
        }

        SentryTransaction(transaction)
    }
}

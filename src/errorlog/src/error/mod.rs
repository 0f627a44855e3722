//! Error values the facade understands and their normalized form.

mod custom;
mod level;
mod normalize;
mod response;

pub use custom::CustomError;
pub use level::ErrorLevel;
pub use normalize::NormalizedError;
pub use response::{RequestConfig, ResponseError, ResponseSnapshot};

use serde_json::Value;
use std::borrow::Cow;

/// An error that can be handed to [`crate::ErrorLog::exception`].
///
/// Every accessor is optional. Plain errors only need `impl ReportableError
/// for MyError {}`; structured errors expose a key, a level and data, and
/// errors produced by a failed outbound HTTP call expose both the request
/// config and the response snapshot.
pub trait ReportableError: std::error::Error + Send + Sync + 'static {
    /// Display name of the error kind.
    fn name(&self) -> Cow<'_, str> {
        Cow::Borrowed(short_type_name::<Self>())
    }

    fn message(&self) -> String {
        self.to_string()
    }

    fn key(&self) -> Option<&str> {
        None
    }

    fn data(&self) -> Option<&Value> {
        None
    }

    fn level(&self) -> Option<ErrorLevel> {
        None
    }

    fn request_config(&self) -> Option<&RequestConfig> {
        None
    }

    fn response(&self) -> Option<&ResponseSnapshot> {
        None
    }
}

fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let path = full.split('<').next().unwrap_or(full);
    path.rsplit("::").next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;

    #[derive(Debug)]
    struct PlainFailure;

    impl fmt::Display for PlainFailure {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "plain failure")
        }
    }

    impl std::error::Error for PlainFailure {}
    impl ReportableError for PlainFailure {}

    #[test]
    fn test_defaults_for_plain_errors() {
        let error = PlainFailure;

        assert_eq!(error.name(), "PlainFailure");
        assert_eq!(error.message(), "plain failure");
        assert!(error.key().is_none());
        assert!(error.data().is_none());
        assert!(error.level().is_none());
        assert!(error.request_config().is_none());
        assert!(error.response().is_none());
    }
}

use crate::backend::UserParams;
use serde::Serialize;
use serde_json::Value;
use typed_builder::TypedBuilder;

/// The parts of an inbound HTTP request that get reported.
#[derive(Debug, Clone, PartialEq, Serialize, TypedBuilder)]
pub struct RequestInfo {
    #[builder(setter(into))]
    pub method: String,
    /// Path plus query string as received.
    #[builder(setter(into))]
    pub original_url: String,
    #[builder(default)]
    pub body: Value,
    #[builder(default)]
    pub params: Value,
    #[builder(default, setter(strip_option, into))]
    pub id: Option<String>,
    #[builder(default, setter(strip_option))]
    pub user: Option<UserParams>,
}

impl RequestInfo {
    /// Name of the transaction opened for this request.
    pub fn transaction_name(&self) -> String {
        format!("{} {}", self.method.to_uppercase(), self.original_url)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, TypedBuilder)]
pub struct TransactionParams {
    #[builder(setter(into))]
    pub name: String,
    #[builder(setter(into))]
    pub op: String,
    #[builder(default, setter(strip_option, into))]
    pub description: Option<String>,
}

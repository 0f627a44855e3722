/// Indentation used whenever structured values are rendered as JSON text.
pub const JSON_INDENT: &[u8] = b"  ";

/// Key assigned to HTTP response errors whose body carries no key of its own.
pub const RESPONSE_ERROR_KEY: &str = "responseError";
pub const UNKNOWN_ERROR_KEY: &str = "unknownError";

pub const CONTEXT_SCALAR_KEY: &str = "data";
pub const INVALID_CONTEXT_VALUE: &str = "Invalid value";

pub const ERROR_DATA_BREADCRUMB: &str = "Error data";
pub const ERROR_KEY_TAG: &str = "error.key";

pub const EXTRA_METHOD: &str = "Method";
pub const EXTRA_ROUTE: &str = "Route";
pub const EXTRA_BODY: &str = "Body";
pub const EXTRA_PARAMS: &str = "Params";
pub const EXTRA_REQUEST_ID: &str = "RequestId";

pub const HTTP_REQUEST_OP: &str = "http.request";

pub const DEFAULT_ENVIRONMENT: &str = "development";
pub const DEFAULT_TRACES_SAMPLE_RATE: f32 = 1.0;

pub const LOG_TARGET: &str = "errorlog";
pub const LOG_FILE_NAME: &str = "errorlog.log";

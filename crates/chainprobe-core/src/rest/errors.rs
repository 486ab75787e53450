use thiserror::Error;

/// Error codes the gateway places in `error.code`.
pub mod codes {
    pub const UNKNOWN_VALIDATOR_ERROR: i64 = 10;
    pub const VALIDATOR_NOT_READY: i64 = 15;
    pub const VALIDATOR_TIMED_OUT: i64 = 17;
    pub const VALIDATOR_DISCONNECTED: i64 = 18;
    pub const INVALID_COUNT_QUERY: i64 = 53;
    pub const INVALID_PAGING_QUERY: i64 = 54;
    pub const INVALID_SORT_QUERY: i64 = 57;
    pub const INVALID_RESOURCE_ID: i64 = 60;
    pub const INVALID_STATE_ADDRESS: i64 = 62;
    pub const BLOCK_NOT_FOUND: i64 = 70;
    pub const BATCH_NOT_FOUND: i64 = 71;
    pub const TRANSACTION_NOT_FOUND: i64 = 72;
    pub const STATE_NOT_FOUND: i64 = 75;
    pub const RECEIPT_NOT_FOUND: i64 = 80;
}

/// Classification of gateway error codes.
///
/// - Validator errors mean the gateway is up but its validator is not; worth retrying.
/// - Query errors mean the request itself was wrong.
/// - Not-found errors are ordinary answers, not failures of the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiErrorCategory {
    ValidatorUnavailable,
    InvalidQuery,
    NotFound,
    Other,
}

impl ApiErrorCategory {
    #[must_use]
    pub fn from_code(code: i64) -> Self {
        match code {
            codes::UNKNOWN_VALIDATOR_ERROR |
            codes::VALIDATOR_NOT_READY |
            codes::VALIDATOR_TIMED_OUT |
            codes::VALIDATOR_DISCONNECTED => Self::ValidatorUnavailable,
            50..=69 => Self::InvalidQuery,
            70..=89 => Self::NotFound,
            _ => Self::Other,
        }
    }

    #[must_use]
    pub fn is_transient(self) -> bool {
        matches!(self, Self::ValidatorUnavailable)
    }

    /// Returns a static string representation for log fields.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ValidatorUnavailable => "validator_unavailable",
            Self::InvalidQuery => "invalid_query",
            Self::NotFound => "not_found",
            Self::Other => "other",
        }
    }
}

/// Errors raised while talking to a node's REST gateway.
///
/// Transport failures (`Timeout`, `ConnectionFailed`, `Network`) are kept apart
/// from answers the gateway gave (`Api`, `Http`, `Decode`).
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum RestError {
    /// Request exceeded the configured timeout.
    #[error("Request timeout")]
    Timeout,

    /// The node could not be reached.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Other failure inside the HTTP client.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-2xx response carrying the gateway's error object.
    #[error("API error {code} ({title}): {message} [HTTP {status}]")]
    Api { status: u16, code: i64, title: String, message: String },

    /// Non-2xx response whose body is not a gateway error object.
    #[error("HTTP error {0}: {1}")]
    Http(u16, String),

    /// 2xx response whose body is not the expected JSON shape.
    #[error("Malformed response: {0}")]
    Decode(String),

    #[error("Invalid node address: {0}")]
    InvalidAddress(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl RestError {
    /// Returns `true` if the request never got an answer from the gateway.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Timeout | Self::ConnectionFailed(_) | Self::Network(_))
    }

    /// Gateway error code, if the gateway answered with one.
    #[must_use]
    pub fn api_code(&self) -> Option<i64> {
        match self {
            Self::Api { code, .. } => Some(*code),
            _ => None,
        }
    }

    #[must_use]
    pub fn api_category(&self) -> Option<ApiErrorCategory> {
        self.api_code().map(ApiErrorCategory::from_code)
    }

    /// Returns `true` if asking again later may succeed.
    ///
    /// Transport failures, 5xx/429 responses and validator-unavailable codes are
    /// transient. Query errors, not-found answers and malformed payloads are not.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout | Self::ConnectionFailed(_) | Self::Network(_) => true,
            Self::Api { status, code, .. } => {
                ApiErrorCategory::from_code(*code).is_transient() || (500..=599).contains(status)
            }
            Self::Http(status, _) => (500..=599).contains(status) || *status == 429,
            _ => false,
        }
    }
}

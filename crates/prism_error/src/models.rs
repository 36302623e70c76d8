//! Model provider errors and retry classification.

/// Chat-completion provider error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ModelsErrorKind {
    /// API key environment variable not set
    #[display("{} environment variable not set", _0)]
    MissingApiKey(String),
    /// Transport-level failure (connect, timeout, TLS)
    #[display("HTTP request failed: {}", _0)]
    Http(String),
    /// Non-success status returned by the API
    #[display("API error {}: {}", status, message)]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body or error message
        message: String,
    },
    /// 429 Too Many Requests
    #[display("Rate limit exceeded")]
    RateLimit,
    /// Response body could not be decoded
    #[display("Failed to parse response: {}", _0)]
    ResponseParsing(String),
    /// Response decoded but carried no choices
    #[display("Response contained no choices")]
    EmptyResponse,
    /// Request could not be constructed
    #[display("Invalid request: {}", _0)]
    InvalidRequest(String),
}

impl ModelsErrorKind {
    /// Check if this error type should be retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            ModelsErrorKind::Http(_) | ModelsErrorKind::RateLimit => true,
            ModelsErrorKind::Api { status, .. } => {
                matches!(*status, 408 | 500 | 502 | 503 | 504)
            }
            _ => false,
        }
    }
}

/// Model provider error with location tracking.
///
/// # Examples
///
/// ```
/// use prism_error::{ModelsError, ModelsErrorKind, RetryableError};
///
/// let err = ModelsError::new(ModelsErrorKind::Api {
///     status: 503,
///     message: "Service unavailable".to_string(),
/// });
/// assert!(err.is_retryable());
///
/// let err = ModelsError::new(ModelsErrorKind::MissingApiKey("ZHIPUAI_API_KEY".to_string()));
/// assert!(!err.is_retryable());
/// assert!(format!("{}", err).contains("ZHIPUAI_API_KEY"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Models Error: {} at {}:{}", kind, file, line)]
pub struct ModelsError {
    /// The specific error kind
    pub kind: ModelsErrorKind,
    /// Line number where error occurred
    pub line: u32,
    /// Source file where error occurred
    pub file: &'static str,
}

impl ModelsError {
    /// Create a new models error.
    #[track_caller]
    pub fn new(kind: ModelsErrorKind) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// Trait for errors that support retry logic.
pub trait RetryableError {
    /// Returns true if this error should trigger a retry.
    ///
    /// Transient failures (rate limits, 5xx, dropped connections) return true.
    /// Permanent failures (bad credentials, malformed requests) return false.
    fn is_retryable(&self) -> bool;
}

impl RetryableError for ModelsError {
    fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}

/// Result type for model operations.
pub type ModelsResult<T> = Result<T, ModelsError>;

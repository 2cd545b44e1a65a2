use thiserror::Error;

/// Main error type for store API operations
///
/// HTTP error statuses are not represented here: a `401` or `500` from the
/// server is a successful call as far as this crate is concerned, and the raw
/// response is handed back to the caller.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The configured OAuth signature method is not one we can compute
    #[error("unsupported signature method: {0}")]
    UnsupportedSignatureMethod(String),

    /// Configuration rejected at client construction
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Request building error
    #[error("failed to build request: {0}")]
    RequestBuild(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP transport error (DNS, TLS, timeout, connection reset)
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing error
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl ApiError {
    /// Check if this error comes from client configuration rather than the network
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            ApiError::UnsupportedSignatureMethod(_) | ApiError::InvalidConfig(_)
        )
    }

    /// Check if this error is a transport timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, ApiError::Http(e) if e.is_timeout())
    }
}

/// Result type for store API operations
pub type Result<T> = std::result::Result<T, ApiError>;

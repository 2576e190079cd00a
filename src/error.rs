use thiserror::Error;

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Failure of a single endpoint call. Batch callers decide per variant whether
/// to skip the unit of work or abort the run; see `is_transient`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),

    #[error("api error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("parse error: {0}")]
    Parse(String),
}

impl ApiError {
    /// Transient failures may be skipped by batch callers. Quota exhaustion
    /// arrives as an ordinary non-2xx status and is indistinguishable from
    /// any other request failure, so every request-level error is transient;
    /// only an undecodable body is structural.
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Network(_) | ApiError::Api { .. } => true,
            ApiError::Parse(_) => false,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Parse(err.to_string())
    }
}

use h2plan_core::error::{RangeError, TargetSetError};

/// Transport-level failures: recoverable, surfaced per call. A polling loop
/// reports them and keeps going on the next tick.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("worker returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to decode worker response: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Client-facing error taxonomy.
///
/// `Validation` and `CombinationLimitExceeded` are raised before any network
/// call; `Transport` is recoverable; `Worker` is terminal for the job it
/// came from and carries the worker's message verbatim.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("invalid parameter: {field} - {message}")]
    Validation { field: String, message: String },

    #[error("combination count ({total}) exceeds the maximum allowed ({limit}); narrow the ranges")]
    CombinationLimitExceeded { total: u64, limit: u64 },

    #[error(transparent)]
    Range(#[from] RangeError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("worker failed: {0}")]
    Worker(String),
}

impl From<TargetSetError> for ClientError {
    fn from(err: TargetSetError) -> Self {
        ClientError::Validation {
            field: "targets".to_string(),
            message: err.to_string(),
        }
    }
}

/// Helper type for client results
pub type ClientResult<T> = Result<T, ClientError>;

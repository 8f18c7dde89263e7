//! Failures a proxied invocation can end in.
//!
//! Each collaborator raises its own type and [`HandleError`] carries it through
//! untouched, so the router sees the same message the failing component produced.

use thiserror::Error;

/// Malformed input, detected before any side effect.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProxyError {
    #[error("missing path")]
    MissingPath,
}

/// The counter could not be incremented. The write must be treated as not applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("hit store unreachable: {0}")]
    Unreachable(String),
    #[error("hit store throttled: {0}")]
    Throttled(String),
    #[error("hit store rejected the write: {0}")]
    Rejected(String),
    #[error("hit store returned an unusable response: {0}")]
    InvalidResponse(String),
}

/// The downstream function failed or could not be reached.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct DownstreamError {
    /// `errorType` reported by the downstream function, if it reported one.
    pub error_type: Option<String>,
    pub message: String,
}

impl DownstreamError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error_type: None,
            message: message.into(),
        }
    }

    pub fn with_type(error_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_type: Some(error_type.into()),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandleError {
    #[error(transparent)]
    Proxy(#[from] ProxyError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Downstream(#[from] DownstreamError),
}

//! Error types shared by the ports and the classification core.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure reported by a vendor-facing port.
///
/// Serializable so that recorded cassettes can replay failures verbatim.
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ApiError {
    /// The request never produced a response (DNS, connect, TLS, read).
    #[error("request failed: {message}")]
    Network {
        /// Transport error text.
        message: String,
    },
    /// The vendor answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Reason phrase or leading part of the body.
        message: String,
    },
    /// The body was not JSON or did not match the expected shape.
    #[error("invalid response format: {message}")]
    Malformed {
        /// Parser error text.
        message: String,
    },
    /// The request was rejected before it was sent.
    #[error("invalid request: {message}")]
    InvalidRequest {
        /// Why the request was rejected.
        message: String,
    },
}

impl ApiError {
    pub(crate) fn network(err: impl std::fmt::Display) -> Self {
        Self::Network { message: err.to_string() }
    }

    pub(crate) fn malformed(err: impl std::fmt::Display) -> Self {
        Self::Malformed { message: err.to_string() }
    }
}

/// Why a classification turn ended in the errored state.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClassifyError {
    /// The request was rejected or the vendor returned a non-2xx status.
    #[error("Classification failed: {0}")]
    NetworkFailure(String),
    /// The response body was missing or unparseable.
    #[error("Classification failed: {0}")]
    MalformedResponse(String),
    /// The vendor repeated the question just answered and offered no headings.
    #[error("Same question returned: invalid answer or API fault")]
    ProtocolStall,
    /// An answer was submitted without an active transaction and question.
    #[error("Invalid state for submitting answer")]
    InvalidLocalState,
    /// The response matched none of the known shapes.
    #[error("Unexpected response format")]
    UnexpectedResponse,
}

impl From<ApiError> for ClassifyError {
    fn from(value: ApiError) -> Self {
        match value {
            ApiError::Malformed { .. } => Self::MalformedResponse(value.to_string()),
            ApiError::Network { .. } | ApiError::Status { .. } | ApiError::InvalidRequest { .. } => {
                Self::NetworkFailure(value.to_string())
            }
        }
    }
}

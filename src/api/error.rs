//! API Error Types
//!
//! Errors returned by calls against the remote diabetes API. Transport
//! failures (the request never produced a usable answer) are kept apart
//! from rejections (the server answered with a non-success status), since
//! session restore treats the two very differently.

use thiserror::Error;

/// Errors that can occur when talking to the remote API
#[derive(Error, Debug)]
pub enum ApiError {
    /// Could not connect to the server
    #[error("Server unavailable")]
    Unavailable,

    /// The transport-level timeout elapsed
    #[error("Request timeout")]
    Timeout,

    /// Any other transport failure
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// A success response whose body did not have the expected shape
    #[error("Invalid response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Classify a reqwest failure
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else if err.is_connect() {
            ApiError::Unavailable
        } else if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Request(err)
        }
    }

    /// True unless the server explicitly rejected the request
    pub fn is_transport(&self) -> bool {
        !matches!(self, ApiError::Rejected { .. })
    }

    /// HTTP status of a rejection
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

//! # Gateway Error Types
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Gateway Error Categories                          │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │     Reads       │  │       Writes            │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  Config         │  │  Fetch          │  │  Write { op }           │ │
//! │  │  Image          │  │  { endpoint,    │  │  { endpoint, op,        │ │
//! │  │                 │  │    cause }      │  │    cause }              │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  FailureCause: Network (no response) │ Status (non-2xx) │ Decode      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;
use thiserror::Error;

use crate::endpoint::Endpoint;
use crate::transport::TransportError;

/// Result type alias for gateway operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// The kind of write that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOp {
    Create,
    Update,
    Delete,
}

impl fmt::Display for WriteOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteOp::Create => write!(f, "create"),
            WriteOp::Update => write!(f, "update"),
            WriteOp::Delete => write!(f, "delete"),
        }
    }
}

/// Why a request failed.
#[derive(Debug, Error)]
pub enum FailureCause {
    /// No response at all.
    #[error(transparent)]
    Network(#[from] TransportError),

    /// The server answered with a non-success status.
    #[error("{message} (HTTP {status})")]
    Status { status: u16, message: String },

    /// The response body was not the expected shape.
    #[error("Unexpected response body: {0}")]
    Decode(String),
}

impl FailureCause {
    pub fn status(&self) -> Option<u16> {
        match self {
            FailureCause::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for FailureCause {
    fn from(err: serde_json::Error) -> Self {
        FailureCause::Decode(err.to_string())
    }
}

/// Gateway error type.
#[derive(Debug, Error)]
pub enum ApiError {
    // =========================================================================
    // Request Errors
    // =========================================================================
    /// A read failed. Nothing was cached.
    #[error("Failed to load {endpoint}: {cause}")]
    Fetch {
        endpoint: Endpoint,
        #[source]
        cause: FailureCause,
    },

    /// A write failed. The cache was left untouched.
    #[error("Failed to {op} {endpoint}: {cause}")]
    Write {
        endpoint: Endpoint,
        op: WriteOp,
        #[source]
        cause: FailureCause,
    },

    // =========================================================================
    // Local Errors
    // =========================================================================
    /// Invalid or unreadable configuration.
    #[error("Invalid API configuration: {0}")]
    Config(String),

    /// An image upload could not be prepared.
    #[error("Invalid image: {0}")]
    Image(String),
}

impl ApiError {
    pub fn fetch(endpoint: Endpoint, cause: impl Into<FailureCause>) -> Self {
        ApiError::Fetch {
            endpoint,
            cause: cause.into(),
        }
    }

    pub fn write(endpoint: Endpoint, op: WriteOp, cause: impl Into<FailureCause>) -> Self {
        ApiError::Write {
            endpoint,
            op,
            cause: cause.into(),
        }
    }

    /// The underlying cause of a request failure.
    pub fn cause(&self) -> Option<&FailureCause> {
        match self {
            ApiError::Fetch { cause, .. } | ApiError::Write { cause, .. } => Some(cause),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::Config(err.to_string())
    }
}

impl From<toml::de::Error> for ApiError {
    fn from(err: toml::de::Error) -> Self {
        ApiError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = ApiError::write(
            Endpoint::Penjualan,
            WriteOp::Create,
            FailureCause::Status {
                status: 500,
                message: "Server error".into(),
            },
        );
        assert_eq!(err.to_string(), "Failed to create penjualan: Server error (HTTP 500)");
        assert_eq!(err.cause().and_then(FailureCause::status), Some(500));

        let err = ApiError::fetch(Endpoint::Category, TransportError::Timeout("http://x".into()));
        assert!(err.to_string().starts_with("Failed to load category"));
    }
}

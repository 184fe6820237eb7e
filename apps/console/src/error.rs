//! # App Error Type
//!
//! Unified error type for screens and commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Warteg Console                         │
//! │                                                                         │
//! │  Screen action                                                          │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Validation Error? ─── ValidationError ────────────┐                   │
//! │         │                                          │                   │
//! │         ▼                                          ▼                   │
//! │  Business rule? ─────── CoreError::EmptyOrder ── AppError ──► Notifier │
//! │         │                                          ▲                   │
//! │         ▼                                          │                   │
//! │  Gateway call? ──────── ApiError::Write { .. } ────┘                   │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Success ──────────────────────────────────────────────────► Notifier  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing here is fatal: the screen keeps its state and the operator can
//! retry.

use serde::Serialize;
use warteg_api::{ApiError, FailureCause};
use warteg_core::{CoreError, ValidationError};

/// Error returned from screens and commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "EMPTY_ORDER",
///   "message": "Order is empty, add at least one product before saving"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,

    /// The operator already saw this failure as a notification.
    #[serde(skip)]
    pub notified: bool,
}

/// Error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Form input failed validation; nothing was sent
    ValidationError,

    /// Record or product not found
    NotFound,

    /// Save pressed on an empty order or purchase draft
    EmptyOrder,

    /// Action not valid in the current screen state
    InvalidState,

    /// The API could not be reached
    NetworkError,

    /// The API rejected the request (4xx)
    Rejected,

    /// The API failed (5xx)
    ServerError,

    /// The API answered with an unexpected body
    InvalidResponse,

    /// Configuration problem
    ConfigError,

    /// Local I/O (stdin, image files)
    IoError,
}

/// Result type alias for console operations.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        AppError {
            code,
            message: message.into(),
            notified: false,
        }
    }

    /// Marks the error as already shown through the notifier.
    pub fn notified(mut self) -> Self {
        self.notified = true;
        self
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        AppError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::ValidationError, message)
    }

    pub fn invalid_state(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::InvalidState, message)
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::validation(err.to_string())
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::EmptyOrder | CoreError::EmptyDraft => AppError::new(ErrorCode::EmptyOrder, err.to_string()),
            CoreError::ProductNotFound(id) => AppError::not_found("Product", &id),
            CoreError::LineNotFound { .. } => AppError::new(ErrorCode::NotFound, err.to_string()),
            CoreError::Validation(e) => e.into(),
        }
    }
}

impl From<ApiError> for AppError {
    fn from(err: ApiError) -> Self {
        let code = match &err {
            ApiError::Fetch { cause, .. } | ApiError::Write { cause, .. } => match cause {
                FailureCause::Network(_) => ErrorCode::NetworkError,
                FailureCause::Status { status: 404, .. } => ErrorCode::NotFound,
                FailureCause::Status { status, .. } if *status >= 500 => ErrorCode::ServerError,
                FailureCause::Status { .. } => ErrorCode::Rejected,
                FailureCause::Decode(_) => {
                    tracing::error!(error = %err, "Unexpected API response");
                    ErrorCode::InvalidResponse
                }
            },
            ApiError::Config(_) => ErrorCode::ConfigError,
            ApiError::Image(_) => ErrorCode::ValidationError,
        };
        AppError::new(code, err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::new(ErrorCode::IoError, err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {}

//! # Error Types
//!
//! Domain-specific error types for warteg-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  warteg-core errors (this file)                                        │
//! │  ├── CoreError        - Order / draft rule violations                  │
//! │  └── ValidationError  - Form field failures                            │
//! │                                                                         │
//! │  warteg-api errors (separate crate)                                    │
//! │  └── ApiError         - FetchError / WriteError from the gateway       │
//! │                                                                         │
//! │  console errors (in app)                                               │
//! │  └── AppError         - What the operator sees                         │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError ─┐                                  │
//! │                        ApiError ────┴──► AppError → Notification       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Business rule violations raised before any request is made.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Submit attempted on a cart with zero lines.
    ///
    /// ## When This Occurs
    /// - The cashier presses save on a fresh POS session
    /// - The last line was removed and save pressed again
    ///
    /// No request is issued in this case.
    #[error("Order is empty, add at least one product before saving")]
    EmptyOrder,

    /// Save attempted on a purchase draft with zero lines.
    #[error("Purchase draft is empty, nothing to save")]
    EmptyDraft,

    /// A product id that is not in the currently loaded catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// A draft line index that does not exist.
    #[error("No purchase line at position {index} (draft has {len} lines)")]
    LineNotFound { index: usize, len: usize },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Form validation errors.
///
/// These are caught at the form boundary and never reach the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or blank.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must be zero or more.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Two related values disagree (e.g. a total that is not price × qty).
    #[error("{field} is inconsistent: {reason}")]
    Inconsistent { field: String, reason: String },

    /// Invalid format (e.g. an unparseable date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Shorthand for [`ValidationError::Required`].
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

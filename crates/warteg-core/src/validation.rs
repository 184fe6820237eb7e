//! # Validation Module
//!
//! Form validation for everything the client sends to the API.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Form input (console)                                         │
//! │  ├── Argument parsing (clap types, dates)                              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Required fields, positive amounts, consistent totals              │
//! │  └── Runs before the gateway is called; a failure keeps the form open  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Remote API                                                   │
//! │  └── Its own constraints; rejections surface as WriteError             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use warteg_core::types::NewCategory;
//! use warteg_core::validation::Validate;
//!
//! let draft = NewCategory { category_name: "Minuman".into() };
//! assert!(draft.validate().is_ok());
//!
//! let blank = NewCategory { category_name: "  ".into() };
//! assert!(blank.validate().is_err());
//! ```

use crate::error::ValidationError;
use crate::types::{CreatePenjualan, NewBahanBaku, NewBelanja, NewCategory, NewProduk};
use crate::{MAX_NAME_LEN, MAX_SEARCH_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Validate Trait
// =============================================================================

/// A draft that can check itself before being sent.
pub trait Validate {
    fn validate(&self) -> ValidationResult<()>;
}

impl Validate for NewCategory {
    fn validate(&self) -> ValidationResult<()> {
        validate_name("categoryName", &self.category_name)
    }
}

impl Validate for NewBahanBaku {
    fn validate(&self) -> ValidationResult<()> {
        validate_name("namaBahanBaku", &self.nama_bahan_baku)?;
        validate_optional_text("supplier", self.supplier.as_deref())?;
        validate_optional_text("merk", self.merk.as_deref())
    }
}

/// ## Rules
/// - `bahanBakuId` present
/// - `hargaSatuan > 0`, `qty > 0`
/// - `hargaTotal == hargaSatuan × qty`
impl Validate for NewBelanja {
    fn validate(&self) -> ValidationResult<()> {
        validate_required("bahanBakuId", &self.bahan_baku_id)?;
        if let Some(nama) = &self.nama_bahan_baku {
            validate_required("namaBahanBaku", nama)?;
        }
        validate_positive("hargaSatuan", self.harga_satuan)?;
        validate_positive("qty", self.qty)?;

        let expected = self.harga_satuan.checked_mul(self.qty);
        if expected != Some(self.harga_total) {
            return Err(ValidationError::Inconsistent {
                field: "hargaTotal".to_string(),
                reason: "must equal hargaSatuan × qty".to_string(),
            });
        }
        Ok(())
    }
}

impl Validate for NewProduk {
    fn validate(&self) -> ValidationResult<()> {
        validate_name("namaProduk", &self.nama_produk)?;
        validate_price("harga", self.harga)?;
        validate_required("categoryId", &self.category_id)?;
        if let Some(image) = &self.image {
            if image.bytes.is_empty() {
                return Err(ValidationError::required("image"));
            }
            if !image.content_type.starts_with("image/") {
                return Err(ValidationError::InvalidFormat {
                    field: "image".to_string(),
                    reason: format!("expected an image, got {}", image.content_type),
                });
            }
        }
        Ok(())
    }
}

/// A batch must not be empty and each item must be self-consistent.
impl Validate for CreatePenjualan {
    fn validate(&self) -> ValidationResult<()> {
        if self.items.is_empty() {
            return Err(ValidationError::required("items"));
        }
        for item in &self.items {
            validate_required("produkId", &item.produk_id)?;
            validate_positive("qty", item.qty)?;
            validate_price("harga", item.harga)?;
            if item.harga.checked_mul(item.qty) != Some(item.harga_total) {
                return Err(ValidationError::Inconsistent {
                    field: "hargaTotal".to_string(),
                    reason: format!("item {} must equal harga × qty", item.produk_id),
                });
            }
        }
        Ok(())
    }
}

// =============================================================================
// String Validators
// =============================================================================

/// Non-blank after trimming.
pub fn validate_required(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::required(field));
    }
    Ok(())
}

/// Validates a display name.
///
/// ## Rules
/// - Must not be blank
/// - At most [`MAX_NAME_LEN`] characters
pub fn validate_name(field: &str, value: &str) -> ValidationResult<()> {
    validate_required(field, value)?;
    validate_optional_text(field, Some(value))
}

fn validate_optional_text(field: &str, value: Option<&str>) -> ValidationResult<()> {
    match value {
        Some(v) if v.trim().chars().count() > MAX_NAME_LEN => Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        }),
        _ => Ok(()),
    }
}

/// Validates a search term.
///
/// ## Rules
/// - Can be empty (no filter)
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed term, or `None` when it is blank.
pub fn validate_search_term(term: &str) -> ValidationResult<Option<String>> {
    let term = term.trim();

    if term.chars().count() > MAX_SEARCH_LEN {
        return Err(ValidationError::TooLong {
            field: "search".to_string(),
            max: MAX_SEARCH_LEN,
        });
    }

    Ok((!term.is_empty()).then(|| term.to_string()))
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Strictly positive (quantities, purchase unit prices).
pub fn validate_positive(field: &str, value: i64) -> ValidationResult<()> {
    if value <= 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Zero or more. A zero price is allowed (free items).
pub fn validate_price(field: &str, value: i64) -> ValidationResult<()> {
    if value < 0 {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

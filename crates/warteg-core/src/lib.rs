//! # warteg-core: Pure Business Logic for Warteg POS
//!
//! This crate holds everything the warteg client decides on its own, with
//! zero I/O. The remote API owns the data; this crate owns the rules for
//! building what gets sent to it.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Warteg POS Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Console (apps/console)                       │   │
//! │  │    CRUD screens ──► POS screen ──► Purchase draft ──► Dashboard │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ warteg-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐  ┌─────────┐  ┌─────────┐  ┌──────────────────┐  │   │
//! │  │   │  types  │  │  money  │  │  cart   │  │ validation       │  │   │
//! │  │   │ Produk  │  │  Money  │  │  Cart   │  │ purchase         │  │   │
//! │  │   │ Belanja │  │         │  │OrderLine│  │ dashboard        │  │   │
//! │  │   └─────────┘  └─────────┘  └─────────┘  └──────────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO CACHE • PURE FUNCTIONS              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 warteg-api (Remote Data Gateway)                │   │
//! │  │            HTTP endpoints, tag cache, configuration             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Wire records (Category, BahanBaku, Belanja, Produk, Penjualan, Dashboard)
//! - [`money`] - Integer Rupiah amounts
//! - [`cart`] - The POS order list (cart aggregator)
//! - [`purchase`] - The daily purchase draft ("Belanja Harian")
//! - [`dashboard`] - Sales / purchase trend summaries
//! - [`validation`] - Form validation before anything reaches the API
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use warteg_core::cart::Cart;
//! use warteg_core::money::Money;
//!
//! let mut cart = Cart::new();
//! cart.add_item("p1", "Nasi", Money::from_rupiah(5000)).unwrap();
//! cart.add_item("p1", "Nasi", Money::from_rupiah(5000)).unwrap();
//! cart.add_item("p2", "Teh", Money::from_rupiah(3000)).unwrap();
//!
//! assert_eq!(cart.len(), 2);
//! assert_eq!(cart.grand_total().rupiah(), 13000);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod dashboard;
pub mod error;
pub mod money;
pub mod purchase;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartTotals, OrderLine, ProductRef};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use purchase::PurchaseDraft;
pub use types::*;
pub use validation::Validate;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum length of a free-text search term sent to the API.
pub const MAX_SEARCH_LEN: usize = 100;

/// Maximum length of a display name (category, product, raw material).
pub const MAX_NAME_LEN: usize = 200;

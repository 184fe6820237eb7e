//! # Screens
//!
//! Screen controllers hold the state a page renders and call the gateway.
//! They never print; commands render their state.
//!
//! | Screen | Page |
//! |---|---|
//! | [`CrudScreen`] | Kategori, Bahan Baku, Belanja, Produk |
//! | [`PurchaseScreen`] | Belanja Harian (draft + batch save) |
//! | [`PosScreen`] | Penjualan (cart) |
//! | [`DashboardScreen`] | Dashboard |

pub mod crud;
pub mod dashboard;
pub mod pos;
pub mod purchase;

pub use crud::{CrudScreen, LoadState, Modal};
pub use dashboard::{DashboardScreen, DashboardView, PopularCard};
pub use pos::{PosScreen, ALL_CATEGORY};
pub use purchase::PurchaseScreen;

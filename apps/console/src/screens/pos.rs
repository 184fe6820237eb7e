//! # POS Screen
//!
//! Category list, product search and the product grid bound to a [`Cart`].
//!
//! ## User Workflow
//! 1. Pick a category ("All Category" shows everything) or type a search term
//! 2. Tap products to add them (repeated taps bump the quantity)
//! 3. Remove lines if needed
//! 4. Save: the whole order goes out as one batch write

use std::sync::Arc;

use tracing::{info, warn};
use warteg_api::{CategoryResource, Gateway, ProdukResource};
use warteg_core::types::{Category, PenjualanCreated, Produk, ProdukFilter, TextFilter};
use warteg_core::validation::validate_search_term;
use warteg_core::{Cart, CoreError, Money, OrderLine, ProductRef};

use crate::error::{AppError, AppResult};
use crate::notify::{Notification, Notifier};

/// Label of the "no category filter" entry.
pub const ALL_CATEGORY: &str = "All Category";

pub struct PosScreen {
    gateway: Gateway,
    notifier: Arc<dyn Notifier>,
    categories: Vec<Category>,
    category_id: Option<String>,
    search: Option<String>,
    products: Vec<Produk>,
    cart: Cart,
}

impl PosScreen {
    pub fn new(gateway: Gateway, notifier: Arc<dyn Notifier>) -> Self {
        PosScreen {
            gateway,
            notifier,
            categories: Vec::new(),
            category_id: None,
            search: None,
            products: Vec::new(),
            cart: Cart::new(),
        }
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    pub async fn load_categories(&mut self) -> AppResult<&[Category]> {
        match self.gateway.list::<CategoryResource>(&TextFilter::default()).await {
            Ok(categories) => {
                self.categories = categories;
                Ok(&self.categories)
            }
            Err(e) => {
                self.notifier.notify(Notification::error(e.to_string()));
                Err(AppError::from(e).notified())
            }
        }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Selected category name, or [`ALL_CATEGORY`].
    pub fn category_label(&self) -> &str {
        self.category_id
            .as_deref()
            .and_then(|id| self.categories.iter().find(|c| c.category_id == id))
            .map(|c| c.category_name.as_str())
            .unwrap_or(ALL_CATEGORY)
    }

    /// `None` selects every category.
    pub async fn set_category(&mut self, category_id: Option<String>) -> AppResult<()> {
        self.category_id = category_id.filter(|id| !id.trim().is_empty());
        self.refresh_products().await
    }

    pub async fn set_search(&mut self, term: &str) -> AppResult<()> {
        self.search = validate_search_term(term)?;
        self.refresh_products().await
    }

    pub async fn refresh_products(&mut self) -> AppResult<()> {
        let filter = ProdukFilter {
            search: self.search.clone(),
            category_id: self.category_id.clone(),
        };
        match self.gateway.list::<ProdukResource>(&filter).await {
            Ok(products) => {
                self.products = products;
                Ok(())
            }
            Err(e) => {
                self.notifier.notify(Notification::error(e.to_string()));
                Err(AppError::from(e).notified())
            }
        }
    }

    pub fn products(&self) -> &[Produk] {
        &self.products
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Adds one unit of a product from the loaded grid.
    pub fn add_product(&mut self, produk_id: &str) -> AppResult<&OrderLine> {
        let product = self
            .products
            .iter()
            .find(|p| p.produk_id == produk_id)
            .map(ProductRef::from)
            .ok_or_else(|| CoreError::ProductNotFound(produk_id.to_string()))?;

        self.cart.add_product(product)?;
        self.cart
            .line(produk_id)
            .ok_or_else(|| CoreError::ProductNotFound(produk_id.to_string()).into())
    }

    /// Drops a cart line. Removing a product that is not in the cart is a no-op.
    pub fn remove_item(&mut self, produk_id: &str) -> Option<OrderLine> {
        self.cart.remove_item(produk_id)
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn grand_total(&self) -> Money {
        self.cart.grand_total()
    }

    /// Sends the whole cart as one `POST /penjualan`.
    ///
    /// Empty or invalid cart: no request. Any 2xx clears the cart; failure
    /// keeps it.
    pub async fn submit(&mut self) -> AppResult<PenjualanCreated> {
        let batch = match self.cart.to_batch() {
            Ok(batch) => batch,
            Err(CoreError::EmptyOrder) => {
                self.notifier.notify(Notification::error("Tidak ada data untuk disimpan!"));
                return Err(AppError::from(CoreError::EmptyOrder).notified());
            }
            Err(e) => {
                self.notifier.notify(Notification::error(e.to_string()));
                return Err(AppError::from(e).notified());
            }
        };

        match self.gateway.create_penjualan(&batch).await {
            Ok(created) => {
                info!(lines = batch.items.len(), total = %self.cart.grand_total(), "Order saved");
                self.cart.clear();
                self.notifier.notify(Notification::success("Penjualan berhasil disimpan!"));
                Ok(created)
            }
            Err(e) => {
                warn!(error = %e, "Order not saved");
                self.notifier.notify(Notification::error("Gagal menyimpan penjualan."));
                Err(AppError::from(e).notified())
            }
        }
    }
}

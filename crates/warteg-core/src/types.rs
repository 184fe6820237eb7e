//! # Domain Types
//!
//! Wire records exchanged with the warteg API.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Remote Entities                                 │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Category     │◄──│     Produk      │◄──│   Penjualan     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  categoryId     │   │  produkId       │   │  penjualanId    │       │
//! │  │  categoryName   │   │  namaProduk     │   │  produkId (FK)  │       │
//! │  └─────────────────┘   │  harga, image   │   │  qty, harga     │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   BahanBaku     │◄──│    Belanja      │   │DashboardMetrics │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  bahanBakuId    │   │  belanjaId      │   │  salesTrend     │       │
//! │  │  namaBahanBaku  │   │  tanggal        │   │  purchaseTrend  │       │
//! │  │  supplier, merk │   │  hargaSatuan    │   │  popularProducts│       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Every record id is assigned by the server. The client never mints ids;
//! `New*` drafts carry no id field at all.
//!
//! ## Naming
//! Field names follow the API's JSON: camelCase, except the server's own
//! `created_at` / `updated_at` timestamps and the embedded `Category`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::validation::ValidationResult;

// =============================================================================
// Category
// =============================================================================

/// A menu category ("Makanan", "Minuman", ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub category_id: String,
    pub category_name: String,
}

/// Create / update body for a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewCategory {
    pub category_name: String,
}

// =============================================================================
// Bahan Baku (raw material)
// =============================================================================

/// A raw material tracked for purchasing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BahanBaku {
    pub bahan_baku_id: String,
    pub nama_bahan_baku: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merk: Option<String>,
}

/// Create / update body for a raw material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewBahanBaku {
    pub nama_bahan_baku: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merk: Option<String>,
}

// =============================================================================
// Belanja (purchase)
// =============================================================================

/// A stored purchase of a raw material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Belanja {
    pub belanja_id: String,
    pub bahan_baku_id: String,
    #[serde(default)]
    pub nama_bahan_baku: Option<String>,
    /// ISO-8601 as returned by the server.
    pub tanggal: String,
    pub harga_satuan: i64,
    pub qty: i64,
    pub harga_total: i64,
    #[serde(rename = "created_at", default)]
    pub created_at: Option<String>,
    #[serde(rename = "updated_at", default)]
    pub updated_at: Option<String>,
}

impl Belanja {
    /// Returns the purchase total as Money.
    pub fn total(&self) -> Money {
        Money::from_rupiah(self.harga_total)
    }

    /// Date part of `tanggal` (`YYYY-MM-DD`), for table display.
    pub fn tanggal_date(&self) -> &str {
        self.tanggal.split('T').next().unwrap_or(&self.tanggal)
    }
}

/// One purchase line sent to `POST /belanja` (or `PUT /belanja/:id`).
///
/// `harga_total` is always `harga_satuan × qty`; build with [`NewBelanja::new`]
/// so the two never drift apart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewBelanja {
    pub bahan_baku_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nama_bahan_baku: Option<String>,
    #[serde(with = "iso8601")]
    #[ts(as = "String")]
    pub tanggal: DateTime<Utc>,
    pub harga_satuan: i64,
    pub qty: i64,
    pub harga_total: i64,
}

impl NewBelanja {
    /// Builds a purchase line, computing `harga_total`.
    ///
    /// ## Errors
    /// [`ValidationError::Inconsistent`] if `harga_satuan × qty` overflows.
    pub fn new(
        bahan_baku_id: impl Into<String>,
        nama_bahan_baku: Option<String>,
        tanggal: DateTime<Utc>,
        harga_satuan: Money,
        qty: i64,
    ) -> ValidationResult<Self> {
        let harga_total = harga_satuan
            .checked_multiply_quantity(qty)
            .ok_or_else(|| ValidationError::Inconsistent {
                field: "hargaTotal".to_string(),
                reason: format!("{} × {} is out of range", harga_satuan, qty),
            })?;
        Ok(NewBelanja {
            bahan_baku_id: bahan_baku_id.into(),
            nama_bahan_baku,
            tanggal,
            harga_satuan: harga_satuan.rupiah(),
            qty,
            harga_total: harga_total.rupiah(),
        })
    }

    /// Returns the line total as Money.
    pub fn total(&self) -> Money {
        Money::from_rupiah(self.harga_total)
    }
}

// =============================================================================
// Produk (sellable product)
// =============================================================================

/// A product on the menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Produk {
    pub produk_id: String,
    pub nama_produk: String,
    pub harga: i64,
    /// Server-relative image path, e.g. `/uploads/nasi.jpg`.
    #[serde(default)]
    pub image: Option<String>,
    pub category_id: String,
    #[serde(rename = "created_at", default)]
    pub created_at: Option<String>,
    #[serde(rename = "updated_at", default)]
    pub updated_at: Option<String>,
    #[serde(rename = "Category", default)]
    pub category: Option<Category>,
}

impl Produk {
    /// Returns the price as Money.
    pub fn price(&self) -> Money {
        Money::from_rupiah(self.harga)
    }

    /// Category name if the server embedded it.
    pub fn category_name(&self) -> Option<&str> {
        self.category.as_ref().map(|c| c.category_name.as_str())
    }
}

/// Create / update body for a product.
///
/// The image is only sent on create, as a multipart file part. Updates are
/// plain JSON and never touch the stored image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewProduk {
    pub nama_produk: String,
    pub harga: i64,
    pub category_id: String,
    #[serde(skip)]
    #[ts(skip)]
    pub image: Option<ImageUpload>,
}

/// An image file attached to a product create.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageUpload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

// =============================================================================
// Penjualan (sale)
// =============================================================================

/// A stored sale line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Penjualan {
    pub penjualan_id: String,
    pub produk_id: String,
    pub qty: i64,
    pub harga: i64,
    pub harga_total: i64,
    pub tanggal: String,
    #[serde(rename = "created_at", default)]
    pub created_at: Option<String>,
    #[serde(rename = "updated_at", default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub produk: Option<Produk>,
}

impl Penjualan {
    pub fn total(&self) -> Money {
        Money::from_rupiah(self.harga_total)
    }
}

/// One item in a batch sale create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PenjualanItem {
    pub produk_id: String,
    pub qty: i64,
    pub harga: i64,
    pub harga_total: i64,
}

/// Body of `POST /penjualan`: every cart line in one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CreatePenjualan {
    pub items: Vec<PenjualanItem>,
}

/// Acknowledgement of a batch sale create. Servers may omit either field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct PenjualanCreated {
    pub message: String,
    pub count: i64,
}

// =============================================================================
// Dashboard
// =============================================================================

/// A best-selling product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PopularProduct {
    pub product_id: String,
    pub name: String,
    #[serde(deserialize_with = "lenient_amount", default)]
    pub harga: i64,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(deserialize_with = "lenient_optional_amount", default)]
    pub total_qty: Option<i64>,
    #[serde(deserialize_with = "lenient_optional_amount", default)]
    pub total_sales: Option<i64>,
}

/// Daily sales total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SalesTrendPoint {
    pub date: String,
    #[serde(deserialize_with = "lenient_amount", default)]
    pub total_penjualan: i64,
}

/// Daily purchase total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseTrendPoint {
    pub date: String,
    #[serde(deserialize_with = "lenient_amount", default)]
    pub total_belanja: i64,
}

/// Response of `GET /dashboard`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    #[serde(default)]
    pub popular_products: Vec<PopularProduct>,
    #[serde(default)]
    pub sales_trend: Vec<SalesTrendPoint>,
    #[serde(default)]
    pub purchase_trend: Vec<PurchaseTrendPoint>,
    #[serde(deserialize_with = "lenient_amount", default)]
    pub total_sales: i64,
    #[serde(deserialize_with = "lenient_amount", default)]
    pub total_purchase: i64,
    #[serde(deserialize_with = "lenient_amount", default)]
    pub profit: i64,
}

// =============================================================================
// Read Filters
// =============================================================================

/// Converts a filter into query-string pairs.
///
/// Empty values are omitted, so an unset filter produces a bare path.
pub trait QueryFilter {
    fn query_pairs(&self) -> Vec<(&'static str, String)>;
}

fn push_non_empty(pairs: &mut Vec<(&'static str, String)>, key: &'static str, value: Option<&str>) {
    if let Some(v) = value.map(str::trim).filter(|v| !v.is_empty()) {
        pairs.push((key, v.to_string()));
    }
}

/// Filter with only a free-text search (category, bahan baku).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TextFilter {
    pub search: Option<String>,
}

impl TextFilter {
    pub fn search(term: impl Into<String>) -> Self {
        TextFilter {
            search: Some(term.into()),
        }
    }
}

impl QueryFilter for TextFilter {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        push_non_empty(&mut pairs, "search", self.search.as_deref());
        pairs
    }
}

/// Purchase list filter: search plus an inclusive date range.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct BelanjaFilter {
    pub search: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl QueryFilter for BelanjaFilter {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        push_non_empty(&mut pairs, "search", self.search.as_deref());
        if let Some(d) = self.start_date {
            pairs.push(("startDate", d.format("%Y-%m-%d").to_string()));
        }
        if let Some(d) = self.end_date {
            pairs.push(("endDate", d.format("%Y-%m-%d").to_string()));
        }
        pairs
    }
}

/// Product list filter: search plus category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ProdukFilter {
    pub search: Option<String>,
    pub category_id: Option<String>,
}

impl QueryFilter for ProdukFilter {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        push_non_empty(&mut pairs, "search", self.search.as_deref());
        push_non_empty(&mut pairs, "categoryId", self.category_id.as_deref());
        pairs
    }
}

/// Reads without parameters (penjualan, dashboard).
impl QueryFilter for () {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }
}

// =============================================================================
// Serde Helpers
// =============================================================================

/// Timestamps as `2024-05-01T07:30:00.000Z`.
mod iso8601 {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

/// Aggregates may come back as numbers, numeric strings or null.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Int(i64),
    Float(f64),
    Text(String),
}

impl RawAmount {
    fn into_i64<E: serde::de::Error>(self) -> Result<i64, E> {
        match self {
            RawAmount::Int(v) => Ok(v),
            RawAmount::Float(v) => Ok(v.round() as i64),
            RawAmount::Text(s) => {
                let s = s.trim();
                if s.is_empty() {
                    return Ok(0);
                }
                s.parse::<i64>()
                    .or_else(|_| s.parse::<f64>().map(|f| f.round() as i64))
                    .map_err(|_| E::custom(format!("invalid amount: {s:?}")))
            }
        }
    }
}

fn lenient_amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    match Option::<RawAmount>::deserialize(deserializer)? {
        Some(raw) => raw.into_i64(),
        None => Ok(0),
    }
}

fn lenient_optional_amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    Option::<RawAmount>::deserialize(deserializer)?
        .map(RawAmount::into_i64)
        .transpose()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_produk_decodes_embedded_category() {
        let json = r#"{
            "produkId": "p1",
            "namaProduk": "Nasi Rames",
            "harga": 12000,
            "image": "/uploads/nasi.jpg",
            "categoryId": "c1",
            "created_at": "2024-05-01T00:00:00.000Z",
            "updated_at": "2024-05-01T00:00:00.000Z",
            "Category": { "categoryId": "c1", "categoryName": "Makanan" }
        }"#;
        let produk: Produk = serde_json::from_str(json).unwrap();
        assert_eq!(produk.price().rupiah(), 12000);
        assert_eq!(produk.category_name(), Some("Makanan"));
    }

    #[test]
    fn test_new_belanja_computes_total_and_iso_date() {
        let tanggal = Utc.with_ymd_and_hms(2024, 5, 1, 7, 30, 0).unwrap();
        let line = NewBelanja::new("b1", Some("Beras".into()), tanggal, Money::from_rupiah(12000), 3).unwrap();
        assert_eq!(line.harga_total, 36000);

        let value = serde_json::to_value(&line).unwrap();
        assert_eq!(value["bahanBakuId"], "b1");
        assert_eq!(value["tanggal"], "2024-05-01T07:30:00.000Z");
        assert_eq!(value["hargaTotal"], 36000);
    }

    #[test]
    fn test_new_belanja_rejects_overflowing_total() {
        let tanggal = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        let err = NewBelanja::new("b1", None, tanggal, Money::from_rupiah(2), i64::MAX).unwrap_err();
        assert!(matches!(err, ValidationError::Inconsistent { field, .. } if field == "hargaTotal"));
    }

    #[test]
    fn test_new_produk_json_omits_image() {
        let draft = NewProduk {
            nama_produk: "Es Teh".into(),
            harga: 3000,
            category_id: "c2".into(),
            image: Some(ImageUpload {
                file_name: "teh.png".into(),
                content_type: "image/png".into(),
                bytes: vec![1, 2, 3],
            }),
        };
        let value = serde_json::to_value(&draft).unwrap();
        assert!(value.get("image").is_none());
        assert_eq!(value["namaProduk"], "Es Teh");
        assert!(format!("{:?}", draft.image).contains("len: 3"));
    }

    #[test]
    fn test_dashboard_accepts_string_amounts() {
        let json = r#"{
            "popularProducts": [{"productId": "p1", "name": "Nasi", "harga": "5000", "totalQty": "12"}],
            "salesTrend": [{"date": "2024-05-01", "totalPenjualan": "15000"},
                           {"date": "2024-05-02", "totalPenjualan": null}],
            "purchaseTrend": [{"date": "2024-05-01", "totalBelanja": 7000.0}],
            "totalSales": 15000,
            "totalPurchase": "7000",
            "profit": 8000
        }"#;
        let metrics: DashboardMetrics = serde_json::from_str(json).unwrap();
        assert_eq!(metrics.popular_products[0].harga, 5000);
        assert_eq!(metrics.popular_products[0].total_qty, Some(12));
        assert_eq!(metrics.popular_products[0].total_sales, None);
        assert_eq!(metrics.sales_trend[0].total_penjualan, 15000);
        assert_eq!(metrics.sales_trend[1].total_penjualan, 0);
        assert_eq!(metrics.purchase_trend[0].total_belanja, 7000);
        assert_eq!(metrics.total_purchase, 7000);
    }

    #[test]
    fn test_filters_omit_empty_values() {
        assert!(TextFilter::default().query_pairs().is_empty());
        assert!(TextFilter::search("   ").query_pairs().is_empty());
        assert_eq!(
            TextFilter::search(" beras ").query_pairs(),
            vec![("search", "beras".to_string())]
        );

        let filter = BelanjaFilter {
            search: None,
            start_date: NaiveDate::from_ymd_opt(2024, 5, 1),
            end_date: NaiveDate::from_ymd_opt(2024, 5, 31),
        };
        assert_eq!(
            filter.query_pairs(),
            vec![
                ("startDate", "2024-05-01".to_string()),
                ("endDate", "2024-05-31".to_string()),
            ]
        );

        let filter = ProdukFilter {
            search: Some(String::new()),
            category_id: Some("c1".into()),
        };
        assert_eq!(filter.query_pairs(), vec![("categoryId", "c1".to_string())]);
    }

    #[test]
    fn test_belanja_date_part() {
        let belanja: Belanja = serde_json::from_str(
            r#"{"belanjaId":"x","bahanBakuId":"b1","tanggal":"2024-05-01T07:30:00.000Z",
                "hargaSatuan":1000,"qty":2,"hargaTotal":2000}"#,
        )
        .unwrap();
        assert_eq!(belanja.tanggal_date(), "2024-05-01");
        assert_eq!(belanja.total().rupiah(), 2000);
    }
}

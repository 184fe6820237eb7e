//! # CRUD Resources
//!
//! The four master-data entities share one shape: a filtered list, a JSON
//! draft for create and update, and delete by id. [`Resource`] captures that
//! shape so the gateway and the CRUD screen are written once.
//!
//! | Resource | Record | Draft | Filter |
//! |---|---|---|---|
//! | [`CategoryResource`] | `Category` | `NewCategory` | `TextFilter` |
//! | [`BahanBakuResource`] | `BahanBaku` | `NewBahanBaku` | `TextFilter` |
//! | [`BelanjaResource`] | `Belanja` | `NewBelanja` | `BelanjaFilter` |
//! | [`ProdukResource`] | `Produk` | `NewProduk` | `ProdukFilter` |

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;

use warteg_core::types::{
    BahanBaku, Belanja, BelanjaFilter, Category, NewBahanBaku, NewBelanja, NewCategory, NewProduk,
    Produk, ProdukFilter, QueryFilter, TextFilter,
};
use warteg_core::validation::Validate;

use crate::endpoint::Endpoint;
use crate::error::{ApiError, ApiResult};
use crate::transport::{FormPart, RequestBody};

/// An entity with list / create / update / delete on the remote API.
pub trait Resource: Send + Sync + 'static {
    const ENDPOINT: Endpoint;

    /// Display name used in operator messages ("Kategori", "Produk", ...).
    const LABEL: &'static str;

    type Record: DeserializeOwned + Serialize + Clone + Debug + Send + Sync;
    type Draft: Serialize + Validate + Clone + Debug + Send + Sync;
    type Filter: QueryFilter + Clone + Default + Debug + Send + Sync;

    fn record_id(record: &Self::Record) -> &str;

    /// Body of `POST`. JSON unless overridden.
    fn create_body(draft: &Self::Draft) -> ApiResult<RequestBody> {
        json_body(draft)
    }

    /// Body of `PUT /:id`.
    fn update_body(draft: &Self::Draft) -> ApiResult<RequestBody> {
        json_body(draft)
    }
}

fn json_body<T: Serialize>(draft: &T) -> ApiResult<RequestBody> {
    serde_json::to_value(draft)
        .map(RequestBody::Json)
        .map_err(|e| ApiError::Config(format!("Failed to encode request body: {e}")))
}

// =============================================================================
// Resources
// =============================================================================

#[derive(Debug, Clone, Copy)]
pub struct CategoryResource;

impl Resource for CategoryResource {
    const ENDPOINT: Endpoint = Endpoint::Category;
    const LABEL: &'static str = "Kategori";
    type Record = Category;
    type Draft = NewCategory;
    type Filter = TextFilter;

    fn record_id(record: &Category) -> &str {
        &record.category_id
    }
}

#[derive(Debug, Clone, Copy)]
pub struct BahanBakuResource;

impl Resource for BahanBakuResource {
    const ENDPOINT: Endpoint = Endpoint::BahanBaku;
    const LABEL: &'static str = "Bahan Baku";
    type Record = BahanBaku;
    type Draft = NewBahanBaku;
    type Filter = TextFilter;

    fn record_id(record: &BahanBaku) -> &str {
        &record.bahan_baku_id
    }
}

#[derive(Debug, Clone, Copy)]
pub struct BelanjaResource;

impl Resource for BelanjaResource {
    const ENDPOINT: Endpoint = Endpoint::Belanja;
    const LABEL: &'static str = "Belanja";
    type Record = Belanja;
    type Draft = NewBelanja;
    type Filter = BelanjaFilter;

    fn record_id(record: &Belanja) -> &str {
        &record.belanja_id
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ProdukResource;

impl Resource for ProdukResource {
    const ENDPOINT: Endpoint = Endpoint::Produk;
    const LABEL: &'static str = "Produk";
    type Record = Produk;
    type Draft = NewProduk;
    type Filter = ProdukFilter;

    fn record_id(record: &Produk) -> &str {
        &record.produk_id
    }

    /// Multipart: `namaProduk`, `harga`, `categoryId` and an optional `image`.
    fn create_body(draft: &NewProduk) -> ApiResult<RequestBody> {
        let mut parts = vec![
            FormPart::text("namaProduk", draft.nama_produk.trim()),
            FormPart::text("harga", draft.harga.to_string()),
            FormPart::text("categoryId", draft.category_id.trim()),
        ];
        if let Some(image) = &draft.image {
            if image.bytes.is_empty() {
                return Err(ApiError::Image(format!("{} is empty", image.file_name)));
            }
            parts.push(FormPart::File {
                name: "image".to_string(),
                file_name: image.file_name.clone(),
                content_type: image.content_type.clone(),
                bytes: image.bytes.clone(),
            });
        }
        Ok(RequestBody::Multipart(parts))
    }
}

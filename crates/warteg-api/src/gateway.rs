//! # Gateway
//!
//! Typed access to every endpoint, with the read cache in front.
//!
//! ## Contract
//! - Reads go through [`QueryCache`]; a miss fetches and caches the result
//!   unless the tag was invalidated while the request was in flight.
//! - Writes report success only after the server acknowledged them, and only
//!   then invalidate the endpoint's tags. A failed write leaves the cache
//!   untouched.
//! - Any 2xx status is an acknowledgement. The body is read best-effort: a
//!   record the client cannot decode (empty 204, `{message}`, a `{data}`
//!   wrapper) comes back as `None`, never as a write failure.
//! - No optimistic local mutation, no automatic retry.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

use warteg_core::types::{CreatePenjualan, DashboardMetrics, Penjualan, PenjualanCreated, QueryFilter};

use crate::cache::{CacheKey, QueryCache};
use crate::config::ApiConfig;
use crate::endpoint::Endpoint;
use crate::error::{ApiError, ApiResult, FailureCause, WriteOp};
use crate::resource::Resource;
use crate::transport::{ApiRequest, ApiResponse, HttpMethod, HttpTransport, RequestBody, Transport};

/// Handle to the remote API. Cheap to clone; clones share the cache.
#[derive(Clone)]
pub struct Gateway {
    transport: Arc<dyn Transport>,
    cache: Arc<QueryCache>,
    base_url: Arc<str>,
}

impl std::fmt::Debug for Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway")
            .field("base_url", &self.base_url)
            .field("cached_reads", &self.cache.len())
            .finish()
    }
}

impl Gateway {
    /// Gateway with a fresh cache.
    pub fn new(transport: Arc<dyn Transport>, base_url: impl Into<String>) -> Self {
        Self::with_cache(transport, Arc::new(QueryCache::new()), base_url)
    }

    pub fn with_cache(transport: Arc<dyn Transport>, cache: Arc<QueryCache>, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Gateway {
            transport,
            cache,
            base_url: Arc::from(base_url.trim_end_matches('/')),
        }
    }

    /// HTTP gateway for a validated configuration.
    pub fn from_config(config: &ApiConfig) -> ApiResult<Self> {
        let transport = HttpTransport::new(config)?;
        info!(base_url = %config.base_url, timeout_secs = config.timeout_secs, "API gateway ready");
        Ok(Self::new(Arc::new(transport), config.base_url.clone()))
    }

    pub fn cache(&self) -> &Arc<QueryCache> {
        &self.cache
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // =========================================================================
    // CRUD Resources
    // =========================================================================

    /// `GET /<resource>?<filter>`.
    pub async fn list<R: Resource>(&self, filter: &R::Filter) -> ApiResult<Vec<R::Record>> {
        self.read(R::ENDPOINT, filter.query_pairs()).await
    }

    /// `POST /<resource>`. `Ok(None)` when the server acknowledged the write
    /// without echoing a record.
    pub async fn create<R: Resource>(&self, draft: &R::Draft) -> ApiResult<Option<R::Record>> {
        let body = R::create_body(draft)?;
        let request = ApiRequest::new(HttpMethod::Post, R::ENDPOINT.path(), body);
        let value = self.write(R::ENDPOINT, WriteOp::Create, request).await?;
        Ok(acknowledged(R::ENDPOINT, WriteOp::Create, value))
    }

    /// `PUT /<resource>/:id`.
    pub async fn update<R: Resource>(&self, id: &str, draft: &R::Draft) -> ApiResult<Option<R::Record>> {
        let body = R::update_body(draft)?;
        let request = ApiRequest::new(HttpMethod::Put, R::ENDPOINT.item_path(id), body);
        let value = self.write(R::ENDPOINT, WriteOp::Update, request).await?;
        Ok(acknowledged(R::ENDPOINT, WriteOp::Update, value))
    }

    /// `DELETE /<resource>/:id`.
    pub async fn delete<R: Resource>(&self, id: &str) -> ApiResult<()> {
        let request = ApiRequest::new(HttpMethod::Delete, R::ENDPOINT.item_path(id), RequestBody::Empty);
        self.write(R::ENDPOINT, WriteOp::Delete, request).await?;
        Ok(())
    }

    // =========================================================================
    // Penjualan & Dashboard
    // =========================================================================

    /// `GET /penjualan`.
    pub async fn penjualan(&self) -> ApiResult<Vec<Penjualan>> {
        self.read(Endpoint::Penjualan, ().query_pairs()).await
    }

    /// `POST /penjualan` with every line of an order in one request.
    ///
    /// Missing acknowledgement fields default to empty.
    pub async fn create_penjualan(&self, batch: &CreatePenjualan) -> ApiResult<PenjualanCreated> {
        let endpoint = Endpoint::Penjualan;
        let body = serde_json::to_value(batch).map_err(|e| ApiError::write(endpoint, WriteOp::Create, e))?;
        let request = ApiRequest::new(HttpMethod::Post, endpoint.path(), RequestBody::Json(body));
        let value = self.write(endpoint, WriteOp::Create, request).await?;
        Ok(acknowledged(endpoint, WriteOp::Create, value).unwrap_or_default())
    }

    /// `GET /dashboard`.
    pub async fn dashboard(&self) -> ApiResult<DashboardMetrics> {
        self.read(Endpoint::Dashboard, ().query_pairs()).await
    }

    /// Absolute URL of a product image path: `<base>/public<path>`.
    pub fn image_url(&self, image: &str) -> String {
        if image.starts_with("http://") || image.starts_with("https://") {
            return image.to_string();
        }
        let sep = if image.starts_with('/') { "" } else { "/" };
        format!("{}/public{}{}", self.base_url, sep, image)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    async fn read<T: DeserializeOwned>(&self, endpoint: Endpoint, query: Vec<(&'static str, String)>) -> ApiResult<T> {
        let query: Vec<(String, String)> = query.into_iter().map(|(k, v)| (k.to_string(), v)).collect();
        let key = CacheKey::new(endpoint.tag(), endpoint.path(), query.clone());

        if let Some(value) = self.cache.get(&key) {
            debug!(%endpoint, ?query, "Cache hit");
            return T::deserialize(&value).map_err(|e| ApiError::fetch(endpoint, e));
        }

        debug!(%endpoint, ?query, "Cache miss, fetching");
        let seen = self.cache.generation(endpoint.tag());
        let response = self
            .transport
            .send(ApiRequest::get(endpoint.path(), query))
            .await
            .map_err(|e| {
                warn!(%endpoint, error = %e, "Read failed");
                ApiError::fetch(endpoint, e)
            })?;

        if !response.is_success() {
            let cause = status_cause(&response);
            warn!(%endpoint, %cause, "Read rejected");
            return Err(ApiError::fetch(endpoint, cause));
        }

        let value = response.value().map_err(|e| ApiError::fetch(endpoint, e))?;
        let decoded = T::deserialize(&value).map_err(|e| {
            warn!(%endpoint, error = %e, "Unexpected read response");
            ApiError::fetch(endpoint, e)
        })?;
        self.cache.insert_if_current(key, value, seen);

        Ok(decoded)
    }

    async fn write(&self, endpoint: Endpoint, op: WriteOp, request: ApiRequest) -> ApiResult<Value> {
        debug!(%endpoint, %op, path = %request.path, "Writing");
        let response = self.transport.send(request).await.map_err(|e| {
            warn!(%endpoint, %op, error = %e, "Write failed");
            ApiError::write(endpoint, op, e)
        })?;

        if !response.is_success() {
            let cause = status_cause(&response);
            warn!(%endpoint, %op, %cause, "Write rejected");
            return Err(ApiError::write(endpoint, op, cause));
        }

        self.cache.invalidate(endpoint.invalidates());
        info!(%endpoint, %op, status = response.status, "Write acknowledged");

        Ok(response.value().unwrap_or_else(|e| {
            warn!(%endpoint, %op, error = %e, "Acknowledgement body is not JSON");
            Value::Null
        }))
    }
}

fn status_cause(response: &ApiResponse) -> FailureCause {
    FailureCause::Status {
        status: response.status,
        message: response.error_message(),
    }
}

/// Body of an acknowledged write, bare or under `data`.
fn acknowledged<T: DeserializeOwned>(endpoint: Endpoint, op: WriteOp, value: Value) -> Option<T> {
    if value.is_null() {
        return None;
    }
    match T::deserialize(&value) {
        Ok(decoded) => Some(decoded),
        Err(e) => {
            let wrapped = value.get("data").and_then(|data| T::deserialize(data).ok());
            if wrapped.is_none() {
                debug!(%endpoint, %op, error = %e, "Acknowledgement carries no record");
            }
            wrapped
        }
    }
}

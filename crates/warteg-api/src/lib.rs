//! # warteg-api: Remote Data Gateway for Warteg POS
//!
//! The client owns no data. Every category, raw material, purchase, product
//! and sale lives behind the warteg HTTP API; this crate is the only way in.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Gateway Request Flow                           │
//! │                                                                         │
//! │  READ  list::<R>(filter)                                               │
//! │    │                                                                    │
//! │    ├── QueryCache hit? ──yes──► decode cached value ──► Ok(records)    │
//! │    │                                                                    │
//! │    └── miss: note tag generation                                       │
//! │             │                                                           │
//! │             ▼                                                           │
//! │        Transport::send(GET path?query)                                 │
//! │             │                                                           │
//! │             ├── 2xx: cache (only if generation unchanged) ──► Ok       │
//! │             └── else ─────────────────────────────► ApiError::Fetch    │
//! │                                                                         │
//! │  WRITE create / update / delete                                        │
//! │    │                                                                    │
//! │    ▼                                                                    │
//! │  Transport::send(POST / PUT / DELETE)                                  │
//! │    │                                                                    │
//! │    ├── 2xx: invalidate endpoint tags (+ Dashboard) ──► Ok              │
//! │    └── else: cache untouched ─────────────────────► ApiError::Write    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`config`] - Base URL and timeout (defaults, TOML file, environment)
//! - [`endpoint`] - Endpoint registry and cache tags
//! - [`transport`] - `Transport` trait and the reqwest implementation
//! - [`cache`] - Tag-keyed read cache with invalidation events
//! - [`resource`] - The CRUD entities as a trait the gateway is generic over
//! - [`gateway`] - The `Gateway` itself
//! - [`mock`] - Scripted transport for tests (`mock` feature)

pub mod cache;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod gateway;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod resource;
pub mod transport;

pub use cache::{CacheKey, QueryCache};
pub use config::ApiConfig;
pub use endpoint::{CacheTag, Endpoint};
pub use error::{ApiError, ApiResult, FailureCause, WriteOp};
pub use gateway::Gateway;
pub use resource::{BahanBakuResource, BelanjaResource, CategoryResource, ProdukResource, Resource};
pub use transport::{ApiRequest, ApiResponse, HttpMethod, HttpTransport, RequestBody, Transport, TransportError};

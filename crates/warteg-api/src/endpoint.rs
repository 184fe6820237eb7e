//! # Endpoint Registry
//!
//! The six endpoints of the warteg API and the cache tags they touch.
//!
//! ```text
//! ┌────────────┬──────────────┬──────────────────────────────┐
//! │ Endpoint   │ Path         │ Writes invalidate            │
//! ├────────────┼──────────────┼──────────────────────────────┤
//! │ Category   │ /category    │ Category, Produk             │
//! │ BahanBaku  │ /bahan-baku  │ BahanBaku, Belanja           │
//! │ Belanja    │ /belanja     │ Belanja, Dashboard           │
//! │ Produk     │ /produk      │ Produk, Dashboard            │
//! │ Penjualan  │ /penjualan   │ Penjualan, Dashboard         │
//! │ Dashboard  │ /dashboard   │ (read only)                  │
//! └────────────┴──────────────┴──────────────────────────────┘
//! ```

use std::fmt;

/// Tag attached to cached reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CacheTag {
    Dashboard,
    Category,
    BahanBaku,
    Belanja,
    Produk,
    Penjualan,
}

impl fmt::Display for CacheTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CacheTag::Dashboard => "Dashboard",
            CacheTag::Category => "Category",
            CacheTag::BahanBaku => "BahanBaku",
            CacheTag::Belanja => "Belanja",
            CacheTag::Produk => "Produk",
            CacheTag::Penjualan => "Penjualan",
        };
        f.write_str(name)
    }
}

/// A named collection on the remote API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Category,
    BahanBaku,
    Belanja,
    Produk,
    Penjualan,
    Dashboard,
}

impl Endpoint {
    pub const ALL: [Endpoint; 6] = [
        Endpoint::Category,
        Endpoint::BahanBaku,
        Endpoint::Belanja,
        Endpoint::Produk,
        Endpoint::Penjualan,
        Endpoint::Dashboard,
    ];

    /// Collection path.
    pub const fn path(&self) -> &'static str {
        match self {
            Endpoint::Category => "/category",
            Endpoint::BahanBaku => "/bahan-baku",
            Endpoint::Belanja => "/belanja",
            Endpoint::Produk => "/produk",
            Endpoint::Penjualan => "/penjualan",
            Endpoint::Dashboard => "/dashboard",
        }
    }

    /// Path of a single record.
    pub fn item_path(&self, id: &str) -> String {
        format!("{}/{}", self.path(), id)
    }

    /// Tag provided by reads of this endpoint.
    pub const fn tag(&self) -> CacheTag {
        match self {
            Endpoint::Category => CacheTag::Category,
            Endpoint::BahanBaku => CacheTag::BahanBaku,
            Endpoint::Belanja => CacheTag::Belanja,
            Endpoint::Produk => CacheTag::Produk,
            Endpoint::Penjualan => CacheTag::Penjualan,
            Endpoint::Dashboard => CacheTag::Dashboard,
        }
    }

    /// Tags made stale by a successful write.
    ///
    /// Dashboard metrics are aggregated from purchases, products and sales.
    /// Product rows embed their category; purchase rows carry the material name.
    pub const fn invalidates(&self) -> &'static [CacheTag] {
        match self {
            Endpoint::Category => &[CacheTag::Category, CacheTag::Produk],
            Endpoint::BahanBaku => &[CacheTag::BahanBaku, CacheTag::Belanja],
            Endpoint::Belanja => &[CacheTag::Belanja, CacheTag::Dashboard],
            Endpoint::Produk => &[CacheTag::Produk, CacheTag::Dashboard],
            Endpoint::Penjualan => &[CacheTag::Penjualan, CacheTag::Dashboard],
            Endpoint::Dashboard => &[CacheTag::Dashboard],
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path().trim_start_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        assert_eq!(Endpoint::BahanBaku.path(), "/bahan-baku");
        assert_eq!(Endpoint::Produk.item_path("p1"), "/produk/p1");
        assert_eq!(Endpoint::Belanja.to_string(), "belanja");
    }

    #[test]
    fn test_every_write_invalidates_its_own_tag() {
        for endpoint in Endpoint::ALL {
            assert!(endpoint.invalidates().contains(&endpoint.tag()), "{endpoint}");
        }
    }

    #[test]
    fn test_dashboard_follows_derived_writes() {
        assert!(Endpoint::Penjualan.invalidates().contains(&CacheTag::Dashboard));
        assert!(Endpoint::Belanja.invalidates().contains(&CacheTag::Dashboard));
        assert!(!Endpoint::Category.invalidates().contains(&CacheTag::Dashboard));
        assert!(Endpoint::Category.invalidates().contains(&CacheTag::Produk));
        assert!(Endpoint::BahanBaku.invalidates().contains(&CacheTag::Belanja));
    }
}

//! # Purchase Screen ("Belanja Harian")
//!
//! Collects purchase lines locally, then posts them one `POST /belanja` each.
//!
//! ## Save Semantics
//! ```text
//! draft: [A, B, C]
//!   POST A ── ok ──► draft: [B, C]
//!   POST B ── err ─► stop, draft: [B, C]   (retry resends B and C only)
//! ```

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use warteg_api::{BelanjaResource, Gateway};
use warteg_core::types::NewBelanja;
use warteg_core::{Money, PurchaseDraft};

use crate::error::{AppError, AppResult};
use crate::notify::{Notification, Notifier};

pub struct PurchaseScreen {
    gateway: Gateway,
    notifier: Arc<dyn Notifier>,
    draft: PurchaseDraft,
}

impl PurchaseScreen {
    pub fn new(gateway: Gateway, notifier: Arc<dyn Notifier>) -> Self {
        PurchaseScreen {
            gateway,
            notifier,
            draft: PurchaseDraft::new(),
        }
    }

    pub fn add(
        &mut self,
        bahan_baku_id: &str,
        nama_bahan_baku: &str,
        tanggal: DateTime<Utc>,
        harga_satuan: Money,
        qty: i64,
    ) -> AppResult<&NewBelanja> {
        match self.draft.add(bahan_baku_id, nama_bahan_baku, tanggal, harga_satuan, qty) {
            Ok(line) => {
                self.notifier.notify(Notification::success("Item berhasil ditambahkan ke tabel!"));
                Ok(line)
            }
            Err(e) => {
                self.notifier.notify(Notification::error("Semua field harus diisi!"));
                Err(AppError::from(e).notified())
            }
        }
    }

    pub fn remove(&mut self, index: usize) -> AppResult<NewBelanja> {
        let line = self.draft.remove(index)?;
        self.notifier.notify(Notification::info("Item berhasil dihapus dari tabel."));
        Ok(line)
    }

    pub fn draft(&self) -> &PurchaseDraft {
        &self.draft
    }

    pub fn total(&self) -> Money {
        self.draft.total()
    }

    /// Saves every line in order and returns how many were saved.
    pub async fn save(&mut self) -> AppResult<usize> {
        if let Err(e) = self.draft.ensure_not_empty() {
            self.notifier.notify(Notification::error("Tidak ada data untuk disimpan!"));
            return Err(AppError::from(e).notified());
        }

        let mut saved = 0;
        while let Some(line) = self.draft.first() {
            match self.gateway.create::<BelanjaResource>(line).await {
                Ok(record) => {
                    self.draft.confirm_first();
                    saved += 1;
                    debug!(belanja_id = ?record.map(|r| r.belanja_id), "Purchase line saved");
                }
                Err(e) => {
                    warn!(saved, remaining = self.draft.len(), error = %e, "Purchase save stopped");
                    self.notifier.notify(Notification::error("Gagal menyimpan data."));
                    return Err(AppError::from(e).notified());
                }
            }
        }

        info!(saved, "Purchases saved");
        self.notifier.notify(Notification::success("Data berhasil disimpan!"));
        Ok(saved)
    }
}

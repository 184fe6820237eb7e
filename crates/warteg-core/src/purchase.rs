//! # Purchase Draft
//!
//! The "Belanja Harian" list: purchase lines assembled locally, then saved
//! one `POST /belanja` at a time.
//!
//! ```text
//! add() ──► lines.push(validated line)      (no merging)
//! remove(i)
//! save loop (console):
//!     while let Some(line) = first() {
//!         POST line ──ok──► confirm_first()
//!                   └─err─► stop, remaining lines stay for retry
//!     }
//! ```

use chrono::{DateTime, Utc};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::NewBelanja;
use crate::validation::{validate_required, Validate};

/// Unsaved purchase lines, in entry order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PurchaseDraft {
    lines: Vec<NewBelanja>,
}

impl PurchaseDraft {
    pub fn new() -> Self {
        PurchaseDraft { lines: Vec::new() }
    }

    /// Validates and appends a line. Identical lines are kept separately.
    ///
    /// ## Rules
    /// - `bahan_baku_id` and `nama_bahan_baku` present
    /// - `harga_satuan > 0`, `qty > 0`
    pub fn add(
        &mut self,
        bahan_baku_id: &str,
        nama_bahan_baku: &str,
        tanggal: DateTime<Utc>,
        harga_satuan: Money,
        qty: i64,
    ) -> CoreResult<&NewBelanja> {
        validate_required("namaBahanBaku", nama_bahan_baku)?;
        let line = NewBelanja::new(
            bahan_baku_id.trim(),
            Some(nama_bahan_baku.trim().to_string()),
            tanggal,
            harga_satuan,
            qty,
        )?;
        line.validate()?;

        self.lines.push(line);
        Ok(&self.lines[self.lines.len() - 1])
    }

    /// Removes the line at `index`.
    pub fn remove(&mut self, index: usize) -> CoreResult<NewBelanja> {
        if index >= self.lines.len() {
            return Err(CoreError::LineNotFound {
                index,
                len: self.lines.len(),
            });
        }
        Ok(self.lines.remove(index))
    }

    /// Σ hargaTotal.
    pub fn total(&self) -> Money {
        self.lines.iter().map(NewBelanja::total).sum()
    }

    pub fn lines(&self) -> &[NewBelanja] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Fails with [`CoreError::EmptyDraft`] when there is nothing to save.
    pub fn ensure_not_empty(&self) -> CoreResult<()> {
        if self.lines.is_empty() {
            return Err(CoreError::EmptyDraft);
        }
        Ok(())
    }

    /// Next line to save.
    pub fn first(&self) -> Option<&NewBelanja> {
        self.lines.first()
    }

    /// Drops the first line after the server accepted it.
    pub fn confirm_first(&mut self) -> Option<NewBelanja> {
        if self.lines.is_empty() {
            None
        } else {
            Some(self.lines.remove(0))
        }
    }
}

//! Plain-text tables for stdout.

use std::io::{self, Write};

use warteg_core::types::{BahanBaku, Belanja, Category, Penjualan, Produk};
use warteg_core::{Cart, CartTotals, Money, PurchaseDraft};

use crate::screens::DashboardView;

/// Column-aligned table.
#[derive(Debug, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Table {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn row<I, S>(&mut self, cells: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(cells.into_iter().map(Into::into).collect());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn write_to(&self, out: &mut impl Write) -> io::Result<()> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                if let Some(w) = widths.get_mut(i) {
                    *w = (*w).max(cell.chars().count());
                }
            }
        }

        write_line(out, &self.headers, &widths)?;
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        write_line(out, &rule, &widths)?;
        if self.rows.is_empty() {
            writeln!(out, "(kosong)")?;
        }
        for row in &self.rows {
            write_line(out, row, &widths)?;
        }
        Ok(())
    }
}

fn write_line(out: &mut impl Write, cells: &[String], widths: &[usize]) -> io::Result<()> {
    let padded: Vec<String> = widths
        .iter()
        .enumerate()
        .map(|(i, w)| {
            let cell = cells.get(i).map(String::as_str).unwrap_or("");
            format!("{:<width$}", cell, width = *w)
        })
        .collect();
    writeln!(out, "{}", padded.join("  ").trim_end())
}

fn opt(value: Option<&str>) -> String {
    value.unwrap_or("-").to_string()
}

// =============================================================================
// Records
// =============================================================================

pub fn categories(out: &mut impl Write, rows: &[Category]) -> io::Result<()> {
    let mut table = Table::new(["ID", "Kategori"]);
    for c in rows {
        table.row([c.category_id.as_str(), c.category_name.as_str()]);
    }
    table.write_to(out)
}

pub fn bahan_baku(out: &mut impl Write, rows: &[BahanBaku]) -> io::Result<()> {
    let mut table = Table::new(["ID", "Nama", "Supplier", "Merk"]);
    for b in rows {
        table.row([
            b.bahan_baku_id.clone(),
            b.nama_bahan_baku.clone(),
            opt(b.supplier.as_deref()),
            opt(b.merk.as_deref()),
        ]);
    }
    table.write_to(out)
}

pub fn belanja(out: &mut impl Write, rows: &[Belanja]) -> io::Result<()> {
    let mut table = Table::new(["ID", "Tanggal", "Bahan Baku", "Harga Satuan", "Qty", "Total"]);
    for b in rows {
        table.row([
            b.belanja_id.clone(),
            b.tanggal_date().to_string(),
            b.nama_bahan_baku.clone().unwrap_or_else(|| b.bahan_baku_id.clone()),
            Money::from_rupiah(b.harga_satuan).to_string(),
            b.qty.to_string(),
            b.total().to_string(),
        ]);
    }
    table.write_to(out)?;
    let total: Money = rows.iter().map(Belanja::total).sum();
    writeln!(out, "Total: {}", total)
}

pub fn produk(out: &mut impl Write, rows: &[Produk]) -> io::Result<()> {
    let mut table = Table::new(["ID", "Produk", "Harga", "Kategori"]);
    for p in rows {
        table.row([
            p.produk_id.clone(),
            p.nama_produk.clone(),
            p.price().to_string(),
            opt(p.category_name()),
        ]);
    }
    table.write_to(out)
}

pub fn penjualan(out: &mut impl Write, rows: &[Penjualan]) -> io::Result<()> {
    let mut table = Table::new(["ID", "Tanggal", "Produk", "Harga", "Qty", "Total"]);
    for p in rows {
        let name = p
            .produk
            .as_ref()
            .map(|produk| produk.nama_produk.clone())
            .unwrap_or_else(|| p.produk_id.clone());
        table.row([
            p.penjualan_id.clone(),
            p.tanggal.chars().take(10).collect(),
            name,
            Money::from_rupiah(p.harga).to_string(),
            p.qty.to_string(),
            p.total().to_string(),
        ]);
    }
    table.write_to(out)?;
    let total: Money = rows.iter().map(Penjualan::total).sum();
    writeln!(out, "Total: {}", total)
}

// =============================================================================
// Working sets
// =============================================================================

pub fn cart(out: &mut impl Write, cart: &Cart) -> io::Result<()> {
    let mut table = Table::new(["ID", "Produk", "Harga", "Qty", "Subtotal"]);
    for line in cart.lines() {
        table.row([
            line.product_id().to_string(),
            line.name().to_string(),
            line.unit_price().to_string(),
            line.quantity().to_string(),
            line.line_total().to_string(),
        ]);
    }
    table.write_to(out)?;
    let totals = CartTotals::from(cart);
    writeln!(
        out,
        "{} produk, {} porsi. Grand total: {}",
        totals.line_count, totals.total_quantity, totals.grand_total
    )
}

pub fn draft(out: &mut impl Write, draft: &PurchaseDraft) -> io::Result<()> {
    let mut table = Table::new(["#", "Bahan Baku", "Tanggal", "Harga Satuan", "Qty", "Total"]);
    for (i, line) in draft.lines().iter().enumerate() {
        table.row([
            (i + 1).to_string(),
            line.nama_bahan_baku.clone().unwrap_or_else(|| line.bahan_baku_id.clone()),
            line.tanggal.format("%Y-%m-%d").to_string(),
            Money::from_rupiah(line.harga_satuan).to_string(),
            line.qty.to_string(),
            line.total().to_string(),
        ]);
    }
    table.write_to(out)?;
    writeln!(out, "Total: {}", draft.total())
}

pub fn dashboard(out: &mut impl Write, view: &DashboardView) -> io::Result<()> {
    let summary = &view.summary;
    writeln!(out, "Total penjualan : {}", summary.total_sales)?;
    writeln!(out, "Total belanja   : {}", summary.total_purchase)?;
    writeln!(out, "Profit          : {}", summary.profit)?;
    writeln!(out)?;

    for (title, trend) in [("Penjualan", &summary.sales), ("Belanja", &summary.purchases)] {
        match &trend.peak {
            Some((date, amount)) => writeln!(
                out,
                "{}: {} dalam {} hari, tertinggi {} ({})",
                title, trend.total, trend.points, amount, date
            )?,
            None => writeln!(out, "{}: belum ada data", title)?,
        }
    }
    writeln!(out)?;

    let mut table = Table::new(["Produk Terlaris", "Harga", "Terjual", "Gambar"]);
    for card in &view.popular {
        let p = &card.product;
        table.row([
            p.name.clone(),
            Money::from_rupiah(p.harga).to_string(),
            p.total_qty.map(|q| q.to_string()).unwrap_or_else(|| "-".to_string()),
            opt(card.image_url.as_deref()),
        ]);
    }
    table.write_to(out)
}

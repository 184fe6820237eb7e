//! Dashboard command.

use std::io::Write;

use super::Context;
use crate::error::AppResult;
use crate::render;
use crate::screens::DashboardScreen;

pub async fn show<W: Write>(ctx: &Context, out: &mut W) -> AppResult<()> {
    let mut screen = DashboardScreen::new(ctx.gateway.clone(), ctx.notifier.clone());
    let view = screen.load().await?;
    render::dashboard(out, view)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{context, text};
    use serde_json::json;

    #[tokio::test]
    async fn test_show_renders_totals_and_peak() {
        let (mock, _, ctx) = context();
        mock.push_json(
            200,
            json!({
                "popularProducts": [{"productId": "p1", "name": "Nasi", "harga": 5000, "image": "nasi.jpg", "totalQty": 12}],
                "salesTrend": [{"date": "2024-05-01", "totalPenjualan": 20000}],
                "purchaseTrend": [],
                "totalSales": "20000",
                "totalPurchase": null,
                "profit": 20000
            }),
        );
        let mut out = Vec::new();

        show(&ctx, &mut out).await.unwrap();

        let out = text(out);
        assert!(out.contains("Total penjualan : Rp 20.000"));
        assert!(out.contains("Total belanja   : Rp 0"));
        assert!(out.contains("tertinggi Rp 20.000 (2024-05-01)"));
        assert!(out.contains("Belanja: belum ada data"));
        assert!(out.contains("http://test/public/nasi.jpg"));
    }
}

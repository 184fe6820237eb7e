//! # Dashboard Summaries
//!
//! Derived figures shown on the dashboard cards: trend totals and the best
//! day of each trend.

use crate::money::Money;
use crate::types::{DashboardMetrics, PopularProduct, PurchaseTrendPoint, SalesTrendPoint};

/// A dated amount in a trend series.
pub trait TrendPoint {
    fn date(&self) -> &str;
    fn amount(&self) -> Money;
}

impl TrendPoint for SalesTrendPoint {
    fn date(&self) -> &str {
        &self.date
    }

    fn amount(&self) -> Money {
        Money::from_rupiah(self.total_penjualan)
    }
}

impl TrendPoint for PurchaseTrendPoint {
    fn date(&self) -> &str {
        &self.date
    }

    fn amount(&self) -> Money {
        Money::from_rupiah(self.total_belanja)
    }
}

/// Total and peak of one trend series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendSummary {
    pub total: Money,
    /// Date and amount of the highest point; `None` for an empty series.
    pub peak: Option<(String, Money)>,
    pub points: usize,
}

impl TrendSummary {
    /// Summarizes a series. On equal amounts the later point is the peak.
    pub fn from_points<P: TrendPoint>(points: &[P]) -> Self {
        let total = points.iter().map(TrendPoint::amount).sum();
        let peak = points
            .iter()
            .fold(None::<&P>, |best, p| match best {
                Some(b) if b.amount() > p.amount() => Some(b),
                _ => Some(p),
            })
            .map(|p| (p.date().to_string(), p.amount()));

        TrendSummary {
            total,
            peak,
            points: points.len(),
        }
    }
}

/// Everything the dashboard screen renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSummary {
    pub sales: TrendSummary,
    pub purchases: TrendSummary,
    pub total_sales: Money,
    pub total_purchase: Money,
    pub profit: Money,
    pub popular_products: Vec<PopularProduct>,
}

impl From<&DashboardMetrics> for DashboardSummary {
    fn from(metrics: &DashboardMetrics) -> Self {
        DashboardSummary {
            sales: TrendSummary::from_points(&metrics.sales_trend),
            purchases: TrendSummary::from_points(&metrics.purchase_trend),
            total_sales: Money::from_rupiah(metrics.total_sales),
            total_purchase: Money::from_rupiah(metrics.total_purchase),
            profit: Money::from_rupiah(metrics.profit),
            popular_products: metrics.popular_products.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sale(date: &str, total: i64) -> SalesTrendPoint {
        SalesTrendPoint {
            date: date.to_string(),
            total_penjualan: total,
        }
    }

    #[test]
    fn test_empty_trend() {
        let summary = TrendSummary::from_points::<SalesTrendPoint>(&[]);
        assert!(summary.total.is_zero());
        assert!(summary.peak.is_none());
        assert_eq!(summary.points, 0);
    }

    #[test]
    fn test_total_and_peak() {
        let trend = vec![sale("2024-05-01", 15000), sale("2024-05-02", 42000), sale("2024-05-03", 8000)];
        let summary = TrendSummary::from_points(&trend);
        assert_eq!(summary.total.rupiah(), 65000);
        assert_eq!(summary.peak, Some(("2024-05-02".to_string(), Money::from_rupiah(42000))));
    }

    #[test]
    fn test_later_point_wins_tie() {
        let trend = vec![sale("2024-05-01", 9000), sale("2024-05-02", 9000)];
        let summary = TrendSummary::from_points(&trend);
        assert_eq!(summary.peak.unwrap().0, "2024-05-02");
    }

    #[test]
    fn test_summary_from_metrics() {
        let metrics = DashboardMetrics {
            sales_trend: vec![sale("2024-05-01", 20000)],
            purchase_trend: vec![PurchaseTrendPoint {
                date: "2024-05-01".into(),
                total_belanja: 7000,
            }],
            total_sales: 20000,
            total_purchase: 7000,
            profit: 13000,
            ..Default::default()
        };
        let summary = DashboardSummary::from(&metrics);
        assert_eq!(summary.sales.total.rupiah(), 20000);
        assert_eq!(summary.purchases.peak.unwrap().1.rupiah(), 7000);
        assert_eq!(summary.profit.rupiah(), 13000);
    }
}

//! Dashboard: sales and purchase trends, profit and popular products.

use std::sync::Arc;

use warteg_api::Gateway;
use warteg_core::dashboard::DashboardSummary;
use warteg_core::types::PopularProduct;

use crate::error::{AppError, AppResult};
use crate::notify::{Notification, Notifier};

/// A popular product with its image resolved to an absolute URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopularCard {
    pub product: PopularProduct,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardView {
    pub summary: DashboardSummary,
    pub popular: Vec<PopularCard>,
}

pub struct DashboardScreen {
    gateway: Gateway,
    notifier: Arc<dyn Notifier>,
    view: Option<DashboardView>,
}

impl DashboardScreen {
    pub fn new(gateway: Gateway, notifier: Arc<dyn Notifier>) -> Self {
        DashboardScreen {
            gateway,
            notifier,
            view: None,
        }
    }

    /// Reads `/dashboard`. A failed read keeps the last view.
    pub async fn load(&mut self) -> AppResult<&DashboardView> {
        let metrics = match self.gateway.dashboard().await {
            Ok(metrics) => metrics,
            Err(e) => {
                self.notifier.notify(Notification::error(e.to_string()));
                return Err(AppError::from(e).notified());
            }
        };

        let summary = DashboardSummary::from(&metrics);
        let popular = summary
            .popular_products
            .iter()
            .map(|p| PopularCard {
                image_url: p.image.as_deref().map(|path| self.gateway.image_url(path)),
                product: p.clone(),
            })
            .collect();

        Ok(&*self.view.insert(DashboardView { summary, popular }))
    }

    pub fn view(&self) -> Option<&DashboardView> {
        self.view.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::RecordingNotifier;
    use serde_json::json;
    use warteg_api::mock::MockTransport;
    use warteg_core::Money;

    fn setup() -> (Arc<MockTransport>, DashboardScreen) {
        let mock = Arc::new(MockTransport::new());
        let gateway = Gateway::new(mock.clone(), "http://test");
        let notifier = Arc::new(RecordingNotifier::default());
        (mock, DashboardScreen::new(gateway, notifier))
    }

    #[tokio::test]
    async fn test_load_builds_summary_and_image_urls() {
        let (mock, mut screen) = setup();
        mock.push_json(
            200,
            json!({
                "popularProducts": [
                    {"productId": "p1", "name": "Nasi", "harga": 5000, "image": "/uploads/nasi.jpg", "totalQty": "12"},
                    {"productId": "p2", "name": "Teh", "harga": 3000, "image": null}
                ],
                "salesTrend": [
                    {"date": "2024-05-01", "totalPenjualan": "20000"},
                    {"date": "2024-05-02", "totalPenjualan": 35000}
                ],
                "purchaseTrend": [{"date": "2024-05-01", "totalBelanja": 18000}],
                "totalSales": 55000,
                "totalPurchase": 18000,
                "profit": 37000
            }),
        );

        let view = screen.load().await.unwrap();

        assert_eq!(view.summary.sales.total, Money::from_rupiah(55_000));
        assert_eq!(
            view.summary.sales.peak,
            Some(("2024-05-02".to_string(), Money::from_rupiah(35_000)))
        );
        assert_eq!(view.summary.profit, Money::from_rupiah(37_000));
        assert_eq!(
            view.popular[0].image_url.as_deref(),
            Some("http://test/public/uploads/nasi.jpg")
        );
        assert_eq!(view.popular[1].image_url, None);
    }

    #[tokio::test]
    async fn test_failed_load_keeps_previous_view() {
        let (mock, mut screen) = setup();
        mock.push_json(200, json!({}));
        screen.load().await.unwrap();

        screen.gateway.cache().invalidate(&[warteg_api::CacheTag::Dashboard]);
        mock.push_json(502, json!({"message": "bad gateway"}));
        assert!(screen.load().await.is_err());
        assert!(screen.view().is_some());
    }
}

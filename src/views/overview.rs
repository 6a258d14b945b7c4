use std::fmt::Write;
use tracing::instrument;

use super::render;
use super::{ListState, LoadOutcome};
use crate::analytics::DashboardSummary;
use crate::domain::{Order, Product};
use crate::source::{queries, DataSource};

/// Business overview (`/admin`). Fetches its own slim projections rather
/// than reading the shared feed.
#[derive(Default)]
pub struct OverviewView {
    products: ListState<Product>,
    orders: ListState<Order>,
}

impl OverviewView {
    #[instrument(skip(source))]
    pub async fn mount(source: &dyn DataSource) -> Self {
        let mut view = Self::default();
        view.refresh(source).await;
        view
    }

    /// Both lists load concurrently and fail independently.
    pub async fn refresh(&mut self, source: &dyn DataSource) -> (LoadOutcome, LoadOutcome) {
        tokio::join!(
            self.products.load(source, queries::OVERVIEW_PRODUCTS),
            self.orders.load(source, queries::OVERVIEW_ORDERS),
        )
    }

    pub fn summary(&self) -> DashboardSummary {
        DashboardSummary::from_records(&self.products.records, &self.orders.records)
    }

    pub fn render(&self) -> String {
        let summary = self.summary();
        let mut out = String::new();
        let _ = writeln!(out, "Business Overview");
        let cards = [
            ("Total Products", summary.product_count.to_string()),
            ("Total Stock", summary.total_stock.to_string()),
            ("Total Value", render::money(summary.total_value)),
            ("Total Orders", summary.order_count.to_string()),
            ("Completed Orders", summary.completed_orders.to_string()),
            ("Pending Orders", summary.pending_orders.to_string()),
            ("Delivered Orders", summary.delivered_orders.to_string()),
        ];
        for (label, value) in cards {
            let _ = writeln!(out, "  {:<18}{}", label, value);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_source::MockSource;
    use serde_json::json;

    #[tokio::test]
    async fn summarises_both_projections() {
        let source = MockSource::new();
        source.respond(
            queries::OVERVIEW_PRODUCTS,
            json!([{ "price": 10.0, "stock": 2 }, { "price": 5.0, "stock": 4 }]),
        );
        source.respond(
            queries::OVERVIEW_ORDERS,
            json!([{ "status": "pending" }, { "status": "completed" }, { "status": "delivered" }, { "status": "pending" }]),
        );

        let view = OverviewView::mount(&source).await;
        let summary = view.summary();
        assert_eq!(summary.product_count, 2);
        assert_eq!(summary.total_value, 40.0);
        assert_eq!(summary.order_count, 4);
        assert_eq!(summary.pending_orders, 2);

        let rendered = view.render();
        assert!(rendered.contains("Total Value       $40.00"));
        assert_eq!(source.calls().len(), 2);
    }

    #[tokio::test]
    async fn one_failed_list_does_not_hide_the_other() {
        let source = MockSource::new();
        source.respond(queries::OVERVIEW_PRODUCTS, json!([{ "price": 3.0, "stock": 3 }]));
        source.fail(queries::OVERVIEW_ORDERS);

        let mut view = OverviewView::default();
        let (products, orders) = view.refresh(&source).await;
        assert_eq!(products, LoadOutcome::Refreshed(1));
        assert_eq!(orders, LoadOutcome::Stale);

        let summary = view.summary();
        assert_eq!(summary.total_stock, 3);
        assert_eq!(summary.order_count, 0);
    }
}

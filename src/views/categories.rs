use colored::Colorize;
use std::fmt::Write;
use tokio::sync::watch;
use tracing::{debug, error, instrument};

use super::render;
use crate::analytics::InventoryAnalytics;
use crate::feed::ProductFeedClient;
use crate::messages::ProductSnapshot;

/// Inventory analytics (`/admin/categories`). Recomputed whenever the
/// product feed publishes a new snapshot.
pub struct CategoriesView {
    updates: Option<watch::Receiver<ProductSnapshot>>,
    analytics: InventoryAnalytics,
}

impl CategoriesView {
    #[instrument(skip(feed))]
    pub async fn mount(feed: &ProductFeedClient) -> Self {
        match feed.subscribe().await {
            Ok(mut updates) => {
                let analytics = InventoryAnalytics::from_products(&updates.borrow_and_update());
                Self {
                    updates: Some(updates),
                    analytics,
                }
            }
            Err(e) => {
                error!(error = %e, "Product feed unavailable");
                Self {
                    updates: None,
                    analytics: InventoryAnalytics::default(),
                }
            }
        }
    }

    pub fn analytics(&self) -> &InventoryAnalytics {
        &self.analytics
    }

    /// Wait for the next feed change and recompute. Returns false once the
    /// feed has gone away.
    pub async fn changed(&mut self) -> bool {
        let Some(updates) = self.updates.as_mut() else {
            return false;
        };
        if updates.changed().await.is_err() {
            self.updates = None;
            return false;
        }
        self.analytics = InventoryAnalytics::from_products(&updates.borrow_and_update());
        debug!(categories = self.analytics.categories.len(), "Analytics recomputed");
        true
    }

    pub fn render(&self) -> String {
        let analytics = &self.analytics;
        let mut out = String::new();
        let _ = writeln!(out, "Inventory Analytics");
        let _ = writeln!(out, "Total Portfolio Value: {}", render::money(analytics.total_value));
        let _ = writeln!(out, "Total Inventory Units: {}", analytics.total_units);

        if analytics.is_empty() {
            out.push_str(&render::empty_state(
                "Inventory Dashboard Empty",
                "Add products to unlock inventory insights and analytics",
            ));
            return out;
        }

        for category in &analytics.categories {
            let _ = writeln!(
                out,
                "\n{} {}  {}\n  {}  {}",
                category.theme.icon(),
                category.label.to_uppercase().color(category.theme.color()).bold(),
                category.share_display(),
                render::money(category.value),
                share_bar(category.share),
            );
        }
        out
    }
}

fn share_bar(share: f64) -> String {
    const WIDTH: usize = 20;
    let filled = ((share / 100.0) * WIDTH as f64).round().clamp(0.0, WIDTH as f64) as usize;
    format!("[{}{}]", "#".repeat(filled), " ".repeat(WIDTH - filled))
}

use std::sync::Arc;
use tracing::{error, instrument};

use super::render::{self, Table};
use crate::analytics::categories::UNCATEGORIZED;
use crate::domain::Product;
use crate::feed::ProductFeedClient;
use crate::messages::ProductSnapshot;
use crate::search::{filter_records, Searchable};

/// Product table (`/admin/product`). Reads the shared feed instead of
/// fetching on its own.
pub struct ProductsView {
    products: ProductSnapshot,
    search_text: String,
}

impl ProductsView {
    #[instrument(skip(feed))]
    pub async fn mount(feed: &ProductFeedClient) -> Self {
        let products = match feed.products().await {
            Ok(products) => products,
            Err(e) => {
                error!(error = %e, "Product feed unavailable");
                Arc::new(Vec::new())
            }
        };
        Self::from_products(products)
    }

    pub fn from_products(products: ProductSnapshot) -> Self {
        Self {
            products,
            search_text: String::new(),
        }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search_text = query.into();
    }

    pub fn filtered(&self) -> Vec<&Product> {
        filter_records(&self.products, &self.search_text)
    }

    pub fn render(&self) -> String {
        let rows = self.filtered();
        if rows.is_empty() {
            return render::empty_state("No products found", "Try adjusting your search criteria");
        }

        let mut table = Table::new(["Name", "Category", "Price", "Stock", "Rating"]);
        for product in rows {
            table.row(vec![
                product.display_value().to_string(),
                category_label(product).to_string(),
                render::money(product.price),
                product.stock.to_string(),
                rating_label(product),
            ]);
        }
        table.render()
    }
}

fn category_label(product: &Product) -> &str {
    if product.category_name.trim().is_empty() {
        UNCATEGORIZED
    } else {
        &product.category_name
    }
}

fn rating_label(product: &Product) -> String {
    if product.rating.rate > 0.0 {
        format!("★ {} ({})", product.rating.rate, product.rating.count)
    } else {
        format!("★ N/A ({})", product.rating.count)
    }
}

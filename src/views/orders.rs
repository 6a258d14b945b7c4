use clap::ValueEnum;
use std::cmp::Ordering;
use tracing::instrument;

use super::render::{self, Table};
use super::{ListState, LoadOutcome};
use crate::domain::Order;
use crate::search::matches;
use crate::source::{queries, DataSource};

/// Columns the order table can be sorted by. Sorting is always ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OrderSortKey {
    #[default]
    Date,
    Amount,
    OrderCode,
    CustomerName,
}

impl OrderSortKey {
    fn compare(&self, a: &Order, b: &Order) -> Ordering {
        match self {
            OrderSortKey::Date => a.order_date.cmp(&b.order_date),
            OrderSortKey::Amount => a.total_amount.total_cmp(&b.total_amount),
            OrderSortKey::OrderCode => a.order_id.cmp(&b.order_id),
            OrderSortKey::CustomerName => a.customer_name().cmp(b.customer_name()),
        }
    }
}

/// Sort first, then keep orders that match both the search text and the
/// status filter. The sort is stable, so equal keys keep input order.
pub fn sort_and_filter<'a>(
    orders: &'a [Order],
    search: &str,
    status: &str,
    sort_key: OrderSortKey,
) -> Vec<&'a Order> {
    let mut sorted: Vec<&Order> = orders.iter().collect();
    sorted.sort_by(|a, b| sort_key.compare(a, b));
    sorted
        .into_iter()
        .filter(|order| matches(*order, search) && (status.is_empty() || order.status.as_str() == status))
        .collect()
}

/// Order table (`/admin/orders`).
pub struct OrdersView {
    list: ListState<Order>,
    search_text: String,
    status_filter: String,
    sort_key: OrderSortKey,
}

impl Default for OrdersView {
    fn default() -> Self {
        Self {
            list: ListState::new(),
            search_text: String::new(),
            status_filter: String::new(),
            sort_key: OrderSortKey::Date,
        }
    }
}

impl OrdersView {
    #[instrument(skip(source))]
    pub async fn mount(source: &dyn DataSource) -> Self {
        let mut view = Self::default();
        view.refresh(source).await;
        view
    }

    pub async fn refresh(&mut self, source: &dyn DataSource) -> LoadOutcome {
        self.list.load(source, queries::ORDERS).await
    }

    pub fn is_loading(&self) -> bool {
        self.list.loading
    }

    pub fn orders(&self) -> &[Order] {
        &self.list.records
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search_text = query.into();
    }

    /// Empty string clears the filter.
    pub fn set_status_filter(&mut self, status: impl Into<String>) {
        self.status_filter = status.into();
    }

    pub fn set_sort_key(&mut self, key: OrderSortKey) {
        self.sort_key = key;
    }

    pub fn visible(&self) -> Vec<&Order> {
        sort_and_filter(
            &self.list.records,
            &self.search_text,
            &self.status_filter,
            self.sort_key,
        )
    }

    pub fn render(&self) -> String {
        if self.list.loading {
            return render::loading("Orders");
        }

        let rows = self.visible();
        if rows.is_empty() {
            return render::empty_state("No orders found", "Try adjusting your search criteria");
        }

        let mut table = Table::new([
            "Order ID", "Customer", "Status", "Items", "Quantity", "Date", "Amount", "Address",
        ]);
        for order in rows {
            table.row(vec![
                order.order_id.clone(),
                order.customer_name().to_string(),
                order.status.as_str().to_uppercase(),
                order.item_count().to_string(),
                order.total_quantity().to_string(),
                render::short_date(order.order_date.as_ref()),
                render::money(order.total_amount),
                order.shipping_address.clone(),
            ]);
        }
        table.render()
    }
}

use crate::domain::{Order, OrderStatus, Product};

/// Counters shown on the overview page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardSummary {
    pub product_count: usize,
    pub total_stock: u64,
    pub total_value: f64,
    pub order_count: usize,
    pub completed_orders: usize,
    pub pending_orders: usize,
    pub delivered_orders: usize,
}

impl DashboardSummary {
    pub fn from_records(products: &[Product], orders: &[Order]) -> Self {
        let count_status = |status: OrderStatus| orders.iter().filter(|o| o.status == status).count();

        Self {
            product_count: products.len(),
            total_stock: products.iter().map(|p| u64::from(p.stock)).sum(),
            total_value: products.iter().map(Product::inventory_value).sum(),
            order_count: orders.len(),
            completed_orders: count_status(OrderStatus::Completed),
            pending_orders: count_status(OrderStatus::Pending),
            delivered_orders: count_status(OrderStatus::Delivered),
        }
    }
}

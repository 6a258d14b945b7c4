use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use super::{non_negative_amount, null_as_default, Record};
use crate::error::RecordError;

/// Fulfilment state of an order. Unknown values from the CMS are kept
/// verbatim so the status filter can still match them exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OrderStatus {
    Pending,
    Delivered,
    Completed,
    Other(String),
}

impl OrderStatus {
    pub fn as_str(&self) -> &str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Completed => "completed",
            OrderStatus::Other(raw) => raw,
        }
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Other(String::new())
    }
}

impl From<String> for OrderStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "pending" => OrderStatus::Pending,
            "delivered" => OrderStatus::Delivered,
            "completed" => OrderStatus::Completed,
            _ => OrderStatus::Other(raw),
        }
    }
}

impl From<&str> for OrderStatus {
    fn from(raw: &str) -> Self {
        OrderStatus::from(raw.to_string())
    }
}

impl From<OrderStatus> for String {
    fn from(status: OrderStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRef {
    #[serde(default, deserialize_with = "null_as_default")]
    pub full_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(default, deserialize_with = "null_as_default")]
    pub quantity: u32,
}

/// Represents a customer order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id", default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub order_id: String,
    #[serde(default)]
    pub customer: Option<CustomerRef>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<LineItem>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_amount: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: OrderStatus,
    #[serde(default, deserialize_with = "flexible_date")]
    pub order_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub shipping_address: String,
}

pub const GUEST_CUSTOMER: &str = "Guest";

impl Order {
    pub fn new(
        order_id: impl Into<String>,
        customer_name: impl Into<String>,
        total_amount: f64,
        status: impl Into<OrderStatus>,
    ) -> Self {
        let order_id = order_id.into();
        Self {
            id: order_id.clone(),
            order_id,
            customer: Some(CustomerRef {
                full_name: customer_name.into(),
            }),
            total_amount,
            status: status.into(),
            ..Default::default()
        }
    }

    pub fn with_date(mut self, date: DateTime<Utc>) -> Self {
        self.order_date = Some(date);
        self
    }

    pub fn with_items(mut self, quantities: &[u32]) -> Self {
        self.items = quantities
            .iter()
            .map(|&quantity| LineItem { quantity })
            .collect();
        self
    }

    /// Resolved customer name; orders without a customer reference belong
    /// to a guest.
    pub fn customer_name(&self) -> &str {
        match &self.customer {
            Some(customer) if !customer.full_name.is_empty() => &customer.full_name,
            _ => GUEST_CUSTOMER,
        }
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }
}

impl Record for Order {
    const KIND: &'static str = "order";

    fn id(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<(), RecordError> {
        non_negative_amount(Self::KIND, &self.id, "totalAmount", self.total_amount)
    }
}

/// Accepts RFC 3339 timestamps and bare `YYYY-MM-DD` dates.
fn flexible_date<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.trim().is_empty() => raw,
        _ => return Ok(None),
    };
    parse_order_date(raw.trim())
        .map(Some)
        .ok_or_else(|| serde::de::Error::custom(format!("unrecognised order date: {}", raw)))
}

pub fn parse_order_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_order_with_dereferenced_customer() {
        let raw = serde_json::json!({
            "_id": "o-1",
            "orderId": "ORD-1001",
            "customer": { "fullName": "John Doe" },
            "items": [{ "quantity": 2 }, { "quantity": 3 }],
            "totalAmount": 120.5,
            "status": "pending",
            "orderDate": "2024-03-01T10:15:00Z",
            "shippingAddress": "1 Main St"
        });

        let order: Order = serde_json::from_value(raw).unwrap();
        assert_eq!(order.order_id, "ORD-1001");
        assert_eq!(order.customer_name(), "John Doe");
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.item_count(), 2);
        assert_eq!(order.total_quantity(), 5);
        assert!(order.order_date.is_some());
    }

    #[test]
    fn unknown_status_is_preserved() {
        let status = OrderStatus::from("Shipped");
        assert_eq!(status, OrderStatus::Other("Shipped".to_string()));
        assert_eq!(status.as_str(), "Shipped");
    }

    #[test]
    fn missing_customer_is_a_guest() {
        let raw = serde_json::json!({ "_id": "o-2", "orderId": "ORD-2", "customer": null });
        let order: Order = serde_json::from_value(raw).unwrap();
        assert_eq!(order.customer_name(), GUEST_CUSTOMER);
    }

    #[test]
    fn date_only_values_parse() {
        let date = parse_order_date("2024-01-31").unwrap();
        assert_eq!(date.to_rfc3339(), "2024-01-31T00:00:00+00:00");
        assert!(parse_order_date("31/01/2024").is_none());
    }
}

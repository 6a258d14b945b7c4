use serde::{Deserialize, Serialize};

use super::{non_negative_amount, null_as_default, Record};
use crate::error::RecordError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    #[serde(default, deserialize_with = "null_as_default")]
    pub rate: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub count: u32,
}

/// Represents a product in the catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id", alias = "id", default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub price: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub stock: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub rating: Rating,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl Product {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category_name: impl Into<String>,
        price: f64,
        stock: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category_name: category_name.into(),
            price,
            stock,
            ..Default::default()
        }
    }

    /// Value of the units on hand.
    pub fn inventory_value(&self) -> f64 {
        self.price * f64::from(self.stock)
    }
}

impl Record for Product {
    const KIND: &'static str = "product";

    fn id(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<(), RecordError> {
        non_negative_amount(Self::KIND, &self.id, "price", self.price)
    }
}

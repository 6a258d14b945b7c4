use std::collections::HashMap;

use crate::domain::Product;

pub const UNCATEGORIZED: &str = "Uncategorized";

/// Presentation theme for a category card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryTheme {
    Chairs,
    Cutlery,
    Tables,
    Decoration,
    Default,
}

impl CategoryTheme {
    /// Lookup is keyed on the normalised category name.
    pub fn for_key(key: &str) -> Self {
        match key {
            "chairs" => CategoryTheme::Chairs,
            "cutlery" => CategoryTheme::Cutlery,
            "tables" => CategoryTheme::Tables,
            "decoration" => CategoryTheme::Decoration,
            _ => CategoryTheme::Default,
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            CategoryTheme::Chairs => "🪑",
            CategoryTheme::Cutlery => "🍴",
            CategoryTheme::Tables => "🛋",
            CategoryTheme::Decoration => "💡",
            CategoryTheme::Default => "📦",
        }
    }

    pub fn color(&self) -> colored::Color {
        match self {
            CategoryTheme::Chairs => colored::Color::Cyan,
            CategoryTheme::Cutlery => colored::Color::Blue,
            CategoryTheme::Tables => colored::Color::Yellow,
            CategoryTheme::Decoration => colored::Color::Magenta,
            CategoryTheme::Default => colored::Color::White,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryShare {
    /// First spelling of the category seen in the feed.
    pub label: String,
    pub value: f64,
    /// Percentage of the total inventory value, 0.0 when the total is 0.
    pub share: f64,
    pub theme: CategoryTheme,
}

impl CategoryShare {
    pub fn share_display(&self) -> String {
        format!("{:.1}%", self.share)
    }
}

/// Inventory value and units, overall and per category.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InventoryAnalytics {
    pub total_value: f64,
    pub total_units: u64,
    pub categories: Vec<CategoryShare>,
}

impl InventoryAnalytics {
    pub fn from_products(products: &[Product]) -> Self {
        let mut total_value = 0.0;
        let mut total_units = 0u64;
        let mut categories: Vec<CategoryShare> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();

        for product in products {
            let value = product.inventory_value();
            total_value += value;
            total_units += u64::from(product.stock);

            let (key, label) = category_key(&product.category_name);
            match positions.get(&key) {
                Some(&position) => categories[position].value += value,
                None => {
                    positions.insert(key.clone(), categories.len());
                    categories.push(CategoryShare {
                        label,
                        value,
                        share: 0.0,
                        theme: CategoryTheme::for_key(&key),
                    });
                }
            }
        }

        for category in &mut categories {
            category.share = share_of(category.value, total_value);
        }

        Self {
            total_value,
            total_units,
            categories,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn category(&self, name: &str) -> Option<&CategoryShare> {
        let (key, _) = category_key(name);
        self.categories
            .iter()
            .find(|category| category_key(&category.label).0 == key)
    }
}

/// Grouping key and display label for a raw category name.
fn category_key(raw: &str) -> (String, String) {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        (UNCATEGORIZED.to_lowercase(), UNCATEGORIZED.to_string())
    } else {
        (trimmed.to_lowercase(), trimmed.to_string())
    }
}

fn share_of(value: f64, total: f64) -> f64 {
    if total > 0.0 {
        100.0 * value / total
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_value_by_category() {
        let analytics = InventoryAnalytics::from_products(&[
            Product::new("p1", "Chair", "chairs", 10.0, 2),
            Product::new("p2", "Table", "tables", 5.0, 4),
        ]);

        assert_eq!(analytics.total_value, 40.0);
        assert_eq!(analytics.total_units, 6);

        let chairs = analytics.category("chairs").unwrap();
        assert_eq!(chairs.value, 20.0);
        assert_eq!(chairs.share_display(), "50.0%");
        assert_eq!(chairs.theme, CategoryTheme::Chairs);

        let tables = analytics.category("tables").unwrap();
        assert_eq!(tables.value, 20.0);
        assert_eq!(tables.share_display(), "50.0%");
    }

    #[test]
    fn empty_feed_has_no_categories() {
        let analytics = InventoryAnalytics::from_products(&[]);
        assert_eq!(analytics.total_value, 0.0);
        assert_eq!(analytics.total_units, 0);
        assert!(analytics.is_empty());
    }

    #[test]
    fn zero_total_value_gives_zero_shares() {
        let analytics = InventoryAnalytics::from_products(&[
            Product::new("p1", "Free Chair", "chairs", 0.0, 3),
            Product::new("p2", "Sold Out", "tables", 99.0, 0),
        ]);

        assert_eq!(analytics.total_value, 0.0);
        for category in &analytics.categories {
            assert_eq!(category.share, 0.0);
            assert_eq!(category.share_display(), "0.0%");
        }
    }

    #[test]
    fn grouping_ignores_case_and_keeps_first_label() {
        let analytics = InventoryAnalytics::from_products(&[
            Product::new("p1", "Chair", "Chairs", 10.0, 1),
            Product::new("p2", "Stool", "chairs ", 10.0, 1),
            Product::new("p3", "Vase", "Decoration", 20.0, 1),
        ]);

        assert_eq!(analytics.categories.len(), 2);
        assert_eq!(analytics.categories[0].label, "Chairs");
        assert_eq!(analytics.categories[0].value, 20.0);
        assert_eq!(analytics.categories[0].theme, CategoryTheme::Chairs);
        assert_eq!(analytics.categories[1].theme, CategoryTheme::Decoration);
    }

    #[test]
    fn unknown_and_missing_categories() {
        let analytics = InventoryAnalytics::from_products(&[
            Product::new("p1", "Rug", "Textiles", 10.0, 1),
            Product::new("p2", "Mystery", "", 10.0, 1),
        ]);

        assert_eq!(analytics.categories[0].theme, CategoryTheme::Default);
        assert_eq!(analytics.categories[1].label, UNCATEGORIZED);
        assert_eq!(analytics.categories[1].theme, CategoryTheme::Default);
    }
}

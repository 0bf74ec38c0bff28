//! Storefront products.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::ProductId;

/// A selectable product variant dimension, e.g. `Size: [S, M, L]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductOption {
    pub name: String,
    #[serde(default)]
    pub values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_price: Option<Decimal>,
    #[serde(default)]
    pub images: Vec<String>,
    /// Category name.
    #[serde(default)]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_category: Option<String>,
    #[serde(default)]
    pub options: Vec<ProductOption>,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub featured: bool,
}

impl Product {
    /// Price actually charged: the discount price when one is set below the list price.
    #[must_use]
    pub fn effective_price(&self) -> Decimal {
        match self.discount_price {
            Some(discount) if discount < self.price => discount,
            _ => self.price,
        }
    }

    #[must_use]
    pub fn is_discounted(&self) -> bool {
        self.effective_price() < self.price
    }

    /// Whole-number percentage saved, for "-20%" badges.
    #[must_use]
    pub fn discount_percent(&self) -> u32 {
        if !self.is_discounted() || self.price.is_zero() {
            return 0;
        }
        let saved = (self.price - self.effective_price()) / self.price * Decimal::ONE_HUNDRED;
        saved.round().try_into().unwrap_or(0)
    }

    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }

    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// Whether `value` is one of the declared values for option `name`.
    #[must_use]
    pub fn accepts_option(&self, name: &str, value: &str) -> bool {
        self.options
            .iter()
            .any(|o| o.name == name && o.values.iter().any(|v| v == value))
    }

    /// Case-insensitive match on name, description or category.
    #[must_use]
    pub fn matches_query(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        needle.is_empty()
            || self.name.to_lowercase().contains(&needle)
            || self.description.to_lowercase().contains(&needle)
            || self.category.to_lowercase().contains(&needle)
    }

    #[must_use]
    pub fn in_category(&self, category: &str) -> bool {
        self.category.eq_ignore_ascii_case(category)
            || self
                .sub_category
                .as_deref()
                .is_some_and(|s| s.eq_ignore_ascii_case(category))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn product(price: &str, discount: Option<&str>) -> Product {
        Product {
            id: ProductId::new("p1"),
            name: "Jamdani Saree".to_string(),
            description: "Handwoven cotton".to_string(),
            price: Decimal::from_str(price).unwrap(),
            discount_price: discount.map(|d| Decimal::from_str(d).unwrap()),
            images: vec!["/img/saree.jpg".to_string()],
            category: "Women".to_string(),
            sub_category: Some("Sarees".to_string()),
            options: vec![ProductOption {
                name: "Color".to_string(),
                values: vec!["Red".to_string(), "Blue".to_string()],
            }],
            stock: 3,
            featured: true,
        }
    }

    #[test]
    fn test_effective_price_prefers_lower_discount() {
        let p = product("2500", Some("2000"));
        assert_eq!(p.effective_price(), Decimal::from(2000));
        assert!(p.is_discounted());
        assert_eq!(p.discount_percent(), 20);
    }

    #[test]
    fn test_discount_above_price_is_ignored() {
        let p = product("2500", Some("3000"));
        assert_eq!(p.effective_price(), Decimal::from(2500));
        assert_eq!(p.discount_percent(), 0);
    }

    #[test]
    fn test_options_and_search() {
        let p = product("100", None);
        assert!(p.accepts_option("Color", "Red"));
        assert!(!p.accepts_option("Color", "Green"));
        assert!(p.matches_query("jamdani"));
        assert!(p.matches_query("  "));
        assert!(!p.matches_query("panjabi"));
        assert!(p.in_category("sarees"));
        assert!(p.in_category("WOMEN"));
    }

    #[test]
    fn test_product_wire_format() {
        let json = r#"{"_id":"p9","name":"Lungi","price":450.5,"discountPrice":399,"stock":0}"#;
        let p: Product = serde_json::from_str(json).unwrap();
        assert_eq!(p.effective_price(), Decimal::from(399));
        assert!(!p.in_stock());
        assert!(p.primary_image().is_none());
    }
}

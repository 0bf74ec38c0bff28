//! Session-held shopping cart.
//!
//! Lines are keyed by product id plus the selected options, so the same shirt
//! in two sizes is two lines. Unit prices are captured at add time using the
//! product's effective (discounted) price.

use std::collections::BTreeMap;

use bazaar_core::{LineItem, Product, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tower_sessions::Session;

use super::session::keys;

/// Largest quantity a single line may hold.
pub const MAX_LINE_QUANTITY: u32 = 99;

/// Reasons a cart change is refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    #[error("{0} is out of stock")]
    OutOfStock(String),

    #[error("Only {available} of {name} available")]
    InsufficientStock { name: String, available: u32 },

    #[error("Please choose a {0}")]
    MissingOption(String),

    #[error("{value} is not an available {name}")]
    InvalidOption { name: String, value: String },

    #[error("Quantity must be at least 1")]
    ZeroQuantity,
}

/// One product/options combination in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: ProductId,
    pub name: String,
    pub image: String,
    /// Effective unit price when the line was added.
    pub unit_price: Decimal,
    pub quantity: u32,
    pub options: BTreeMap<String, String>,
}

impl CartLine {
    /// Stable identifier for this line: product id plus sorted options.
    #[must_use]
    pub fn key(&self) -> String {
        line_key(&self.product_id, &self.options)
    }

    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// `id` alone, or `id|Color=Red;Size=M` when options are selected.
#[must_use]
pub fn line_key(product_id: &ProductId, options: &BTreeMap<String, String>) -> String {
    if options.is_empty() {
        return product_id.to_string();
    }
    let opts = options
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join(";");
    format!("{product_id}|{opts}")
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    pub lines: Vec<CartLine>,
}

impl Cart {
    /// Load the cart from the session, empty when none was stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store cannot be read.
    pub async fn load(session: &Session) -> Result<Self, tower_sessions::session::Error> {
        Ok(session.get::<Self>(keys::CART).await?.unwrap_or_default())
    }

    /// Write the cart back to the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store cannot be written.
    pub async fn save(&self, session: &Session) -> Result<(), tower_sessions::session::Error> {
        session.insert(keys::CART, self).await
    }

    /// Remove the cart from the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store cannot be written.
    pub async fn clear(session: &Session) -> Result<(), tower_sessions::session::Error> {
        session.remove::<Self>(keys::CART).await.map(drop)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total units across all lines, for the header badge.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Add `quantity` of `product` with the chosen options.
    ///
    /// Every option the product declares must be chosen from its values;
    /// options it does not declare are dropped. Adding an existing
    /// combination increases that line's quantity.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] when the product is out of stock, an option is
    /// missing or invalid, or the combined quantity exceeds the stock.
    pub fn add(
        &mut self,
        product: &Product,
        quantity: u32,
        selected: &BTreeMap<String, String>,
    ) -> Result<(), CartError> {
        if quantity == 0 {
            return Err(CartError::ZeroQuantity);
        }
        if !product.in_stock() {
            return Err(CartError::OutOfStock(product.name.clone()));
        }

        let mut options = BTreeMap::new();
        for option in &product.options {
            let value = selected
                .get(&option.name)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| CartError::MissingOption(option.name.to_lowercase()))?;
            if !product.accepts_option(&option.name, value) {
                return Err(CartError::InvalidOption {
                    name: option.name.to_lowercase(),
                    value: value.to_string(),
                });
            }
            options.insert(option.name.clone(), value.to_string());
        }

        let key = line_key(&product.id, &options);
        let already = self
            .lines
            .iter()
            .find(|l| l.key() == key)
            .map_or(0, |l| l.quantity);
        let wanted = already.saturating_add(quantity);
        let available = product.stock.min(MAX_LINE_QUANTITY);
        if wanted > available {
            return Err(CartError::InsufficientStock {
                name: product.name.clone(),
                available,
            });
        }

        if let Some(line) = self.lines.iter_mut().find(|l| l.key() == key) {
            line.quantity = wanted;
        } else {
            self.lines.push(CartLine {
                product_id: product.id.clone(),
                name: product.name.clone(),
                image: product.primary_image().unwrap_or_default().to_string(),
                unit_price: product.effective_price(),
                quantity,
                options,
            });
        }
        Ok(())
    }

    /// The line stored under `key`.
    #[must_use]
    pub fn line(&self, key: &str) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.key() == key)
    }

    /// Set a line's quantity; zero removes it. Returns whether the line existed.
    ///
    /// `stock` is the product's current stock; the line is held to the same
    /// `min(stock, MAX_LINE_QUANTITY)` limit as [`Cart::add`].
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InsufficientStock`] when `quantity` exceeds the
    /// limit. The line is left unchanged.
    pub fn set_quantity(
        &mut self,
        key: &str,
        quantity: u32,
        stock: u32,
    ) -> Result<bool, CartError> {
        if quantity == 0 {
            return Ok(self.remove(key));
        }
        let Some(line) = self.lines.iter_mut().find(|l| l.key() == key) else {
            return Ok(false);
        };
        let available = stock.min(MAX_LINE_QUANTITY);
        if quantity > available {
            return Err(CartError::InsufficientStock {
                name: line.name.clone(),
                available,
            });
        }
        line.quantity = quantity;
        Ok(true)
    }

    /// Remove a line. Returns whether it existed.
    pub fn remove(&mut self, key: &str) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| l.key() != key);
        self.lines.len() != before
    }

    /// Order line items for checkout.
    #[must_use]
    pub fn to_line_items(&self) -> Vec<LineItem> {
        self.lines
            .iter()
            .map(|l| LineItem {
                name: l.name.clone(),
                image: l.image.clone(),
                quantity: l.quantity,
                price: l.unit_price,
                selected_options: l.options.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use bazaar_core::ProductOption;
    use std::str::FromStr;

    fn panjabi() -> Product {
        Product {
            id: ProductId::new("p-panjabi"),
            name: "Cotton Panjabi".to_string(),
            description: String::new(),
            price: Decimal::from(1800),
            discount_price: Some(Decimal::from(1500)),
            images: vec!["/img/panjabi.jpg".to_string()],
            category: "Men".to_string(),
            sub_category: None,
            options: vec![ProductOption {
                name: "Size".to_string(),
                values: vec!["M".to_string(), "L".to_string()],
            }],
            stock: 5,
            featured: false,
        }
    }

    fn size(value: &str) -> BTreeMap<String, String> {
        BTreeMap::from([("Size".to_string(), value.to_string())])
    }

    #[test]
    fn test_same_options_merge_into_one_line() {
        let mut cart = Cart::default();
        cart.add(&panjabi(), 1, &size("M")).unwrap();
        cart.add(&panjabi(), 2, &size("M")).unwrap();
        cart.add(&panjabi(), 1, &size("L")).unwrap();

        assert_eq!(cart.lines.len(), 2);
        assert_eq!(cart.lines[0].quantity, 3);
        assert_eq!(cart.item_count(), 4);
    }

    #[test]
    fn test_subtotal_uses_effective_price() {
        let mut cart = Cart::default();
        cart.add(&panjabi(), 2, &size("M")).unwrap();
        assert_eq!(cart.subtotal(), Decimal::from(3000));

        let items = cart.to_line_items();
        assert_eq!(items[0].price, Decimal::from_str("1500").unwrap());
        assert_eq!(items[0].selected_options["Size"], "M");
    }

    #[test]
    fn test_options_must_be_declared_values() {
        let mut cart = Cart::default();
        assert_eq!(
            cart.add(&panjabi(), 1, &BTreeMap::new()),
            Err(CartError::MissingOption("size".to_string()))
        );
        assert!(matches!(
            cart.add(&panjabi(), 1, &size("XXL")),
            Err(CartError::InvalidOption { .. })
        ));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_undeclared_options_are_dropped() {
        let mut cart = Cart::default();
        let mut selected = size("L");
        selected.insert("Engraving".to_string(), "RH".to_string());
        cart.add(&panjabi(), 1, &selected).unwrap();
        assert_eq!(cart.lines[0].key(), "p-panjabi|Size=L");
    }

    #[test]
    fn test_stock_limits() {
        let mut cart = Cart::default();
        cart.add(&panjabi(), 4, &size("M")).unwrap();
        assert_eq!(
            cart.add(&panjabi(), 2, &size("M")),
            Err(CartError::InsufficientStock {
                name: "Cotton Panjabi".to_string(),
                available: 5
            })
        );

        let mut sold_out = panjabi();
        sold_out.stock = 0;
        assert!(matches!(
            cart.add(&sold_out, 1, &size("M")),
            Err(CartError::OutOfStock(_))
        ));
        assert_eq!(cart.add(&panjabi(), 0, &size("M")), Err(CartError::ZeroQuantity));
    }

    #[test]
    fn test_set_quantity_zero_removes() {
        let mut cart = Cart::default();
        cart.add(&panjabi(), 1, &size("M")).unwrap();
        let key = cart.lines[0].key();

        assert_eq!(cart.set_quantity(&key, 3, 5), Ok(true));
        assert_eq!(cart.item_count(), 3);
        assert_eq!(cart.set_quantity(&key, 0, 5), Ok(true));
        assert!(cart.is_empty());
        assert_eq!(cart.set_quantity(&key, 1, 5), Ok(false));
    }

    #[test]
    fn test_set_quantity_respects_stock() {
        let mut cart = Cart::default();
        cart.add(&panjabi(), 1, &size("M")).unwrap();
        let key = cart.lines[0].key();

        assert_eq!(
            cart.set_quantity(&key, 50, 5),
            Err(CartError::InsufficientStock {
                name: "Cotton Panjabi".to_string(),
                available: 5
            })
        );
        assert_eq!(cart.item_count(), 1);

        assert_eq!(
            cart.set_quantity(&key, 120, 500),
            Err(CartError::InsufficientStock {
                name: "Cotton Panjabi".to_string(),
                available: MAX_LINE_QUANTITY
            })
        );
        assert_eq!(cart.set_quantity(&key, 5, 5), Ok(true));
        assert_eq!(cart.line(&key).map(|l| l.quantity), Some(5));
    }

    #[test]
    fn test_remove_unknown_line_is_noop() {
        let mut cart = Cart::default();
        cart.add(&panjabi(), 1, &size("M")).unwrap();
        assert!(!cart.remove("p-other"));
        assert_eq!(cart.lines.len(), 1);
        assert!(cart.remove("p-panjabi|Size=M"));
    }
}

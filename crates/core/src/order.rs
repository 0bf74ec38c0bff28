//! Orders, their line items, and client-side filtering for the order console.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{OrderId, OrderStatus};

/// Customer billing details captured at checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingInfo {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
}

/// One purchased product line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub name: String,
    #[serde(default)]
    pub image: String,
    pub quantity: u32,
    /// Unit price.
    pub price: Decimal,
    /// Variant choices, e.g. `{"Size": "M", "Color": "Red"}`.
    #[serde(default)]
    pub selected_options: BTreeMap<String, String>,
}

impl LineItem {
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }

    /// Variant choices rendered as `Color: Red, Size: M`.
    #[must_use]
    pub fn options_summary(&self) -> String {
        self.selected_options
            .iter()
            .map(|(k, v)| format!("{k}: {v}"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// How an order was (or will be) paid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInfo {
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl PaymentInfo {
    /// Payment record for orders placed without an online gateway.
    #[must_use]
    pub fn cash_on_delivery() -> Self {
        Self {
            method: "cash_on_delivery".to_string(),
            transaction_id: None,
            status: Some("unpaid".to_string()),
        }
    }
}

/// A customer purchase record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: OrderId,
    pub billing_info: BillingInfo,
    #[serde(default)]
    pub items: Vec<LineItem>,
    pub total_amount: Decimal,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub payment_info: PaymentInfo,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Calendar date (UTC) the order was created.
    #[must_use]
    pub fn created_date(&self) -> NaiveDate {
        self.created_at.date_naive()
    }
}

impl AsRef<Self> for Order {
    fn as_ref(&self) -> &Self {
        self
    }
}

/// Body for `POST /orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub billing_info: BillingInfo,
    pub items: Vec<LineItem>,
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub payment_info: PaymentInfo,
}

impl NewOrder {
    /// Build a pending, cash-on-delivery order whose total is the sum of its lines.
    #[must_use]
    pub fn pending(billing_info: BillingInfo, items: Vec<LineItem>) -> Self {
        let total_amount = items.iter().map(LineItem::line_total).sum();
        Self {
            billing_info,
            items,
            total_amount,
            status: OrderStatus::Pending,
            payment_info: PaymentInfo::cash_on_delivery(),
        }
    }
}

/// Body for `PATCH /orders/{id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: OrderStatus,
}

/// Composable order-console filters. Absent predicates are inactive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderFilter {
    /// Case-insensitive substring of order id, customer name or email.
    pub search: Option<String>,
    /// Exact calendar date of `created_at` (UTC).
    pub date: Option<NaiveDate>,
    pub status: Option<OrderStatus>,
}

impl OrderFilter {
    /// Build a filter, treating a blank search string as inactive.
    #[must_use]
    pub fn new(search: Option<&str>, date: Option<NaiveDate>, status: Option<OrderStatus>) -> Self {
        Self {
            search: search
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_lowercase),
            date,
            status,
        }
    }

    /// True when no predicate is active.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.search.is_none() && self.date.is_none() && self.status.is_none()
    }

    /// Whether `order` satisfies every active predicate.
    #[must_use]
    pub fn matches(&self, order: &Order) -> bool {
        if let Some(needle) = &self.search {
            let hit = order.id.as_str().to_lowercase().contains(needle)
                || order.billing_info.name.to_lowercase().contains(needle)
                || order.billing_info.email.to_lowercase().contains(needle);
            if !hit {
                return false;
            }
        }
        if let Some(date) = self.date
            && order.created_date() != date
        {
            return false;
        }
        if let Some(status) = self.status
            && order.status != status
        {
            return false;
        }
        true
    }

    /// Matching orders, in their original relative order.
    #[must_use]
    pub fn apply<'a>(&self, orders: &'a [Order]) -> Vec<&'a Order> {
        orders.iter().filter(|o| self.matches(o)).collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
pub(crate) mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::str::FromStr;

    pub(crate) fn order(id: &str, name: &str, email: &str, status: OrderStatus, day: u32) -> Order {
        Order {
            id: OrderId::new(id),
            billing_info: BillingInfo {
                name: name.to_string(),
                email: email.to_string(),
                phone: "01700000000".to_string(),
                address: "House 1, Road 2, Dhaka".to_string(),
            },
            items: vec![LineItem {
                name: "Panjabi".to_string(),
                image: String::new(),
                quantity: 2,
                price: Decimal::from_str("750.50").unwrap(),
                selected_options: BTreeMap::from([("Size".to_string(), "L".to_string())]),
            }],
            total_amount: Decimal::from_str("1501.00").unwrap(),
            status,
            payment_info: PaymentInfo::cash_on_delivery(),
            created_at: Utc.with_ymd_and_hms(2024, 5, day, 10, 30, 0).unwrap(),
        }
    }

    fn fixture() -> Vec<Order> {
        vec![
            order("a1", "Rahim Uddin", "rahim@example.com", OrderStatus::Pending, 1),
            order("b2", "Karima Begum", "karima@example.com", OrderStatus::Shipped, 1),
            order("c3", "Rahman Ali", "ali@shop.test", OrderStatus::Pending, 2),
            order("d4", "Nadia Islam", "nadia@example.com", OrderStatus::Delivered, 2),
        ]
    }

    fn ids(orders: &[&Order]) -> Vec<String> {
        orders.iter().map(|o| o.id.to_string()).collect()
    }

    #[test]
    fn test_status_filter_preserves_relative_order() {
        let orders = vec![
            order("1", "A", "a@x.io", OrderStatus::Pending, 1),
            order("2", "B", "b@x.io", OrderStatus::Shipped, 1),
            order("3", "C", "c@x.io", OrderStatus::Pending, 1),
        ];
        let filter = OrderFilter::new(None, None, Some(OrderStatus::Pending));
        assert_eq!(ids(&filter.apply(&orders)), vec!["1", "3"]);
    }

    #[test]
    fn test_search_matches_id_name_or_email_case_insensitively() {
        let orders = fixture();
        assert_eq!(ids(&OrderFilter::new(Some("RAH"), None, None).apply(&orders)), vec!["a1", "c3"]);
        assert_eq!(ids(&OrderFilter::new(Some("shop.test"), None, None).apply(&orders)), vec!["c3"]);
        assert_eq!(ids(&OrderFilter::new(Some("B2"), None, None).apply(&orders)), vec!["b2"]);
    }

    #[test]
    fn test_date_filter_matches_calendar_day() {
        let orders = fixture();
        let date = NaiveDate::from_ymd_opt(2024, 5, 2);
        assert_eq!(ids(&OrderFilter::new(None, date, None).apply(&orders)), vec!["c3", "d4"]);
    }

    #[test]
    fn test_filters_compose_as_intersection() {
        let orders = fixture();
        let search = Some("rah");
        let date = NaiveDate::from_ymd_opt(2024, 5, 1);
        let status = Some(OrderStatus::Pending);

        let search_only = OrderFilter::new(search, None, None).apply(&orders);
        let date_only = OrderFilter::new(None, date, None).apply(&orders);
        let status_only = OrderFilter::new(None, None, status).apply(&orders);
        let combined = OrderFilter::new(search, date, status).apply(&orders);

        let expected: Vec<String> = ids(&search_only)
            .into_iter()
            .filter(|id| ids(&date_only).contains(id) && ids(&status_only).contains(id))
            .collect();
        assert_eq!(ids(&combined), expected);
        assert_eq!(ids(&combined), vec!["a1"]);
    }

    #[test]
    fn test_cleared_filter_returns_everything() {
        let orders = fixture();
        let filter = OrderFilter::new(Some("   "), None, None);
        assert!(filter.is_empty());
        assert_eq!(filter.apply(&orders).len(), orders.len());
    }

    #[test]
    fn test_order_wire_format() {
        let json = r#"{
            "_id": "665f",
            "billingInfo": {"name": "Rahim", "email": "r@x.io", "phone": "017", "address": "Dhaka"},
            "items": [{"name": "Saree", "image": "s.png", "quantity": 1, "price": 2500, "selectedOptions": {"Color": "Red"}}],
            "totalAmount": 2500,
            "status": "processing",
            "paymentInfo": {"method": "bkash", "transactionId": "TX1"},
            "createdAt": "2024-05-01T08:00:00Z"
        }"#;
        let order: Order = serde_json::from_str(json).unwrap();
        assert_eq!(order.status, OrderStatus::Processing);
        assert_eq!(order.items[0].options_summary(), "Color: Red");
        assert_eq!(order.payment_info.transaction_id.as_deref(), Some("TX1"));
        assert_eq!(order.item_count(), 1);
    }

    #[test]
    fn test_new_order_totals_lines() {
        let items = fixture()[0].items.clone();
        let new_order = NewOrder::pending(BillingInfo::default(), items);
        assert_eq!(new_order.total_amount, Decimal::from_str("1501.00").unwrap());
        assert_eq!(new_order.status, OrderStatus::Pending);
        assert_eq!(new_order.payment_info.method, "cash_on_delivery");
    }
}

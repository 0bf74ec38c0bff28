//! Type definitions and conversions for order views.

use bazaar_core::{CurrencyCode, LineItem, Money, Order, OrderFilter, OrderStatus};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

// =============================================================================
// Query Parameters
// =============================================================================

/// Query parameters for the orders list. Every field is optional and a blank
/// value is the same as an absent one.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrdersQuery {
    /// Free-text search over order id, customer name and email.
    pub search: Option<String>,
    /// Calendar date, `YYYY-MM-DD`.
    pub date: Option<String>,
    /// One of the order statuses.
    pub status: Option<String>,
}

/// Non-blank trimmed value.
fn present(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

impl OrdersQuery {
    /// Build the order filter, ignoring values that do not parse.
    ///
    /// Returns the filter and one message per ignored value.
    #[must_use]
    pub fn to_filter(&self) -> (OrderFilter, Vec<String>) {
        let mut warnings = Vec::new();

        let date = present(self.date.as_ref()).and_then(|raw| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .inspect_err(|_| {
                    warnings.push(format!("Ignoring date filter \"{raw}\": expected YYYY-MM-DD."));
                })
                .ok()
        });

        let status = present(self.status.as_ref()).and_then(|raw| {
            raw.parse::<OrderStatus>()
                .inspect_err(|_| {
                    warnings.push(format!("Ignoring unknown status filter \"{raw}\"."));
                })
                .ok()
        });

        let filter = OrderFilter::new(present(self.search.as_ref()), date, status);
        (filter, warnings)
    }

    /// Encoded query string of the non-blank parameters, without a leading `?`.
    #[must_use]
    pub fn query_string(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (key, value) in [
            ("search", &self.search),
            ("date", &self.date),
            ("status", &self.status),
        ] {
            if let Some(value) = present(value.as_ref()) {
                serializer.append_pair(key, value);
            }
        }
        serializer.finish()
    }

    /// `path` with the preserved filter query appended.
    #[must_use]
    pub fn url_for(&self, path: &str) -> String {
        let query = self.query_string();
        if query.is_empty() {
            path.to_string()
        } else {
            format!("{path}?{query}")
        }
    }

    /// The status filter value, for highlighting the selected option.
    #[must_use]
    pub fn status_value(&self) -> String {
        present(self.status.as_ref()).unwrap_or_default().to_lowercase()
    }
}

// =============================================================================
// View Types
// =============================================================================

fn money(amount: Decimal) -> String {
    Money::new(amount, CurrencyCode::default()).to_string()
}

/// Order row for the list and dashboard tables.
#[derive(Debug, Clone)]
pub struct OrderRowView {
    pub id: String,
    pub customer_name: String,
    pub email: String,
    /// `YYYY-MM-DD`
    pub date: String,
    pub created_at: String,
    pub item_count: u32,
    pub total: String,
    pub status: OrderStatus,
    pub payment_method: String,
    pub payment_status: String,
}

impl From<&Order> for OrderRowView {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.to_string(),
            customer_name: order.billing_info.name.clone(),
            email: order.billing_info.email.clone(),
            date: order.created_date().format("%Y-%m-%d").to_string(),
            created_at: order.created_at.format("%b %-d, %Y %H:%M UTC").to_string(),
            item_count: order.item_count(),
            total: money(order.total_amount),
            status: order.status,
            payment_method: payment_method_label(&order.payment_info.method),
            payment_status: order.payment_info.status.clone().unwrap_or_default(),
        }
    }
}

/// Human label for a payment method identifier.
fn payment_method_label(method: &str) -> String {
    match method {
        "cash_on_delivery" => "Cash on delivery".to_string(),
        "" => "Unknown".to_string(),
        other => other.replace('_', " "),
    }
}

/// Line item for the detail view.
#[derive(Debug, Clone)]
pub struct LineItemView {
    pub name: String,
    pub image: String,
    pub quantity: u32,
    pub price: String,
    pub line_total: String,
    pub options: String,
}

impl From<&LineItem> for LineItemView {
    fn from(item: &LineItem) -> Self {
        Self {
            name: item.name.clone(),
            image: item.image.clone(),
            quantity: item.quantity,
            price: money(item.price),
            line_total: money(item.line_total()),
            options: item.options_summary(),
        }
    }
}

/// Full read-only order record for the detail view.
#[derive(Debug, Clone)]
pub struct OrderDetailView {
    pub row: OrderRowView,
    pub phone: String,
    pub address: String,
    pub transaction_id: Option<String>,
    pub items: Vec<LineItemView>,
}

impl From<&Order> for OrderDetailView {
    fn from(order: &Order) -> Self {
        Self {
            row: OrderRowView::from(order),
            phone: order.billing_info.phone.clone(),
            address: order.billing_info.address.clone(),
            transaction_id: order.payment_info.transaction_id.clone(),
            items: order.items.iter().map(LineItemView::from).collect(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn query(search: Option<&str>, date: Option<&str>, status: Option<&str>) -> OrdersQuery {
        OrdersQuery {
            search: search.map(str::to_string),
            date: date.map(str::to_string),
            status: status.map(str::to_string),
        }
    }

    #[test]
    fn test_blank_query_is_empty_filter() {
        let (filter, warnings) = query(Some("  "), Some(""), None).to_filter();
        assert!(filter.is_empty());
        assert!(warnings.is_empty());
        assert_eq!(query(Some(" "), None, Some("")).query_string(), "");
    }

    #[test]
    fn test_valid_query_builds_all_predicates() {
        let (filter, warnings) =
            query(Some("Rahim"), Some("2024-05-01"), Some("Pending")).to_filter();
        assert!(warnings.is_empty());
        assert_eq!(filter.search.as_deref(), Some("rahim"));
        assert_eq!(filter.date, NaiveDate::from_ymd_opt(2024, 5, 1));
        assert_eq!(filter.status, Some(OrderStatus::Pending));
    }

    #[test]
    fn test_invalid_values_are_inactive_with_warnings() {
        let (filter, warnings) = query(None, Some("05/01/2024"), Some("returned")).to_filter();
        assert!(filter.is_empty());
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("05/01/2024"));
        assert!(warnings[1].contains("returned"));
    }

    #[test]
    fn test_query_string_encodes_and_preserves() {
        let q = query(Some("a&b c"), Some("2024-05-01"), Some("shipped"));
        assert_eq!(q.query_string(), "search=a%26b+c&date=2024-05-01&status=shipped");
        assert_eq!(
            q.url_for("/orders"),
            "/orders?search=a%26b+c&date=2024-05-01&status=shipped"
        );
        assert_eq!(OrdersQuery::default().url_for("/orders"), "/orders");
    }

    #[test]
    fn test_payment_method_label() {
        assert_eq!(payment_method_label("cash_on_delivery"), "Cash on delivery");
        assert_eq!(payment_method_label("mobile_wallet"), "mobile wallet");
        assert_eq!(payment_method_label(""), "Unknown");
    }
}

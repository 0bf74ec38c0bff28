//! CSV export of the order console's filtered view.

use std::fmt::Write as _;

use chrono::NaiveDate;
use thiserror::Error;

use crate::order::Order;
use crate::types::format_plain;

/// Header row of every export.
pub const CSV_HEADER: [&str; 6] = ["Order ID", "Customer", "Email", "Date", "Status", "Total"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ExportError {
    /// Nothing matched the current filters, so there is nothing to download.
    #[error("no orders to export")]
    NoOrders,
}

/// Serialize `orders` as CSV, one row per order after the header.
///
/// Fields containing a comma, quote or line break are quoted with inner quotes
/// doubled; everything else is written as-is.
///
/// # Errors
///
/// Returns [`ExportError::NoOrders`] for an empty slice.
pub fn orders_csv<O: AsRef<Order>>(orders: &[O]) -> Result<String, ExportError> {
    if orders.is_empty() {
        return Err(ExportError::NoOrders);
    }

    let mut out = String::new();
    push_row(&mut out, CSV_HEADER.iter().copied());
    for order in orders {
        let order = order.as_ref();
        let date = order.created_date().format("%Y-%m-%d").to_string();
        let total = format_plain(order.total_amount);
        push_row(
            &mut out,
            [
                order.id.as_str(),
                order.billing_info.name.as_str(),
                order.billing_info.email.as_str(),
                date.as_str(),
                order.status.as_str(),
                total.as_str(),
            ],
        );
    }
    Ok(out)
}

/// Download name for an export generated on `date`.
#[must_use]
pub fn export_file_name(date: NaiveDate) -> String {
    format!("orders-{}.csv", date.format("%Y-%m-%d"))
}

fn push_row<'a>(out: &mut String, fields: impl IntoIterator<Item = &'a str>) {
    for (i, field) in fields.into_iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        push_field(out, field);
    }
    out.push('\n');
}

fn push_field(out: &mut String, field: &str) {
    if field.contains([',', '"', '\n', '\r']) {
        let _ = write!(out, "\"{}\"", field.replace('"', "\"\""));
    } else {
        out.push_str(field);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::order::tests::order;
    use crate::types::OrderStatus;

    #[test]
    fn test_empty_export_is_an_error() {
        let none: Vec<Order> = vec![];
        assert_eq!(orders_csv(&none), Err(ExportError::NoOrders));
    }

    #[test]
    fn test_header_and_rows() {
        let orders = vec![
            order("a1", "Rahim Uddin", "rahim@example.com", OrderStatus::Pending, 1),
            order("b2", "Karima Begum", "karima@example.com", OrderStatus::Shipped, 3),
        ];
        let csv = orders_csv(&orders).unwrap();
        assert_eq!(
            csv,
            "Order ID,Customer,Email,Date,Status,Total\n\
             a1,Rahim Uddin,rahim@example.com,2024-05-01,pending,1501.00\n\
             b2,Karima Begum,karima@example.com,2024-05-03,shipped,1501.00\n"
        );
    }

    #[test]
    fn test_borrowed_rows_from_filter_output() {
        let orders = vec![order("a1", "A", "a@x.io", OrderStatus::Pending, 1)];
        let refs: Vec<&Order> = orders.iter().collect();
        assert_eq!(orders_csv(&refs).unwrap().lines().count(), 2);
    }

    #[test]
    fn test_names_with_commas_and_quotes_are_quoted() {
        let orders = vec![order(
            "c3",
            "Ali, \"Bablu\" Khan",
            "ali@x.io",
            OrderStatus::Delivered,
            2,
        )];
        let csv = orders_csv(&orders).unwrap();
        let row = csv.lines().nth(1).unwrap();
        assert_eq!(row, "c3,\"Ali, \"\"Bablu\"\" Khan\",ali@x.io,2024-05-02,delivered,1501.00");
    }

    #[test]
    fn test_file_name() {
        let date = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        assert_eq!(export_file_name(date), "orders-2024-12-31.csv");
    }
}

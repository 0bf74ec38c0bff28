//! Order commands.

use std::fmt::Write as _;
use std::path::PathBuf;

use bazaar_admin::api::ApiClient;
use bazaar_core::{Order, OrderFilter, export_file_name, orders_csv};

use super::{CliError, emit};

/// Print orders matching `filter` in backend order.
///
/// # Errors
///
/// Returns an error if the backend request fails.
pub async fn list(client: &ApiClient, filter: &OrderFilter) -> Result<(), CliError> {
    let orders = client.list_orders().await?;
    let matching = filter.apply(&orders);
    tracing::debug!(matching = matching.len(), total = orders.len(), "Filtered orders");
    emit(&render(&matching, orders.len()));
    Ok(())
}

/// Write orders matching `filter` as CSV.
///
/// Nothing is written when no order matches.
///
/// # Errors
///
/// Returns [`CliError::Export`] when no order matches, or a write error.
pub async fn export(
    client: &ApiClient,
    filter: &OrderFilter,
    output: Option<PathBuf>,
) -> Result<(), CliError> {
    let orders = client.list_orders().await?;
    let matching = filter.apply(&orders);
    let csv = orders_csv(&matching)?;

    let path = output
        .unwrap_or_else(|| PathBuf::from(export_file_name(chrono::Utc::now().date_naive())));
    tokio::fs::write(&path, csv)
        .await
        .map_err(|source| CliError::Write {
            path: path.display().to_string(),
            source,
        })?;

    tracing::info!(count = matching.len(), path = %path.display(), "Orders exported");
    emit(&format!("Exported {} orders to {}\n", matching.len(), path.display()));
    Ok(())
}

fn render(orders: &[&Order], total: usize) -> String {
    let mut out = String::new();
    for order in orders {
        let _ = writeln!(
            out,
            "{id}  {date}  {status:<10}  {amount:>10}  {name} <{email}>",
            id = order.id,
            date = order.created_date().format("%Y-%m-%d"),
            status = order.status.as_str(),
            amount = order.total_amount,
            name = order.billing_info.name,
            email = order.billing_info.email,
        );
    }
    let _ = writeln!(out, "{} of {total} orders", orders.len());
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use bazaar_core::{BillingInfo, OrderId, OrderStatus, PaymentInfo};
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;

    fn order(id: &str, name: &str) -> Order {
        Order {
            id: OrderId::new(id),
            billing_info: BillingInfo {
                name: name.to_string(),
                email: format!("{}@example.com", name.to_lowercase()),
                phone: "01700000000".to_string(),
                address: "Dhaka".to_string(),
            },
            items: vec![],
            total_amount: Decimal::from(1500),
            status: OrderStatus::Pending,
            payment_info: PaymentInfo::cash_on_delivery(),
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_render_rows_and_summary() {
        let a = order("a1", "Rahim");
        let out = render(&[&a], 3);
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines.first().unwrap().starts_with("a1  2024-05-01  pending"));
        assert!(lines.first().unwrap().ends_with("Rahim <rahim@example.com>"));
        assert_eq!(lines.last().copied(), Some("1 of 3 orders"));
    }

    #[test]
    fn test_render_nothing_matched() {
        assert_eq!(render(&[], 5), "0 of 5 orders\n");
    }
}

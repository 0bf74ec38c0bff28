//! Data table component types.
//!
//! These types describe the columns and filter controls of list pages in the
//! admin console. Filtering happens server-side on the cached record list; the
//! template renders the controls as a GET form so the query string carries
//! the filter state.

use bazaar_core::OrderStatus;
use serde::{Deserialize, Serialize};

/// Column definition for a data table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableColumn {
    /// Unique key for the column.
    pub key: String,
    /// Display label for the column header.
    pub label: String,
    /// Right-align numeric columns.
    pub numeric: bool,
}

impl TableColumn {
    #[must_use]
    pub fn new(key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            numeric: false,
        }
    }

    /// Create a right-aligned numeric column.
    #[must_use]
    pub fn numeric(key: &str, label: &str) -> Self {
        Self {
            numeric: true,
            ..Self::new(key, label)
        }
    }
}

/// Filter control type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterType {
    /// Free-text input.
    Text,
    /// Single-select dropdown.
    Select,
    /// Calendar date picker.
    Date,
}

/// Filter definition for a data table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableFilter {
    /// Query parameter key.
    pub key: String,
    /// Display label.
    pub label: String,
    pub filter_type: FilterType,
    /// Placeholder text (for text inputs).
    pub placeholder: Option<String>,
    /// Available options (for selects).
    pub options: Vec<FilterOption>,
}

/// Option for select filters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterOption {
    pub value: String,
    pub label: String,
}

impl FilterOption {
    #[must_use]
    pub fn new(value: &str, label: &str) -> Self {
        Self {
            value: value.to_string(),
            label: label.to_string(),
        }
    }
}

impl TableFilter {
    /// Create a text filter.
    #[must_use]
    pub fn text(key: &str, label: &str, placeholder: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            filter_type: FilterType::Text,
            placeholder: Some(placeholder.to_string()),
            options: vec![],
        }
    }

    /// Create a select filter.
    #[must_use]
    pub fn select(key: &str, label: &str, options: Vec<FilterOption>) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            filter_type: FilterType::Select,
            placeholder: None,
            options,
        }
    }

    /// Create a date filter.
    #[must_use]
    pub fn date(key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            filter_type: FilterType::Date,
            placeholder: None,
            options: vec![],
        }
    }

    #[must_use]
    pub fn is_text(&self) -> bool {
        self.filter_type == FilterType::Text
    }

    #[must_use]
    pub fn is_select(&self) -> bool {
        self.filter_type == FilterType::Select
    }

    #[must_use]
    pub fn is_date(&self) -> bool {
        self.filter_type == FilterType::Date
    }
}

/// Configuration for a data table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataTableConfig {
    /// Unique table identifier.
    pub table_id: String,
    pub columns: Vec<TableColumn>,
    pub filters: Vec<TableFilter>,
    /// Icon for empty state.
    pub empty_icon: String,
    /// Title for empty state.
    pub empty_title: String,
    /// Description for empty state.
    pub empty_description: Option<String>,
}

impl DataTableConfig {
    /// Create a new data table configuration.
    #[must_use]
    pub fn new(table_id: &str) -> Self {
        Self {
            table_id: table_id.to_string(),
            columns: vec![],
            filters: vec![],
            empty_icon: "ph-list".to_string(),
            empty_title: "No items found".to_string(),
            empty_description: None,
        }
    }

    /// Add a column.
    #[must_use]
    pub fn column(mut self, column: TableColumn) -> Self {
        self.columns.push(column);
        self
    }

    /// Add a filter.
    #[must_use]
    pub fn filter(mut self, filter: TableFilter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Set empty state configuration.
    #[must_use]
    pub fn empty_state(mut self, icon: &str, title: &str, description: Option<&str>) -> Self {
        self.empty_icon = icon.to_string();
        self.empty_title = title.to_string();
        self.empty_description = description.map(ToString::to_string);
        self
    }
}

/// Build the orders table configuration.
#[must_use]
pub fn orders_table_config() -> DataTableConfig {
    let status_options = std::iter::once(FilterOption::new("", "All statuses"))
        .chain(
            OrderStatus::ALL
                .into_iter()
                .map(|s| FilterOption::new(s.as_str(), s.label())),
        )
        .collect();

    DataTableConfig::new("orders")
        .column(TableColumn::new("order", "Order"))
        .column(TableColumn::new("customer", "Customer"))
        .column(TableColumn::new("date", "Date"))
        .column(TableColumn::numeric("items", "Items"))
        .column(TableColumn::numeric("total", "Total"))
        .column(TableColumn::new("payment", "Payment"))
        .column(TableColumn::new("status", "Status"))
        .column(TableColumn::new("actions", ""))
        .filter(TableFilter::text(
            "search",
            "Search",
            "Order ID, customer name or email",
        ))
        .filter(TableFilter::date("date", "Date"))
        .filter(TableFilter::select("status", "Status", status_options))
        .empty_state(
            "ph-receipt",
            "No orders found",
            Some("Try adjusting your search or filters"),
        )
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_orders_table_has_three_filters() {
        let config = orders_table_config();
        let keys: Vec<_> = config.filters.iter().map(|f| f.key.as_str()).collect();
        assert_eq!(keys, vec!["search", "date", "status"]);
        assert!(config.filters[0].is_text());
        assert!(config.filters[1].is_date());
        assert!(config.filters[2].is_select());
    }

    #[test]
    fn test_status_filter_lists_every_status_after_blank() {
        let config = orders_table_config();
        let status = &config.filters[2];
        assert_eq!(status.options.len(), OrderStatus::ALL.len() + 1);
        assert_eq!(status.options[0].value, "");
        assert_eq!(status.options[1].value, "pending");
    }

    #[test]
    fn test_numeric_column() {
        let col = TableColumn::numeric("total", "Total");
        assert!(col.numeric);
        assert_eq!(col.label, "Total");
    }
}

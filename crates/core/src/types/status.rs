//! Order status enumeration.

use serde::{Deserialize, Serialize};

/// Lifecycle status of an order.
///
/// The set is fixed; the order console moves orders between these values and
/// nothing else about an order is editable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Every status, in the order the console lists them.
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::Processing,
        Self::Shipped,
        Self::Delivered,
        Self::Cancelled,
    ];

    /// Wire value (`"pending"`, `"shipped"`, ...).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Processing => "Processing",
            Self::Shipped => "Shipped",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Badge class used by the admin templates.
    #[must_use]
    pub const fn badge_class(self) -> &'static str {
        match self {
            Self::Pending => "badge-warning",
            Self::Processing => "badge-info",
            Self::Shipped => "badge-primary",
            Self::Delivered => "badge-success",
            Self::Cancelled => "badge-danger",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| format!("invalid order status: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_status_round_trips_through_str() {
        for status in OrderStatus::ALL {
            assert_eq!(OrderStatus::from_str(status.as_str()), Ok(status));
        }
    }

    #[test]
    fn test_status_parse_is_case_insensitive() {
        assert_eq!(OrderStatus::from_str(" Shipped "), Ok(OrderStatus::Shipped));
        assert!(OrderStatus::from_str("returned").is_err());
    }

    #[test]
    fn test_status_serde_uses_lowercase() {
        let json = serde_json::to_string(&OrderStatus::Cancelled).unwrap_or_default();
        assert_eq!(json, "\"cancelled\"");
    }
}

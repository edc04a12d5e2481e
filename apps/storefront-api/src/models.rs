//! Row types for the store and the validated input shapes derived from
//! request payloads.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A customer account. Owns zero or more orders; deleting a user cascades
/// to its orders.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Row id.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Postal address.
    pub address: String,
    /// Unique email address.
    pub email: String,
    /// Phone number.
    pub phone: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Validated input for creating a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Display name.
    pub name: String,
    /// Unique email address.
    pub email: String,
    /// Postal address.
    pub address: String,
    /// Phone number.
    pub phone: String,
}

/// Validated input for updating a user. `None` keeps the stored value.
#[derive(Debug, Clone)]
pub struct UserUpdate {
    /// Replacement name.
    pub name: String,
    /// Replacement email.
    pub email: String,
    /// Replacement address, if present in the request.
    pub address: Option<String>,
    /// Replacement phone, if present in the request.
    pub phone: Option<String>,
}

/// A catalog product. Referenced by orders through the `order_product`
/// join table.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    /// Row id.
    pub id: i64,
    /// Product name.
    pub product_name: String,
    /// Unit price, always positive.
    pub price: f64,
    /// Optional free-form description.
    pub description: Option<String>,
    /// Available inventory count, never negative.
    pub stock_quantity: i64,
    /// Optional category label.
    pub category: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Validated input for creating a product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    /// Product name.
    pub product_name: String,
    /// Unit price.
    pub price: f64,
    /// Optional description.
    pub description: Option<String>,
    /// Starting stock, defaults to 0.
    pub stock_quantity: i64,
    /// Optional category label.
    pub category: Option<String>,
}

/// Validated input for updating a product. Name and price overwrite the
/// stored values; `None` in the remaining fields keeps them.
#[derive(Debug, Clone)]
pub struct ProductUpdate {
    /// Replacement name.
    pub product_name: String,
    /// Replacement price.
    pub price: f64,
    /// Replacement description, if present in the request.
    pub description: Option<String>,
    /// Replacement stock, if present in the request.
    pub stock_quantity: Option<i64>,
    /// Replacement category, if present in the request.
    pub category: Option<String>,
}

/// Optional filters for the product listing, combined with AND.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    /// Case-insensitive substring match on the category.
    pub category: Option<String>,
    /// Inclusive lower price bound.
    pub min_price: Option<f64>,
    /// Inclusive upper price bound.
    pub max_price: Option<f64>,
}

/// A customer order. Holds a set of distinct products via the join table;
/// `total_amount` is recomputed on every membership change.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Order {
    /// Row id.
    pub id: i64,
    /// Creation timestamp.
    pub order_date: DateTime<Utc>,
    /// Owning user.
    pub user_id: i64,
    /// Lifecycle status, one of [`OrderStatus`].
    pub status: String,
    /// Sum of the prices of the currently associated products.
    pub total_amount: f64,
}

/// The closed set of order statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Newly created, the default.
    Pending,
    /// Confirmed by the shop.
    Confirmed,
    /// Handed to the carrier.
    Shipped,
    /// Received by the customer.
    Delivered,
}

impl OrderStatus {
    /// All valid statuses, in lifecycle order.
    pub const ALL: [Self; 4] = [Self::Pending, Self::Confirmed, Self::Shipped, Self::Delivered];

    /// The wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
        }
    }

    /// Comma-separated list of valid statuses, for error messages.
    #[must_use]
    pub fn valid_list() -> String {
        Self::ALL
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "shipped" => Ok(Self::Shipped),
            "delivered" => Ok(Self::Delivered),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_status_roundtrip() {
        for status in OrderStatus::ALL {
            assert_eq!(status.as_str().parse::<OrderStatus>(), Ok(status));
        }
    }

    #[test]
    fn order_status_rejects_unknown() {
        assert!("archived".parse::<OrderStatus>().is_err());
        assert!("PENDING".parse::<OrderStatus>().is_err());
        assert!("".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn order_status_valid_list() {
        assert_eq!(
            OrderStatus::valid_list(),
            "pending, confirmed, shipped, delivered"
        );
    }
}

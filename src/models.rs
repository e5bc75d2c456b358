//! Plain data structures that cross the repository boundary.
//!
//! These are what callers see and what the snapshot file contains. Storage rows
//! live in [`crate::entities`]; candidate payloads for writes live in
//! [`crate::core::validation`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A catalog item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Stable unique identifier
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt_description: Option<String>,
    pub likes: i64,
    pub urls: Urls,
    pub links: Links,
    pub user: ProductUser,
    /// Tags in their stored order
    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl Product {
    /// Returns true if one of the product's tags has exactly this title.
    pub fn has_tag(&self, title: &str) -> bool {
        self.tags.iter().any(|tag| tag.title == title)
    }
}

/// Image URLs at the sizes the catalog serves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Urls {
    pub regular: String,
    pub small: String,
    pub thumb: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Links {
    #[serde(rename = "self")]
    pub self_link: String,
    pub html: String,
}

/// The author credited for a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductUser {
    pub id: String,
    pub first_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portfolio_url: Option<String>,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub title: String,
}

impl Tag {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

/// Paging and filtering for product listings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ListProductsOptions {
    pub offset: u64,
    pub limit: u64,
    pub tag: Option<String>,
}

impl ListProductsOptions {
    /// Page size used when none (or zero) is given
    pub const DEFAULT_LIMIT: u64 = 25;

    /// Largest offset or limit the primary store can bind.
    pub const MAX_WINDOW: u64 = i64::MAX.unsigned_abs();

    /// Limit with the zero case folded into the default, capped at [`Self::MAX_WINDOW`].
    pub const fn effective_limit(&self) -> u64 {
        effective_limit(self.limit)
    }

    /// Offset capped at [`Self::MAX_WINDOW`]. Any offset that large is past the end anyway.
    pub const fn effective_offset(&self) -> u64 {
        effective_offset(self.offset)
    }
}

const fn effective_limit(limit: u64) -> u64 {
    if limit == 0 {
        ListProductsOptions::DEFAULT_LIMIT
    } else if limit > ListProductsOptions::MAX_WINDOW {
        ListProductsOptions::MAX_WINDOW
    } else {
        limit
    }
}

const fn effective_offset(offset: u64) -> u64 {
    if offset > ListProductsOptions::MAX_WINDOW {
        ListProductsOptions::MAX_WINDOW
    } else {
        offset
    }
}

impl Default for ListProductsOptions {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: Self::DEFAULT_LIMIT,
            tag: None,
        }
    }
}

/// Lifecycle state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Created,
    Pending,
    Completed,
}

impl OrderStatus {
    /// Every accepted status, in lifecycle order
    pub const ALL: [Self; 3] = [Self::Created, Self::Pending, Self::Completed];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "CREATED",
            Self::Pending => "PENDING",
            Self::Completed => "COMPLETED",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                let allowed: Vec<&str> = Self::ALL.iter().map(|s| s.as_str()).collect();
                format!("status must be one of {{{}}}", allowed.join(", "))
            })
    }
}

/// A buyer's order referencing products by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub buyer_email: String,
    /// Product ids, loosely referenced
    pub products: Vec<String>,
    pub status: OrderStatus,
}

/// An order as returned by single-order reads and writes: product references
/// resolved to the stored products, dangling references left out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderWithProducts {
    pub id: String,
    pub buyer_email: String,
    pub products: Vec<Product>,
    pub status: OrderStatus,
}

/// Paging and filtering for order listings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ListOrdersOptions {
    pub offset: u64,
    pub limit: u64,
    #[serde(rename = "productId")]
    pub product_id: Option<String>,
    /// Raw status filter; checked against [`OrderStatus`] by the repository
    pub status: Option<String>,
}

impl Default for ListOrdersOptions {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: ListProductsOptions::DEFAULT_LIMIT,
            product_id: None,
            status: None,
        }
    }
}

impl ListOrdersOptions {
    pub const fn effective_limit(&self) -> u64 {
        effective_limit(self.limit)
    }

    pub const fn effective_offset(&self) -> u64 {
        effective_offset(self.offset)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_links_self_is_renamed_on_the_wire() {
        let links = Links {
            self_link: "https://api.example.com/photos/1".to_string(),
            html: "https://example.com/photos/1".to_string(),
        };
        let json = serde_json::to_value(&links).unwrap();
        assert_eq!(json["self"], "https://api.example.com/photos/1");
        assert!(json.get("self_link").is_none());
    }

    #[test]
    fn test_order_status_parsing() {
        assert_eq!("PENDING".parse::<OrderStatus>(), Ok(OrderStatus::Pending));
        let err = "SHIPPED".parse::<OrderStatus>().unwrap_err();
        assert_eq!(err, "status must be one of {CREATED, PENDING, COMPLETED}");
    }

    #[test]
    fn test_list_options_defaults() {
        let options: ListProductsOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, ListProductsOptions::default());
        let zero = ListProductsOptions {
            limit: 0,
            ..Default::default()
        };
        assert_eq!(zero.effective_limit(), 25);
    }

    #[test]
    fn test_list_options_window_is_capped() {
        let huge = ListProductsOptions {
            offset: u64::MAX,
            limit: u64::MAX,
            tag: None,
        };
        assert_eq!(huge.effective_offset(), 9_223_372_036_854_775_807);
        assert_eq!(huge.effective_limit(), 9_223_372_036_854_775_807);

        let orders = ListOrdersOptions {
            offset: u64::MAX,
            limit: 7,
            ..Default::default()
        };
        assert_eq!(orders.effective_offset(), ListProductsOptions::MAX_WINDOW);
        assert_eq!(orders.effective_limit(), 7);
    }
}

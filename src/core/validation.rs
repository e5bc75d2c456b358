//! Candidate payloads and required-field validation.
//!
//! Writes arrive as drafts where every field is optional. Validation turns a
//! draft into a well-formed [`Product`] or [`Order`], or reports every problem
//! at once as [`Error::Validation`]. A required string is missing when it is
//! absent or blank.

use crate::{
    errors::{Error, Result},
    models::{Links, Order, OrderStatus, Product, ProductUser, Tag, Urls},
};
use serde::Deserialize;

/// A product as submitted for creation, or a set of changes for an edit.
///
/// For edits, each present top-level field replaces the stored one. Nested
/// records (`urls`, `links`, `user`) and `tags` are replaced as a whole.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProductDraft {
    pub id: Option<String>,
    pub description: Option<String>,
    pub alt_description: Option<String>,
    pub likes: Option<i64>,
    pub urls: Option<UrlsDraft>,
    pub links: Option<LinksDraft>,
    pub user: Option<UserDraft>,
    pub tags: Option<Vec<TagDraft>>,
}

/// Field changes accepted by product edits
pub type ProductChanges = ProductDraft;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UrlsDraft {
    pub regular: Option<String>,
    pub small: Option<String>,
    pub thumb: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LinksDraft {
    #[serde(rename = "self")]
    pub self_link: Option<String>,
    pub html: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UserDraft {
    pub id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub portfolio_url: Option<String>,
    pub username: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TagDraft {
    pub title: Option<String>,
}

impl From<Product> for ProductDraft {
    fn from(product: Product) -> Self {
        Self {
            id: Some(product.id),
            description: product.description,
            alt_description: product.alt_description,
            likes: Some(product.likes),
            urls: Some(UrlsDraft {
                regular: Some(product.urls.regular),
                small: Some(product.urls.small),
                thumb: Some(product.urls.thumb),
            }),
            links: Some(LinksDraft {
                self_link: Some(product.links.self_link),
                html: Some(product.links.html),
            }),
            user: Some(UserDraft {
                id: Some(product.user.id),
                first_name: Some(product.user.first_name),
                last_name: product.user.last_name,
                portfolio_url: product.user.portfolio_url,
                username: Some(product.user.username),
            }),
            tags: Some(
                product
                    .tags
                    .into_iter()
                    .map(|tag| TagDraft {
                        title: Some(tag.title),
                    })
                    .collect(),
            ),
        }
    }
}

impl ProductDraft {
    /// Overlays `changes` onto this draft; present fields win.
    #[must_use]
    pub fn merge(self, changes: Self) -> Self {
        Self {
            id: changes.id.or(self.id),
            description: changes.description.or(self.description),
            alt_description: changes.alt_description.or(self.alt_description),
            likes: changes.likes.or(self.likes),
            urls: changes.urls.or(self.urls),
            links: changes.links.or(self.links),
            user: changes.user.or(self.user),
            tags: changes.tags.or(self.tags),
        }
    }
}

/// Collects field problems while a draft is being checked.
#[derive(Debug, Default)]
struct Problems(Vec<String>);

impl Problems {
    fn required(&mut self, value: Option<String>, path: &str) -> String {
        match value {
            Some(v) if !v.trim().is_empty() => v,
            _ => {
                self.0.push(format!("{path} is required"));
                String::new()
            }
        }
    }

    fn push(&mut self, message: String) {
        self.0.push(message);
    }

    fn finish<T>(self, value: T) -> Result<T> {
        if self.0.is_empty() {
            Ok(value)
        } else {
            Err(Error::Validation { fields: self.0 })
        }
    }
}

/// Returns the draft id if it is present and not blank.
pub fn supplied_id(id: Option<&String>) -> Option<&str> {
    id.map(String::as_str).filter(|id| !id.trim().is_empty())
}

/// Checks a product draft and builds the product stored under `id`.
///
/// # Errors
/// Returns `Error::Validation` listing every missing required field.
pub fn validate_product(id: String, draft: ProductDraft) -> Result<Product> {
    let mut problems = Problems::default();

    let likes = draft.likes.unwrap_or_else(|| {
        problems.push("likes is required".to_string());
        0
    });

    let urls = draft.urls.unwrap_or_else(|| {
        problems.push("urls is required".to_string());
        UrlsDraft::default()
    });
    let urls = Urls {
        regular: problems.required(urls.regular, "urls.regular"),
        small: problems.required(urls.small, "urls.small"),
        thumb: problems.required(urls.thumb, "urls.thumb"),
    };

    let links = draft.links.unwrap_or_else(|| {
        problems.push("links is required".to_string());
        LinksDraft::default()
    });
    let links = Links {
        self_link: problems.required(links.self_link, "links.self"),
        html: problems.required(links.html, "links.html"),
    };

    let user = draft.user.unwrap_or_else(|| {
        problems.push("user is required".to_string());
        UserDraft::default()
    });
    let user = ProductUser {
        id: problems.required(user.id, "user.id"),
        first_name: problems.required(user.first_name, "user.first_name"),
        last_name: user.last_name,
        portfolio_url: user.portfolio_url,
        username: problems.required(user.username, "user.username"),
    };

    let tags = draft
        .tags
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(index, tag)| Tag {
            title: problems.required(tag.title, &format!("tags[{index}].title")),
        })
        .collect();

    problems.finish(Product {
        id,
        description: draft.description,
        alt_description: draft.alt_description,
        likes,
        urls,
        links,
        user,
        tags,
    })
}

/// An order as submitted for creation, or a set of changes for an edit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OrderDraft {
    pub id: Option<String>,
    pub buyer_email: Option<String>,
    pub products: Option<Vec<Option<String>>>,
    pub status: Option<String>,
}

/// Field changes accepted by order edits
pub type OrderChanges = OrderDraft;

impl From<Order> for OrderDraft {
    fn from(order: Order) -> Self {
        Self {
            id: Some(order.id),
            buyer_email: Some(order.buyer_email),
            products: Some(order.products.into_iter().map(Some).collect()),
            status: Some(order.status.to_string()),
        }
    }
}

impl OrderDraft {
    /// Overlays `changes` onto this draft; present fields win.
    #[must_use]
    pub fn merge(self, changes: Self) -> Self {
        Self {
            id: changes.id.or(self.id),
            buyer_email: changes.buyer_email.or(self.buyer_email),
            products: changes.products.or(self.products),
            status: changes.status.or(self.status),
        }
    }
}

/// Parses an order status against the closed set of accepted values.
///
/// # Errors
/// Returns `Error::Validation` naming the accepted values.
pub fn parse_status(raw: &str) -> Result<OrderStatus> {
    raw.parse().map_err(|message: String| Error::Validation {
        fields: vec![message],
    })
}

/// Checks an order draft and builds the order stored under `id`.
///
/// A missing status defaults to `CREATED`.
///
/// # Errors
/// Returns `Error::Validation` listing every problem found.
pub fn validate_order(id: String, draft: OrderDraft) -> Result<Order> {
    let mut problems = Problems::default();

    let buyer_email = problems.required(draft.buyer_email, "buyerEmail");
    let products = draft
        .products
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(index, product)| problems.required(product, &format!("products[{index}]")))
        .collect();
    let status = match draft.status {
        None => OrderStatus::default(),
        Some(raw) => raw.parse().unwrap_or_else(|message| {
            problems.push(message);
            OrderStatus::default()
        }),
    };

    problems.finish(Order {
        id,
        buyer_email,
        products,
        status,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::sample_draft;

    fn fields(err: Error) -> Vec<String> {
        match err {
            Error::Validation { fields } => fields,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_complete_draft_is_valid() {
        let product = validate_product("p1".to_string(), sample_draft("p1", &["nature"])).unwrap();
        assert_eq!(product.id, "p1");
        assert_eq!(product.tags, vec![Tag::new("nature")]);
    }

    #[test]
    fn test_missing_likes_is_reported() {
        let draft = ProductDraft {
            likes: None,
            ..sample_draft("p1", &[])
        };
        let problems = fields(validate_product("p1".to_string(), draft).unwrap_err());
        assert_eq!(problems, vec!["likes is required"]);
    }

    #[test]
    fn test_all_missing_fields_are_listed() {
        let mut draft = sample_draft("p1", &["a", "b"]);
        draft.urls.as_mut().unwrap().thumb = None;
        draft.user.as_mut().unwrap().username = Some("   ".to_string());
        draft.tags.as_mut().unwrap()[1].title = None;
        draft.links = None;

        let problems = fields(validate_product("p1".to_string(), draft).unwrap_err());
        assert_eq!(
            problems,
            vec![
                "urls.thumb is required",
                "links is required",
                "links.self is required",
                "links.html is required",
                "user.username is required",
                "tags[1].title is required",
            ]
        );
    }

    #[test]
    fn test_merge_replaces_only_present_fields() {
        let base = sample_draft("p1", &["a"]);
        let merged = base.clone().merge(ProductChanges {
            likes: Some(5),
            ..Default::default()
        });
        assert_eq!(merged.likes, Some(5));
        assert_eq!(merged.urls, base.urls);
        assert_eq!(merged.tags, base.tags);
    }

    #[test]
    fn test_supplied_id_ignores_blank() {
        assert_eq!(supplied_id(Some(&"  ".to_string())), None);
        assert_eq!(supplied_id(Some(&"abc".to_string())), Some("abc"));
        assert_eq!(supplied_id(None), None);
    }

    #[test]
    fn test_order_defaults_to_created() {
        let order = validate_order(
            "o1".to_string(),
            OrderDraft {
                buyer_email: Some("buyer@example.com".to_string()),
                products: Some(vec![Some("p1".to_string())]),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(order.status, OrderStatus::Created);
        assert_eq!(order.products, vec!["p1"]);
    }

    #[test]
    fn test_order_rejects_unknown_status_and_blank_products() {
        let draft = OrderDraft {
            buyer_email: None,
            products: Some(vec![Some("p1".to_string()), None]),
            status: Some("SHIPPED".to_string()),
            ..Default::default()
        };
        let problems = fields(validate_order("o1".to_string(), draft).unwrap_err());
        assert_eq!(
            problems,
            vec![
                "buyerEmail is required",
                "products[1] is required",
                "status must be one of {CREATED, PENDING, COMPLETED}",
            ]
        );
    }

    #[test]
    fn test_order_draft_accepts_camel_case() {
        let draft: OrderDraft =
            serde_json::from_str(r#"{"buyerEmail":"a@b.c","products":["p1"]}"#).unwrap();
        assert_eq!(draft.buyer_email.as_deref(), Some("a@b.c"));
    }
}

//! Product entity - Represents catalog items in the primary store.
//!
//! Nested sub-records of the public [`crate::models::Product`] (`urls`, `links`,
//! `user`) are flattened into prefixed columns. Tags live in their own table,
//! see [`super::product_tag`].

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Product database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    /// Unique identifier, assigned by the service rather than the database
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Free-form description
    pub description: Option<String>,
    /// Alternate (accessibility) description
    pub alt_description: Option<String>,
    /// Number of likes
    pub likes: i64,
    /// `urls.regular`
    pub url_regular: String,
    /// `urls.small`
    pub url_small: String,
    /// `urls.thumb`
    pub url_thumb: String,
    /// `links.self`
    pub link_self: String,
    /// `links.html`
    pub link_html: String,
    /// `user.id`
    pub user_id: String,
    /// `user.first_name`
    pub user_first_name: String,
    /// `user.last_name`
    pub user_last_name: Option<String>,
    /// `user.portfolio_url`
    pub user_portfolio_url: Option<String>,
    /// `user.username`
    pub user_username: String,
}

/// Defines relationships between Product and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One product has many tags
    #[sea_orm(has_many = "super::product_tag::Entity")]
    Tags,
}

impl Related<super::product_tag::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tags.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

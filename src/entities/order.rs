//! Order entity - A buyer's order.
//!
//! Product references are kept in [`super::order_product`] without a foreign key
//! to `products`, so an order may outlive the products it names.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Order database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    /// Unique identifier, assigned by the service
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Email address of the buyer
    pub buyer_email: String,
    /// One of `CREATED`, `PENDING`, `COMPLETED`
    #[sea_orm(indexed)]
    pub status: String,
}

/// Defines relationships between Order and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One order has many product lines
    #[sea_orm(has_many = "super::order_product::Entity")]
    Lines,
}

impl Related<super::order_product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Lines.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

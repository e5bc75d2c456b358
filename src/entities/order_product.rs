//! Order line entity - Links an order to a product id, in order.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Order line database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "order_products")]
pub struct Model {
    /// ID of the owning order
    #[sea_orm(primary_key, auto_increment = false)]
    pub order_id: String,
    /// Zero-based index within the order's product list
    #[sea_orm(primary_key, auto_increment = false)]
    pub position: i32,
    /// Referenced product id (not enforced)
    #[sea_orm(indexed)]
    pub product_id: String,
}

/// Defines relationships between `OrderProduct` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each line belongs to one order
    #[sea_orm(
        belongs_to = "super::order::Entity",
        from = "Column::OrderId",
        to = "super::order::Column::Id",
        on_delete = "Cascade"
    )]
    Order,
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Order.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

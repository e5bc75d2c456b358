//! Product tag entity - One row per tag attached to a product.
//!
//! `position` keeps the tag order of the original record.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Product tag database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "product_tags")]
pub struct Model {
    /// ID of the product this tag belongs to
    #[sea_orm(primary_key, auto_increment = false)]
    pub product_id: String,
    /// Zero-based index of the tag within the product's tag list
    #[sea_orm(primary_key, auto_increment = false)]
    pub position: i32,
    /// Tag title, matched exactly by the list filter
    #[sea_orm(indexed)]
    pub title: String,
}

/// Defines relationships between `ProductTag` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each tag belongs to one product
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id",
        on_delete = "Cascade"
    )]
    Product,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

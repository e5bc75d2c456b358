//! Entity module - Contains all SeaORM entity definitions for the primary store.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod order;
pub mod order_product;
pub mod product;
pub mod product_tag;

// Re-export specific types to avoid conflicts
pub use order::{Column as OrderColumn, Entity as Order, Model as OrderModel};
pub use order_product::{
    Column as OrderProductColumn, Entity as OrderProduct, Model as OrderProductModel,
};
pub use product::{Column as ProductColumn, Entity as Product, Model as ProductModel};
pub use product_tag::{
    Column as ProductTagColumn, Entity as ProductTag, Model as ProductTagModel,
};

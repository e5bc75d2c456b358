//! Database configuration module for the catalog service.
//!
//! This module handles the primary store connection and table creation using `SeaORM`.
//! Tables and their `indexed` columns are generated from the entity definitions with
//! `Schema::create_table_from_entity` and `Schema::create_index_from_entity`, and
//! created only if they do not already exist. There is no migration logic.

use crate::entities::{Order, OrderProduct, Product, ProductTag};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema};
use tracing::{debug, info, instrument};

/// Establishes a connection to the primary store.
///
/// The connection is owned by the caller (the process entry point) and passed
/// into repositories and the HTTP state.
#[instrument(skip_all)]
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    debug!("Connecting to primary store");
    let db = Database::connect(database_url).await?;
    info!("Primary store connection established");
    Ok(db)
}

/// Creates all tables used by the service if they are missing.
///
/// Creates tables for products, product tags, orders, and order lines, plus the
/// indexes behind the tag, status, and product filters.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    create_table(db, Product).await?;
    create_table(db, ProductTag).await?;
    create_table(db, Order).await?;
    create_table(db, OrderProduct).await?;
    Ok(())
}

async fn create_table<E: EntityTrait + Copy>(db: &DatabaseConnection, entity: E) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();
    db.execute(builder.build(&statement)).await?;

    for mut index in schema.create_index_from_entity(entity) {
        index.if_not_exists();
        db.execute(builder.build(&index)).await?;
    }
    Ok(())
}

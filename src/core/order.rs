//! Order business logic - single-source CRUD over the primary store.
//!
//! Orders have no snapshot fallback; every store failure surfaces as
//! `Error::StorageUnavailable`. Product references are stored as-is and are not
//! checked against the product table. Single-order reads and writes resolve them
//! to the stored products; references to missing products are left out.

use super::{
    ID_CHUNK, new_id,
    product::find_by_ids,
    validation::{OrderChanges, OrderDraft, parse_status, supplied_id, validate_order},
};
use crate::{
    entities::{Order as OrderEntity, OrderProduct, order, order_product},
    errors::{Error, Result},
    models::{ListOrdersOptions, Order, OrderStatus, OrderWithProducts, Product},
};
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, QueryOrder, QuerySelect, Set, TransactionTrait, prelude::*,
    sea_query::Query,
};
use std::collections::HashMap;
use tracing::{info, instrument, warn};

/// Lists orders sorted by id, optionally filtered by a contained product id
/// and by status, windowed by `offset` and `limit`.
///
/// # Errors
/// Returns `Error::Validation` for an unknown status filter and
/// `Error::StorageUnavailable` if the query fails.
#[instrument(skip(db))]
pub async fn list_orders(db: &DatabaseConnection, options: &ListOrdersOptions) -> Result<Vec<Order>> {
    let mut query = OrderEntity::find();
    if let Some(product_id) = &options.product_id {
        query = query.filter(
            order::Column::Id.in_subquery(
                Query::select()
                    .column(order_product::Column::OrderId)
                    .from(OrderProduct)
                    .and_where(order_product::Column::ProductId.eq(product_id.as_str()))
                    .to_owned(),
            ),
        );
    }
    if let Some(status) = &options.status {
        query = query.filter(order::Column::Status.eq(parse_status(status)?.as_str()));
    }

    let rows = query
        .order_by_asc(order::Column::Id)
        .offset(options.effective_offset())
        .limit(options.effective_limit())
        .all(db)
        .await?;
    Ok(with_lines(db, rows).await?)
}

/// Finds an order by id, with its products resolved.
///
/// # Errors
/// Returns `Error::StorageUnavailable` if the query fails.
#[instrument(skip(db))]
pub async fn get_order(db: &DatabaseConnection, id: &str) -> Result<Option<OrderWithProducts>> {
    let Some(order) = fetch_one(db, id).await? else {
        return Ok(None);
    };
    Ok(Some(populate(db, order).await?))
}

/// Validates and stores a new order. Status defaults to `CREATED`.
///
/// # Errors
/// Returns `Error::Validation`, `Error::Conflict` on a duplicate id, or
/// `Error::StorageUnavailable`.
#[instrument(skip(db, draft))]
pub async fn create_order(db: &DatabaseConnection, draft: OrderDraft) -> Result<OrderWithProducts> {
    let id = supplied_id(draft.id.as_ref()).map_or_else(new_id, ToString::to_string);
    let order = validate_order(id, draft)?;

    let txn = db.begin().await?;
    OrderEntity::insert(to_active_model(&order))
        .exec_without_returning(&txn)
        .await
        .map_err(|e| Error::from_insert(e, &order.id))?;
    insert_lines(&txn, &order).await?;
    info!(id = %order.id, products = order.products.len(), "Created order");
    let created = populate(&txn, order).await?;
    txn.commit().await?;

    Ok(created)
}

/// Merges `changes` into a stored order, re-validating the result.
///
/// # Errors
/// Returns `Error::Validation` or `Error::StorageUnavailable`.
#[instrument(skip(db, changes))]
pub async fn edit_order(
    db: &DatabaseConnection,
    id: &str,
    changes: OrderChanges,
) -> Result<Option<OrderWithProducts>> {
    if supplied_id(changes.id.as_ref()).is_some_and(|requested| requested != id) {
        return Err(Error::validation(["id cannot be changed"]));
    }
    let replaces_lines = changes.products.is_some();

    let txn = db.begin().await?;
    let Some(existing) = fetch_one(&txn, id).await? else {
        return Ok(None);
    };
    let updated = validate_order(id.to_string(), OrderDraft::from(existing).merge(changes))?;

    to_active_model(&updated).update(&txn).await?;
    if replaces_lines {
        delete_lines(&txn, id).await?;
        insert_lines(&txn, &updated).await?;
    }
    info!(id, status = %updated.status, "Updated order");
    let updated = populate(&txn, updated).await?;
    txn.commit().await?;

    Ok(Some(updated))
}

/// Removes an order and its lines. Returns the number of orders removed.
///
/// # Errors
/// Returns `Error::StorageUnavailable` if the store fails.
#[instrument(skip(db))]
pub async fn destroy_order(db: &DatabaseConnection, id: &str) -> Result<u64> {
    let txn = db.begin().await?;
    delete_lines(&txn, id).await?;
    let removed = OrderEntity::delete_by_id(id).exec(&txn).await?;
    txn.commit().await?;

    info!(id, removed = removed.rows_affected, "Deleted order");
    Ok(removed.rows_affected)
}

async fn fetch_one<C: ConnectionTrait>(
    conn: &C,
    id: &str,
) -> std::result::Result<Option<Order>, DbErr> {
    let Some(row) = OrderEntity::find_by_id(id).one(conn).await? else {
        return Ok(None);
    };
    Ok(with_lines(conn, vec![row]).await?.pop())
}

async fn with_lines<C: ConnectionTrait>(
    conn: &C,
    rows: Vec<order::Model>,
) -> std::result::Result<Vec<Order>, DbErr> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<&str> = rows.iter().map(|row| row.id.as_str()).collect();
    let mut lines: HashMap<String, Vec<String>> = HashMap::new();
    for chunk in ids.chunks(ID_CHUNK) {
        let line_rows = OrderProduct::find()
            .filter(order_product::Column::OrderId.is_in(chunk.iter().copied()))
            .order_by_asc(order_product::Column::OrderId)
            .order_by_asc(order_product::Column::Position)
            .all(conn)
            .await?;
        for line in line_rows {
            lines.entry(line.order_id).or_default().push(line.product_id);
        }
    }

    Ok(rows
        .into_iter()
        .map(|row| {
            let status = row.status.parse().unwrap_or_else(|_| {
                warn!(id = %row.id, status = %row.status, "Stored order has unknown status");
                OrderStatus::default()
            });
            Order {
                products: lines.remove(&row.id).unwrap_or_default(),
                id: row.id,
                buyer_email: row.buyer_email,
                status,
            }
        })
        .collect())
}

/// Resolves product references to stored products, keeping line order.
async fn populate<C: ConnectionTrait>(
    conn: &C,
    order: Order,
) -> std::result::Result<OrderWithProducts, DbErr> {
    let found: HashMap<String, Product> = find_by_ids(conn, &order.products)
        .await?
        .into_iter()
        .map(|product| (product.id.clone(), product))
        .collect();
    let products = order
        .products
        .iter()
        .filter_map(|id| found.get(id).cloned())
        .collect();

    Ok(OrderWithProducts {
        id: order.id,
        buyer_email: order.buyer_email,
        products,
        status: order.status,
    })
}

async fn insert_lines<C: ConnectionTrait>(conn: &C, order: &Order) -> std::result::Result<(), DbErr> {
    if order.products.is_empty() {
        return Ok(());
    }
    let rows = (0_i32..).zip(&order.products).map(|(position, product_id)| {
        order_product::ActiveModel {
            order_id: Set(order.id.clone()),
            position: Set(position),
            product_id: Set(product_id.clone()),
        }
    });
    OrderProduct::insert_many(rows)
        .exec_without_returning(conn)
        .await?;
    Ok(())
}

async fn delete_lines<C: ConnectionTrait>(conn: &C, id: &str) -> std::result::Result<(), DbErr> {
    OrderProduct::delete_many()
        .filter(order_product::Column::OrderId.eq(id))
        .exec(conn)
        .await?;
    Ok(())
}

fn to_active_model(order: &Order) -> order::ActiveModel {
    order::ActiveModel {
        id: Set(order.id.clone()),
        buyer_email: Set(order.buyer_email.clone()),
        status: Set(order.status.as_str().to_string()),
    }
}

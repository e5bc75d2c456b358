//! Product repository - primary store first, snapshot on read failure.
//!
//! Reads (`list`, `get`) run against the primary store and fall back to the
//! on-disk snapshot when the store call fails for any reason. A successful
//! lookup that finds nothing is an answer, not a failure, and is never
//! replaced by snapshot data. Writes only touch the primary store and surface
//! every failure. The snapshot is never updated, so the two sources may drift.

use super::{
    ID_CHUNK, new_id,
    snapshot::{self, SnapshotReader},
    validation::{ProductChanges, ProductDraft, supplied_id, validate_product},
};
use crate::{
    entities::{Product as ProductEntity, ProductTag, product, product_tag},
    errors::{Error, Result},
    models::{Links, ListProductsOptions, Product, ProductUser, Tag, Urls},
};
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, DbErr, QueryOrder, QuerySelect, Set,
    TransactionTrait, prelude::*, sea_query::Query,
};
use std::{collections::HashMap, sync::Arc};
use tracing::{info, instrument, warn};

/// Result of asking the primary store for something.
#[derive(Debug)]
pub enum PrimaryOutcome<T> {
    /// The store answered (possibly with "nothing found")
    Served(T),
    /// The store call itself failed; reads may fall back
    PrimaryFailed(DbErr),
}

impl<T> From<std::result::Result<T, DbErr>> for PrimaryOutcome<T> {
    fn from(result: std::result::Result<T, DbErr>) -> Self {
        match result {
            Ok(value) => Self::Served(value),
            Err(cause) => Self::PrimaryFailed(cause),
        }
    }
}

/// Data access for products over an injected primary store and snapshot.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    db: Arc<DatabaseConnection>,
    snapshot: SnapshotReader,
}

impl ProductRepository {
    pub fn new(db: impl Into<Arc<DatabaseConnection>>, snapshot: SnapshotReader) -> Self {
        Self {
            db: db.into(),
            snapshot,
        }
    }

    /// Lists products sorted by id, optionally restricted to one tag, windowed
    /// by `offset` and `limit`.
    ///
    /// # Errors
    /// Only fails if the primary store failed and the snapshot could not be read.
    #[instrument(skip(self))]
    pub async fn list(&self, options: &ListProductsOptions) -> Result<Vec<Product>> {
        match self.primary_list(options).await {
            PrimaryOutcome::Served(products) => Ok(products),
            PrimaryOutcome::PrimaryFailed(cause) => {
                warn!(
                    error = %cause,
                    path = %self.snapshot.path().display(),
                    "Primary store failed to list products, falling back to snapshot"
                );
                let products = self.snapshot.load().await?;
                Ok(snapshot::window(products, options))
            }
        }
    }

    /// Looks up one product. `Ok(None)` means neither source has it.
    ///
    /// # Errors
    /// Only fails if the primary store failed and the snapshot could not be read.
    #[instrument(skip(self))]
    pub async fn get(&self, id: &str) -> Result<Option<Product>> {
        match self.primary_get(id).await {
            PrimaryOutcome::Served(found) => Ok(found),
            PrimaryOutcome::PrimaryFailed(cause) => {
                warn!(
                    error = %cause,
                    path = %self.snapshot.path().display(),
                    "Primary store failed to get product, falling back to snapshot"
                );
                let products = self.snapshot.load().await?;
                Ok(snapshot::find(products, id))
            }
        }
    }

    /// Validates and stores a new product, assigning an id if none was given.
    ///
    /// # Errors
    /// Returns:
    /// - `Error::Validation` if required fields are missing (nothing is stored)
    /// - `Error::Conflict` if the id is already taken
    /// - `Error::StorageUnavailable` if the primary store fails
    #[instrument(skip(self, draft))]
    pub async fn create(&self, draft: ProductDraft) -> Result<Product> {
        let id = supplied_id(draft.id.as_ref()).map_or_else(new_id, ToString::to_string);
        let product = validate_product(id, draft)?;

        let txn = self.db.begin().await?;
        ProductEntity::insert(to_active_model(&product))
            .exec_without_returning(&txn)
            .await
            .map_err(|e| Error::from_insert(e, &product.id))?;
        insert_tags(&txn, &product).await?;
        txn.commit().await?;

        info!(id = %product.id, "Created product");
        Ok(product)
    }

    /// Merges `changes` into the stored product and returns the result.
    ///
    /// `Ok(None)` if no product has this id.
    ///
    /// # Errors
    /// Returns `Error::Validation` if the merged product is not well-formed or
    /// the changes try to alter the id, `Error::StorageUnavailable` if the
    /// primary store fails.
    #[instrument(skip(self, changes))]
    pub async fn edit(&self, id: &str, changes: ProductChanges) -> Result<Option<Product>> {
        if supplied_id(changes.id.as_ref()).is_some_and(|requested| requested != id) {
            return Err(Error::validation(["id cannot be changed"]));
        }
        let replaces_tags = changes.tags.is_some();

        let txn = self.db.begin().await?;
        let Some(existing) = fetch_one(&txn, id).await? else {
            return Ok(None);
        };
        let updated = validate_product(id.to_string(), ProductDraft::from(existing).merge(changes))?;

        to_active_model(&updated).update(&txn).await?;
        if replaces_tags {
            delete_tags(&txn, id).await?;
            insert_tags(&txn, &updated).await?;
        }
        txn.commit().await?;

        info!(id, "Updated product");
        Ok(Some(updated))
    }

    /// Removes a product and its tags. Returns the number of products removed.
    ///
    /// # Errors
    /// Returns `Error::StorageUnavailable` if the primary store fails.
    #[instrument(skip(self))]
    pub async fn destroy(&self, id: &str) -> Result<u64> {
        let txn = self.db.begin().await?;
        delete_tags(&txn, id).await?;
        let removed = ProductEntity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        info!(id, removed = removed.rows_affected, "Deleted product");
        Ok(removed.rows_affected)
    }

    async fn primary_list(&self, options: &ListProductsOptions) -> PrimaryOutcome<Vec<Product>> {
        fetch_page(&*self.db, options).await.into()
    }

    async fn primary_get(&self, id: &str) -> PrimaryOutcome<Option<Product>> {
        fetch_one(&*self.db, id).await.into()
    }
}

async fn fetch_page<C: ConnectionTrait>(
    conn: &C,
    options: &ListProductsOptions,
) -> std::result::Result<Vec<Product>, DbErr> {
    let mut query = ProductEntity::find();
    if let Some(tag) = &options.tag {
        query = query.filter(
            product::Column::Id.in_subquery(
                Query::select()
                    .column(product_tag::Column::ProductId)
                    .from(ProductTag)
                    .and_where(product_tag::Column::Title.eq(tag.as_str()))
                    .to_owned(),
            ),
        );
    }

    let rows = query
        .order_by_asc(product::Column::Id)
        .offset(options.effective_offset())
        .limit(options.effective_limit())
        .all(conn)
        .await?;
    with_tags(conn, rows).await
}

async fn fetch_one<C: ConnectionTrait>(
    conn: &C,
    id: &str,
) -> std::result::Result<Option<Product>, DbErr> {
    let Some(row) = ProductEntity::find_by_id(id).one(conn).await? else {
        return Ok(None);
    };
    Ok(with_tags(conn, vec![row]).await?.pop())
}

/// Loads stored products by id, with tags. Unknown ids are skipped and the
/// result is in no particular order.
pub(crate) async fn find_by_ids<C: ConnectionTrait>(
    conn: &C,
    ids: &[String],
) -> std::result::Result<Vec<Product>, DbErr> {
    let mut unique = ids.to_vec();
    unique.sort_unstable();
    unique.dedup();

    let mut rows = Vec::with_capacity(unique.len());
    for chunk in unique.chunks(ID_CHUNK) {
        let found = ProductEntity::find()
            .filter(product::Column::Id.is_in(chunk.iter().map(String::as_str)))
            .all(conn)
            .await?;
        rows.extend(found);
    }
    with_tags(conn, rows).await
}

/// Loads the tags for `rows` and assembles products in row order.
///
/// Tags are fetched [`ID_CHUNK`] products at a time so a large page never
/// exceeds the store's bound-variable limit.
async fn with_tags<C: ConnectionTrait>(
    conn: &C,
    rows: Vec<product::Model>,
) -> std::result::Result<Vec<Product>, DbErr> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<&str> = rows.iter().map(|row| row.id.as_str()).collect();
    let mut tags: HashMap<String, Vec<Tag>> = HashMap::new();
    for chunk in ids.chunks(ID_CHUNK) {
        let tag_rows = ProductTag::find()
            .filter(product_tag::Column::ProductId.is_in(chunk.iter().copied()))
            .order_by_asc(product_tag::Column::ProductId)
            .order_by_asc(product_tag::Column::Position)
            .all(conn)
            .await?;
        for row in tag_rows {
            tags.entry(row.product_id).or_default().push(Tag::new(row.title));
        }
    }

    Ok(rows
        .into_iter()
        .map(|row| {
            let product_tags = tags.remove(&row.id).unwrap_or_default();
            from_model(row, product_tags)
        })
        .collect())
}

async fn insert_tags<C: ConnectionTrait>(
    conn: &C,
    product: &Product,
) -> std::result::Result<(), DbErr> {
    if product.tags.is_empty() {
        return Ok(());
    }
    let rows = (0_i32..).zip(&product.tags).map(|(position, tag)| product_tag::ActiveModel {
        product_id: Set(product.id.clone()),
        position: Set(position),
        title: Set(tag.title.clone()),
    });
    ProductTag::insert_many(rows)
        .exec_without_returning(conn)
        .await?;
    Ok(())
}

async fn delete_tags<C: ConnectionTrait>(conn: &C, id: &str) -> std::result::Result<(), DbErr> {
    ProductTag::delete_many()
        .filter(product_tag::Column::ProductId.eq(id))
        .exec(conn)
        .await?;
    Ok(())
}

fn from_model(row: product::Model, tags: Vec<Tag>) -> Product {
    Product {
        id: row.id,
        description: row.description,
        alt_description: row.alt_description,
        likes: row.likes,
        urls: Urls {
            regular: row.url_regular,
            small: row.url_small,
            thumb: row.url_thumb,
        },
        links: Links {
            self_link: row.link_self,
            html: row.link_html,
        },
        user: ProductUser {
            id: row.user_id,
            first_name: row.user_first_name,
            last_name: row.user_last_name,
            portfolio_url: row.user_portfolio_url,
            username: row.user_username,
        },
        tags,
    }
}

fn to_active_model(product: &Product) -> product::ActiveModel {
    product::ActiveModel {
        id: Set(product.id.clone()),
        description: Set(product.description.clone()),
        alt_description: Set(product.alt_description.clone()),
        likes: Set(product.likes),
        url_regular: Set(product.urls.regular.clone()),
        url_small: Set(product.urls.small.clone()),
        url_thumb: Set(product.urls.thumb.clone()),
        link_self: Set(product.links.self_link.clone()),
        link_html: Set(product.links.html.clone()),
        user_id: Set(product.user.id.clone()),
        user_first_name: Set(product.user.first_name.clone()),
        user_last_name: Set(product.user.last_name.clone()),
        user_portfolio_url: Set(product.user.portfolio_url.clone()),
        user_username: Set(product.user.username.clone()),
    }
}

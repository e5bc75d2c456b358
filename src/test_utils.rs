//! Shared test utilities for the catalog service.
//!
//! This module provides common helper functions for setting up test databases,
//! snapshot files, and records with sensible defaults.

use crate::{
    core::{
        product::ProductRepository,
        snapshot::SnapshotReader,
        validation::{OrderDraft, ProductDraft},
    },
    errors::Result,
    models::{Links, Product, ProductUser, Tag, Urls},
};
use sea_orm::{DatabaseBackend, DatabaseConnection, DbErr, MockDatabase, RuntimeErr};
use std::io::Write;
use tempfile::NamedTempFile;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// A connection whose every query and statement fails like an unreachable server.
pub fn failing_db() -> DatabaseConnection {
    MockDatabase::new(DatabaseBackend::Sqlite)
        .append_query_errors([DbErr::Conn(RuntimeErr::Internal(
            "connection refused".to_string(),
        ))])
        .append_exec_errors([DbErr::Conn(RuntimeErr::Internal(
            "connection refused".to_string(),
        ))])
        .into_connection()
}

/// Sets up a repository over a fresh in-memory database and an empty snapshot.
///
/// The snapshot file handle is returned so it outlives the repository.
pub async fn setup_repository() -> Result<(ProductRepository, NamedTempFile)> {
    let snapshot = write_snapshot(&[]);
    let repo = ProductRepository::new(setup_test_db().await?, SnapshotReader::new(snapshot.path()));
    Ok((repo, snapshot))
}

/// Builds a well-formed product with the given id and tag titles.
///
/// # Defaults
/// * likes: 10
/// * description set, `alt_description` absent
/// * user `last_name` set, `portfolio_url` absent
pub fn sample_product(id: &str, tags: &[&str]) -> Product {
    Product {
        id: id.to_string(),
        description: Some(format!("Photo {id}")),
        alt_description: None,
        likes: 10,
        urls: Urls {
            regular: format!("https://images.example.com/{id}?w=1080"),
            small: format!("https://images.example.com/{id}?w=400"),
            thumb: format!("https://images.example.com/{id}?w=200"),
        },
        links: Links {
            self_link: format!("https://api.example.com/photos/{id}"),
            html: format!("https://example.com/photos/{id}"),
        },
        user: ProductUser {
            id: format!("user-{id}"),
            first_name: "Ada".to_string(),
            last_name: Some("Lovelace".to_string()),
            portfolio_url: None,
            username: "ada".to_string(),
        },
        tags: tags.iter().copied().map(Tag::new).collect(),
    }
}

/// Same as [`sample_product`], as a creation draft.
pub fn sample_draft(id: &str, tags: &[&str]) -> ProductDraft {
    ProductDraft::from(sample_product(id, tags))
}

/// Builds a valid order draft for `buyer@example.com` with no status.
pub fn sample_order_draft(id: &str, products: &[&str]) -> OrderDraft {
    OrderDraft {
        id: Some(id.to_string()),
        buyer_email: Some("buyer@example.com".to_string()),
        products: Some(products.iter().map(|p| Some((*p).to_string())).collect()),
        status: None,
    }
}

/// Writes `products` as a JSON snapshot file, in the given order.
#[allow(clippy::unwrap_used)]
pub fn write_snapshot(products: &[Product]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    let json = serde_json::to_string_pretty(products).unwrap();
    file.write_all(json.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

//! Snapshot reader - the read-only product baseline on disk.
//!
//! The snapshot is a JSON array of products. It is read fresh on every call and
//! never written by the service. Records are trusted as well-formed; a file that
//! does not parse as a product array is reported as corrupt.

use crate::{
    errors::{Error, Result},
    models::{ListProductsOptions, Product},
};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// Reads the product snapshot from a fixed path.
#[derive(Debug, Clone)]
pub struct SnapshotReader {
    path: PathBuf,
}

impl SnapshotReader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads and parses the whole snapshot.
    ///
    /// # Errors
    /// Returns `Error::SnapshotUnavailable` if the file is missing, unreadable,
    /// or not a JSON array of products.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub async fn load(&self) -> Result<Vec<Product>> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|e| self.unavailable(format!("read failed: {e}")))?;
        let products: Vec<Product> = serde_json::from_slice(&bytes)
            .map_err(|e| self.unavailable(format!("parse failed: {e}")))?;
        debug!("Loaded {} products from snapshot", products.len());
        Ok(products)
    }

    fn unavailable(&self, message: String) -> Error {
        Error::SnapshotUnavailable {
            path: self.path.display().to_string(),
            message,
        }
    }
}

/// Applies list semantics to an in-memory product set.
///
/// Sorts by id ascending, keeps products carrying `options.tag` (if any), then
/// skips `offset` and takes the effective limit. This mirrors the primary-store
/// query exactly.
pub fn window(mut products: Vec<Product>, options: &ListProductsOptions) -> Vec<Product> {
    products.sort_by(|a, b| a.id.cmp(&b.id));
    let offset = usize::try_from(options.effective_offset()).unwrap_or(usize::MAX);
    let limit = usize::try_from(options.effective_limit()).unwrap_or(usize::MAX);
    products
        .into_iter()
        .filter(|product| options.tag.as_deref().is_none_or(|tag| product.has_tag(tag)))
        .skip(offset)
        .take(limit)
        .collect()
}

/// Finds a product by exact id.
pub fn find(products: Vec<Product>, id: &str) -> Option<Product> {
    products.into_iter().find(|product| product.id == id)
}

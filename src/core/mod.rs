//! Core business logic - framework-agnostic repositories over the primary store.

pub mod order;
pub mod product;
pub mod snapshot;
pub mod validation;

/// Generates a new record id.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Most ids bound into a single `IN (...)` lookup. `SQLite` rejects statements
/// with more than 32766 variables.
pub(crate) const ID_CHUNK: usize = 500;

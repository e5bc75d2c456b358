//! Unified error types for the catalog service.
//!
//! Absence of a record is not an error here: lookups return `Option` and the
//! HTTP layer turns `None` into a 404.

use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Errors surfaced by repositories, configuration and the server.
#[derive(Debug, Error)]
pub enum Error {
    /// A candidate record is missing required fields or carries malformed ones.
    #[error("Validation failed: {}", fields.join(", "))]
    Validation {
        /// One entry per offending field path, e.g. `urls.thumb`
        fields: Vec<String>,
    },

    /// The primary store could not carry out a write (or a read with no fallback).
    #[error("Storage unavailable: {source}")]
    StorageUnavailable {
        /// Underlying driver error
        #[source]
        source: DbErr,
    },

    /// A record with the same id already exists.
    #[error("Record with id '{id}' already exists")]
    Conflict {
        /// The duplicated id
        id: String,
    },

    /// The snapshot file could not be read or parsed after a primary failure.
    #[error("Snapshot unavailable at {path}: {message}")]
    SnapshotUnavailable {
        /// Location of the snapshot file
        path: String,
        /// What went wrong while reading or parsing it
        message: String,
    },

    /// Configuration could not be loaded.
    #[error("Configuration error: {message}")]
    Config {
        /// Human readable message
        message: String,
    },

    /// I/O error outside the snapshot path (binding the listener, serving).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Builds a validation error from a list of field problems.
    pub fn validation<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Validation {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Maps an insert failure, turning unique-key violations on `id` into `Conflict`.
    pub fn from_insert(err: DbErr, id: &str) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => Self::Conflict { id: id.to_string() },
            _ => Self::StorageUnavailable { source: err },
        }
    }
}

impl From<DbErr> for Error {
    fn from(source: DbErr) -> Self {
        Self::StorageUnavailable { source }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;

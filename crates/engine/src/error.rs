//! The module contains the errors the engine can return.
//!
//! Expected, non-fatal outcomes ([`AccountNotFound`], [`UnknownCatalogEntry`])
//! are ordinary result values; only [`Database`] represents a store fault, and
//! it is always surfaced after the current database transaction has been
//! rolled back.
//!
//! [`AccountNotFound`]: EngineError::AccountNotFound
//! [`UnknownCatalogEntry`]: EngineError::UnknownCatalogEntry
//! [`Database`]: EngineError::Database
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("account not found: {0}")]
    AccountNotFound(String),
    #[error("unknown catalog entry: {0}")]
    UnknownCatalogEntry(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::AccountNotFound(a), Self::AccountNotFound(b)) => a == b,
            (Self::UnknownCatalogEntry(a), Self::UnknownCatalogEntry(b)) => a == b,
            (Self::Conflict(a), Self::Conflict(b)) => a == b,
            (Self::InvalidArgument(a), Self::InvalidArgument(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}

//! The module contains the errors the engine can throw.
//!
//! The taxonomy is:
//!
//! - [`NotFound`] a referenced entity is absent or not owned by the caller.
//! - [`InvalidArgument`] an input failed validation (unknown enum value,
//!   zero amount, out-of-range date).
//! - [`ConstraintViolation`] the store rejected a write.
//! - [`Database`] the store layer itself failed.
//!
//! [`NotFound`]: LedgerError::NotFound
//! [`InvalidArgument`]: LedgerError::InvalidArgument
//! [`ConstraintViolation`]: LedgerError::ConstraintViolation
//! [`Database`]: LedgerError::Database
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for LedgerError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::NotFound(a), Self::NotFound(b)) => a == b,
            (Self::InvalidArgument(a), Self::InvalidArgument(b)) => a == b,
            (Self::ConstraintViolation(a), Self::ConstraintViolation(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}

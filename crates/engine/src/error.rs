//! The module contains the errors the engine can return.
//!
//! Every variant except [`Database`] is an expected business outcome the
//! caller can react to:
//!
//! - [`NotFound`] the entity is missing, archived or owned by someone else.
//! - [`Validation`] and [`InvalidCursor`] the input is malformed.
//! - [`Conflict`] the request tries to change an immutable field.
//! - [`ExistingKey`] a unique name is already taken.
//! - [`InsufficientFunds`] an outgoing delta would overdraw an account.
//!
//!  [`NotFound`]: EngineError::NotFound
//!  [`Validation`]: EngineError::Validation
//!  [`InvalidCursor`]: EngineError::InvalidCursor
//!  [`Conflict`]: EngineError::Conflict
//!  [`ExistingKey`]: EngineError::ExistingKey
//!  [`InsufficientFunds`]: EngineError::InsufficientFunds
//!  [`Database`]: EngineError::Database
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Invalid cursor: {0}")]
    InvalidCursor(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("Insufficient funds on account {0}")]
    InsufficientFunds(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::NotFound(a), Self::NotFound(b)) => a == b,
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::InvalidCursor(a), Self::InvalidCursor(b)) => a == b,
            (Self::Conflict(a), Self::Conflict(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::InsufficientFunds(a), Self::InsufficientFunds(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}

//! Errors raised while parsing the shared types.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypesError {
    #[error("unknown participant role: {0}")]
    UnknownRole(String),

    #[error("unknown batch status: {0}")]
    UnknownStatus(String),

    #[error("invalid batch id: {0}")]
    InvalidBatchId(String),
}

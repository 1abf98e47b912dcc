use thiserror::Error;

use crate::db::schemas::{id::ObjectId, payload::ValidationError};

#[derive(Error, Debug)]
pub enum Error {
    #[error("SurrealDB error: {0}")]
    DbError(#[from] surrealdb::Error),
    #[error("{0}")]
    Validation(#[from] ValidationError),
    #[error("Invalid ObjectId: {0:?}")]
    InvalidIdentifier(String),
    #[error("Database not configured")]
    Unavailable,
    #[error("Item not found.")]
    NotFound,
    #[error("The {table} record {id} was inserted but could not be read back.")]
    ReadAfterWrite { table: &'static str, id: ObjectId },
    #[error("Stored record has a malformed key: {0}")]
    MalformedKey(String),
}

pub type StorageResult<T> = Result<T, Error>;

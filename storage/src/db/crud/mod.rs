//! CRUD operations for the record tables.
//!
//! Creates are followed by a read of the same key, so callers always get the document as
//! stored.
use serde::{Serialize, de::DeserializeOwned};
use surrealdb::{Connection, Surreal};

use super::schemas::id::ObjectId;
use crate::errors::{Error, StorageResult};

pub mod artist;
pub mod release;
pub mod track;

/// Insert `record` under `id`, then read it back.
async fn insert_and_read_back<C, T>(
    db: &Surreal<C>,
    table: &'static str,
    id: ObjectId,
    record: T,
) -> StorageResult<T>
where
    C: Connection,
    T: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    let _: Option<T> = db.create(id.record_id(table)).content(record).await?;
    let stored: Option<T> = db.select(id.record_id(table)).await?;
    stored.ok_or(Error::ReadAfterWrite { table, id })
}

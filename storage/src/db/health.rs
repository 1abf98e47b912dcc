//! this module hold the implementations of functions needed for the diagnostics of the database

use surrealdb::{Connection, Surreal};
use tracing::instrument;

use crate::{
    db::queries::generic::{Count, DatabaseInfo},
    errors::Error,
};

/// How many table names the diagnostics report at most.
pub const MAX_LISTED_COLLECTIONS: usize = 10;

/// List the names of the tables in the database, sorted, at most [`MAX_LISTED_COLLECTIONS`].
///
/// # Errors
///
/// see [`DatabaseInfo::fetch`]
#[instrument]
pub async fn list_collections<C: Connection>(db: &Surreal<C>) -> Result<Vec<String>, Error> {
    let info = DatabaseInfo::fetch(db).await?;
    Ok(info
        .tables
        .into_keys()
        .take(MAX_LISTED_COLLECTIONS)
        .collect())
}

/// Count the number of records in a table
///
/// # Errors
///
/// see [`Count::count`]
#[instrument]
pub async fn count_records<C: Connection>(db: &Surreal<C>, table: &str) -> Result<u64, Error> {
    Count::count(db, table).await
}

use std::collections::BTreeMap;

use serde::Deserialize;
use surrealdb::{Connection, Surreal};

use crate::errors::Error;

/// Struct to assist deserializing the results of the count queries
#[derive(Debug, Deserialize, PartialEq, Eq, Clone, Copy)]
pub struct Count {
    count: u64,
}

impl Count {
    /// Count the number of items in a table.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or if the result cannot be deserialized.
    pub async fn count<C: Connection>(db: &Surreal<C>, table: &str) -> Result<u64, Error> {
        let result: Option<Self> = db.query(count(table)).await?.take(0)?;
        Ok(result.map_or_else(
            || {
                log::debug!("When counting entries in table {table}, no count was returned");
                0
            },
            |c| c.count,
        ))
    }
}

/// The part of the `INFO FOR DB` result we care about.
#[derive(Debug, Default, Deserialize)]
pub struct DatabaseInfo {
    /// table name -> definition
    #[serde(default)]
    pub tables: BTreeMap<String, serde_json::Value>,
}

impl DatabaseInfo {
    /// # Errors
    ///
    /// Returns an error if the query fails or if the result cannot be deserialized.
    pub async fn fetch<C: Connection>(db: &Surreal<C>) -> Result<Self, Error> {
        let result: Option<Self> = db.query(info_for_db()).await?.take(0)?;
        Ok(result.unwrap_or_default())
    }
}

/// Query to count the number of items in a table.
///
/// Compiles to:
/// ```sql, ignore
/// SELECT count() FROM table GROUP ALL
/// ```
#[must_use]
pub fn count(table: &str) -> String {
    format!("SELECT count() FROM {table} GROUP ALL")
}

/// Query describing the current database, including its tables.
///
/// Compiles to:
/// ```sql, ignore
/// INFO FOR DB
/// ```
#[must_use]
pub const fn info_for_db() -> &'static str {
    "INFO FOR DB"
}

/// Query to read every record of a table, up to `$limit`.
///
/// Compiles to:
/// ```sql, ignore
/// SELECT * FROM table LIMIT $limit
/// ```
#[must_use]
pub fn list_all(table: &str) -> String {
    format!("SELECT * FROM {table} LIMIT $limit")
}

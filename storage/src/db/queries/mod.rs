//! SurrealQL statements issued by the storage layer.
//!
//! Each function returns the statement as a `String`; values that come from clients are
//! never interpolated, they are passed as bound parameters (`$artist_id`, `$status`, ...).
use std::fmt::Write as _;

use super::schemas::{release, track, COLLECTIONS};

pub mod generic;
pub mod records;

/// Largest value SurrealDB accepts in a `LIMIT` clause.
pub const MAX_LIMIT: u64 = u32::MAX as u64;

/// A requested row count as the value bound to `$limit`.
///
/// Requests above [`MAX_LIMIT`] are clamped to it, which still returns every row.
#[must_use]
pub fn limit_param(limit: u64) -> i64 {
    i64::from(u32::try_from(limit).unwrap_or(u32::MAX))
}

/// Fields of the per-artist tables that get an index.
const INDEXED_FIELDS: [&str; 2] = ["artist_id", "status"];

/// Statements that create every table, and the indexes used by the list queries.
///
/// Safe to run against a database that already has them.
///
/// Compiles to:
/// ```sql, ignore
/// DEFINE TABLE IF NOT EXISTS artist SCHEMALESS;
/// DEFINE TABLE IF NOT EXISTS track SCHEMALESS;
/// DEFINE TABLE IF NOT EXISTS release SCHEMALESS;
/// DEFINE INDEX IF NOT EXISTS track_artist_id ON TABLE track FIELDS artist_id;
/// DEFINE INDEX IF NOT EXISTS track_status ON TABLE track FIELDS status;
/// DEFINE INDEX IF NOT EXISTS release_artist_id ON TABLE release FIELDS artist_id;
/// DEFINE INDEX IF NOT EXISTS release_status ON TABLE release FIELDS status;
/// ```
#[must_use]
pub fn define_tables() -> String {
    let mut statements = String::new();
    for table in COLLECTIONS {
        let _ = writeln!(statements, "DEFINE TABLE IF NOT EXISTS {table} SCHEMALESS;");
    }
    for table in [track::TABLE_NAME, release::TABLE_NAME] {
        for field in INDEXED_FIELDS {
            let _ = writeln!(
                statements,
                "DEFINE INDEX IF NOT EXISTS {table}_{field} ON TABLE {table} FIELDS {field};"
            );
        }
    }
    statements
}

#[cfg(test)]
pub fn validate_query(query: impl AsRef<str>, expected: &str) {
    use pretty_assertions::assert_eq;

    let compiled_query = surrealdb::syn::parse(query.as_ref()).unwrap();
    let compiled_expected = surrealdb::syn::parse(expected).unwrap();
    assert!(
        !compiled_expected.0.is_empty(),
        "Expected query compiled to an empty list of statements: \"{expected}\""
    );
    assert_eq!(compiled_query, compiled_expected);
}

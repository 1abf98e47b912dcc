//! Queries over the per-artist tables (`track`, `release`).
use super::limit_param;
use crate::db::schemas::status::Status;

/// Parameters of a per-artist list query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListQuery {
    pub artist_id: String,
    /// Only return records with exactly this status.
    pub status: Option<Status>,
    /// Upper bound on the number of records returned. There is no server-side cap.
    pub limit: u64,
}

impl ListQuery {
    pub const DEFAULT_LIMIT: u64 = 50;

    #[must_use]
    pub fn new(artist_id: impl Into<String>) -> Self {
        Self {
            artist_id: artist_id.into(),
            status: None,
            limit: Self::DEFAULT_LIMIT,
        }
    }

    #[must_use]
    pub const fn with_status(mut self, status: Option<Status>) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub const fn with_limit(mut self, limit: u64) -> Self {
        self.limit = limit;
        self
    }

    /// `limit` as the value bound to `$limit`, see [`limit_param`].
    #[must_use]
    pub fn bounded_limit(&self) -> i64 {
        limit_param(self.limit)
    }
}

/// Query to list the records of one artist, in the store's natural order.
///
/// Compiles to:
/// ```sql, ignore
/// SELECT * FROM table WHERE artist_id = $artist_id [AND status = $status] LIMIT $limit
/// ```
#[must_use]
pub fn list_by_artist(table: &str, with_status: bool) -> String {
    let status_filter = if with_status {
        " AND status = $status"
    } else {
        ""
    };
    format!("SELECT * FROM {table} WHERE artist_id = $artist_id{status_filter} LIMIT $limit")
}

//! CRUD operations for the track table
use surrealdb::{Connection, Surreal};
use tracing::instrument;

use crate::{
    db::{
        queries::records::{ListQuery, list_by_artist},
        schemas::{
            id::ObjectId,
            track::{TABLE_NAME, Track, TrackDraft},
        },
    },
    errors::StorageResult,
};

impl Track {
    /// Store a new track owned by `artist_id`.
    ///
    /// # Errors
    ///
    /// Fails if the insert fails, or with [`crate::errors::Error::ReadAfterWrite`] if the
    /// inserted track cannot be read back.
    #[instrument]
    pub async fn create<C: Connection>(
        db: &Surreal<C>,
        artist_id: &str,
        draft: TrackDraft,
    ) -> StorageResult<Self> {
        let id = ObjectId::new();
        super::insert_and_read_back(db, TABLE_NAME, id, Self::new(id, artist_id, draft)).await
    }

    #[instrument]
    pub async fn read<C: Connection>(db: &Surreal<C>, id: ObjectId) -> StorageResult<Option<Self>> {
        Ok(db.select(id.record_id(TABLE_NAME)).await?)
    }

    /// The tracks of one artist, optionally with one status, at most `query.limit` of them.
    #[instrument]
    pub async fn list<C: Connection>(db: &Surreal<C>, query: &ListQuery) -> StorageResult<Vec<Self>> {
        if query.limit == 0 {
            return Ok(Vec::new());
        }
        Ok(db
            .query(list_by_artist(TABLE_NAME, query.status.is_some()))
            .bind(("artist_id", query.artist_id.clone()))
            .bind(("status", query.status))
            .bind(("limit", query.bounded_limit()))
            .await?
            .take(0)?)
    }
}

//! CRUD operations for the artist table
use surrealdb::{Connection, Surreal};
use tracing::instrument;

use crate::{
    db::{
        queries::{generic::list_all, limit_param},
        schemas::{
            artist::{Artist, ArtistDraft, TABLE_NAME},
            id::ObjectId,
        },
    },
    errors::StorageResult,
};

impl Artist {
    /// # Errors
    ///
    /// Fails if the insert fails, or with [`crate::errors::Error::ReadAfterWrite`] if the
    /// inserted profile cannot be read back.
    #[instrument]
    pub async fn create<C: Connection>(db: &Surreal<C>, draft: ArtistDraft) -> StorageResult<Self> {
        let id = ObjectId::new();
        super::insert_and_read_back(db, TABLE_NAME, id, Self::new(id, draft)).await
    }

    #[instrument]
    pub async fn read<C: Connection>(db: &Surreal<C>, id: ObjectId) -> StorageResult<Option<Self>> {
        Ok(db.select(id.record_id(TABLE_NAME)).await?)
    }

    #[instrument]
    pub async fn list<C: Connection>(db: &Surreal<C>, limit: u64) -> StorageResult<Vec<Self>> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        Ok(db
            .query(list_all(TABLE_NAME))
            .bind(("limit", limit_param(limit)))
            .await?
            .take(0)?)
    }
}

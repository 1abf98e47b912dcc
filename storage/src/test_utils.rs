//! Helpers for tests that need a database or well-formed drafts.
use anyhow::Result;
use serde_json::json;
use surrealdb::{
    Surreal,
    engine::local::{Db, Mem},
};

use crate::db::{
    DatabaseLocation, StoreInfo, register_tables,
    schemas::{artist::ArtistDraft, release::ReleaseDraft, track::TrackDraft},
};

/// A fresh in-memory database with every table registered.
///
/// # Errors
///
/// Fails if the engine can't be started or the tables can't be defined.
pub async fn init_test_database() -> Result<Surreal<Db>> {
    let db = Surreal::new::<Mem>(()).await?;
    db.use_ns("test").use_db("test").await?;
    register_tables(&db).await?;
    Ok(db)
}

#[must_use]
pub fn test_store_info() -> StoreInfo {
    StoreInfo {
        location: Some(DatabaseLocation::Memory),
        namespace: "test".into(),
        name: "test".into(),
    }
}

/// A track by "Aria" with every optional field left out.
///
/// # Panics
///
/// Never, the payload is well-formed.
#[must_use]
pub fn track_draft(title: &str) -> TrackDraft {
    TrackDraft::from_payload(&json!({"title": title, "primary_artist": "Aria"}))
        .expect("well-formed track payload")
}

/// # Panics
///
/// Never, the payload is well-formed.
#[must_use]
pub fn release_draft(title: &str) -> ReleaseDraft {
    ReleaseDraft::from_payload(&json!({"title": title})).expect("well-formed release payload")
}

/// # Panics
///
/// Never, the payload is well-formed.
#[must_use]
pub fn artist_draft(stage_name: &str) -> ArtistDraft {
    ArtistDraft::from_payload(&json!({"stage_name": stage_name}))
        .expect("well-formed artist payload")
}

//! The record service: validates inbound payloads, scopes them to an artist, and stores them.
//!
//! Every operation first checks that the store is connected, so a disconnected store fails
//! with [`Error::Unavailable`] before any validation or query is attempted.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use surrealdb::{Connection, Surreal};
use tracing::instrument;

use aurca_storage::{
    db::{
        Store, health,
        queries::records::ListQuery,
        schemas::{
            COLLECTIONS,
            artist::{Artist, ArtistDraft, ArtistView},
            id::ObjectId,
            payload::{Reason, ValidationError},
            release::{Release, ReleaseDraft, ReleaseView},
            status::Status,
            track::{Track, TrackDraft, TrackView},
        },
    },
    errors::{Error, StorageResult},
};

/// The query string of the list endpoints.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct ListParams {
    /// Only return records with this status. Empty means no filter.
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub limit: Option<u64>,
}

impl ListParams {
    /// Resolve these parameters into a query over the records of `artist_id`.
    ///
    /// # Errors
    ///
    /// Fails if `status` is not one of the known statuses.
    #[inline]
    pub fn into_query(self, artist_id: &str) -> Result<ListQuery, ValidationError> {
        let status = match self.status.as_deref() {
            None | Some("") => None,
            Some(status) => Some(
                status
                    .parse::<Status>()
                    .map_err(|_| ValidationError::single("status", Reason::UnknownStatus))?,
            ),
        };
        Ok(ListQuery::new(artist_id)
            .with_status(status)
            .with_limit(self.limit.unwrap_or(ListQuery::DEFAULT_LIMIT)))
    }
}

/// What `GET /test` reports about the backend and its database.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics {
    pub backend: String,
    pub database: String,
    pub database_path: Option<String>,
    pub database_name: Option<String>,
    pub connection_status: String,
    pub collections: Vec<String>,
    /// Number of records in each record table.
    pub record_counts: BTreeMap<String, u64>,
}

/// How much of a storage error message the diagnostics include.
const DIAGNOSTIC_ERROR_CHARS: usize = 80;

pub struct RecordService<C: Connection> {
    store: Store<C>,
}

impl<C: Connection> Clone for RecordService<C> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<C: Connection> std::fmt::Debug for RecordService<C> {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordService")
            .field("store", &self.store)
            .finish()
    }
}

impl<C: Connection> RecordService<C> {
    #[must_use]
    #[inline]
    pub const fn new(store: Store<C>) -> Self {
        Self { store }
    }

    #[must_use]
    #[inline]
    pub const fn store(&self) -> &Store<C> {
        &self.store
    }

    /// Create a track owned by `artist_id` from a raw JSON payload.
    ///
    /// # Errors
    ///
    /// [`Error::Unavailable`] if the store is disconnected, [`Error::Validation`] if the payload
    /// is malformed, or any storage error.
    #[instrument(skip(payload))]
    #[inline]
    pub async fn create_track(&self, artist_id: &str, payload: &Value) -> StorageResult<TrackView> {
        let db = self.store.connection()?;
        let draft = TrackDraft::from_payload(payload)?;
        TrackView::try_from(Track::create(db, artist_id, draft).await?)
    }

    /// # Errors
    ///
    /// [`Error::Unavailable`] if the store is disconnected, [`Error::Validation`] if the status
    /// filter is unknown, or any storage error.
    #[instrument]
    #[inline]
    pub async fn list_tracks(
        &self,
        artist_id: &str,
        params: ListParams,
    ) -> StorageResult<Vec<TrackView>> {
        let db = self.store.connection()?;
        let query = params.into_query(artist_id)?;
        Track::list(db, &query)
            .await?
            .into_iter()
            .map(TrackView::try_from)
            .collect()
    }

    /// Create a release owned by `artist_id` from a raw JSON payload.
    ///
    /// # Errors
    ///
    /// see [`Self::create_track`]
    #[instrument(skip(payload))]
    #[inline]
    pub async fn create_release(
        &self,
        artist_id: &str,
        payload: &Value,
    ) -> StorageResult<ReleaseView> {
        let db = self.store.connection()?;
        let draft = ReleaseDraft::from_payload(payload)?;
        ReleaseView::try_from(Release::create(db, artist_id, draft).await?)
    }

    /// # Errors
    ///
    /// see [`Self::list_tracks`]
    #[instrument]
    #[inline]
    pub async fn list_releases(
        &self,
        artist_id: &str,
        params: ListParams,
    ) -> StorageResult<Vec<ReleaseView>> {
        let db = self.store.connection()?;
        let query = params.into_query(artist_id)?;
        Release::list(db, &query)
            .await?
            .into_iter()
            .map(ReleaseView::try_from)
            .collect()
    }

    /// Create an artist profile from a raw JSON payload.
    ///
    /// # Errors
    ///
    /// see [`Self::create_track`]
    #[instrument(skip(payload))]
    #[inline]
    pub async fn create_artist(&self, payload: &Value) -> StorageResult<ArtistView> {
        let db = self.store.connection()?;
        let draft = ArtistDraft::from_payload(payload)?;
        ArtistView::try_from(Artist::create(db, draft).await?)
    }

    /// # Errors
    ///
    /// [`Error::Unavailable`] if the store is disconnected, or any storage error.
    #[instrument]
    #[inline]
    pub async fn list_artists(&self, limit: Option<u64>) -> StorageResult<Vec<ArtistView>> {
        let db = self.store.connection()?;
        Artist::list(db, limit.unwrap_or(ListQuery::DEFAULT_LIMIT))
            .await?
            .into_iter()
            .map(ArtistView::try_from)
            .collect()
    }

    /// Read one artist profile by its identifier.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidIdentifier`] if `id` is not a well-formed identifier,
    /// [`Error::NotFound`] if there is no such artist.
    #[instrument]
    #[inline]
    pub async fn read_artist(&self, id: &str) -> StorageResult<ArtistView> {
        let db = self.store.connection()?;
        let id: ObjectId = id.parse()?;
        let artist = Artist::read(db, id).await?.ok_or(Error::NotFound)?;
        ArtistView::try_from(artist)
    }

    /// Report on the backend and its database. Never fails: storage errors are reported in
    /// [`Diagnostics::database`].
    #[instrument]
    #[inline]
    pub async fn diagnostics(&self) -> Diagnostics {
        let mut diagnostics = Diagnostics {
            backend: "Running".to_owned(),
            database: "Not Available".to_owned(),
            database_path: None,
            database_name: None,
            connection_status: "Not Connected".to_owned(),
            collections: Vec::new(),
            record_counts: BTreeMap::new(),
        };

        let Ok(db) = self.store.connection() else {
            return diagnostics;
        };

        let info = self.store.info();
        diagnostics.database = "Connected & Working".to_owned();
        diagnostics.database_path = info.location.as_ref().map(ToString::to_string);
        diagnostics.database_name = Some(format!("{}/{}", info.namespace, info.name));
        diagnostics.connection_status = "Connected".to_owned();

        match inspect_tables(db).await {
            Ok((collections, record_counts)) => {
                diagnostics.collections = collections;
                diagnostics.record_counts = record_counts;
            }
            Err(e) => {
                log::warn!("Diagnostics could not inspect the database: {e}");
                let message: String = e.to_string().chars().take(DIAGNOSTIC_ERROR_CHARS).collect();
                diagnostics.database = format!("Error: {message}");
            }
        }

        diagnostics
    }
}

/// The table names in the database, and how many records each record table holds.
async fn inspect_tables<C: Connection>(
    db: &Surreal<C>,
) -> StorageResult<(Vec<String>, BTreeMap<String, u64>)> {
    let collections = health::list_collections(db).await?;
    let mut record_counts = BTreeMap::new();
    for table in COLLECTIONS {
        record_counts.insert(table.to_owned(), health::count_records(db, table).await?);
    }
    Ok((collections, record_counts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{connected_service, disconnected_service, init};

    use anyhow::Result;
    use aurca_storage::test_utils::test_store_info;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;
    use surrealdb::{Surreal, engine::local::Mem};

    fn params(status: Option<&str>, limit: Option<u64>) -> ListParams {
        ListParams {
            status: status.map(ToOwned::to_owned),
            limit,
        }
    }

    #[rstest]
    #[case::defaults(params(None, None), None, 50)]
    #[case::empty_status(params(Some(""), Some(3)), None, 3)]
    #[case::released(params(Some("released"), None), Some(Status::Released), 50)]
    #[case::huge_limit(params(None, Some(1_000_000)), None, 1_000_000)]
    fn test_list_params(
        #[case] params: ListParams,
        #[case] status: Option<Status>,
        #[case] limit: u64,
    ) {
        let query = params.into_query("a1").unwrap();
        assert_eq!(query.artist_id, "a1");
        assert_eq!(query.status, status);
        assert_eq!(query.limit, limit);
    }

    #[test]
    fn test_list_params_unknown_status() {
        assert_eq!(
            params(Some("Released"), None).into_query("a1"),
            Err(ValidationError::single("status", Reason::UnknownStatus))
        );
    }

    #[tokio::test]
    async fn test_create_track_scenario() -> Result<()> {
        init();
        let service = connected_service().await?;

        let track = service
            .create_track("a1", &json!({"title": "Nova", "primary_artist": "Aria"}))
            .await?;

        assert_eq!(track.artist_id, "a1");
        assert_eq!(track.track.status, Status::Draft);
        assert!(!track.track.explicit);
        assert!(track.track.featuring.is_empty());
        assert!(!track.id.to_string().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_body_artist_id_is_ignored() -> Result<()> {
        init();
        let service = connected_service().await?;

        let track = service
            .create_track(
                "a1",
                &json!({"title": "Nova", "primary_artist": "Aria", "artist_id": "a2"}),
            )
            .await?;
        let release = service
            .create_release("a1", &json!({"title": "Orbit", "artist_id": "a2"}))
            .await?;

        assert_eq!(track.artist_id, "a1");
        assert_eq!(release.artist_id, "a1");
        assert!(service.list_tracks("a2", ListParams::default()).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_payload_persists_nothing() -> Result<()> {
        init();
        let service = connected_service().await?;

        let err = service
            .create_track("a1", &json!({"primary_artist": "Aria"}))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Validation(ref e) if e.field_names() == vec!["title"]));
        assert!(service.list_tracks("a1", ListParams::default()).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_list_returns_everything_created_up_to_limit() -> Result<()> {
        init();
        let service = connected_service().await?;
        let mut created = Vec::new();
        for title in ["One", "Two", "Three"] {
            created.push(
                service
                    .create_track("a1", &json!({"title": title, "primary_artist": "Aria"}))
                    .await?,
            );
        }

        let mut listed = service.list_tracks("a1", ListParams::default()).await?;
        listed.sort_by_key(|t| t.id);
        created.sort_by_key(|t| t.id);
        assert_eq!(listed, created);

        let limited = service.list_tracks("a1", params(None, Some(1))).await?;
        assert_eq!(limited.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_status_filter() -> Result<()> {
        init();
        let service = connected_service().await?;
        for (title, status) in [("One", "released"), ("Two", "draft"), ("Three", "released")] {
            service
                .create_release("a1", &json!({"title": title, "status": status}))
                .await?;
        }

        let released = service
            .list_releases("a1", params(Some("released"), None))
            .await?;
        assert_eq!(released.len(), 2);
        assert!(released.iter().all(|r| r.release.status == Status::Released));
        Ok(())
    }

    #[tokio::test]
    async fn test_round_trip() -> Result<()> {
        init();
        let service = connected_service().await?;
        let created = service
            .create_track(
                "a1",
                &json!({
                    "title": "Nova",
                    "primary_artist": "Aria",
                    "featuring": ["Bex"],
                    "genre": "synthwave",
                    "release_date": "2025-03-01",
                    "status": "released",
                    "metadata": {"bpm": 120},
                }),
            )
            .await?;

        let listed = service
            .list_tracks("a1", params(Some("released"), None))
            .await?;
        assert_eq!(listed, vec![created]);
        Ok(())
    }

    #[tokio::test]
    async fn test_artists() -> Result<()> {
        init();
        let service = connected_service().await?;

        let created = service
            .create_artist(&json!({"stage_name": "Aria", "bio": "synth pop"}))
            .await?;
        assert_eq!(service.read_artist(&created.id.to_string()).await?, created);
        assert_eq!(service.list_artists(None).await?, vec![created]);

        assert!(matches!(
            service.read_artist("not-an-id").await,
            Err(Error::InvalidIdentifier(_))
        ));
        assert!(matches!(
            service.read_artist(&ObjectId::new().to_string()).await,
            Err(Error::NotFound)
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_disconnected_store_fails_before_validation() {
        init();
        let service = disconnected_service();

        // an invalid payload still reports the store as unavailable
        assert!(matches!(
            service.create_track("a1", &json!({})).await,
            Err(Error::Unavailable)
        ));
        assert!(matches!(
            service.create_release("a1", &json!("nope")).await,
            Err(Error::Unavailable)
        ));
        assert!(matches!(
            service.list_tracks("a1", params(Some("bogus"), None)).await,
            Err(Error::Unavailable)
        ));
        assert!(matches!(
            service.list_releases("a1", ListParams::default()).await,
            Err(Error::Unavailable)
        ));
        assert!(matches!(
            service.create_artist(&json!({"stage_name": "Aria"})).await,
            Err(Error::Unavailable)
        ));
        assert!(matches!(
            service.list_artists(None).await,
            Err(Error::Unavailable)
        ));
        assert!(matches!(
            service.read_artist("x").await,
            Err(Error::Unavailable)
        ));
    }

    #[tokio::test]
    async fn test_diagnostics_connected() -> Result<()> {
        init();
        let service = connected_service().await?;

        assert_eq!(
            service.diagnostics().await,
            Diagnostics {
                backend: "Running".into(),
                database: "Connected & Working".into(),
                database_path: Some("memory".into()),
                database_name: Some("test/test".into()),
                connection_status: "Connected".into(),
                collections: vec!["artist".into(), "release".into(), "track".into()],
                record_counts: BTreeMap::from([
                    ("artist".into(), 0),
                    ("release".into(), 0),
                    ("track".into(), 0),
                ]),
            }
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_diagnostics_counts_records() -> Result<()> {
        init();
        let service = connected_service().await?;
        for title in ["One", "Two"] {
            service
                .create_track("a1", &json!({"title": title, "primary_artist": "Aria"}))
                .await?;
        }
        service.create_release("a2", &json!({"title": "Orbit"})).await?;

        let diagnostics = service.diagnostics().await;

        assert_eq!(diagnostics.database, "Connected & Working");
        assert_eq!(
            diagnostics.record_counts,
            BTreeMap::from([
                ("artist".into(), 0),
                ("release".into(), 1),
                ("track".into(), 2),
            ])
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_malformed_stored_key_is_not_a_client_error() -> Result<()> {
        init();
        let service = connected_service().await?;
        service
            .store()
            .connection()?
            .query("CREATE track:weird CONTENT { artist_id: 'a1', title: 'Odd', primary_artist: 'Aria' }")
            .await?
            .check()?;

        let result = service.list_tracks("a1", ListParams::default()).await;

        assert!(
            matches!(result, Err(Error::MalformedKey(ref key)) if key.contains("weird")),
            "unexpected result: {result:?}"
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_diagnostics_disconnected() {
        init();
        let diagnostics = disconnected_service().diagnostics().await;

        assert_eq!(diagnostics.database, "Not Available");
        assert_eq!(diagnostics.connection_status, "Not Connected");
        assert_eq!(diagnostics.database_path, None);
        assert!(diagnostics.collections.is_empty());
        assert!(diagnostics.record_counts.is_empty());
    }

    #[tokio::test]
    async fn test_diagnostics_reports_storage_errors() -> Result<()> {
        init();
        // no namespace or database selected, so INFO FOR DB fails
        let db = Surreal::new::<Mem>(()).await?;
        let service = RecordService::new(Store::connected(db, test_store_info()));

        let diagnostics = service.diagnostics().await;

        assert!(
            diagnostics.database.starts_with("Error: "),
            "{}",
            diagnostics.database
        );
        assert!(diagnostics.database.chars().count() <= "Error: ".len() + DIAGNOSTIC_ERROR_CHARS);
        assert_eq!(diagnostics.connection_status, "Connected");
        Ok(())
    }
}

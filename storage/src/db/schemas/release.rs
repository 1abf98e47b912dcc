use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use surrealdb::RecordId;

use super::{
    id::ObjectId,
    payload::{PayloadReader, ValidationError},
    status::Status,
};
use crate::errors::Error;

pub type ReleaseId = RecordId;

pub const TABLE_NAME: &str = "release";

/// Release type assumed when the client doesn't give one.
pub const DEFAULT_KIND: &str = "single";

/// The fields of a [`Release`] that a client controls.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseDraft {
    pub title: String,
    /// single, EP, album, ... (free text)
    #[serde(rename = "type")]
    pub kind: String,
    pub upc: Option<String>,
    pub cover_url: Option<String>,
    pub release_date: Option<DateTime<Utc>>,
    /// Identifiers of the tracks on this release, in track order.
    ///
    /// These are not checked against the `track` table.
    pub tracks: Vec<String>,
    pub status: Status,
    pub notes: Option<String>,
}

impl ReleaseDraft {
    /// Validate a raw JSON payload, filling in defaults for omitted fields.
    ///
    /// # Errors
    ///
    /// Fails with every field that is missing or has the wrong type.
    pub fn from_payload(payload: &Value) -> Result<Self, ValidationError> {
        let mut reader = PayloadReader::new(payload)?;
        let draft = Self {
            title: reader.required_string("title"),
            kind: reader.string_or("type", DEFAULT_KIND),
            upc: reader.optional_string("upc"),
            cover_url: reader.optional_string("cover_url"),
            release_date: reader.optional_timestamp("release_date"),
            tracks: reader.string_list("tracks"),
            status: reader.status("status"),
            notes: reader.optional_string("notes"),
        };
        reader.finish(draft)
    }
}

/// A release as it is stored in the `release` table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    pub id: ReleaseId,
    pub artist_id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub upc: Option<String>,
    #[serde(default)]
    pub cover_url: Option<String>,
    #[serde(default)]
    pub release_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tracks: Vec<String>,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Release {
    #[must_use]
    pub fn new(id: ObjectId, artist_id: &str, draft: ReleaseDraft) -> Self {
        Self {
            id: id.record_id(TABLE_NAME),
            artist_id: artist_id.to_owned(),
            title: draft.title,
            kind: draft.kind,
            upc: draft.upc,
            cover_url: draft.cover_url,
            release_date: draft.release_date,
            tracks: draft.tracks,
            status: draft.status,
            notes: draft.notes,
        }
    }
}

/// The outbound representation of a [`Release`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseView {
    pub id: ObjectId,
    pub artist_id: String,
    #[serde(flatten)]
    pub release: ReleaseDraft,
}

impl TryFrom<Release> for ReleaseView {
    type Error = Error;

    fn try_from(release: Release) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ObjectId::try_from(&release.id)?,
            artist_id: release.artist_id,
            release: ReleaseDraft {
                title: release.title,
                kind: release.kind,
                upc: release.upc,
                cover_url: release.cover_url,
                release_date: release.release_date,
                tracks: release.tracks,
                status: release.status,
                notes: release.notes,
            },
        })
    }
}

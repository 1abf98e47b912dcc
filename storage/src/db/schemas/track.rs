use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use surrealdb::RecordId;

use super::{
    id::ObjectId,
    payload::{PayloadReader, ValidationError},
    status::Status,
};
use crate::errors::Error;

pub type TrackId = RecordId;

pub const TABLE_NAME: &str = "track";

/// The fields of a [`Track`] that a client controls.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackDraft {
    pub title: String,
    /// Display name of the primary artist.
    pub primary_artist: String,
    /// Featuring artist names, in the order given.
    pub featuring: Vec<String>,
    pub isrc: Option<String>,
    /// UPC/EAN for a single, if applicable.
    pub upc: Option<String>,
    pub explicit: bool,
    pub genre: Option<String>,
    pub mood: Option<String>,
    pub cover_url: Option<String>,
    pub audio_url: Option<String>,
    pub release_date: Option<DateTime<Utc>>,
    pub status: Status,
    /// Whether the track should go through the AI mastering pipeline.
    pub ai_mastering: bool,
    pub metadata: Map<String, Value>,
}

impl TrackDraft {
    /// Validate a raw JSON payload, filling in defaults for omitted fields.
    ///
    /// # Errors
    ///
    /// Fails with every field that is missing or has the wrong type.
    pub fn from_payload(payload: &Value) -> Result<Self, ValidationError> {
        let mut reader = PayloadReader::new(payload)?;
        let draft = Self {
            title: reader.required_string("title"),
            primary_artist: reader.required_string("primary_artist"),
            featuring: reader.string_list("featuring"),
            isrc: reader.optional_string("isrc"),
            upc: reader.optional_string("upc"),
            explicit: reader.bool_or("explicit", false),
            genre: reader.optional_string("genre"),
            mood: reader.optional_string("mood"),
            cover_url: reader.optional_string("cover_url"),
            audio_url: reader.optional_string("audio_url"),
            release_date: reader.optional_timestamp("release_date"),
            status: reader.status("status"),
            ai_mastering: reader.bool_or("ai_mastering", false),
            metadata: reader.object("metadata"),
        };
        reader.finish(draft)
    }
}

/// A track as it is stored in the `track` table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub id: TrackId,
    /// The owning artist, assigned by the server.
    pub artist_id: String,
    pub title: String,
    pub primary_artist: String,
    #[serde(default)]
    pub featuring: Vec<String>,
    #[serde(default)]
    pub isrc: Option<String>,
    #[serde(default)]
    pub upc: Option<String>,
    #[serde(default)]
    pub explicit: bool,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub mood: Option<String>,
    #[serde(default)]
    pub cover_url: Option<String>,
    #[serde(default)]
    pub audio_url: Option<String>,
    #[serde(default)]
    pub release_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub ai_mastering: bool,
    #[serde(default, with = "super::json_text")]
    pub metadata: Map<String, Value>,
}

impl Track {
    #[must_use]
    pub fn new(id: ObjectId, artist_id: &str, draft: TrackDraft) -> Self {
        Self {
            id: id.record_id(TABLE_NAME),
            artist_id: artist_id.to_owned(),
            title: draft.title,
            primary_artist: draft.primary_artist,
            featuring: draft.featuring,
            isrc: draft.isrc,
            upc: draft.upc,
            explicit: draft.explicit,
            genre: draft.genre,
            mood: draft.mood,
            cover_url: draft.cover_url,
            audio_url: draft.audio_url,
            release_date: draft.release_date,
            status: draft.status,
            ai_mastering: draft.ai_mastering,
            metadata: draft.metadata,
        }
    }
}

/// The outbound representation of a [`Track`]: the stored fields plus its `id` as a string.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackView {
    pub id: ObjectId,
    pub artist_id: String,
    #[serde(flatten)]
    pub track: TrackDraft,
}

impl TryFrom<Track> for TrackView {
    type Error = Error;

    fn try_from(track: Track) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ObjectId::try_from(&track.id)?,
            artist_id: track.artist_id,
            track: TrackDraft {
                title: track.title,
                primary_artist: track.primary_artist,
                featuring: track.featuring,
                isrc: track.isrc,
                upc: track.upc,
                explicit: track.explicit,
                genre: track.genre,
                mood: track.mood,
                cover_url: track.cover_url,
                audio_url: track.audio_url,
                release_date: track.release_date,
                status: track.status,
                ai_mastering: track.ai_mastering,
                metadata: track.metadata,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schemas::payload::Reason;

    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    #[test]
    fn test_minimal_payload_gets_defaults() {
        let draft = TrackDraft::from_payload(&json!({"title": "Nova", "primary_artist": "Aria"}))
            .unwrap();
        assert_eq!(
            draft,
            TrackDraft {
                title: "Nova".into(),
                primary_artist: "Aria".into(),
                featuring: vec![],
                isrc: None,
                upc: None,
                explicit: false,
                genre: None,
                mood: None,
                cover_url: None,
                audio_url: None,
                release_date: None,
                status: Status::Draft,
                ai_mastering: false,
                metadata: Map::new(),
            }
        );
    }

    #[test]
    fn test_full_payload() {
        let draft = TrackDraft::from_payload(&json!({
            "title": "Nova",
            "primary_artist": "Aria",
            "featuring": ["Bex", "Cato"],
            "isrc": "USRC17607839",
            "explicit": true,
            "genre": "synthwave",
            "release_date": "2025-03-01",
            "status": "scheduled",
            "ai_mastering": true,
            "metadata": {"bpm": 120, "key": "Am"},
        }))
        .unwrap();
        assert_eq!(draft.featuring, vec!["Bex".to_owned(), "Cato".to_owned()]);
        assert_eq!(draft.isrc.as_deref(), Some("USRC17607839"));
        assert!(draft.explicit);
        assert!(draft.ai_mastering);
        assert_eq!(draft.status, Status::Scheduled);
        assert_eq!(
            draft.release_date.map(|d| d.to_rfc3339()),
            Some("2025-03-01T00:00:00+00:00".to_owned())
        );
        assert_eq!(draft.metadata.get("bpm"), Some(&json!(120)));
    }

    #[test]
    fn test_client_supplied_ids_are_ignored() {
        let draft = TrackDraft::from_payload(&json!({
            "title": "Nova",
            "primary_artist": "Aria",
            "artist_id": "someone-else",
            "id": "65a1b2c3d4e5f60718293a4b",
        }))
        .unwrap();
        let view = TrackView::try_from(Track::new(ObjectId::new(), "a1", draft)).unwrap();
        assert_eq!(view.artist_id, "a1");
        assert_ne!(view.id.to_string(), "65a1b2c3d4e5f60718293a4b");
    }

    #[rstest]
    #[case::missing_title(json!({"primary_artist": "Aria"}), vec!["title"])]
    #[case::missing_both(json!({}), vec!["title", "primary_artist"])]
    #[case::explicit_not_bool(json!({"title": "Nova", "primary_artist": "Aria", "explicit": "true"}), vec!["explicit"])]
    #[case::status_out_of_set(json!({"title": "Nova", "primary_artist": "Aria", "status": "live"}), vec!["status"])]
    fn test_invalid_payloads(#[case] payload: Value, #[case] fields: Vec<&str>) {
        let err = TrackDraft::from_payload(&payload).unwrap_err();
        assert_eq!(err.field_names(), fields);
    }

    #[test]
    fn test_explicit_wrong_type_reason() {
        let err = TrackDraft::from_payload(&json!({
            "title": "Nova", "primary_artist": "Aria", "explicit": 1
        }))
        .unwrap_err();
        assert_eq!(err.fields[0].reason, Reason::ExpectedBoolean);
    }

    #[test]
    fn test_view_serializes_flat_with_string_id() {
        let id: ObjectId = "65a1b2c3d4e5f60718293a4b".parse().unwrap();
        let draft = TrackDraft::from_payload(&json!({"title": "Nova", "primary_artist": "Aria"}))
            .unwrap();
        let view = TrackView::try_from(Track::new(id, "a1", draft)).unwrap();
        assert_eq!(
            serde_json::to_value(&view).unwrap(),
            json!({
                "id": "65a1b2c3d4e5f60718293a4b",
                "artist_id": "a1",
                "title": "Nova",
                "primary_artist": "Aria",
                "featuring": [],
                "isrc": null,
                "upc": null,
                "explicit": false,
                "genre": null,
                "mood": null,
                "cover_url": null,
                "audio_url": null,
                "release_date": null,
                "status": "draft",
                "ai_mastering": false,
                "metadata": {},
            })
        );
    }
}

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use surrealdb::RecordId;

use super::{
    id::ObjectId,
    payload::{PayloadReader, ValidationError},
};
use crate::errors::Error;

pub type ArtistId = RecordId;

pub const TABLE_NAME: &str = "artist";

/// The fields of an [`Artist`] profile that a client controls.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistDraft {
    pub stage_name: String,
    /// The platform user this profile belongs to, if any.
    pub user_id: Option<String>,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    /// e.g. `{"instagram": "https://..."}`
    pub socials: Map<String, Value>,
    /// Links to the artist on digital service providers (Spotify, Apple Music, ...).
    pub dsps: Map<String, Value>,
}

impl ArtistDraft {
    /// # Errors
    ///
    /// Fails with every field that is missing or has the wrong type.
    pub fn from_payload(payload: &Value) -> Result<Self, ValidationError> {
        let mut reader = PayloadReader::new(payload)?;
        let draft = Self {
            stage_name: reader.required_string("stage_name"),
            user_id: reader.optional_string("user_id"),
            avatar_url: reader.optional_string("avatar_url"),
            bio: reader.optional_string("bio"),
            socials: reader.nullable_object("socials"),
            dsps: reader.nullable_object("dsps"),
        };
        reader.finish(draft)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artist {
    pub id: ArtistId,
    pub stage_name: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default, with = "super::json_text")]
    pub socials: Map<String, Value>,
    #[serde(default, with = "super::json_text")]
    pub dsps: Map<String, Value>,
}

impl Artist {
    #[must_use]
    pub fn new(id: ObjectId, draft: ArtistDraft) -> Self {
        Self {
            id: id.record_id(TABLE_NAME),
            stage_name: draft.stage_name,
            user_id: draft.user_id,
            avatar_url: draft.avatar_url,
            bio: draft.bio,
            socials: draft.socials,
            dsps: draft.dsps,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistView {
    pub id: ObjectId,
    #[serde(flatten)]
    pub artist: ArtistDraft,
}

impl TryFrom<Artist> for ArtistView {
    type Error = Error;

    fn try_from(artist: Artist) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ObjectId::try_from(&artist.id)?,
            artist: ArtistDraft {
                stage_name: artist.stage_name,
                user_id: artist.user_id,
                avatar_url: artist.avatar_url,
                bio: artist.bio,
                socials: artist.socials,
                dsps: artist.dsps,
            },
        })
    }
}

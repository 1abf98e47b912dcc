//! The object identifier used as the primary key of every record.
//!
//! Documents are stored under the record id `<table>:⟨hex⟩`, but outside of the storage
//! layer an identifier is only ever handled as its 24 character hexadecimal form.
use std::{
    fmt,
    str::FromStr,
    sync::atomic::{AtomicU32, Ordering},
};

use data_encoding::{HEXLOWER, HEXLOWER_PERMISSIVE};
use once_cell::sync::Lazy;
use surrealdb::RecordId;

use crate::errors::Error;

/// Random value fixed for the lifetime of the process.
static PROCESS_UNIQUE: Lazy<[u8; 5]> = Lazy::new(rand::random);

/// Incrementing counter, seeded with a random value.
static COUNTER: Lazy<AtomicU32> = Lazy::new(|| AtomicU32::new(rand::random::<u32>() & MAX_COUNTER));

const MAX_COUNTER: u32 = 0x00FF_FFFF;

/// A 12 byte identifier.
///
/// Layout:
/// - 4 bytes: big-endian seconds since the unix epoch
/// - 5 bytes: random value unique to this process
/// - 3 bytes: big-endian counter, wrapping
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId([u8; 12]);

impl ObjectId {
    #[must_use]
    pub fn new() -> Self {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let timestamp = chrono::Utc::now().timestamp() as u32;
        let counter = COUNTER.fetch_add(1, Ordering::Relaxed) & MAX_COUNTER;
        Self::from_parts(timestamp, *PROCESS_UNIQUE, counter)
    }

    #[must_use]
    pub const fn from_bytes(bytes: [u8; 12]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub const fn bytes(&self) -> [u8; 12] {
        self.0
    }

    /// Seconds since the unix epoch at which this id was generated.
    #[must_use]
    pub const fn timestamp(&self) -> u32 {
        u32::from_be_bytes([self.0[0], self.0[1], self.0[2], self.0[3]])
    }

    fn from_parts(timestamp: u32, process: [u8; 5], counter: u32) -> Self {
        let mut bytes = [0u8; 12];
        bytes[..4].copy_from_slice(&timestamp.to_be_bytes());
        bytes[4..9].copy_from_slice(&process);
        bytes[9..].copy_from_slice(&counter.to_be_bytes()[1..]);
        Self(bytes)
    }

    /// The record id of the document with this key in `table`.
    #[must_use]
    pub fn record_id(&self, table: &str) -> RecordId {
        RecordId::from_table_key(table, self.to_string())
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&HEXLOWER.encode(&self.0))
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({self})")
    }
}

impl FromStr for ObjectId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 24 {
            return Err(Error::InvalidIdentifier(s.to_owned()));
        }
        let decoded = HEXLOWER_PERMISSIVE
            .decode(s.as_bytes())
            .map_err(|_| Error::InvalidIdentifier(s.to_owned()))?;
        let bytes: [u8; 12] = decoded
            .try_into()
            .map_err(|_| Error::InvalidIdentifier(s.to_owned()))?;
        Ok(Self(bytes))
    }
}

impl TryFrom<&RecordId> for ObjectId {
    type Error = Error;

    /// Stored keys are written by [`ObjectId::record_id`], so any other shape is
    /// [`Error::MalformedKey`] rather than a client error.
    fn try_from(record: &RecordId) -> Result<Self, Self::Error> {
        match record.key().clone().into_inner() {
            surrealdb::sql::Id::String(key) => key
                .parse()
                .map_err(|_| Error::MalformedKey(record.to_string())),
            _ => Err(Error::MalformedKey(record.to_string())),
        }
    }
}

impl serde::Serialize for ObjectId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for ObjectId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

//! The record kinds stored by AURCA, and the pieces shared between them.
#![allow(clippy::module_name_repetitions)]

pub mod artist;
pub mod id;
pub mod json_text;
pub mod payload;
pub mod release;
pub mod status;
pub mod track;

/// Every table known to the storage layer, in the order they are registered.
pub const COLLECTIONS: [&str; 3] = [artist::TABLE_NAME, track::TABLE_NAME, release::TABLE_NAME];

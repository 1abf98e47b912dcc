use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Publication status shared by tracks and releases.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Display,
    PartialEq,
    Eq,
    Hash,
    Deserialize,
    Serialize,
    EnumIter,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Status {
    #[default]
    Draft,
    Scheduled,
    Released,
    Archived,
}

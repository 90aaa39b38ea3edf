use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// identifier of an OSM way. used as the feature id of classified, buffered
/// and hex-indexed outputs.
#[derive(
    Debug, Default, Clone, Copy, Eq, PartialEq, PartialOrd, Ord, Deserialize, Serialize, Hash,
)]
pub struct OsmWayId(pub i64);

impl Display for OsmWayId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for OsmWayId {
    fn from(value: i64) -> Self {
        OsmWayId(value)
    }
}

use geo::{Coord, Point};
use serde::{Deserialize, Serialize};

use super::OsmNodeId;

/// a node carrying a `highway` tag, retained for the node layer output.
/// nodes without a `highway` tag are only kept as coordinates for
/// resolving way geometries.
#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OsmNodeData {
    pub osmid: OsmNodeId,
    pub x: f64,
    pub y: f64,
    pub highway: String,
    pub traffic_signals: bool,
}

impl OsmNodeData {
    pub const TRAFFIC_SIGNALS: &'static str = "traffic_signals";

    pub fn new(osmid: OsmNodeId, coord: Coord<f64>, highway: &str) -> OsmNodeData {
        OsmNodeData {
            osmid,
            x: coord.x,
            y: coord.y,
            highway: String::from(highway),
            traffic_signals: highway == Self::TRAFFIC_SIGNALS,
        }
    }

    pub fn get_point(&self) -> Point<f64> {
        Point::new(self.x, self.y)
    }
}

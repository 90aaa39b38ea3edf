use super::{ClassifiedWay, OsmWayId, WayAttributes};
use geo::MultiPolygon;

/// a classified way whose centerline has been replaced by its road corridor
/// polygon, in geographic coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct BufferedWay {
    pub attributes: WayAttributes,
    pub width_m: f64,
    pub corridor: MultiPolygon<f64>,
}

impl BufferedWay {
    /// consumes the classified way. the centerline is dropped.
    pub fn new(way: ClassifiedWay, width_m: f64, corridor: MultiPolygon<f64>) -> BufferedWay {
        BufferedWay {
            attributes: way.attributes,
            width_m,
            corridor,
        }
    }

    pub fn osmid(&self) -> OsmWayId {
        self.attributes.osmid
    }
}

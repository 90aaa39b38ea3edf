use super::{osm_way_ops, OsmNodeId, OsmWayId};
use crate::model::{
    bike::{BikeCategory, BikeClassification, Side},
    osm::TagMap,
};
use geo::LineString;
use itertools::Itertools;

/// the attribute columns of an extracted way. the lane and width fields are
/// the only ones modified after extraction, by lane/width inference.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct WayAttributes {
    pub osmid: OsmWayId,
    pub nodes: Vec<OsmNodeId>,
    pub fclass: Option<String>,
    pub name: Option<String>,
    pub lane_markings: Option<String>,
    pub srvc_rd_typ: Option<String>,
    pub turn: Option<String>,
    pub maxspeed: Option<i64>,
    pub lanes_fwd: Option<i64>,
    pub lanes_bwd: Option<i64>,
    pub lanes_tot: Option<i64>,
    pub lanes_inferred: bool,
    pub surface: Option<String>,
    pub oneway: bool,
    pub bk_route: Option<String>,
    pub osmbk_left: Option<String>,
    pub osmbk_right: Option<String>,
    pub bkwid_left: Option<String>,
    pub bkwid_right: Option<String>,
    pub bkinf_left: Option<BikeCategory>,
    pub bkinf_right: Option<BikeCategory>,
    pub min_bk_inf: Option<BikeCategory>,
    pub max_bk_inf: Option<BikeCategory>,
    pub trf_signal: bool,
    /// the `width` tag as written, in feet
    pub width_tag: Option<f64>,
    /// carriageway width in meters, set once by lane/width inference
    pub width_m: Option<f64>,
    pub width_inferred: bool,
}

impl WayAttributes {
    pub fn new(
        osmid: OsmWayId,
        nodes: Vec<OsmNodeId>,
        tags: &TagMap,
        classification: BikeClassification,
        trf_signal: bool,
    ) -> WayAttributes {
        let oneway = osm_way_ops::is_one_way(tags);
        let BikeClassification {
            left_facility,
            right_facility,
            left,
            right,
            min,
            max,
        } = classification;
        WayAttributes {
            osmid,
            nodes,
            fclass: tags.get("highway").cloned(),
            name: tags.get("name").cloned(),
            lane_markings: tags.get("lane_markings").cloned(),
            srvc_rd_typ: tags.get("service").cloned(),
            turn: tags.get("turn").cloned(),
            maxspeed: tags
                .get("maxspeed")
                .and_then(|v| osm_way_ops::parse_digits(v)),
            lanes_fwd: osm_way_ops::directional_lanes(tags, "forward"),
            lanes_bwd: osm_way_ops::directional_lanes(tags, "backward"),
            lanes_tot: tags.get("lanes").and_then(|v| osm_way_ops::parse_digits(v)),
            lanes_inferred: false,
            surface: tags.get("surface").cloned(),
            oneway,
            bk_route: osm_way_ops::bicycle_route(tags),
            osmbk_left: left_facility,
            osmbk_right: right_facility,
            bkwid_left: osm_way_ops::bike_width(tags, &Side::Left.to_string()).map(String::from),
            bkwid_right: osm_way_ops::bike_width(tags, &Side::Right.to_string())
                .map(String::from),
            bkinf_left: left,
            bkinf_right: right,
            min_bk_inf: min,
            max_bk_inf: max,
            trf_signal,
            width_tag: tags.get("width").and_then(|v| osm_way_ops::width_feet(v)),
            width_m: None,
            width_inferred: false,
        }
    }

    /// the node ids as a comma-delimited list
    pub fn node_ids_string(&self) -> String {
        self.nodes.iter().join(", ")
    }
}

/// an included way with its classification and centerline geometry
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedWay {
    pub attributes: WayAttributes,
    pub centerline: LineString<f64>,
}

impl ClassifiedWay {
    pub fn new(attributes: WayAttributes, centerline: LineString<f64>) -> ClassifiedWay {
        ClassifiedWay {
            attributes,
            centerline,
        }
    }

    pub fn osmid(&self) -> OsmWayId {
        self.attributes.osmid
    }
}

#[cfg(test)]
mod tests {
    use super::WayAttributes;
    use crate::model::{
        bike::BikeClassification,
        osm::{
            feature::{OsmNodeId, OsmWayId},
            tag_map,
        },
    };

    #[test]
    fn test_attributes_from_tags() {
        let tags = tag_map(&[
            ("highway", "service"),
            ("service", "alley"),
            ("turn", "left|through"),
            ("lane_markings", "no"),
            ("lanes", "2"),
            ("maxspeed", "15 mph"),
            ("width", "3.5 m"),
        ]);
        let attributes = WayAttributes::new(
            OsmWayId(3),
            vec![OsmNodeId(1), OsmNodeId(2)],
            &tags,
            BikeClassification::default(),
            false,
        );
        assert_eq!(attributes.srvc_rd_typ.as_deref(), Some("alley"));
        assert_eq!(attributes.turn.as_deref(), Some("left|through"));
        assert_eq!(attributes.lane_markings.as_deref(), Some("no"));
        assert_eq!(attributes.maxspeed, Some(15));
        assert_eq!(attributes.lanes_fwd, Some(2));
        assert_eq!(attributes.lanes_bwd, Some(2));
        // a metric width is still read as feet
        assert_eq!(attributes.width_tag, Some(3.5));
        assert_eq!(attributes.node_ids_string(), "1, 2");
    }
}

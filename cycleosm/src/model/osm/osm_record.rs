use super::feature::{OsmNodeId, OsmWayId};
use std::collections::HashMap;

/// raw key/value attributes of an OSM element. keys are unique.
pub type TagMap = HashMap<String, String>;

/// an element of the ordered feature feed consumed by the streaming extractor.
/// within a single file, every node is expected to appear before any way that
/// references it.
#[derive(Debug, Clone)]
pub enum OsmRecord {
    Node {
        id: OsmNodeId,
        lon: f64,
        lat: f64,
        tags: TagMap,
    },
    Way {
        id: OsmWayId,
        refs: Vec<OsmNodeId>,
        tags: TagMap,
    },
}

impl OsmRecord {
    pub fn node(id: i64, lon: f64, lat: f64, tags: &[(&str, &str)]) -> OsmRecord {
        OsmRecord::Node {
            id: OsmNodeId(id),
            lon,
            lat,
            tags: tag_map(tags),
        }
    }

    pub fn way(id: i64, refs: &[i64], tags: &[(&str, &str)]) -> OsmRecord {
        OsmRecord::Way {
            id: OsmWayId(id),
            refs: refs.iter().map(|r| OsmNodeId(*r)).collect(),
            tags: tag_map(tags),
        }
    }
}

/// builds a [`TagMap`] from borrowed pairs, trimming values the same way
/// the pbf reader does.
pub fn tag_map(tags: &[(&str, &str)]) -> TagMap {
    tags.iter()
        .map(|(k, v)| (String::from(*k), String::from(v.trim())))
        .collect()
}

impl From<&osmpbf::elements::Node<'_>> for OsmRecord {
    fn from(node: &osmpbf::elements::Node) -> Self {
        OsmRecord::Node {
            id: OsmNodeId(node.id()),
            lon: node.lon(),
            lat: node.lat(),
            tags: node
                .tags()
                .map(|(k, v)| (String::from(k), String::from(v.trim())))
                .collect(),
        }
    }
}

impl From<&osmpbf::dense::DenseNode<'_>> for OsmRecord {
    fn from(node: &osmpbf::dense::DenseNode<'_>) -> Self {
        OsmRecord::Node {
            id: OsmNodeId(node.id()),
            lon: node.lon(),
            lat: node.lat(),
            tags: node
                .tags()
                .map(|(k, v)| (String::from(k), String::from(v.trim())))
                .collect(),
        }
    }
}

impl From<&osmpbf::elements::Way<'_>> for OsmRecord {
    fn from(way: &osmpbf::elements::Way) -> Self {
        OsmRecord::Way {
            id: OsmWayId(way.id()),
            refs: way.refs().map(OsmNodeId).collect(),
            tags: way
                .tags()
                .map(|(k, v)| (String::from(k), String::from(v.trim())))
                .collect(),
        }
    }
}

mod buffered_way;
pub mod fill_value_lookup;
pub mod osm_element_filter;
pub mod osm_node_data;
mod osm_node_id;
pub mod osm_way_data;
pub mod osm_way_ops;
mod osm_way_id;

pub use buffered_way::BufferedWay;
pub use fill_value_lookup::FillValueLookup;
pub use osm_element_filter::ElementFilter;
pub use osm_node_data::OsmNodeData;
pub use osm_node_id::OsmNodeId;
pub use osm_way_data::{ClassifiedWay, WayAttributes};
pub use osm_way_id::OsmWayId;

use geo::Coord;
use std::collections::{HashMap, HashSet};

pub type NodeLocations = HashMap<OsmNodeId, Coord<f64>>;
pub type SignalIdSet = HashSet<OsmNodeId>;

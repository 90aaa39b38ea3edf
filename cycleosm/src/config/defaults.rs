//! built-in tables used when the configuration does not name a file.
//! lane count and lane width tables have no defaults.

/// `highway` values retained by the extractor
pub const FUNCTIONAL_CLASSES: [&str; 24] = [
    "motorway",
    "motorway_link",
    "primary",
    "primary_link",
    "secondary",
    "secondary_link",
    "trunk",
    "trunk_link",
    "tertiary",
    "tertiary_link",
    "residential",
    "living_street",
    "bus_guideway",
    "busway",
    "road",
    "cycleway",
    "service",
    "path",
    "steps",
    "pedestrian",
    "footway",
    "sidewalk",
    "track",
    "unclassified",
];

/// cycleway values that do not describe a bike facility
pub const NON_FACILITIES: [&str; 12] = [
    "no",
    "none",
    "No",
    "None",
    "sidewalk",
    "Sidewalk",
    "noneno",
    "traffic_island",
    "link",
    "\\",
    "closed_lane",
    "unmarked_lane",
];

/// ordered from least protection to greatest protection
pub const PRECEDENCE: [(&str, &str); 33] = [
    ("proposed", "Proposed"),
    ("crossing", "Crossing"),
    ("asl", "Advanced Stop Line"),
    ("shoulder", "Shoulder"),
    ("shared_lane", "Shared Road"),
    ("opposite_share_busway", "Shared Road"),
    ("share_busway", "Shared Road"),
    ("on_street", "Shared Road"),
    ("shared_parking_lane", "Shared Road"),
    ("shared", "Shared Road"),
    ("lane", "Bike Lane"),
    ("lanes", "Bike Lane"),
    ("opposite_lane", "Bike Lane"),
    ("opposite", "Bike Lane"),
    ("designated", "Bike Lane"),
    ("both", "Bike Lane"),
    ("yes", "Bike Lane"),
    ("1", "Bike Lane"),
    ("5", "Bike Lane"),
    ("right", "Bike Lane"),
    ("left", "Bike Lane"),
    ("buffer", "Buffered Bike Lane"),
    ("buffered_lane", "Buffered Bike Lane"),
    ("track", "Protected Bike Lane"),
    ("opposite_track", "Protected Bike Lane"),
    ("lane=exlusive", "Protected Bike Lane"),
    ("lane=exclusive", "Protected Bike Lane"),
    ("protected lane", "Protected Bike Lane"),
    ("separate", "Shared Use Path"),
    ("sidepath", "Shared Use Path"),
    ("path", "Shared Use Path"),
    ("use_sidepath", "Shared Use Path"),
    ("cycleway", "Cycleway"),
];

pub fn precedence_rows() -> Vec<(String, String)> {
    PRECEDENCE
        .iter()
        .map(|(v, l)| (String::from(*v), String::from(*l)))
        .collect()
}

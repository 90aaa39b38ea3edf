mod lane_width_inference;

pub use lane_width_inference::{meters_from_feet, LaneWidthInferencer, FEET_PER_METER};

mod corridor;
mod road_buffer;
pub mod utm;

pub use corridor::{buffer_linestring, CapStyle, CIRCLE_SEGMENTS};
pub use road_buffer::{batch_centroid, buffer_way, buffer_ways, select_zone};
pub use utm::{UtmProjection, UtmZone};

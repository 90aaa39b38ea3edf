pub mod feature;
mod feature_issue;
mod osm_error;
mod osm_record;
pub mod pbf_reader;

pub use feature_issue::{FeatureIssue, IssueReport, PipelineStage};
pub use osm_error::OsmError;
pub use osm_record::{tag_map, OsmRecord, TagMap};

mod region_pipeline;
mod region_writer;

pub use region_pipeline::{
    process_extraction, process_regions, region_name, run_pbf_region, run_region, run_regions,
    RegionOutput, RegionResult, RegionSummary, RunOptions,
};
pub use region_writer::{filenames, NodeRow, RegionWriter, WayRow};

pub mod bike;
mod cycleosm_cli_error;
pub mod osm;

pub use cycleosm_cli_error::CycleOsmCliError;

use super::osm::OsmError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CycleOsmCliError {
    #[error("failure reading run configuration: {0}")]
    ConfigurationError(String),
    #[error("failure loading run tables: {source}")]
    OsmError {
        #[from]
        source: OsmError,
    },
    #[error("failure preparing output: {source}")]
    StdIoError {
        #[from]
        source: std::io::Error,
    },
    #[error("failure decoding JSON: {source}")]
    SerdeJsonError {
        #[from]
        source: serde_json::Error,
    },
    #[error("{failed} of {total} regions failed")]
    RegionsFailed { failed: usize, total: usize },
}

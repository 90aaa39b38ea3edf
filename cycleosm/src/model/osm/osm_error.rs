use thiserror::Error;

use super::feature::OsmWayId;

#[derive(Error, Debug)]
pub enum OsmError {
    #[error("invalid cycleosm configuration: {0}")]
    ConfigurationError(String),
    #[error("way '{0}' is malformed: {1}")]
    MalformedFeature(OsmWayId, String),
    #[error("unable to select a projection: {0}")]
    ProjectionError(String),
    #[error("failure reading .pbf file: {source}")]
    PbfLibError { source: osmpbf::Error },
    #[error("failure reading table {0}: {1}")]
    CsvReadError(String, csv::Error),
    #[error("failure writing to file {0}: {1}")]
    CsvWriteError(String, csv::Error),
    #[error("failure computing hex coverage for way '{0}': {1}")]
    HexCoverageError(OsmWayId, String),
    #[error("{0}")]
    InternalError(String),
}

impl OsmError {
    /// short label used to aggregate per-feature issues in batch reports
    pub fn kind(&self) -> &'static str {
        match self {
            OsmError::ConfigurationError(_) => "configuration",
            OsmError::MalformedFeature(_, _) => "malformed feature",
            OsmError::ProjectionError(_) => "projection",
            OsmError::PbfLibError { .. } => "pbf",
            OsmError::CsvReadError(_, _) => "csv read",
            OsmError::CsvWriteError(_, _) => "csv write",
            OsmError::HexCoverageError(_, _) => "hex coverage",
            OsmError::InternalError(_) => "internal",
        }
    }
}

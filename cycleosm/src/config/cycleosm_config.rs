use crate::{algorithm::buffer::CapStyle, model::CycleOsmCliError};
use serde::{Deserialize, Serialize};

/// defines behaviors for a cycleosm run. table files are headerless CSV.
/// the allowlist, precedence and non-facility tables fall back to built-in
/// defaults when not set.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct CycleOsmConfiguration {
    /// single column of accepted `highway` values
    pub functional_classes_file: Option<String>,
    /// ordered `value,label` rows, least to most protective
    pub precedence_file: Option<String>,
    /// single column of cycleway values that are not bike facilities
    pub non_facilities_file: Option<String>,
    /// `fclass,lanes` rows
    pub lanes_file: String,
    /// `fclass,width` rows, lane width in feet
    pub widths_file: String,
    #[serde(default = "default_resolutions")]
    pub resolutions: Vec<u8>,
    #[serde(default)]
    pub summary_resolutions: Vec<u8>,
    #[serde(default)]
    pub cap_style: CapStyle,
    /// worker count for concurrent regions. rayon's default when unset.
    pub parallelism: Option<usize>,
    #[serde(default = "default_true")]
    pub write_nodes: bool,
    #[serde(default)]
    pub overwrite: bool,
}

pub const DEFAULT_RESOLUTION: u8 = 13;

fn default_resolutions() -> Vec<u8> {
    vec![DEFAULT_RESOLUTION]
}

fn default_true() -> bool {
    true
}

impl TryFrom<&String> for CycleOsmConfiguration {
    type Error = CycleOsmCliError;

    fn try_from(f: &String) -> Result<Self, Self::Error> {
        if f.ends_with(".toml") {
            let s = std::fs::read_to_string(f).map_err(|e| {
                CycleOsmCliError::ConfigurationError(format!("failure reading {f}: {e}"))
            })?;
            toml::from_str(&s).map_err(|e| {
                CycleOsmCliError::ConfigurationError(format!("failure decoding {f}: {e}"))
            })
        } else if f.ends_with(".json") {
            let s = std::fs::read_to_string(f).map_err(|e| {
                CycleOsmCliError::ConfigurationError(format!("failure reading {f}: {e}"))
            })?;
            serde_json::from_str(&s).map_err(|e| {
                CycleOsmCliError::ConfigurationError(format!("failure decoding {f}: {e}"))
            })
        } else {
            Err(CycleOsmCliError::ConfigurationError(format!(
                "unsupported file type: {f}"
            )))
        }
    }
}

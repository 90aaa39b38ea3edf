use super::{BikeCategory, Side};
use std::fmt::Display;

/// the tag that produced a side's bike facility, in resolution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagSource {
    /// `cycleway:<side>:buffer`
    SideBuffer,
    /// `cycleway:<side>`
    Side,
    /// `cycleway:both:buffer`
    BothBuffer,
    /// `cycleway:both`
    Both,
    /// `cycleway`
    Unqualified,
    /// `oneway:bicycle`
    OnewayBicycle,
    /// the way itself is `highway=cycleway`
    HighwayCycleway,
}

impl TagSource {
    pub fn is_buffer(&self) -> bool {
        matches!(self, TagSource::SideBuffer | TagSource::BothBuffer)
    }

    /// the tag key read for this source, if any
    pub fn key(&self, side: Side) -> Option<String> {
        match self {
            TagSource::SideBuffer => Some(format!("cycleway:{side}:buffer")),
            TagSource::Side => Some(format!("cycleway:{side}")),
            TagSource::BothBuffer => Some(String::from("cycleway:both:buffer")),
            TagSource::Both => Some(String::from("cycleway:both")),
            TagSource::Unqualified => Some(String::from("cycleway")),
            TagSource::OnewayBicycle => Some(String::from("oneway:bicycle")),
            TagSource::HighwayCycleway => None,
        }
    }
}

impl Display for TagSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TagSource::SideBuffer => write!(f, "side buffer"),
            TagSource::Side => write!(f, "side"),
            TagSource::BothBuffer => write!(f, "both buffer"),
            TagSource::Both => write!(f, "both"),
            TagSource::Unqualified => write!(f, "cycleway"),
            TagSource::OnewayBicycle => write!(f, "oneway:bicycle"),
            TagSource::HighwayCycleway => write!(f, "highway=cycleway"),
        }
    }
}

/// the first tag that describes a bike facility on one side of a way
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SideMatch {
    pub source: TagSource,
    pub raw: String,
}

/// resolved bike infrastructure for a way
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BikeClassification {
    /// the matched tag value as written to `osmbk_left`
    pub left_facility: Option<String>,
    pub right_facility: Option<String>,
    pub left: Option<BikeCategory>,
    pub right: Option<BikeCategory>,
    pub min: Option<BikeCategory>,
    pub max: Option<BikeCategory>,
}

mod hex_coverage;

pub use hex_coverage::{
    cover_polygon, FeatureCoverage, HexCell, HexCoverage, HexIndexer, ResolutionCoverage,
};

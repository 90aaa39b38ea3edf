use crate::model::osm::{
    feature::{BufferedWay, OsmWayId},
    IssueReport, OsmError, PipelineStage,
};
use geo::MultiPolygon;
use h3o::{
    geom::{ContainmentMode, TilerBuilder},
    CellIndex, Resolution,
};
use itertools::Itertools;
use kdam::tqdm;
use std::collections::BTreeSet;

/// one grid cell covering a feature's corridor, with its ancestors at each
/// summary resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HexCell {
    pub osmid: OsmWayId,
    pub cell: CellIndex,
    pub resolution: Resolution,
    pub parents: Vec<Option<CellIndex>>,
}

/// the cells of every feature at one resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionCoverage {
    pub resolution: Resolution,
    pub cells: Vec<HexCell>,
}

/// a feature's cells at every target resolution, in target resolution order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureCoverage {
    pub osmid: OsmWayId,
    pub cells: Vec<Vec<HexCell>>,
}

/// hex coverage of a region at all target resolutions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HexCoverage {
    pub summary_resolutions: Vec<Resolution>,
    pub tables: Vec<ResolutionCoverage>,
}

impl HexCoverage {
    /// inner join of the resolution tables on feature id. a feature is kept
    /// only if it has cells at every resolution, so the join is empty when
    /// any resolution has no cells at all.
    pub fn join(&self) -> Vec<FeatureCoverage> {
        if let Some(empty) = self.tables.iter().find(|t| t.cells.is_empty()) {
            log::warn!(
                "no cells at resolution {}, hex coverage join is empty",
                empty.resolution
            );
            return vec![];
        }
        let grouped = self
            .tables
            .iter()
            .map(|t| t.cells.iter().cloned().into_group_map_by(|c| c.osmid))
            .collect::<Vec<_>>();
        let features: BTreeSet<OsmWayId> = match grouped.first() {
            Some(first) => first
                .keys()
                .filter(|id| grouped.iter().all(|g| g.contains_key(id)))
                .copied()
                .collect(),
            None => BTreeSet::new(),
        };
        features
            .into_iter()
            .map(|osmid| FeatureCoverage {
                osmid,
                cells: grouped
                    .iter()
                    .map(|g| g.get(&osmid).cloned().unwrap_or_default())
                    .collect(),
            })
            .collect()
    }

    /// the resolution tables restricted to features that survive the join
    pub fn joined_tables(&self) -> Vec<ResolutionCoverage> {
        let joined: BTreeSet<OsmWayId> = self.join().into_iter().map(|f| f.osmid).collect();
        self.tables
            .iter()
            .map(|t| ResolutionCoverage {
                resolution: t.resolution,
                cells: t
                    .cells
                    .iter()
                    .filter(|c| joined.contains(&c.osmid))
                    .cloned()
                    .collect(),
            })
            .collect()
    }
}

/// computes hex grid coverage of corridor polygons at a set of target
/// resolutions, with optional roll-up to coarser summary resolutions.
#[derive(Debug, Clone)]
pub struct HexIndexer {
    resolutions: Vec<Resolution>,
    summary_resolutions: Vec<Resolution>,
}

impl HexIndexer {
    pub fn new(resolutions: &[u8], summary_resolutions: &[u8]) -> Result<HexIndexer, OsmError> {
        let resolutions = parse_resolutions(resolutions)?;
        let summary_resolutions = parse_resolutions(summary_resolutions)?;
        let finest_summary = summary_resolutions.iter().max();
        let coarsest_target = resolutions.iter().min();
        match (finest_summary, coarsest_target) {
            (_, None) => Err(OsmError::ConfigurationError(String::from(
                "at least one hex resolution is required",
            ))),
            (Some(s), Some(t)) if s >= t => Err(OsmError::ConfigurationError(format!(
                "summary resolution {s} must be coarser than every target resolution, found target {t}"
            ))),
            _ => Ok(HexIndexer {
                resolutions,
                summary_resolutions,
            }),
        }
    }

    pub fn resolutions(&self) -> &[Resolution] {
        &self.resolutions
    }

    pub fn summary_resolutions(&self) -> &[Resolution] {
        &self.summary_resolutions
    }

    /// covers every buffered way at every target resolution. a way smaller
    /// than one cell has no cells at that resolution. a way whose polygon is
    /// rejected by the tiler is recorded in `issues`.
    pub fn index_ways(&self, ways: &[BufferedWay], issues: &mut IssueReport) -> HexCoverage {
        let mut tables = Vec::with_capacity(self.resolutions.len());
        for resolution in self.resolutions.iter() {
            let desc = format!("hex coverage at resolution {resolution}");
            let mut cells = vec![];
            let mut uncovered: usize = 0;
            for way in tqdm!(ways.iter(), desc = desc, total = ways.len()) {
                match cover_polygon(&way.corridor, *resolution) {
                    Ok(covering) if covering.is_empty() => {
                        log::debug!(
                            "way {} is smaller than one resolution {resolution} cell",
                            way.osmid()
                        );
                        uncovered += 1;
                    }
                    Ok(covering) => cells.extend(
                        covering
                            .into_iter()
                            .map(|cell| self.hex_cell(way.osmid(), cell, *resolution)),
                    ),
                    Err(e) => issues.push(
                        PipelineStage::Index,
                        OsmError::HexCoverageError(way.osmid(), e),
                    ),
                }
            }
            eprintln!();
            log::info!(
                "{} cells at resolution {resolution}, {uncovered} ways too small to cover",
                cells.len()
            );
            tables.push(ResolutionCoverage {
                resolution: *resolution,
                cells,
            });
        }
        HexCoverage {
            summary_resolutions: self.summary_resolutions.clone(),
            tables,
        }
    }

    fn hex_cell(&self, osmid: OsmWayId, cell: CellIndex, resolution: Resolution) -> HexCell {
        HexCell {
            osmid,
            cell,
            resolution,
            parents: self
                .summary_resolutions
                .iter()
                .map(|r| cell.parent(*r))
                .collect(),
        }
    }
}

/// the cells whose centroids fall inside the polygon
pub fn cover_polygon(
    corridor: &MultiPolygon<f64>,
    resolution: Resolution,
) -> Result<BTreeSet<CellIndex>, String> {
    let mut tiler = TilerBuilder::new(resolution)
        .containment_mode(ContainmentMode::ContainsCentroid)
        .build();
    for polygon in corridor.0.iter() {
        tiler
            .add(polygon.clone())
            .map_err(|e| format!("failure adding polygon to h3 tiler: {e}"))?;
    }
    Ok(tiler.into_coverage().collect())
}

/// validates, sorts and de-duplicates resolution numbers
fn parse_resolutions(values: &[u8]) -> Result<Vec<Resolution>, OsmError> {
    let parsed = values
        .iter()
        .map(|v| {
            Resolution::try_from(*v).map_err(|e| {
                OsmError::ConfigurationError(format!("invalid hex resolution {v}: {e}"))
            })
        })
        .collect::<Result<BTreeSet<_>, _>>()?;
    Ok(parsed.into_iter().collect())
}

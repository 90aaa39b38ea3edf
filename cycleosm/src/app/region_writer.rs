use super::RegionOutput;
use crate::model::{
    bike::BikeCategory,
    osm::{
        feature::{BufferedWay, OsmNodeData, OsmNodeId, OsmWayId},
        OsmError,
    },
};
use csv::QuoteStyle;
use flate2::{write::GzEncoder, Compression};
use kdam::tqdm;
use serde::Serialize;
use std::{fs::File, path::Path};
use wkt::ToWkt;

pub trait RegionWriter {
    /// writes the ways, nodes and hex coverage tables of a region as
    /// gzipped CSV files in a shared directory.
    fn write_region(
        &self,
        output_directory: &Path,
        overwrite: bool,
        write_nodes: bool,
    ) -> Result<(), OsmError>;
}

pub mod filenames {
    pub const WAYS: &str = "ways.csv.gz";
    pub const NODES: &str = "nodes.csv.gz";

    pub fn hex(resolution: h3o::Resolution) -> String {
        format!("h3-r{}.csv.gz", u8::from(resolution))
    }
}

/// one row of the ways table
#[derive(Serialize, Debug, Clone)]
pub struct WayRow {
    pub osmid: OsmWayId,
    pub nodes: String,
    pub fclass: Option<String>,
    pub name: Option<String>,
    pub lane_markings: Option<String>,
    pub srvc_rd_typ: Option<String>,
    pub turn: Option<String>,
    pub maxspeed: Option<i64>,
    pub lanes_fwd: Option<i64>,
    pub lanes_bwd: Option<i64>,
    pub lanes_tot: Option<i64>,
    pub lanes_inferred: bool,
    pub surface: Option<String>,
    pub oneway: bool,
    pub bk_route: Option<String>,
    pub osmbk_left: Option<String>,
    pub osmbk_right: Option<String>,
    pub bkwid_left: Option<String>,
    pub bkwid_right: Option<String>,
    pub bkinf_left: Option<BikeCategory>,
    pub bkinf_right: Option<BikeCategory>,
    pub min_bk_inf: Option<BikeCategory>,
    pub max_bk_inf: Option<BikeCategory>,
    pub trf_signal: bool,
    pub width_m: f64,
    pub width_inferred: bool,
    pub geometry: String,
}

impl From<&BufferedWay> for WayRow {
    fn from(way: &BufferedWay) -> Self {
        let a = &way.attributes;
        WayRow {
            osmid: a.osmid,
            nodes: a.node_ids_string(),
            fclass: a.fclass.clone(),
            name: a.name.clone(),
            lane_markings: a.lane_markings.clone(),
            srvc_rd_typ: a.srvc_rd_typ.clone(),
            turn: a.turn.clone(),
            maxspeed: a.maxspeed,
            lanes_fwd: a.lanes_fwd,
            lanes_bwd: a.lanes_bwd,
            lanes_tot: a.lanes_tot,
            lanes_inferred: a.lanes_inferred,
            surface: a.surface.clone(),
            oneway: a.oneway,
            bk_route: a.bk_route.clone(),
            osmbk_left: a.osmbk_left.clone(),
            osmbk_right: a.osmbk_right.clone(),
            bkwid_left: a.bkwid_left.clone(),
            bkwid_right: a.bkwid_right.clone(),
            bkinf_left: a.bkinf_left.clone(),
            bkinf_right: a.bkinf_right.clone(),
            min_bk_inf: a.min_bk_inf.clone(),
            max_bk_inf: a.max_bk_inf.clone(),
            trf_signal: a.trf_signal,
            width_m: way.width_m,
            width_inferred: a.width_inferred,
            geometry: way.corridor.to_wkt().to_string(),
        }
    }
}

/// one row of the nodes table
#[derive(Serialize, Debug, Clone)]
pub struct NodeRow {
    pub osmid: OsmNodeId,
    pub highway: String,
    pub traffic_signals: bool,
    pub geometry: String,
}

impl From<&OsmNodeData> for NodeRow {
    fn from(node: &OsmNodeData) -> Self {
        NodeRow {
            osmid: node.osmid,
            highway: node.highway.clone(),
            traffic_signals: node.traffic_signals,
            geometry: node.get_point().to_wkt().to_string(),
        }
    }
}

impl RegionWriter for RegionOutput {
    fn write_region(
        &self,
        output_directory: &Path,
        overwrite: bool,
        write_nodes: bool,
    ) -> Result<(), OsmError> {
        if !output_directory.is_dir() {
            std::fs::create_dir_all(output_directory).map_err(|e| {
                OsmError::InternalError(format!(
                    "unable to create directory {}: {e}",
                    output_directory.to_string_lossy()
                ))
            })?;
        }

        if let Some(mut writer) = create_writer(
            output_directory,
            filenames::WAYS,
            true,
            QuoteStyle::Necessary,
            overwrite,
        )? {
            let way_iter = tqdm!(
                self.ways.iter(),
                total = self.ways.len(),
                desc = "write ways dataset"
            );
            for way in way_iter {
                writer
                    .serialize(WayRow::from(way))
                    .map_err(|e| OsmError::CsvWriteError(String::from(filenames::WAYS), e))?;
            }
            eprintln!();
            flush(writer, filenames::WAYS)?;
        }

        if write_nodes {
            if let Some(mut writer) = create_writer(
                output_directory,
                filenames::NODES,
                true,
                QuoteStyle::Necessary,
                overwrite,
            )? {
                for node in self.nodes.iter() {
                    writer
                        .serialize(NodeRow::from(node))
                        .map_err(|e| OsmError::CsvWriteError(String::from(filenames::NODES), e))?;
                }
                flush(writer, filenames::NODES)?;
            }
        }

        let summary_columns = self
            .hex
            .summary_resolutions
            .iter()
            .map(|r| format!("h3_r{}", u8::from(*r)))
            .collect::<Vec<_>>();
        for table in self.hex.joined_tables() {
            let filename = filenames::hex(table.resolution);
            let Some(mut writer) = create_writer(
                output_directory,
                &filename,
                false,
                QuoteStyle::Necessary,
                overwrite,
            )?
            else {
                continue;
            };
            let mut header = vec![
                String::from("osmid"),
                format!("h3_r{}", u8::from(table.resolution)),
            ];
            header.extend(summary_columns.iter().cloned());
            writer
                .write_record(&header)
                .map_err(|e| OsmError::CsvWriteError(filename.clone(), e))?;
            for hex in table.cells.iter() {
                let mut record = vec![hex.osmid.to_string(), hex.cell.to_string()];
                record.extend(
                    hex.parents
                        .iter()
                        .map(|p| p.map(|c| c.to_string()).unwrap_or_default()),
                );
                writer
                    .write_record(&record)
                    .map_err(|e| OsmError::CsvWriteError(filename.clone(), e))?;
            }
            flush(writer, &filename)?;
        }
        Ok(())
    }
}

/// helper function to build a gzipped CSV file writer while respecting the
/// user's overwrite preference. returns None when the file exists and should
/// not be overwritten.
fn create_writer(
    directory: &Path,
    filename: &str,
    has_headers: bool,
    quote_style: QuoteStyle,
    overwrite: bool,
) -> Result<Option<csv::Writer<GzEncoder<File>>>, OsmError> {
    let filepath = directory.join(filename);
    if filepath.exists() && !overwrite {
        log::warn!(
            "{} exists and overwrite is disabled, skipping",
            filepath.to_string_lossy()
        );
        return Ok(None);
    }
    let file = File::create(&filepath).map_err(|e| {
        OsmError::InternalError(format!(
            "unable to create file {}: {e}",
            filepath.to_string_lossy()
        ))
    })?;
    let buffer = GzEncoder::new(file, Compression::default());
    let writer = csv::WriterBuilder::new()
        .has_headers(has_headers)
        .quote_style(quote_style)
        .from_writer(buffer);
    Ok(Some(writer))
}

/// flushes the CSV buffer and completes the gzip stream
fn flush(writer: csv::Writer<GzEncoder<File>>, filename: &str) -> Result<(), OsmError> {
    let encoder = writer.into_inner().map_err(|e| {
        OsmError::InternalError(format!("failure flushing {filename}: {}", e.error()))
    })?;
    encoder
        .finish()
        .map_err(|e| OsmError::InternalError(format!("failure finishing {filename}: {e}")))?;
    Ok(())
}

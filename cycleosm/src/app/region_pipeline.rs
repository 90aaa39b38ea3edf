use super::RegionWriter;
use crate::{
    algorithm::{
        buffer::{self, UtmZone},
        extraction::{Extraction, StreamingExtractor},
        hex::HexCoverage,
    },
    config::CycleOsmContext,
    model::osm::{
        feature::{BufferedWay, OsmNodeData},
        pbf_reader, IssueReport, OsmError, OsmRecord, PipelineStage,
    },
};
use rayon::prelude::*;
use std::{
    path::{Path, PathBuf},
    time::Instant,
};

/// everything produced for one region file
#[derive(Debug)]
pub struct RegionOutput {
    pub name: String,
    pub zone: UtmZone,
    pub nodes: Vec<OsmNodeData>,
    pub ways: Vec<BufferedWay>,
    pub hex: HexCoverage,
    pub issues: IssueReport,
}

/// outcome of a region processed by [`process_regions`]
#[derive(Debug)]
pub struct RegionResult {
    pub pbf_file: PathBuf,
    pub output: Result<RegionSummary, OsmError>,
}

/// counts reported for a completed region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionSummary {
    pub name: String,
    pub ways: usize,
    pub nodes: usize,
    pub cells: usize,
    pub issues: usize,
}

impl From<&RegionOutput> for RegionSummary {
    fn from(output: &RegionOutput) -> Self {
        RegionSummary {
            name: output.name.clone(),
            ways: output.ways.len(),
            nodes: output.nodes.len(),
            cells: output.hex.tables.iter().map(|t| t.cells.len()).sum(),
            issues: output.issues.len(),
        }
    }
}

/// options of a run that are not part of the shared context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    pub parallelism: Option<usize>,
    pub write_nodes: bool,
    pub overwrite: bool,
}

/// runs an in-memory feed of records through extraction, inference,
/// buffering and hex indexing.
pub fn run_region<I>(name: &str, records: I, context: &CycleOsmContext) -> Result<RegionOutput, OsmError>
where
    I: IntoIterator<Item = OsmRecord>,
{
    let mut extractor = StreamingExtractor::new(&context.element_filter, &context.classifier);
    for record in records {
        extractor.accept(record);
    }
    process_extraction(name, extractor.finish(), context)
}

/// runs a .pbf file through extraction, inference, buffering and hex indexing.
/// the file is streamed into the extractor without materializing its records.
pub fn run_pbf_region(pbf_file: &Path, context: &CycleOsmContext) -> Result<RegionOutput, OsmError> {
    let name = region_name(pbf_file);
    let mut extractor = StreamingExtractor::new(&context.element_filter, &context.classifier);
    let _ = pbf_reader::read_pbf(pbf_file, |record| extractor.accept(record))?;
    process_extraction(&name, extractor.finish(), context)
}

/// the stages that follow extraction. each stage runs on the complete output
/// of the previous stage.
pub fn process_extraction(
    name: &str,
    extraction: Extraction,
    context: &CycleOsmContext,
) -> Result<RegionOutput, OsmError> {
    let Extraction {
        nodes,
        ways,
        mut issues,
        ..
    } = extraction;

    let mut inferred = Vec::with_capacity(ways.len());
    for mut way in ways.into_iter() {
        match context.inferencer.infer(&mut way.attributes) {
            Ok(()) => inferred.push(way),
            Err(e) => issues.push(PipelineStage::Infer, e),
        }
    }
    log::info!("{name}: lanes and widths set for {} ways", inferred.len());

    let (zone, buffered) = buffer::buffer_ways(inferred, context.cap_style, &mut issues)?;
    let hex = context.hex_indexer.index_ways(&buffered, &mut issues);
    issues.log_summary(name);

    Ok(RegionOutput {
        name: String::from(name),
        zone,
        nodes,
        ways: buffered,
        hex,
        issues,
    })
}

/// processes region files concurrently on a bounded worker pool. each region
/// is written to its own directory under `output_directory`. a failing region
/// is logged and reported in its result without affecting the others.
pub fn process_regions(
    pbf_files: &[PathBuf],
    output_directory: &Path,
    context: &CycleOsmContext,
    options: &RunOptions,
) -> Result<Vec<RegionResult>, OsmError> {
    run_regions(pbf_files, options.parallelism, |pbf_file| {
        process_region_file(pbf_file, output_directory, context, options)
    })
}

/// runs `runner` once per region file on a pool of `parallelism` workers,
/// collecting one result per file in input order.
pub fn run_regions<F>(
    pbf_files: &[PathBuf],
    parallelism: Option<usize>,
    runner: F,
) -> Result<Vec<RegionResult>, OsmError>
where
    F: Fn(&Path) -> Result<RegionSummary, OsmError> + Sync,
{
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = parallelism {
        builder = builder.num_threads(n);
    }
    let pool = builder
        .build()
        .map_err(|e| OsmError::InternalError(format!("failure building worker pool: {e}")))?;
    log::info!(
        "processing {} region files on {} workers",
        pbf_files.len(),
        pool.current_num_threads()
    );

    let results = pool.install(|| {
        pbf_files
            .par_iter()
            .map(|pbf_file| {
                let output = runner(pbf_file);
                if let Err(e) = &output {
                    log::error!("region {} failed: {e}", pbf_file.to_string_lossy());
                }
                RegionResult {
                    pbf_file: pbf_file.clone(),
                    output,
                }
            })
            .collect::<Vec<_>>()
    });
    Ok(results)
}

fn process_region_file(
    pbf_file: &Path,
    output_directory: &Path,
    context: &CycleOsmContext,
    options: &RunOptions,
) -> Result<RegionSummary, OsmError> {
    let start = Instant::now();
    let output = run_pbf_region(pbf_file, context)?;
    let region_directory = output_directory.join(&output.name);
    output.write_region(&region_directory, options.overwrite, options.write_nodes)?;
    let summary = RegionSummary::from(&output);
    log::info!(
        "{} finished in {:.2} minutes: {} ways, {} cells, {} issues",
        summary.name,
        start.elapsed().as_secs_f64() / 60.0,
        summary.ways,
        summary.cells,
        summary.issues
    );
    Ok(summary)
}

/// the region name of a .pbf file, its file name without `.osm.pbf` or `.pbf`
pub fn region_name(pbf_file: &Path) -> String {
    let filename = pbf_file
        .file_name()
        .map(|f| f.to_string_lossy().to_string())
        .unwrap_or_default();
    let stem = filename
        .strip_suffix(".osm.pbf")
        .or_else(|| filename.strip_suffix(".pbf"))
        .unwrap_or(&filename);
    String::from(stem)
}

#[cfg(test)]
mod tests {
    use super::{process_regions, region_name, run_region, run_regions, RegionSummary, RunOptions};
    use crate::{
        algorithm::buffer::CapStyle,
        config::{defaults, CycleOsmContext, LookupTable},
        model::{
            bike::PrecedenceTable,
            osm::{feature::ElementFilter, OsmError, OsmRecord, PipelineStage},
        },
    };
    use std::{collections::HashSet, path::PathBuf};

    fn context() -> CycleOsmContext {
        let non_facilities: HashSet<String> = defaults::NON_FACILITIES
            .iter()
            .map(|v| String::from(*v))
            .collect();
        CycleOsmContext::new(
            ElementFilter::new(defaults::FUNCTIONAL_CLASSES).unwrap(),
            PrecedenceTable::new(defaults::precedence_rows()).unwrap(),
            non_facilities,
            &LookupTable::from_rows("lanes", [("residential", "1"), ("secondary", "2")]),
            &LookupTable::from_rows("widths", [("residential", "10"), ("secondary", "12")]),
            CapStyle::Flat,
            &[13],
            &[9],
        )
        .unwrap()
    }

    fn feed() -> Vec<OsmRecord> {
        vec![
            OsmRecord::node(1, -104.99, 39.74, &[]),
            OsmRecord::node(2, -104.99, 39.741, &[("highway", "traffic_signals")]),
            OsmRecord::node(3, -104.99, 39.742, &[]),
            OsmRecord::node(4, -104.985, 39.74, &[]),
            OsmRecord::node(5, -104.985, 39.742, &[]),
            OsmRecord::way(
                100,
                &[1, 2, 3],
                &[
                    ("highway", "secondary"),
                    ("oneway", "yes"),
                    ("cycleway:right", "lane"),
                    ("lanes", "1"),
                ],
            ),
            OsmRecord::way(101, &[4, 5], &[("highway", "residential")]),
            OsmRecord::way(102, &[4, 5], &[("highway", "bus_guideway")]),
        ]
    }

    #[test]
    fn test_run_region_end_to_end() {
        let ctx = context();
        let output = run_region("test", feed(), &ctx).unwrap();
        assert_eq!(output.zone.epsg(), 32613);
        assert_eq!(output.ways.len(), 2);
        assert_eq!(output.nodes.len(), 1);

        let secondary = &output.ways[0].attributes;
        assert_eq!(secondary.lanes_tot, Some(1));
        assert!(!secondary.lanes_inferred);
        assert!(secondary.trf_signal);
        assert_eq!(secondary.max_bk_inf.as_ref().map(|c| c.label.as_str()), Some("Bike Lane"));
        assert_eq!(secondary.min_bk_inf, secondary.max_bk_inf);

        let residential = &output.ways[1].attributes;
        assert_eq!(residential.lanes_tot, Some(2));
        assert_eq!(residential.width_m, Some(6.1));

        // bus_guideway has no lane width and no width tag
        assert_eq!(output.issues.len(), 1);
        assert_eq!(output.issues.issues()[0].stage, PipelineStage::Infer);

        assert!(!output.hex.tables[0].cells.is_empty());
        assert!(output.hex.tables[0].cells.iter().all(|c| c.parents[0].is_some()));
    }

    #[test]
    fn test_empty_region_is_projection_error() {
        let ctx = context();
        let records = vec![OsmRecord::node(1, -104.99, 39.74, &[])];
        let result = run_region("empty", records, &ctx);
        assert!(matches!(result, Err(OsmError::ProjectionError(_))));
    }

    #[test]
    fn test_failed_region_is_isolated() {
        let ctx = context();
        let dir = tempfile::tempdir().unwrap();
        let files = vec![
            PathBuf::from("/no/such/region-a.osm.pbf"),
            PathBuf::from("/no/such/region-b.osm.pbf"),
        ];
        let options = RunOptions {
            parallelism: Some(2),
            write_nodes: true,
            overwrite: false,
        };
        let results = process_regions(&files, dir.path(), &ctx, &options).unwrap();
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.output.is_err()));
    }

    #[test]
    fn test_failed_region_does_not_affect_sibling() {
        let ctx = context();
        let files = vec![PathBuf::from("empty.osm.pbf"), PathBuf::from("denver.osm.pbf")];
        let results = run_regions(&files, Some(2), |pbf_file| {
            let name = region_name(pbf_file);
            let records = if name == "empty" {
                vec![OsmRecord::node(1, -104.99, 39.74, &[])]
            } else {
                feed()
            };
            run_region(&name, records, &ctx).map(|output| RegionSummary::from(&output))
        })
        .unwrap();
        assert_eq!(results.len(), 2);
        assert!(matches!(results[0].output, Err(OsmError::ProjectionError(_))));
        let summary = results[1].output.as_ref().unwrap();
        assert_eq!(summary.name, "denver");
        assert_eq!(summary.ways, 2);
        assert_eq!(results.iter().filter(|r| r.output.is_ok()).count(), 1);
    }

    #[test]
    fn test_region_name() {
        assert_eq!(region_name(&PathBuf::from("/data/colorado-latest.osm.pbf")), "colorado-latest");
        assert_eq!(region_name(&PathBuf::from("delaware.pbf")), "delaware");
    }
}

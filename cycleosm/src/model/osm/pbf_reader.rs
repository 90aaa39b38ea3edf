use super::{OsmError, OsmRecord};
use kdam::{Bar, BarExt};
use osmpbf::{Element, ElementReader};
use std::path::Path;

/// reads a PBF file in file order, converting each node, dense node and way
/// into an [`OsmRecord`] handed to `sink`. relations are ignored.
///
/// # Arguments
///
/// * `filepath` - path to the .pbf file
/// * `sink` - consumer of records, called in file order
///
/// # Returns
///
/// the number of records passed to the sink
pub fn read_pbf(filepath: &Path, mut sink: impl FnMut(OsmRecord)) -> Result<usize, OsmError> {
    let reader =
        ElementReader::from_path(filepath).map_err(|e| OsmError::PbfLibError { source: e })?;

    let mut reader_bar = Bar::builder()
        .desc(filepath.to_string_lossy())
        .unit(" rows")
        .unit_scale(true)
        .build()
        .map_err(OsmError::InternalError)?;

    let mut records: usize = 0;
    reader
        .for_each(|e| {
            let record = match e {
                Element::Node(node) => Some(OsmRecord::from(&node)),
                // from documentation on DenseNode:
                // So, if you want to [pattern match on] `Node`, you also likely want to match [`DenseNode`].
                Element::DenseNode(dense) => Some(OsmRecord::from(&dense)),
                Element::Way(way) => Some(OsmRecord::from(&way)),
                Element::Relation(_) => None,
            };
            if let Some(r) = record {
                records += 1;
                sink(r);
            }
            let _ = reader_bar.update(1);
        })
        .map_err(|e| OsmError::PbfLibError { source: e })?;
    eprintln!();

    log::info!(
        "{} node and way records read from {}",
        records,
        filepath.to_string_lossy()
    );
    Ok(records)
}

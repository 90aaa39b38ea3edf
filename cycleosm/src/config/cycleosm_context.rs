use super::{defaults, CycleOsmConfiguration, LookupTable};
use crate::{
    algorithm::{
        buffer::CapStyle, classification::TagClassifier, hex::HexIndexer,
        inference::LaneWidthInferencer,
    },
    model::{
        bike::PrecedenceTable,
        osm::{
            feature::{ElementFilter, FillValueLookup},
            OsmError,
        },
    },
};
use std::{collections::HashSet, path::Path, sync::Arc};

/// the validated, immutable tables and settings of a run. built once before
/// any record is read and shared read-only by all region workers.
#[derive(Debug, Clone)]
pub struct CycleOsmContext {
    pub element_filter: ElementFilter,
    pub classifier: TagClassifier,
    pub inferencer: LaneWidthInferencer,
    pub cap_style: CapStyle,
    pub hex_indexer: HexIndexer,
}

impl CycleOsmContext {
    pub const LANES_FIELD: &'static str = "lanes";
    pub const WIDTH_FIELD: &'static str = "width";
    pub const FCLASS_FIELD: &'static str = "fclass";

    #[allow(clippy::too_many_arguments)]
    pub fn new(
        element_filter: ElementFilter,
        precedence: PrecedenceTable,
        non_facilities: HashSet<String>,
        lanes: &LookupTable,
        widths: &LookupTable,
        cap_style: CapStyle,
        resolutions: &[u8],
        summary_resolutions: &[u8],
    ) -> Result<CycleOsmContext, OsmError> {
        let lanes = FillValueLookup::new(lanes, Self::FCLASS_FIELD, Self::LANES_FIELD)?;
        let widths = FillValueLookup::new(widths, Self::FCLASS_FIELD, Self::WIDTH_FIELD)?;
        let inferencer = LaneWidthInferencer::new(lanes, widths)?;
        let classifier = TagClassifier::new(Arc::new(precedence), non_facilities);
        let hex_indexer = HexIndexer::new(resolutions, summary_resolutions)?;
        Ok(CycleOsmContext {
            element_filter,
            classifier,
            inferencer,
            cap_style,
            hex_indexer,
        })
    }
}

impl TryFrom<&CycleOsmConfiguration> for CycleOsmContext {
    type Error = OsmError;

    /// loads every table named by the configuration, falling back to the
    /// built-in tables where permitted.
    fn try_from(conf: &CycleOsmConfiguration) -> Result<Self, Self::Error> {
        let element_filter = match &conf.functional_classes_file {
            Some(f) => ElementFilter::new(LookupTable::read_list(Path::new(f))?.keys().cloned())?,
            None => ElementFilter::new(defaults::FUNCTIONAL_CLASSES)?,
        };
        let precedence = match &conf.precedence_file {
            Some(f) => PrecedenceTable::try_from_table(&LookupTable::read_pairs(Path::new(f))?)?,
            None => PrecedenceTable::new(defaults::precedence_rows())?,
        };
        let non_facilities: HashSet<String> = match &conf.non_facilities_file {
            Some(f) => LookupTable::read_list(Path::new(f))?.keys().cloned().collect(),
            None => defaults::NON_FACILITIES.iter().map(|v| String::from(*v)).collect(),
        };
        let lanes = LookupTable::read_pairs(Path::new(&conf.lanes_file))?;
        let widths = LookupTable::read_pairs(Path::new(&conf.widths_file))?;

        let context = CycleOsmContext::new(
            element_filter,
            precedence,
            non_facilities,
            &lanes,
            &widths,
            conf.cap_style,
            &conf.resolutions,
            &conf.summary_resolutions,
        )?;
        log::info!(
            "loaded {} functional classes, {} precedence rows, {} lane and {} width classes",
            context.element_filter.len(),
            context.classifier.precedence().len(),
            lanes.len(),
            widths.len()
        );
        Ok(context)
    }
}

#[cfg(test)]
mod tests {
    use super::CycleOsmContext;
    use crate::{algorithm::buffer::CapStyle, config::CycleOsmConfiguration};
    use std::io::Write;

    fn write_table(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn configuration(lanes_file: String, widths_file: String) -> CycleOsmConfiguration {
        CycleOsmConfiguration {
            functional_classes_file: None,
            precedence_file: None,
            non_facilities_file: None,
            lanes_file,
            widths_file,
            resolutions: vec![12, 13],
            summary_resolutions: vec![8],
            cap_style: CapStyle::Flat,
            parallelism: None,
            write_nodes: true,
            overwrite: false,
        }
    }

    #[test]
    fn test_load_with_default_tables() {
        let lanes = write_table("residential,1\nprimary,2\n");
        let widths = write_table("residential,10\nprimary,12\n");
        let conf = configuration(
            lanes.path().to_string_lossy().to_string(),
            widths.path().to_string_lossy().to_string(),
        );
        let context = CycleOsmContext::try_from(&conf).unwrap();
        assert_eq!(context.element_filter.len(), 24);
        assert_eq!(context.classifier.precedence().len(), 33);
        assert_eq!(context.hex_indexer.resolutions().len(), 2);
    }

    #[test]
    fn test_missing_lane_table_is_fatal() {
        let widths = write_table("residential,10\n");
        let conf = configuration(
            String::from("/no/such/lanes.csv"),
            widths.path().to_string_lossy().to_string(),
        );
        assert!(CycleOsmContext::try_from(&conf).is_err());
    }

    #[test]
    fn test_non_numeric_width_is_fatal() {
        let lanes = write_table("residential,1\n");
        let widths = write_table("residential,wide\n");
        let conf = configuration(
            lanes.path().to_string_lossy().to_string(),
            widths.path().to_string_lossy().to_string(),
        );
        assert!(CycleOsmContext::try_from(&conf).is_err());
    }

    #[test]
    fn test_summary_finer_than_target_is_fatal() {
        let lanes = write_table("residential,1\n");
        let widths = write_table("residential,10\n");
        let mut conf = configuration(
            lanes.path().to_string_lossy().to_string(),
            widths.path().to_string_lossy().to_string(),
        );
        conf.summary_resolutions = vec![14];
        assert!(CycleOsmContext::try_from(&conf).is_err());
    }
}

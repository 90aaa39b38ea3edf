use crate::{
    algorithm::classification::TagClassifier,
    model::osm::{
        feature::{
            ClassifiedWay, ElementFilter, NodeLocations, OsmNodeData, OsmNodeId, OsmWayId,
            SignalIdSet, WayAttributes,
        },
        IssueReport, OsmError, OsmRecord, PipelineStage, TagMap,
    },
};
use geo::{Coord, LineString};

/// the result of extracting one region
#[derive(Debug, Default)]
pub struct Extraction {
    pub signals: SignalIdSet,
    pub nodes: Vec<OsmNodeData>,
    pub ways: Vec<ClassifiedWay>,
    pub issues: IssueReport,
}

/// consumes an ordered feed of node and way records in a single pass. nodes
/// must precede the ways that reference them, which is the order of a PBF
/// file. node coordinates are kept so that way geometries can be resolved.
pub struct StreamingExtractor<'a> {
    filter: &'a ElementFilter,
    classifier: &'a TagClassifier,
    locations: NodeLocations,
    signals: SignalIdSet,
    nodes: Vec<OsmNodeData>,
    ways: Vec<ClassifiedWay>,
    issues: IssueReport,
    ways_seen: usize,
    late_nodes: usize,
}

impl<'a> StreamingExtractor<'a> {
    pub fn new(filter: &'a ElementFilter, classifier: &'a TagClassifier) -> StreamingExtractor<'a> {
        StreamingExtractor {
            filter,
            classifier,
            locations: NodeLocations::new(),
            signals: SignalIdSet::new(),
            nodes: vec![],
            ways: vec![],
            issues: IssueReport::default(),
            ways_seen: 0,
            late_nodes: 0,
        }
    }

    pub fn accept(&mut self, record: OsmRecord) {
        match record {
            OsmRecord::Node { id, lon, lat, tags } => {
                self.accept_node(id, Coord { x: lon, y: lat }, &tags)
            }
            OsmRecord::Way { id, refs, tags } => self.accept_way(id, refs, &tags),
        }
    }

    fn accept_node(&mut self, id: OsmNodeId, coord: Coord<f64>, tags: &TagMap) {
        if self.ways_seen > 0 {
            if self.late_nodes == 0 {
                log::warn!(
                    "node {id} arrived after {} ways, ways already extracted cannot see it",
                    self.ways_seen
                );
            }
            self.late_nodes += 1;
        }
        let _ = self.locations.insert(id, coord);
        if let Some(highway) = tags.get("highway") {
            let node = OsmNodeData::new(id, coord, highway);
            if node.traffic_signals {
                let _ = self.signals.insert(id);
            }
            self.nodes.push(node);
        }
    }

    fn accept_way(&mut self, id: OsmWayId, refs: Vec<OsmNodeId>, tags: &TagMap) {
        self.ways_seen += 1;
        if !self.filter.accept(tags) {
            return;
        }
        match self.build_way(id, refs, tags) {
            Ok(way) => self.ways.push(way),
            Err(e) => self.issues.push(PipelineStage::Extract, e),
        }
    }

    fn build_way(
        &self,
        id: OsmWayId,
        refs: Vec<OsmNodeId>,
        tags: &TagMap,
    ) -> Result<ClassifiedWay, OsmError> {
        let coords = refs
            .iter()
            .filter_map(|r| self.locations.get(r).copied())
            .collect::<Vec<_>>();
        if coords.len() < 2 {
            return Err(OsmError::MalformedFeature(
                id,
                format!(
                    "{} of {} referenced nodes resolved, at least 2 are required",
                    coords.len(),
                    refs.len()
                ),
            ));
        }
        if coords.len() < refs.len() {
            log::debug!(
                "way {id} is missing {} of {} referenced nodes",
                refs.len() - coords.len(),
                refs.len()
            );
        }
        let trf_signal = refs.iter().any(|r| self.signals.contains(r));
        let classification = self.classifier.classify(tags);
        let attributes = WayAttributes::new(id, refs, tags, classification, trf_signal);
        Ok(ClassifiedWay::new(attributes, LineString::new(coords)))
    }

    pub fn finish(self) -> Extraction {
        if self.late_nodes > 0 {
            log::warn!(
                "{} nodes arrived after the first way, input was not node-before-way ordered",
                self.late_nodes
            );
        }
        log::info!(
            "extracted {} of {} ways and {} highway nodes ({} signalized)",
            self.ways.len(),
            self.ways_seen,
            self.nodes.len(),
            self.signals.len()
        );
        Extraction {
            signals: self.signals,
            nodes: self.nodes,
            ways: self.ways,
            issues: self.issues,
        }
    }
}

/// runs an in-memory feed through a [`StreamingExtractor`]
pub fn extract<I>(records: I, filter: &ElementFilter, classifier: &TagClassifier) -> Extraction
where
    I: IntoIterator<Item = OsmRecord>,
{
    let mut extractor = StreamingExtractor::new(filter, classifier);
    for record in records {
        extractor.accept(record);
    }
    extractor.finish()
}

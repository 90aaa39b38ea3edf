use super::OsmError;
use std::{collections::BTreeMap, fmt::Display};

/// pipeline stage where a feature was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PipelineStage {
    Extract,
    Infer,
    Buffer,
    Index,
}

impl Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineStage::Extract => write!(f, "extract"),
            PipelineStage::Infer => write!(f, "infer"),
            PipelineStage::Buffer => write!(f, "buffer"),
            PipelineStage::Index => write!(f, "index"),
        }
    }
}

/// a per-feature failure that skipped (or partially filled) one feature
/// without failing the batch.
#[derive(Debug)]
pub struct FeatureIssue {
    pub stage: PipelineStage,
    pub error: OsmError,
}

impl FeatureIssue {
    pub fn new(stage: PipelineStage, error: OsmError) -> FeatureIssue {
        FeatureIssue { stage, error }
    }
}

/// collects the feature issues of one region so they can be reported together
/// once the batch has completed.
#[derive(Debug, Default)]
pub struct IssueReport {
    issues: Vec<FeatureIssue>,
}

impl IssueReport {
    pub fn push(&mut self, stage: PipelineStage, error: OsmError) {
        log::debug!("{stage}: {error}");
        self.issues.push(FeatureIssue::new(stage, error));
    }

    pub fn extend(&mut self, other: IssueReport) {
        self.issues.extend(other.issues);
    }

    pub fn issues(&self) -> &[FeatureIssue] {
        &self.issues
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// issue counts keyed by (stage, error kind)
    pub fn counts(&self) -> BTreeMap<(PipelineStage, &'static str), usize> {
        let mut counts = BTreeMap::new();
        for issue in self.issues.iter() {
            *counts.entry((issue.stage, issue.error.kind())).or_insert(0) += 1;
        }
        counts
    }

    pub fn log_summary(&self, region: &str) {
        if self.issues.is_empty() {
            log::info!("{region}: no features skipped");
            return;
        }
        for ((stage, kind), count) in self.counts() {
            log::warn!("{region}: {count} feature(s) with {kind} issues during {stage}");
        }
    }
}

use super::BikeCategory;
use crate::config::LookupTable;
use crate::model::osm::OsmError;
use std::collections::HashMap;

/// ordered mapping from raw cycleway tag values to category labels. row order
/// encodes protection, from least to most protective. a label's rank is the
/// order in which it first appears in the table.
#[derive(Debug, Clone)]
pub struct PrecedenceTable {
    rows: Vec<(String, String)>,
    row_by_value: HashMap<String, usize>,
    rank_by_label: HashMap<String, usize>,
}

impl PrecedenceTable {
    pub const BIKE_LANE: &'static str = "Bike Lane";
    pub const BUFFERED_BIKE_LANE: &'static str = "Buffered Bike Lane";
    pub const SHARED_USE_PATH: &'static str = "Shared Use Path";

    /// labels the classifier resolves to without a table lookup, which must be ranked
    const REQUIRED_LABELS: [&'static str; 3] = [
        Self::BIKE_LANE,
        Self::BUFFERED_BIKE_LANE,
        Self::SHARED_USE_PATH,
    ];

    pub fn new(rows: Vec<(String, String)>) -> Result<PrecedenceTable, OsmError> {
        if rows.is_empty() {
            return Err(OsmError::ConfigurationError(String::from(
                "precedence table is empty",
            )));
        }
        let mut row_by_value: HashMap<String, usize> = HashMap::with_capacity(rows.len());
        let mut rank_by_label: HashMap<String, usize> = HashMap::new();
        for (idx, (value, label)) in rows.iter().enumerate() {
            if value.is_empty() || label.is_empty() {
                return Err(OsmError::ConfigurationError(format!(
                    "precedence table row {idx} has an empty value or label"
                )));
            }
            if row_by_value.insert(value.clone(), idx).is_some() {
                return Err(OsmError::ConfigurationError(format!(
                    "precedence table lists value '{value}' more than once"
                )));
            }
            let next_rank = rank_by_label.len();
            let _ = rank_by_label.entry(label.clone()).or_insert(next_rank);
        }
        for label in Self::REQUIRED_LABELS {
            if !rank_by_label.contains_key(label) {
                return Err(OsmError::ConfigurationError(format!(
                    "precedence table is missing required category '{label}'"
                )));
            }
        }
        Ok(PrecedenceTable {
            rows,
            row_by_value,
            rank_by_label,
        })
    }

    pub fn try_from_table(table: &LookupTable) -> Result<PrecedenceTable, OsmError> {
        PrecedenceTable::new(table.rows().to_vec())
    }

    /// the category of a raw tag value, or None if the value is not in the table
    pub fn lookup(&self, value: &str) -> Option<BikeCategory> {
        let row = self.row_by_value.get(value)?;
        let (_, label) = &self.rows[*row];
        self.category(label)
    }

    /// the ranked category for a label, or None if the label is not in the table
    pub fn category(&self, label: &str) -> Option<BikeCategory> {
        self.rank_by_label
            .get(label)
            .map(|rank| BikeCategory::new(label, *rank))
    }

    pub fn rows(&self) -> &[(String, String)] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

use crate::config::LookupTable;
use crate::model::osm::OsmError;
use std::collections::HashMap;

/// looks up base values by functional class in order to fill incomplete data taken
/// from OpenStreetMaps, such as lane counts and lane widths.
#[derive(Debug, Clone)]
pub struct FillValueLookup {
    pub class_field: String,
    pub value_field: String,
    pub values_by_class: HashMap<String, f64>,
}

impl FillValueLookup {
    pub fn new(
        table: &LookupTable,
        class_label_field: &str,
        value_field: &str,
    ) -> Result<FillValueLookup, OsmError> {
        if table.is_empty() {
            return Err(OsmError::ConfigurationError(format!(
                "{value_field} by {class_label_field} table '{}' is empty",
                table.name
            )));
        }
        let mut values_by_class = HashMap::with_capacity(table.len());
        for (class_label, value) in table.rows() {
            let parsed = value.parse::<f64>().map_err(|e| {
                OsmError::ConfigurationError(format!(
                    "table '{}' has non-numeric {value_field} '{value}' for {class_label_field} '{class_label}': {e}",
                    table.name
                ))
            })?;
            if !parsed.is_finite() || parsed < 0.0 {
                return Err(OsmError::ConfigurationError(format!(
                    "table '{}' has invalid {value_field} '{value}' for {class_label_field} '{class_label}'",
                    table.name
                )));
            }
            let _ = values_by_class.insert(class_label.clone(), parsed);
        }
        let result = FillValueLookup {
            class_field: String::from(class_label_field),
            value_field: String::from(value_field),
            values_by_class,
        };
        Ok(result)
    }

    /// get a fill value for a class label. classes missing from the table
    /// (or a missing label) have no fill value.
    pub fn get(&self, label: Option<&str>) -> Option<f64> {
        label.and_then(|l| self.values_by_class.get(l).copied())
    }

    pub fn len(&self) -> usize {
        self.values_by_class.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values_by_class.is_empty()
    }
}

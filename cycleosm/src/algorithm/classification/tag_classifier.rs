use crate::model::{
    bike::{BikeCategory, BikeClassification, PrecedenceTable, Side, SideMatch, TagSource},
    osm::{feature::osm_way_ops, TagMap},
};
use std::{collections::HashSet, sync::Arc};

/// resolves the raw cycleway tags of a way into ranked bike infrastructure
/// categories. classification is a pure function of the tags and the
/// precedence table.
#[derive(Debug, Clone)]
pub struct TagClassifier {
    precedence: Arc<PrecedenceTable>,
    non_facilities: HashSet<String>,
}

impl TagClassifier {
    /// tag sources checked for each side, first match wins. a way tagged
    /// `highway=cycleway` is the fallback when none of these match.
    const SOURCE_ORDER: [TagSource; 6] = [
        TagSource::SideBuffer,
        TagSource::Side,
        TagSource::BothBuffer,
        TagSource::Both,
        TagSource::Unqualified,
        TagSource::OnewayBicycle,
    ];

    pub fn new(precedence: Arc<PrecedenceTable>, non_facilities: HashSet<String>) -> TagClassifier {
        TagClassifier {
            precedence,
            non_facilities,
        }
    }

    pub fn precedence(&self) -> &PrecedenceTable {
        &self.precedence
    }

    /// classifies both sides of a way and aggregates them.
    ///
    /// when both sides have the same rank, the right side is reported for
    /// both the min and the max category. on one-way roads the min category
    /// is the max category.
    pub fn classify(&self, tags: &TagMap) -> BikeClassification {
        let left_match = self.match_side(tags, Side::Left);
        let right_match = self.match_side(tags, Side::Right);
        let left = left_match.as_ref().and_then(|m| self.resolve(m));
        let right = right_match.as_ref().and_then(|m| self.resolve(m));

        let max = match (&left, &right) {
            (Some(l), Some(r)) if l.rank > r.rank => Some(l.clone()),
            (_, Some(r)) => Some(r.clone()),
            (Some(l), None) => Some(l.clone()),
            (None, None) => None,
        };
        let min = if osm_way_ops::is_one_way(tags) {
            max.clone()
        } else {
            match (&left, &right) {
                (Some(l), Some(r)) if l.rank < r.rank => Some(l.clone()),
                (_, Some(r)) => Some(r.clone()),
                (Some(l), None) => Some(l.clone()),
                (None, None) => None,
            }
        };

        let left_facility = left_match.map(|m| facility_value(&m, left.as_ref()));
        let right_facility = right_match.map(|m| facility_value(&m, right.as_ref()));
        BikeClassification {
            left_facility,
            right_facility,
            left,
            right,
            min,
            max,
        }
    }

    /// finds the first tag describing a bike facility on this side. values in
    /// the non-facility set are skipped and the next source is checked.
    pub fn match_side(&self, tags: &TagMap, side: Side) -> Option<SideMatch> {
        let tagged = Self::SOURCE_ORDER.iter().find_map(|source| {
            let key = source.key(side)?;
            let value = tags.get(&key)?;
            if self.non_facilities.contains(value) {
                None
            } else {
                Some(SideMatch {
                    source: *source,
                    raw: value.clone(),
                })
            }
        });
        tagged.or_else(|| match tags.get("highway") {
            Some(highway) if highway == "cycleway" => Some(SideMatch {
                source: TagSource::HighwayCycleway,
                raw: String::from("cycleway"),
            }),
            _ => None,
        })
    }

    /// the category of a side match. a raw value missing from the precedence
    /// table has no category.
    pub fn resolve(&self, side_match: &SideMatch) -> Option<BikeCategory> {
        if side_match.source == TagSource::HighwayCycleway {
            return self.precedence.category(PrecedenceTable::SHARED_USE_PATH);
        }
        match self.precedence.lookup(&side_match.raw) {
            None => {
                log::debug!(
                    "cycleway value '{}' from {} tag is not in the precedence table",
                    side_match.raw,
                    side_match.source
                );
                None
            }
            Some(category)
                if side_match.source.is_buffer() && category.label == PrecedenceTable::BIKE_LANE =>
            {
                self.precedence.category(PrecedenceTable::BUFFERED_BIKE_LANE)
            }
            Some(category) => Some(category),
        }
    }
}

/// the facility value reported for a side. tag values are capitalized, a
/// `highway=cycleway` way is `Cycleway` and an `oneway:bicycle` match is
/// reported by its category label.
fn facility_value(side_match: &SideMatch, category: Option<&BikeCategory>) -> String {
    match (side_match.source, category) {
        (TagSource::HighwayCycleway, _) => String::from("Cycleway"),
        (TagSource::OnewayBicycle, Some(c)) => c.label.clone(),
        _ => capitalize(&side_match.raw),
    }
}

/// upper case first character, lower case remainder
fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

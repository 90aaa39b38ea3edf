use serde::{Serialize, Serializer};
use std::{cmp::Ordering, fmt::Display};

/// a bicycle infrastructure protection level. `rank` is the position of the
/// label in the precedence table, from least (0) to most protective.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BikeCategory {
    pub label: String,
    pub rank: usize,
}

impl BikeCategory {
    pub fn new(label: &str, rank: usize) -> BikeCategory {
        BikeCategory {
            label: String::from(label),
            rank,
        }
    }
}

impl PartialOrd for BikeCategory {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BikeCategory {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank
            .cmp(&other.rank)
            .then_with(|| self.label.cmp(&other.label))
    }
}

impl Display for BikeCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label)
    }
}

/// categories are written by label only
impl Serialize for BikeCategory {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.label)
    }
}

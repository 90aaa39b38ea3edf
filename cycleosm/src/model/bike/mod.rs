mod bike_category;
mod bike_classification;
mod precedence_table;
mod side;

pub use bike_category::BikeCategory;
pub use bike_classification::{BikeClassification, SideMatch, TagSource};
pub use precedence_table::PrecedenceTable;
pub use side::Side;

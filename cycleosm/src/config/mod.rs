mod cycleosm_config;
mod cycleosm_context;
pub mod defaults;
mod lookup_table;

pub use cycleosm_config::{CycleOsmConfiguration, DEFAULT_RESOLUTION};
pub use cycleosm_context::CycleOsmContext;
pub use lookup_table::LookupTable;

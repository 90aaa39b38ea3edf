mod streaming_extractor;

pub use streaming_extractor::{extract, Extraction, StreamingExtractor};

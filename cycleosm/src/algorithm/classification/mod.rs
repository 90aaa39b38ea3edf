mod tag_classifier;

pub use tag_classifier::TagClassifier;

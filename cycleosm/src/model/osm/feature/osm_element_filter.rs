use crate::model::osm::{OsmError, TagMap};
use std::collections::HashSet;

/// decides which ways are retained by the extractor, based on the
/// functional class found in their `highway` tag.
#[derive(Debug, Clone)]
pub struct ElementFilter {
    functional_classes: HashSet<String>,
}

impl ElementFilter {
    pub const HIGHWAY: &'static str = "highway";
    pub const CYCLEWAY: &'static str = "cycleway";
    pub const PROPOSED: &'static str = "proposed";

    pub fn new<I, S>(functional_classes: I) -> Result<ElementFilter, OsmError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let functional_classes: HashSet<String> =
            functional_classes.into_iter().map(Into::into).collect();
        if functional_classes.is_empty() {
            return Err(OsmError::ConfigurationError(String::from(
                "functional class allowlist is empty",
            )));
        }
        Ok(ElementFilter { functional_classes })
    }

    /// accepts a way when
    /// - its `highway` value is one of the allowed functional classes, or
    /// - it has a `cycleway` tag and is not a `highway=proposed` way
    ///
    /// # Arguments
    ///
    /// * `tags` - the way's tags
    ///
    /// # Returns
    ///
    /// true if the way should be classified and retained
    pub fn accept(&self, tags: &TagMap) -> bool {
        let highway = tags.get(Self::HIGHWAY);
        let allowed_class = matches!(highway, Some(h) if self.functional_classes.contains(h));
        let proposed = matches!(highway, Some(h) if h == Self::PROPOSED);
        allowed_class || (tags.contains_key(Self::CYCLEWAY) && !proposed)
    }

    pub fn len(&self) -> usize {
        self.functional_classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functional_classes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::ElementFilter;
    use crate::model::osm::tag_map;

    fn filter() -> ElementFilter {
        ElementFilter::new(["secondary", "residential", "cycleway"]).unwrap()
    }

    #[test]
    fn test_accepts_allowed_class() {
        assert!(filter().accept(&tag_map(&[("highway", "secondary")])));
    }

    #[test]
    fn test_rejects_other_class() {
        assert!(!filter().accept(&tag_map(&[("highway", "motorway")])));
        assert!(!filter().accept(&tag_map(&[("building", "yes")])));
    }

    #[test]
    fn test_cycleway_tag_overrides_class() {
        let tags = tag_map(&[("highway", "motorway"), ("cycleway", "shoulder")]);
        assert!(filter().accept(&tags));
        let untagged_highway = tag_map(&[("cycleway", "track")]);
        assert!(filter().accept(&untagged_highway));
    }

    #[test]
    fn test_proposed_with_cycleway_rejected() {
        let tags = tag_map(&[("highway", "proposed"), ("cycleway", "lane")]);
        assert!(!filter().accept(&tags));
    }

    #[test]
    fn test_empty_allowlist_is_configuration_error() {
        let result = ElementFilter::new(Vec::<String>::new());
        assert!(result.is_err());
    }
}

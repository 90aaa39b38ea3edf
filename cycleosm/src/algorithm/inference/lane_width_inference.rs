use crate::model::osm::{
    feature::{FillValueLookup, WayAttributes},
    OsmError,
};

pub const FEET_PER_METER: f64 = 3.28084;

/// converts feet to meters, rounded to two decimal places. the conversion is
/// applied once per field, values already in meters must not be passed back in.
pub fn meters_from_feet(feet: f64) -> f64 {
    (feet / FEET_PER_METER * 100.0).round() / 100.0
}

/// fills missing lane counts and carriageway widths from per-class tables.
/// lane counts are per direction, lane widths are in feet.
#[derive(Debug, Clone)]
pub struct LaneWidthInferencer {
    lanes: FillValueLookup,
    widths: FillValueLookup,
}

impl LaneWidthInferencer {
    pub fn new(
        lanes: FillValueLookup,
        widths: FillValueLookup,
    ) -> Result<LaneWidthInferencer, OsmError> {
        for lookup in [&lanes, &widths] {
            if lookup.is_empty() {
                return Err(OsmError::ConfigurationError(format!(
                    "{} by {} table is empty",
                    lookup.value_field, lookup.class_field
                )));
            }
        }
        Ok(LaneWidthInferencer { lanes, widths })
    }

    /// fills `lanes_tot` and `width_m` when they are absent. fields that are
    /// already set are left unchanged, so inference can safely run twice.
    ///
    /// a missing lane count is the base count of the functional class, doubled
    /// on two-way roads. a missing width is the explicit `width` tag, or else
    /// the class lane width times the lane count, converted to meters.
    ///
    /// # Returns
    ///
    /// an error if no width could be found, leaving `width_m` unset. a lane
    /// count that cannot be inferred stays absent without an error as long as
    /// a width is found.
    pub fn infer(&self, way: &mut WayAttributes) -> Result<(), OsmError> {
        let fclass = way.fclass.as_deref();
        if way.lanes_tot.is_none() {
            if let Some(base) = self.lanes.get(fclass) {
                let directions = if way.oneway { 1.0 } else { 2.0 };
                way.lanes_tot = Some((base * directions).round() as i64);
                way.lanes_inferred = true;
            }
        }

        if way.width_m.is_some() {
            return Ok(());
        }
        if let Some(feet) = way.width_tag {
            way.width_m = Some(meters_from_feet(feet));
            return Ok(());
        }
        let lane_width = self.widths.get(fclass).ok_or_else(|| {
            OsmError::MalformedFeature(
                way.osmid,
                format!(
                    "no width tag and no lane width for {} '{}'",
                    self.widths.class_field,
                    fclass.unwrap_or_default()
                ),
            )
        })?;
        let lanes = way.lanes_tot.ok_or_else(|| {
            OsmError::MalformedFeature(
                way.osmid,
                format!(
                    "no width tag and no lane count for {} '{}'",
                    self.lanes.class_field,
                    fclass.unwrap_or_default()
                ),
            )
        })?;
        way.width_m = Some(meters_from_feet(lane_width * lanes as f64));
        way.width_inferred = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{meters_from_feet, LaneWidthInferencer};
    use crate::{
        config::LookupTable,
        model::osm::feature::{FillValueLookup, OsmWayId, WayAttributes},
    };

    fn inferencer() -> LaneWidthInferencer {
        let lanes = LookupTable::from_rows(
            "lanes",
            [("residential", "1"), ("secondary", "2"), ("primary", "2")],
        );
        let widths = LookupTable::from_rows(
            "widths",
            [("residential", "10"), ("secondary", "12"), ("primary", "12")],
        );
        LaneWidthInferencer::new(
            FillValueLookup::new(&lanes, "fclass", "lanes").unwrap(),
            FillValueLookup::new(&widths, "fclass", "width").unwrap(),
        )
        .unwrap()
    }

    fn way(fclass: &str, oneway: bool) -> WayAttributes {
        WayAttributes {
            osmid: OsmWayId(1),
            fclass: Some(String::from(fclass)),
            oneway,
            ..Default::default()
        }
    }

    #[test]
    fn test_meters_from_feet() {
        assert_eq!(meters_from_feet(20.0), 6.1);
        assert_eq!(meters_from_feet(12.0), 3.66);
        assert_eq!(meters_from_feet(0.0), 0.0);
    }

    #[test]
    fn test_residential_two_way() {
        let mut attributes = way("residential", false);
        inferencer().infer(&mut attributes).unwrap();
        assert_eq!(attributes.lanes_tot, Some(2));
        assert!(attributes.lanes_inferred);
        assert_eq!(attributes.width_m, Some(meters_from_feet(20.0)));
        assert!(attributes.width_inferred);
    }

    #[test]
    fn test_explicit_lanes_preserved() {
        let mut attributes = way("secondary", true);
        attributes.lanes_tot = Some(1);
        inferencer().infer(&mut attributes).unwrap();
        assert_eq!(attributes.lanes_tot, Some(1));
        assert!(!attributes.lanes_inferred);
        assert_eq!(attributes.width_m, Some(3.66));
    }

    #[test]
    fn test_explicit_width_converted() {
        let mut attributes = way("primary", false);
        attributes.width_tag = Some(30.0);
        inferencer().infer(&mut attributes).unwrap();
        assert_eq!(attributes.width_m, Some(meters_from_feet(30.0)));
        assert!(!attributes.width_inferred);
    }

    #[test]
    fn test_idempotent() {
        let i = inferencer();
        let mut attributes = way("residential", false);
        i.infer(&mut attributes).unwrap();
        let once = attributes.clone();
        i.infer(&mut attributes).unwrap();
        assert_eq!(attributes, once);

        let mut explicit = way("primary", false);
        explicit.width_tag = Some(30.0);
        i.infer(&mut explicit).unwrap();
        let once = explicit.clone();
        i.infer(&mut explicit).unwrap();
        assert_eq!(explicit, once);
    }

    #[test]
    fn test_unknown_class_without_width_fails() {
        let mut attributes = way("bus_guideway", false);
        assert!(inferencer().infer(&mut attributes).is_err());
        assert_eq!(attributes.lanes_tot, None);
        assert_eq!(attributes.width_m, None);
    }

    #[test]
    fn test_unknown_class_with_width_tag() {
        let mut attributes = way("bus_guideway", false);
        attributes.width_tag = Some(10.0);
        inferencer().infer(&mut attributes).unwrap();
        assert_eq!(attributes.lanes_tot, None);
        assert_eq!(attributes.width_m, Some(3.05));
    }
}

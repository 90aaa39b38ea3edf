use crate::model::osm::TagMap;

/// deals with free-text numeric tags such as `maxspeed` and `lanes` by keeping
/// only the digit runs of the value. units, separators and other tokens are
/// dropped, so that:
///   - 25 mph   => 25
///   - 30       => 30
///   - none     => None
///
/// a value without digits (or too large for an i64) has no numeric value,
/// which is not an error.
pub fn parse_digits(value: &str) -> Option<i64> {
    let digits = value
        .split(|c: char| !c.is_ascii_digit())
        .collect::<String>();
    if digits.is_empty() {
        None
    } else {
        digits.parse::<i64>().ok()
    }
}

/// reads the first decimal number found in a free-text measurement, such as
/// a `width` of "3.5 m" or "12'".
pub fn parse_decimal(value: &str) -> Option<f64> {
    let start = value.find(|c: char| c.is_ascii_digit())?;
    let rest = &value[start..];
    let end = rest
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(rest.len());
    let number = rest[..end].trim_end_matches('.');
    number.parse::<f64>().ok()
}

/// the side-qualified bike facility width, reading `cycleway:<side>:width`,
/// `cycleway:both:width` and then `cycleway:width`.
pub fn bike_width<'a>(tags: &'a TagMap, side: &str) -> Option<&'a str> {
    tags.get(&format!("cycleway:{side}:width"))
        .or_else(|| tags.get("cycleway:both:width"))
        .or_else(|| tags.get("cycleway:width"))
        .map(String::as_str)
}

/// directional lane counts, reading `lanes:<direction>` before falling back
/// to the unqualified `lanes` count.
pub fn directional_lanes(tags: &TagMap, direction: &str) -> Option<i64> {
    tags.get(&format!("lanes:{direction}"))
        .or_else(|| tags.get("lanes"))
        .and_then(|v| parse_digits(v))
}

/// units a `width` value may carry while still being read as feet
const FEET_UNITS: [&str; 5] = ["'", "ft", "feet", "foot", "\""];

/// the unit text following the number of a measurement, such as "m" in "3.5 m"
pub fn measurement_unit(value: &str) -> Option<&str> {
    let start = value.find(|c: char| c.is_ascii_digit())?;
    let rest = &value[start..];
    let end = rest
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(rest.len());
    let unit = rest[end..].trim();
    if unit.is_empty() {
        None
    } else {
        Some(unit)
    }
}

/// reads a `width` tag as feet. a value written with another unit is still
/// read as feet, with a debug notice.
pub fn width_feet(value: &str) -> Option<f64> {
    let feet = parse_decimal(value)?;
    if let Some(unit) = measurement_unit(value) {
        if !FEET_UNITS.contains(&unit.to_lowercase().as_str()) {
            log::debug!("width '{value}' has unit '{unit}', reading it as feet");
        }
    }
    Some(feet)
}

/// true for the `oneway` values that denote a one-way road, see
/// https://wiki.openstreetmap.org/wiki/Key:oneway. an untagged roundabout
/// is one-way as well.
pub fn is_one_way(tags: &TagMap) -> bool {
    if let Some(oneway) = tags.get("oneway") {
        matches!(
            oneway.as_str().trim(),
            "yes" | "true" | "1" | "-1" | "reverse"
        )
    } else if let Some(junction) = tags.get("junction") {
        junction.as_str().trim() == "roundabout"
    } else {
        false
    }
}

/// `Bicycle Route` when the way is tagged as part of a bicycle route
pub fn bicycle_route(tags: &TagMap) -> Option<String> {
    match tags.get("route") {
        Some(route) if route == "bicycle" => Some(String::from("Bicycle Route")),
        _ => None,
    }
}

use geo::{BooleanOps, Coord, LineString, MultiPolygon, Polygon};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// shape of a corridor at the two ends of its centerline
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapStyle {
    /// the corridor ends flush with the first and last vertex
    #[default]
    Flat,
    /// the corridor ends in a half circle around the first and last vertex
    Round,
}

/// vertices used to approximate a circle at joins and round caps
pub const CIRCLE_SEGMENTS: usize = 32;

/// buffers a planar centerline by `half_width` on both sides. the corridor is
/// the union of one rectangle per segment, plus a disc at each interior
/// vertex so that bends are rounded, plus discs at the ends for round caps.
///
/// # Arguments
///
/// * `line` - centerline in a planar coordinate system
/// * `half_width` - offset distance, in the units of the coordinate system
/// * `cap_style` - end treatment
///
/// # Returns
///
/// the corridor polygon, or an error if the line has no extent or the width
/// is not positive
pub fn buffer_linestring(
    line: &LineString<f64>,
    half_width: f64,
    cap_style: CapStyle,
) -> Result<MultiPolygon<f64>, String> {
    if !half_width.is_finite() || half_width <= 0.0 {
        return Err(format!("buffer width must be positive, found {}", half_width * 2.0));
    }
    let mut parts: Vec<Polygon<f64>> = vec![];
    for segment in line.lines() {
        if let Some(rectangle) = segment_rectangle(segment.start, segment.end, half_width) {
            parts.push(rectangle);
        }
    }
    if parts.is_empty() {
        return Err(String::from("centerline has no nonzero-length segment"));
    }

    let coords = &line.0;
    if coords.len() > 2 {
        for vertex in coords[1..coords.len() - 1].iter() {
            parts.push(disc(*vertex, half_width));
        }
    }
    if cap_style == CapStyle::Round {
        if let (Some(first), Some(last)) = (coords.first(), coords.last()) {
            parts.push(disc(*first, half_width));
            parts.push(disc(*last, half_width));
        }
    }

    let mut iter = parts.into_iter();
    let first = match iter.next() {
        Some(p) => MultiPolygon::new(vec![p]),
        None => return Err(String::from("centerline produced no corridor")),
    };
    let corridor = iter.fold(first, |acc, part| acc.union(&MultiPolygon::new(vec![part])));
    Ok(corridor)
}

/// counter-clockwise rectangle around a segment, or None for a zero-length segment
fn segment_rectangle(start: Coord<f64>, end: Coord<f64>, half_width: f64) -> Option<Polygon<f64>> {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let length = dx.hypot(dy);
    if length == 0.0 || !length.is_finite() {
        return None;
    }
    let offset = Coord {
        x: -dy / length * half_width,
        y: dx / length * half_width,
    };
    let exterior = LineString::new(vec![
        start - offset,
        end - offset,
        end + offset,
        start + offset,
        start - offset,
    ]);
    Some(Polygon::new(exterior, vec![]))
}

fn disc(center: Coord<f64>, radius: f64) -> Polygon<f64> {
    let mut ring = (0..CIRCLE_SEGMENTS)
        .map(|i| {
            let theta = 2.0 * PI * i as f64 / CIRCLE_SEGMENTS as f64;
            Coord {
                x: center.x + radius * theta.cos(),
                y: center.y + radius * theta.sin(),
            }
        })
        .collect::<Vec<_>>();
    ring.push(ring[0]);
    Polygon::new(LineString::new(ring), vec![])
}

#[cfg(test)]
mod tests {
    use super::{buffer_linestring, CapStyle, CIRCLE_SEGMENTS};
    use geo::{Area, Contains, LineString, Point};
    use std::f64::consts::PI;

    fn polygon_disc_area(radius: f64) -> f64 {
        let n = CIRCLE_SEGMENTS as f64;
        0.5 * n * radius * radius * (2.0 * PI / n).sin()
    }

    #[test]
    fn test_straight_segment_area() {
        let (length, width) = (100.0, 8.0);
        let line = LineString::from(vec![(0.0, 0.0), (length, 0.0)]);
        let corridor = buffer_linestring(&line, width / 2.0, CapStyle::Flat).unwrap();
        let area = corridor.unsigned_area();
        assert!((area - length * width).abs() < 1e-6, "{area}");
    }

    #[test]
    fn test_diagonal_segment_area() {
        let line = LineString::from(vec![(10.0, 10.0), (40.0, 50.0)]);
        let corridor = buffer_linestring(&line, 2.0, CapStyle::Flat).unwrap();
        assert!((corridor.unsigned_area() - 50.0 * 4.0).abs() < 1e-6);
    }

    #[test]
    fn test_collinear_vertices_area() {
        let line = LineString::from(vec![(0.0, 0.0), (40.0, 0.0), (100.0, 0.0)]);
        let corridor = buffer_linestring(&line, 4.0, CapStyle::Flat).unwrap();
        assert!((corridor.unsigned_area() - 800.0).abs() < 1e-3);
    }

    #[test]
    fn test_round_caps_add_discs() {
        let line = LineString::from(vec![(0.0, 0.0), (100.0, 0.0)]);
        let corridor = buffer_linestring(&line, 4.0, CapStyle::Round).unwrap();
        let expected = 800.0 + polygon_disc_area(4.0);
        assert!((corridor.unsigned_area() - expected).abs() < 1e-2);
        assert!(corridor.contains(&Point::new(-3.0, 0.0)));
    }

    #[test]
    fn test_bend_is_covered() {
        let line = LineString::from(vec![(0.0, 0.0), (50.0, 0.0), (50.0, 50.0)]);
        let corridor = buffer_linestring(&line, 5.0, CapStyle::Flat).unwrap();
        assert_eq!(corridor.0.len(), 1);
        assert!(corridor.contains(&Point::new(53.0, -3.0)));
        assert!(corridor.contains(&Point::new(25.0, 4.0)));
        assert!(!corridor.contains(&Point::new(25.0, 6.0)));
    }

    #[test]
    fn test_degenerate_inputs() {
        let point_line = LineString::from(vec![(1.0, 1.0), (1.0, 1.0)]);
        assert!(buffer_linestring(&point_line, 4.0, CapStyle::Flat).is_err());
        let line = LineString::from(vec![(0.0, 0.0), (1.0, 0.0)]);
        assert!(buffer_linestring(&line, 0.0, CapStyle::Flat).is_err());
        assert!(buffer_linestring(&line, f64::NAN, CapStyle::Flat).is_err());
    }
}

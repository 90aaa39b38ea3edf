use super::{corridor, CapStyle, UtmProjection, UtmZone};
use crate::model::osm::{
    feature::{BufferedWay, ClassifiedWay},
    IssueReport, OsmError, PipelineStage,
};
use geo::{Centroid, Coord};
use kdam::tqdm;

/// mean longitude and latitude of the centroids of a batch of ways
pub fn batch_centroid(ways: &[ClassifiedWay]) -> Result<Coord<f64>, OsmError> {
    let centroids = ways
        .iter()
        .filter_map(|w| w.centerline.centroid())
        .collect::<Vec<_>>();
    if centroids.is_empty() {
        return Err(OsmError::ProjectionError(format!(
            "cannot compute a centroid for a batch of {} ways",
            ways.len()
        )));
    }
    let n = centroids.len() as f64;
    let (sum_x, sum_y) = centroids
        .iter()
        .fold((0.0, 0.0), |(x, y), p| (x + p.x(), y + p.y()));
    Ok(Coord {
        x: sum_x / n,
        y: sum_y / n,
    })
}

/// the UTM zone at the centroid of a batch
pub fn select_zone(ways: &[ClassifiedWay]) -> Result<UtmZone, OsmError> {
    let centroid = batch_centroid(ways)?;
    UtmZone::from_lon_lat(centroid.x, centroid.y)
}

/// buffers every way of a region into its road corridor. the centerlines
/// are buffered in the UTM zone of the batch centroid and the corridors are
/// returned in geographic coordinates.
///
/// ways without a width, whose centerline has no extent or whose coordinates
/// cannot be projected are recorded in `issues` and dropped.
///
/// # Returns
///
/// the zone used and the buffered ways, or a [`OsmError::ProjectionError`]
/// if the batch is empty or the zone's transforms cannot be built
pub fn buffer_ways(
    ways: Vec<ClassifiedWay>,
    cap_style: CapStyle,
    issues: &mut IssueReport,
) -> Result<(UtmZone, Vec<BufferedWay>), OsmError> {
    let zone = select_zone(&ways)?;
    let projection = UtmProjection::new(zone)?;
    log::info!("buffering {} ways in UTM zone {zone}", ways.len());

    let n_ways = ways.len();
    let mut buffered = Vec::with_capacity(n_ways);
    let buffer_iter = tqdm!(ways.into_iter(), desc = "buffer ways", total = n_ways);
    for way in buffer_iter {
        match buffer_way(way, &projection, cap_style) {
            Ok(b) => buffered.push(b),
            Err(e) => issues.push(PipelineStage::Buffer, e),
        }
    }
    eprintln!();
    Ok((zone, buffered))
}

/// buffers one way by half of its width on each side
pub fn buffer_way(
    way: ClassifiedWay,
    projection: &UtmProjection,
    cap_style: CapStyle,
) -> Result<BufferedWay, OsmError> {
    let width_m = way.attributes.width_m.ok_or_else(|| {
        OsmError::MalformedFeature(way.osmid(), String::from("way has no width to buffer"))
    })?;
    let projected = projection.project_line(&way.centerline)?;
    let corridor = corridor::buffer_linestring(&projected, width_m / 2.0, cap_style)
        .map_err(|e| OsmError::MalformedFeature(way.osmid(), e))?;
    let geographic = projection.unproject_polygons(&corridor)?;
    Ok(BufferedWay::new(way, width_m, geographic))
}

#[cfg(test)]
mod tests {
    use super::{batch_centroid, buffer_ways};
    use crate::{
        algorithm::buffer::{CapStyle, UtmProjection, UtmZone},
        model::osm::{
            feature::{ClassifiedWay, OsmWayId, WayAttributes},
            IssueReport, OsmError, PipelineStage,
        },
    };
    use geo::{Area, Contains, Coord, LineString, MapCoords, Point};

    fn way(id: i64, coords: Vec<(f64, f64)>, width_m: Option<f64>) -> ClassifiedWay {
        let attributes = WayAttributes {
            osmid: OsmWayId(id),
            width_m,
            ..Default::default()
        };
        ClassifiedWay::new(attributes, LineString::from(coords))
    }

    #[test]
    fn test_batch_centroid() {
        let ways = vec![
            way(1, vec![(-105.0, 39.0), (-105.0, 39.002)], Some(6.0)),
            way(2, vec![(-104.0, 40.0), (-104.002, 40.0)], Some(6.0)),
        ];
        let centroid = batch_centroid(&ways).unwrap();
        assert!((centroid.x - -104.5005).abs() < 1e-9);
        assert!((centroid.y - 39.5005).abs() < 1e-9);
    }

    #[test]
    fn test_empty_batch_is_projection_error() {
        let mut issues = IssueReport::default();
        let result = buffer_ways(vec![], CapStyle::Flat, &mut issues);
        assert!(matches!(result, Err(OsmError::ProjectionError(_))));
    }

    #[test]
    fn test_buffered_area_in_meters() {
        // about 111 m north-south near Denver
        let ways = vec![way(1, vec![(-104.99, 39.74), (-104.99, 39.741)], Some(10.0))];
        let mut issues = IssueReport::default();
        let (zone, buffered) = buffer_ways(ways, CapStyle::Flat, &mut issues).unwrap();
        assert_eq!(zone, UtmZone { band: 13, north: true });
        assert_eq!(buffered.len(), 1);
        assert!(issues.is_empty());

        let corridor = &buffered[0].corridor;
        assert!(corridor.contains(&Point::new(-104.99, 39.7405)));
        let projection = UtmProjection::new(zone).unwrap();
        let projected = corridor
            .try_map_coords(|c| projection.forward(c))
            .unwrap();
        let north = projection.forward(Coord { x: -104.99, y: 39.741 }).unwrap();
        let south = projection.forward(Coord { x: -104.99, y: 39.74 }).unwrap();
        let length = north.y - south.y;
        let expected = length * 10.0;
        assert!((projected.unsigned_area() - expected).abs() / expected < 1e-3);
    }

    #[test]
    fn test_missing_width_is_skipped() {
        let ways = vec![
            way(1, vec![(-104.99, 39.74), (-104.99, 39.741)], None),
            way(2, vec![(-104.98, 39.74), (-104.98, 39.741)], Some(6.0)),
        ];
        let mut issues = IssueReport::default();
        let (_, buffered) = buffer_ways(ways, CapStyle::Flat, &mut issues).unwrap();
        assert_eq!(buffered.len(), 1);
        assert_eq!(buffered[0].osmid(), OsmWayId(2));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues.issues()[0].stage, PipelineStage::Buffer);
    }
}

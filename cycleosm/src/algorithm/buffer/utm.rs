use crate::model::osm::OsmError;
use geo::{Coord, LineString, MapCoords, MultiPolygon};
use proj::Proj;
use std::fmt::Display;

pub const EPSG_WGS84: u32 = 4326;

/// a UTM zone, identified by its longitudinal band (1..=60) and hemisphere
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UtmZone {
    pub band: u8,
    pub north: bool,
}

impl UtmZone {
    /// the zone containing a geographic coordinate, in degrees
    pub fn from_lon_lat(lon: f64, lat: f64) -> Result<UtmZone, OsmError> {
        if !lon.is_finite() || !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(OsmError::ProjectionError(format!(
                "no UTM zone for coordinate ({lon}, {lat})"
            )));
        }
        let band = ((lon + 180.0) / 6.0).floor() as i64;
        Ok(UtmZone {
            band: (band.rem_euclid(60) + 1) as u8,
            north: lat >= 0.0,
        })
    }

    /// EPSG code of the WGS84 UTM coordinate system, 326xx north or 327xx south
    pub fn epsg(&self) -> u32 {
        let base = if self.north { 32600 } else { 32700 };
        base + self.band as u32
    }
}

impl Display for UtmZone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let hemisphere = if self.north { "N" } else { "S" };
        write!(f, "{:02}{} (EPSG:{})", self.band, hemisphere, self.epsg())
    }
}

/// WGS84 to UTM transforms for one zone, in both directions. coordinates are
/// (lon, lat) in degrees and (easting, northing) in meters.
pub struct UtmProjection {
    pub zone: UtmZone,
    to_utm: Proj,
    to_wgs84: Proj,
}

impl UtmProjection {
    pub fn new(zone: UtmZone) -> Result<UtmProjection, OsmError> {
        let wgs84 = format!("EPSG:{EPSG_WGS84}");
        let utm = format!("EPSG:{}", zone.epsg());
        let to_utm = Proj::new_known_crs(&wgs84, &utm, None).map_err(|e| {
            OsmError::ProjectionError(format!("failure building {wgs84} to {utm} transform: {e}"))
        })?;
        let to_wgs84 = Proj::new_known_crs(&utm, &wgs84, None).map_err(|e| {
            OsmError::ProjectionError(format!("failure building {utm} to {wgs84} transform: {e}"))
        })?;
        Ok(UtmProjection {
            zone,
            to_utm,
            to_wgs84,
        })
    }

    pub fn forward(&self, coord: Coord<f64>) -> Result<Coord<f64>, OsmError> {
        convert(&self.to_utm, coord)
    }

    pub fn inverse(&self, coord: Coord<f64>) -> Result<Coord<f64>, OsmError> {
        convert(&self.to_wgs84, coord)
    }

    pub fn project_line(&self, line: &LineString<f64>) -> Result<LineString<f64>, OsmError> {
        line.try_map_coords(|c| convert(&self.to_utm, c))
    }

    pub fn unproject_polygons(
        &self,
        polygons: &MultiPolygon<f64>,
    ) -> Result<MultiPolygon<f64>, OsmError> {
        polygons.try_map_coords(|c| convert(&self.to_wgs84, c))
    }
}

fn convert(proj: &Proj, coord: Coord<f64>) -> Result<Coord<f64>, OsmError> {
    let (x, y) = proj.convert((coord.x, coord.y)).map_err(|e| {
        OsmError::ProjectionError(format!("failure projecting ({}, {}): {e}", coord.x, coord.y))
    })?;
    Ok(Coord { x, y })
}

#[cfg(test)]
mod tests {
    use super::{UtmProjection, UtmZone};
    use geo::Coord;

    #[test]
    fn test_zone_selection() {
        let denver = UtmZone::from_lon_lat(-104.99, 39.74).unwrap();
        assert_eq!(denver.band, 13);
        assert!(denver.north);
        assert_eq!(denver.epsg(), 32613);

        let sydney = UtmZone::from_lon_lat(151.21, -33.87).unwrap();
        assert_eq!(sydney.band, 56);
        assert_eq!(sydney.epsg(), 32756);

        let antimeridian = UtmZone::from_lon_lat(180.0, 0.0).unwrap();
        assert_eq!(antimeridian.band, 1);
        assert_eq!(UtmZone::from_lon_lat(-180.0, 0.0).unwrap().band, 1);
        assert_eq!(format!("{}", UtmZone::from_lon_lat(2.0, 48.0).unwrap()), "31N (EPSG:32631)");
        assert_eq!(format!("{}", UtmZone::from_lon_lat(-177.0, 10.0).unwrap()), "01N (EPSG:32601)");
    }

    #[test]
    fn test_invalid_coordinate() {
        assert!(UtmZone::from_lon_lat(f64::NAN, 0.0).is_err());
        assert!(UtmZone::from_lon_lat(0.0, 91.0).is_err());
    }

    #[test]
    fn test_forward_known_points() {
        let projection = UtmProjection::new(UtmZone::from_lon_lat(-105.0, 39.0).unwrap()).unwrap();
        let on_meridian = projection.forward(Coord { x: -105.0, y: 0.0 }).unwrap();
        assert!((on_meridian.x - 500_000.0).abs() < 1e-3);
        assert!(on_meridian.y.abs() < 1e-3);

        // lon 0 lies 3 degrees west of the zone 31 central meridian
        let zone31 = UtmProjection::new(UtmZone { band: 31, north: true }).unwrap();
        let west = zone31.forward(Coord { x: 0.0, y: 0.0 }).unwrap();
        assert!((west.x - 166_021.443).abs() < 0.01, "{west:?}");

        let south = UtmProjection::new(UtmZone::from_lon_lat(-105.0, -10.0).unwrap()).unwrap();
        let projected = south.forward(Coord { x: -105.0, y: -10.0 }).unwrap();
        assert!(projected.y < 10_000_000.0 && projected.y > 8_000_000.0);
    }

    #[test]
    fn test_round_trip() {
        let points = [(-104.99, 39.74), (151.21, -33.87), (2.35, 48.86), (-73.0, 0.5)];
        for (lon, lat) in points {
            let projection = UtmProjection::new(UtmZone::from_lon_lat(lon, lat).unwrap()).unwrap();
            let projected = projection.forward(Coord { x: lon, y: lat }).unwrap();
            let back = projection.inverse(projected).unwrap();
            assert!((back.x - lon).abs() < 1e-7, "{lon} => {}", back.x);
            assert!((back.y - lat).abs() < 1e-7, "{lat} => {}", back.y);
        }
    }

    #[test]
    fn test_distances_are_meters() {
        // one degree of latitude near 40N is about 111 km
        let projection = UtmProjection::new(UtmZone::from_lon_lat(-105.0, 40.0).unwrap()).unwrap();
        let a = projection.forward(Coord { x: -105.0, y: 39.5 }).unwrap();
        let b = projection.forward(Coord { x: -105.0, y: 40.5 }).unwrap();
        let d = ((b.x - a.x).powi(2) + (b.y - a.y).powi(2)).sqrt();
        assert!((d - 111_000.0).abs() < 500.0, "{d}");
    }
}

//! Geographic point and geodesic distance module
//!
//! Distances are computed on the WGS-84 ellipsoid and reported in
//! kilometres. Route lengths are the sum of successive point-to-point
//! distances, never a single endpoint-to-endpoint measurement.

mod types;

pub use types::{CoordError, GeoPoint, MAX_LAT, MAX_LON, MIN_LAT, MIN_LON};

use geo::{Distance, Geodesic, Point};

/// Validates a latitude/longitude pair.
pub fn validate(lat: f64, lon: f64) -> Result<(), CoordError> {
    if !(MIN_LAT..=MAX_LAT).contains(&lat) {
        return Err(CoordError::InvalidLatitude(lat));
    }
    if !(MIN_LON..=MAX_LON).contains(&lon) {
        return Err(CoordError::InvalidLongitude(lon));
    }
    Ok(())
}

/// Parses a `"lat,lon"` string into a validated point.
pub fn parse_lat_lon(input: &str) -> Result<GeoPoint, CoordError> {
    let (lat, lon) = input
        .split_once(',')
        .ok_or_else(|| CoordError::Unparseable(input.to_string()))?;

    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|_| CoordError::Unparseable(input.to_string()))?;
    let lon: f64 = lon
        .trim()
        .parse()
        .map_err(|_| CoordError::Unparseable(input.to_string()))?;

    validate(lat, lon)?;
    Ok(GeoPoint::new(lat, lon))
}

/// Geodesic distance between two points in kilometres.
///
/// Elevation is ignored.
#[inline]
pub fn geodesic_distance_km(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let origin = Point::new(a.lon, a.lat);
    let destination = Point::new(b.lon, b.lat);
    Geodesic.distance(origin, destination) / 1000.0
}

/// Total length of a point sequence in kilometres.
///
/// # Errors
///
/// Returns [`CoordError::InsufficientPoints`] for fewer than two points.
pub fn total_distance_km(points: &[GeoPoint]) -> Result<f64, CoordError> {
    if points.len() < 2 {
        return Err(CoordError::InsufficientPoints(points.len()));
    }

    Ok(points
        .windows(2)
        .map(|pair| geodesic_distance_km(&pair[0], &pair[1]))
        .sum())
}

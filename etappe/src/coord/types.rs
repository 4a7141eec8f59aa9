//! Coordinate type definitions

use serde::{Deserialize, Serialize};
use std::fmt;

/// Valid latitude range
pub const MIN_LAT: f64 = -90.0;
pub const MAX_LAT: f64 = 90.0;

/// Valid longitude range
pub const MIN_LON: f64 = -180.0;
pub const MAX_LON: f64 = 180.0;

/// A geographic point with optional elevation.
///
/// Points have no identity beyond value equality. Elevation is in metres
/// above sea level when known.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in decimal degrees
    pub lat: f64,
    /// Longitude in decimal degrees
    pub lon: f64,
    /// Elevation in metres, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation: Option<f64>,
}

impl GeoPoint {
    /// Creates a point without elevation.
    #[inline]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self {
            lat,
            lon,
            elevation: None,
        }
    }

    /// Returns a copy of this point carrying the given elevation.
    #[inline]
    pub fn with_elevation(mut self, elevation: f64) -> Self {
        self.elevation = Some(elevation);
        self
    }

    /// Returns `[lon, lat]`, the axis order used by GeoJSON and most
    /// routing APIs.
    #[inline]
    pub fn lon_lat(&self) -> [f64; 2] {
        [self.lon, self.lat]
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.elevation {
            Some(ele) => write!(f, "{:.5},{:.5} ({:.0} m)", self.lat, self.lon, ele),
            None => write!(f, "{:.5},{:.5}", self.lat, self.lon),
        }
    }
}

/// Errors that can occur during coordinate handling.
#[derive(Debug, Clone, PartialEq)]
pub enum CoordError {
    /// Latitude is outside valid range (-90.0 to 90.0)
    InvalidLatitude(f64),
    /// Longitude is outside valid range (-180.0 to 180.0)
    InvalidLongitude(f64),
    /// Fewer than two points were supplied to a distance calculation
    InsufficientPoints(usize),
    /// A "lat,lon" string could not be parsed
    Unparseable(String),
}

impl fmt::Display for CoordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordError::InvalidLatitude(lat) => {
                write!(
                    f,
                    "Invalid latitude: {} (must be between {} and {})",
                    lat, MIN_LAT, MAX_LAT
                )
            }
            CoordError::InvalidLongitude(lon) => {
                write!(
                    f,
                    "Invalid longitude: {} (must be between {} and {})",
                    lon, MIN_LON, MAX_LON
                )
            }
            CoordError::InsufficientPoints(count) => {
                write!(f, "At least 2 points are required, got {}", count)
            }
            CoordError::Unparseable(input) => {
                write!(f, "Cannot parse '{}' as 'lat,lon'", input)
            }
        }
    }
}

impl std::error::Error for CoordError {}

//! Trip request and plan types

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

use crate::coord::{parse_lat_lon, CoordError, GeoPoint};
use crate::provider::ProviderError;
use crate::segment::{SegmentError, Stage};

/// Default stage length in kilometres.
pub const DEFAULT_STAGE_LENGTH_KM: f64 = 300.0;

/// Errors from trip planning.
#[derive(Debug, Error)]
pub enum TripError {
    #[error("No place found for '{0}'")]
    PlaceNotFound(String),

    #[error("Invalid waypoint: {0}")]
    InvalidWaypoint(String),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Segment(#[from] SegmentError),
}

/// A trip endpoint or stop, given by name or by coordinate.
#[derive(Debug, Clone, PartialEq)]
pub enum Waypoint {
    /// Free text resolved through geocoding, top match only
    Place(String),
    Coordinate(GeoPoint),
}

impl FromStr for Waypoint {
    type Err = TripError;

    /// Parses `"lat,lon"` as a coordinate and anything else as a place name.
    ///
    /// A pair of numbers outside the valid ranges is rejected rather than
    /// geocoded.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(TripError::InvalidWaypoint("empty waypoint".to_string()));
        }
        match parse_lat_lon(trimmed) {
            Ok(point) => Ok(Waypoint::Coordinate(point)),
            Err(CoordError::Unparseable(_)) => Ok(Waypoint::Place(trimmed.to_string())),
            Err(e) => Err(TripError::InvalidWaypoint(e.to_string())),
        }
    }
}

impl fmt::Display for Waypoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Waypoint::Place(name) => write!(f, "{}", name),
            Waypoint::Coordinate(point) => write!(f, "{}", point),
        }
    }
}

/// Start, optional intermediate stops and end of a trip.
#[derive(Debug, Clone, PartialEq)]
pub struct TripRequest {
    pub start: Waypoint,
    pub end: Waypoint,
    pub stops: Vec<Waypoint>,
}

impl TripRequest {
    pub fn new(start: Waypoint, end: Waypoint) -> Self {
        Self {
            start,
            end,
            stops: Vec::new(),
        }
    }

    pub fn with_stops(mut self, stops: Vec<Waypoint>) -> Self {
        self.stops = stops;
        self
    }

    /// All waypoints in travel order.
    pub fn waypoints(&self) -> impl Iterator<Item = &Waypoint> {
        std::iter::once(&self.start)
            .chain(self.stops.iter())
            .chain(std::iter::once(&self.end))
    }
}

/// A waypoint after geocoding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedWaypoint {
    pub label: String,
    pub point: GeoPoint,
}

/// A full route between the waypoints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutePlan {
    pub points: Vec<GeoPoint>,
    pub distance_km: f64,
    pub waypoints: Vec<ResolvedWaypoint>,
}

/// A stage with its elevation samples.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedStage {
    #[serde(flatten)]
    pub stage: Stage,
    /// Elevation samples along the stage, empty when none were available
    pub profile: Vec<f64>,
}

/// A route split into stages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StagePlan {
    pub stages: Vec<PlannedStage>,
    /// Sum of the stage distances in kilometres
    pub total_distance_km: f64,
    pub waypoints: Vec<ResolvedWaypoint>,
}

/// How long each kind of upstream answer stays fresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheTtls {
    pub route: Duration,
    pub elevation: Duration,
    pub geocode: Duration,
}

impl Default for CacheTtls {
    fn default() -> Self {
        Self {
            route: Duration::from_secs(24 * 3600),
            elevation: Duration::from_secs(30 * 24 * 3600),
            geocode: Duration::from_secs(90 * 24 * 3600),
        }
    }
}

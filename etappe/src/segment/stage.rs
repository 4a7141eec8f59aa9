//! Stage value type.

use serde::Serialize;

use crate::coord::GeoPoint;
use crate::elevation::ElevationStats;

/// A contiguous, distance-bounded part of a route.
///
/// A stage holds at least two points. Its last point is the first point of
/// the following stage. Stages are immutable once built; elevation
/// statistics are attached by producing a new value with
/// [`Stage::with_elevation`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stage {
    /// Ordered points of this stage
    pub points: Vec<GeoPoint>,
    /// Accumulated point-to-point distance in kilometres
    pub distance_km: f64,
    /// Elevation statistics, once reconciled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elevation: Option<ElevationStats>,
}

impl Stage {
    pub(crate) fn new(points: Vec<GeoPoint>, distance_km: f64) -> Self {
        debug_assert!(points.len() >= 2, "a stage spans at least one leg");
        Self {
            points,
            distance_km,
            elevation: None,
        }
    }

    /// Returns this stage with elevation statistics attached.
    pub fn with_elevation(self, elevation: ElevationStats) -> Self {
        Self {
            elevation: Some(elevation),
            ..self
        }
    }

    /// First point of the stage.
    pub fn start(&self) -> &GeoPoint {
        &self.points[0]
    }

    /// Last point of the stage, shared with the next stage.
    pub fn end(&self) -> &GeoPoint {
        &self.points[self.points.len() - 1]
    }
}

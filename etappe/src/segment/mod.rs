//! Distance-bounded route segmentation.
//!
//! Splits a route into stages of at least a threshold length. The walk
//! accumulates geodesic distance leg by leg; once the running total reaches
//! the threshold the stage is closed at the current point and the next
//! stage starts from that same point.
//!
//! Stage distances are sums of raw leg distances, so the stage totals add up
//! to the route total exactly as the legs were measured.

mod stage;

pub use stage::Stage;

use thiserror::Error;
use tracing::debug;

use crate::coord::{geodesic_distance_km, GeoPoint};

/// Errors raised by segmentation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SegmentError {
    /// Fewer than two points were supplied.
    #[error("Segmentation needs at least 2 points, got {0}")]
    InsufficientPoints(usize),

    /// The stage threshold is not a number.
    #[error("Stage threshold must be a number, got {0}")]
    InvalidThreshold(f64),
}

/// Splits `points` into stages of at least `threshold_km`.
///
/// The final stage may be shorter than the threshold. A threshold of zero or
/// less closes a stage after every leg.
///
/// # Errors
///
/// Returns [`SegmentError::InsufficientPoints`] when fewer than two points are
/// given, and [`SegmentError::InvalidThreshold`] for a NaN threshold.
pub fn segment(points: &[GeoPoint], threshold_km: f64) -> Result<Vec<Stage>, SegmentError> {
    if points.len() < 2 {
        return Err(SegmentError::InsufficientPoints(points.len()));
    }
    if threshold_km.is_nan() {
        return Err(SegmentError::InvalidThreshold(threshold_km));
    }

    let last = points.len() - 1;
    let mut stages = Vec::new();
    let mut current = vec![points[0]];
    let mut distance = 0.0;

    for i in 1..points.len() {
        distance += geodesic_distance_km(&points[i - 1], &points[i]);
        current.push(points[i]);

        if distance >= threshold_km || i == last {
            let finished = std::mem::replace(&mut current, vec![points[i]]);
            stages.push(Stage::new(finished, distance));
            distance = 0.0;
        }
    }

    debug!(
        points = points.len(),
        threshold_km = threshold_km,
        stages = stages.len(),
        "Route segmented"
    );

    Ok(stages)
}

//! Elevation profiles and statistics.
//!
//! [`ElevationReconciler`] turns a point sequence into an
//! [`ElevationProfile`], querying a line-shaped source, then a point-shaped
//! one, through the cache. [`ElevationStats`] summarizes a profile, and
//! [`estimate_from_distance`] provides the synthetic substitute callers use
//! when a profile comes back empty.

mod config;
mod reconcile;
mod stats;

pub use config::{
    downsample, ElevationConfig, GradientBands, DEFAULT_GRADIENT_EDGES, DEFAULT_SAMPLE_STRIDE,
    DEFAULT_SAMPLE_THRESHOLD,
};
pub use reconcile::{ElevationProfile, ElevationReconciler, ElevationTier};
pub use stats::{
    estimate_from_distance, BandCount, ElevationStats, GradientBreakdown,
    ESTIMATED_CLIMB_M_PER_KM,
};

use thiserror::Error;

/// Errors from elevation statistics and configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ElevationError {
    #[error("Elevation statistics need at least 2 samples, got {0}")]
    InsufficientPoints(usize),

    #[error("Invalid gradient bands: {0}")]
    InvalidBands(String),
}

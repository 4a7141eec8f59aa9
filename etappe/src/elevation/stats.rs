//! Aggregate statistics over an elevation profile.

use serde::Serialize;

use super::config::GradientBands;
use super::ElevationError;

/// Climb assumed per kilometre when no elevation data is available.
pub const ESTIMATED_CLIMB_M_PER_KM: f64 = 8.0;

/// Number of profile segments whose elevation delta falls in one band.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BandCount {
    /// Inclusive lower edge in metres
    pub lower_m: f64,
    /// Exclusive upper edge in metres, `None` for the open top band
    pub upper_m: Option<f64>,
    pub segments: usize,
}

/// Per-band segment counts of a profile.
///
/// With the default edges the three bands read as mild, steep and very
/// steep.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GradientBreakdown {
    pub bands: Vec<BandCount>,
}

impl GradientBreakdown {
    fn from_deltas(deltas: impl Iterator<Item = f64>, bands: &GradientBands) -> Self {
        let edges = bands.edges();
        let mut counts = vec![0usize; bands.band_count()];
        for delta in deltas {
            counts[bands.band_of(delta)] += 1;
        }

        let bands = counts
            .into_iter()
            .enumerate()
            .map(|(i, segments)| BandCount {
                lower_m: if i == 0 { 0.0 } else { edges[i - 1] },
                upper_m: edges.get(i).copied(),
                segments,
            })
            .collect();
        Self { bands }
    }

    /// Segment count of band `index`, zero when out of range.
    pub fn count(&self, index: usize) -> usize {
        self.bands.get(index).map_or(0, |b| b.segments)
    }

    /// Total number of segments across all bands.
    pub fn total(&self) -> usize {
        self.bands.iter().map(|b| b.segments).sum()
    }
}

/// Elevation summary of a stage or route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElevationStats {
    /// Sum of positive deltas in metres
    pub gain_m: f64,
    /// Sum of negative deltas as a positive number of metres
    pub loss_m: f64,
    pub min_m: f64,
    pub max_m: f64,
    pub gradients: GradientBreakdown,
    /// True when derived from distance rather than measured samples
    pub estimated: bool,
}

impl ElevationStats {
    /// Computes statistics over measured elevation samples.
    ///
    /// # Errors
    ///
    /// Returns [`ElevationError::InsufficientPoints`] for fewer than two
    /// samples.
    pub fn from_profile(profile: &[f64], bands: &GradientBands) -> Result<Self, ElevationError> {
        if profile.len() < 2 {
            return Err(ElevationError::InsufficientPoints(profile.len()));
        }

        let deltas = || profile.windows(2).map(|w| w[1] - w[0]);
        let gain_m = deltas().filter(|d| *d > 0.0).sum();
        let loss_m = deltas().filter(|d| *d < 0.0).map(f64::abs).sum();
        let min_m = profile.iter().copied().fold(f64::INFINITY, f64::min);
        let max_m = profile.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Ok(Self {
            gain_m,
            loss_m,
            min_m,
            max_m,
            gradients: GradientBreakdown::from_deltas(deltas(), bands),
            estimated: false,
        })
    }
}

/// Synthetic statistics for a stretch with no elevation data.
///
/// Gain and loss are both [`ESTIMATED_CLIMB_M_PER_KM`] per kilometre; min,
/// max and the gradient breakdown are unknown and left at zero.
pub fn estimate_from_distance(distance_km: f64) -> ElevationStats {
    let climb = distance_km.max(0.0) * ESTIMATED_CLIMB_M_PER_KM;
    ElevationStats {
        gain_m: climb,
        loss_m: climb,
        min_m: 0.0,
        max_m: 0.0,
        gradients: GradientBreakdown::default(),
        estimated: true,
    }
}

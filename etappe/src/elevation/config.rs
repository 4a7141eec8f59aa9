//! Sampling and banding parameters.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::ElevationError;
use crate::coord::GeoPoint;

/// Default sampling stride: every 10th point is queried.
pub const DEFAULT_SAMPLE_STRIDE: usize = 10;

/// Default sampling threshold: sequences up to this length are not thinned.
pub const DEFAULT_SAMPLE_THRESHOLD: usize = 10;

/// Default gradient band edges in metres.
pub const DEFAULT_GRADIENT_EDGES: [f64; 2] = [5.0, 15.0];

/// Ascending edges that split per-segment elevation deltas into bands.
///
/// `N` edges produce `N + 1` bands. A delta below the first edge falls in
/// band 0; a delta equal to an edge belongs to the band above it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradientBands {
    edges: Vec<f64>,
}

impl GradientBands {
    /// Creates bands from strictly ascending, finite, non-negative edges.
    pub fn new(edges: Vec<f64>) -> Result<Self, ElevationError> {
        if edges.iter().any(|e| !e.is_finite() || *e < 0.0) {
            return Err(ElevationError::InvalidBands(format!(
                "edges must be finite and non-negative: {:?}",
                edges
            )));
        }
        if edges.windows(2).any(|w| w[0] >= w[1]) {
            return Err(ElevationError::InvalidBands(format!(
                "edges must be strictly ascending: {:?}",
                edges
            )));
        }
        Ok(Self { edges })
    }

    /// The band edges in metres.
    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    /// Number of bands, one more than the number of edges.
    pub fn band_count(&self) -> usize {
        self.edges.len() + 1
    }

    /// Index of the band an absolute elevation delta falls into.
    pub fn band_of(&self, delta_m: f64) -> usize {
        let magnitude = delta_m.abs();
        self.edges.iter().take_while(|edge| magnitude >= **edge).count()
    }
}

impl Default for GradientBands {
    fn default() -> Self {
        Self {
            edges: DEFAULT_GRADIENT_EDGES.to_vec(),
        }
    }
}

impl FromStr for GradientBands {
    type Err = ElevationError;

    /// Parses a comma separated list such as `"5,15"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let edges = s
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| {
                part.parse::<f64>()
                    .map_err(|_| ElevationError::InvalidBands(format!("not a number: {}", part)))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(edges)
    }
}

impl fmt::Display for GradientBands {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.edges.iter().map(|e| e.to_string()).collect();
        write!(f, "{}", parts.join(","))
    }
}

/// Elevation reconciliation settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ElevationConfig {
    /// Keep every `sample_stride`-th point when thinning
    pub sample_stride: usize,
    /// Thin only sequences longer than this
    pub sample_threshold: usize,
    /// Band edges for the gradient breakdown
    pub gradient_bands: GradientBands,
}

impl Default for ElevationConfig {
    fn default() -> Self {
        Self {
            sample_stride: DEFAULT_SAMPLE_STRIDE,
            sample_threshold: DEFAULT_SAMPLE_THRESHOLD,
            gradient_bands: GradientBands::default(),
        }
    }
}

/// Thins a point sequence before querying elevation.
///
/// Sequences longer than the threshold keep every `stride`-th point starting
/// with the first. The final point is always kept so the profile spans the
/// whole sequence. A stride of zero is treated as one.
pub fn downsample(points: &[GeoPoint], config: &ElevationConfig) -> Vec<GeoPoint> {
    if points.len() <= config.sample_threshold {
        return points.to_vec();
    }

    let stride = config.sample_stride.max(1);
    let mut sampled: Vec<GeoPoint> = points.iter().step_by(stride).copied().collect();
    if (points.len() - 1) % stride != 0 {
        sampled.extend(points.last().copied());
    }
    sampled
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(n: usize) -> Vec<GeoPoint> {
        (0..n).map(|i| GeoPoint::new(47.0, 11.0 + i as f64 * 0.01)).collect()
    }

    #[test]
    fn test_short_sequence_is_untouched() {
        let points = line(10);
        assert_eq!(downsample(&points, &ElevationConfig::default()), points);
    }

    #[test]
    fn test_long_sequence_keeps_stride_and_last() {
        let points = line(25);
        let sampled = downsample(&points, &ElevationConfig::default());

        // 0, 10, 20 plus the final point 24
        assert_eq!(sampled.len(), 4);
        assert_eq!(sampled[0], points[0]);
        assert_eq!(sampled[1], points[10]);
        assert_eq!(sampled[2], points[20]);
        assert_eq!(sampled[3], points[24]);
    }

    #[test]
    fn test_last_point_not_duplicated_on_stride_boundary() {
        let points = line(21);
        let sampled = downsample(&points, &ElevationConfig::default());
        assert_eq!(sampled, vec![points[0], points[10], points[20]]);
    }

    #[test]
    fn test_custom_stride_and_threshold() {
        let config = ElevationConfig {
            sample_stride: 3,
            sample_threshold: 4,
            ..ElevationConfig::default()
        };
        let sampled = downsample(&line(8), &config);
        assert_eq!(sampled.len(), 4); // 0, 3, 6, 7
    }

    #[test]
    fn test_zero_stride_keeps_everything() {
        let config = ElevationConfig {
            sample_stride: 0,
            sample_threshold: 0,
            ..ElevationConfig::default()
        };
        assert_eq!(downsample(&line(5), &config).len(), 5);
    }

    #[test]
    fn test_empty_input() {
        assert!(downsample(&[], &ElevationConfig::default()).is_empty());
    }

    #[test]
    fn test_band_of_edges() {
        let bands = GradientBands::default();
        assert_eq!(bands.band_count(), 3);
        assert_eq!(bands.band_of(0.0), 0);
        assert_eq!(bands.band_of(4.99), 0);
        assert_eq!(bands.band_of(5.0), 1);
        assert_eq!(bands.band_of(-14.9), 1);
        assert_eq!(bands.band_of(15.0), 2);
        assert_eq!(bands.band_of(-120.0), 2);
    }

    #[test]
    fn test_parse_bands() {
        let bands: GradientBands = " 2, 8 ,20".parse().unwrap();
        assert_eq!(bands.edges(), &[2.0, 8.0, 20.0]);
        assert_eq!(bands.to_string(), "2,8,20");
    }

    #[test]
    fn test_empty_bands_are_one_band() {
        let bands: GradientBands = "".parse().unwrap();
        assert_eq!(bands.band_count(), 1);
        assert_eq!(bands.band_of(1000.0), 0);
    }

    #[test]
    fn test_reject_invalid_bands() {
        assert!("15,5".parse::<GradientBands>().is_err());
        assert!("5,5".parse::<GradientBands>().is_err());
        assert!("-1".parse::<GradientBands>().is_err());
        assert!("five".parse::<GradientBands>().is_err());
    }
}

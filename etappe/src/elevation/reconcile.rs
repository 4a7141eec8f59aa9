//! Tiered elevation lookup.
//!
//! A profile is fetched from the line tier first and from the point tier if
//! the line tier yields nothing usable. A tier is usable only when it
//! returns a finite value for every sampled point. When both tiers fail the
//! result is an empty profile; choosing a substitute is left to the caller.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::config::{downsample, ElevationConfig};
use crate::cache::{CacheStore, Category};
use crate::coord::GeoPoint;
use crate::provider::ElevationSource;

/// Which query shape produced a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElevationTier {
    Line,
    Point,
}

impl ElevationTier {
    fn category(self) -> Category {
        match self {
            ElevationTier::Line => Category::ELEVATION_LINE,
            ElevationTier::Point => Category::ELEVATION_POINT,
        }
    }
}

impl fmt::Display for ElevationTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElevationTier::Line => write!(f, "line"),
            ElevationTier::Point => write!(f, "point"),
        }
    }
}

/// Elevation samples aligned with a (possibly downsampled) point sequence.
///
/// An empty profile means no tier produced data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElevationProfile {
    /// Sampled points, each carrying its elevation
    pub samples: Vec<GeoPoint>,
    /// Tier the samples came from, `None` when empty
    pub tier: Option<ElevationTier>,
}

impl ElevationProfile {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Elevation values in sample order.
    pub fn elevations(&self) -> Vec<f64> {
        self.samples.iter().filter_map(|p| p.elevation).collect()
    }
}

/// Fetches elevation profiles through the cache with tiered fallback.
pub struct ElevationReconciler<S: ElevationSource> {
    source: S,
    cache: CacheStore,
    ttl: Duration,
    config: ElevationConfig,
}

impl<S: ElevationSource> ElevationReconciler<S> {
    /// Creates a reconciler caching upstream answers for `ttl`.
    pub fn new(source: S, cache: CacheStore, ttl: Duration, config: ElevationConfig) -> Self {
        Self {
            source,
            cache,
            ttl,
            config,
        }
    }

    pub fn config(&self) -> &ElevationConfig {
        &self.config
    }

    /// Returns the elevation profile of `points`.
    ///
    /// Never fails: upstream errors and incomplete answers fall through to
    /// the next tier, and exhausting all tiers yields an empty profile.
    pub fn profile(&self, points: &[GeoPoint]) -> ElevationProfile {
        let sampled = downsample(points, &self.config);
        if sampled.is_empty() {
            return ElevationProfile::empty();
        }

        for tier in [ElevationTier::Line, ElevationTier::Point] {
            if let Some(elevations) = self.query(tier, &sampled) {
                debug!(
                    tier = %tier,
                    points = points.len(),
                    samples = sampled.len(),
                    "Elevation profile resolved"
                );
                let samples = sampled
                    .iter()
                    .zip(elevations)
                    .map(|(point, ele)| point.with_elevation(ele))
                    .collect();
                return ElevationProfile {
                    samples,
                    tier: Some(tier),
                };
            }
        }

        info!(samples = sampled.len(), "No elevation data from any tier");
        ElevationProfile::empty()
    }

    fn query(&self, tier: ElevationTier, sampled: &[GeoPoint]) -> Option<Vec<f64>> {
        let request = match tier {
            ElevationTier::Line => self.source.line_request(sampled),
            ElevationTier::Point => self.source.point_request(sampled),
        };

        let result = self
            .cache
            .get_or_fetch(tier.category(), &request, self.ttl, || match tier {
                ElevationTier::Line => self.source.line(sampled),
                ElevationTier::Point => self.source.point(sampled),
            });

        let values = match result {
            Ok(values) => values,
            Err(e) => {
                warn!(tier = %tier, error = %e, "Elevation tier failed");
                return None;
            }
        };

        let usable = usable_values(&values, sampled.len());
        if usable.is_none() {
            warn!(
                tier = %tier,
                expected = sampled.len(),
                returned = values.len(),
                missing = values.iter().filter(|v| v.is_none()).count(),
                "Elevation tier returned incomplete data"
            );
        }
        usable
    }
}

/// All values, provided there is a finite one for each of `expected` points.
fn usable_values(values: &[Option<f64>], expected: usize) -> Option<Vec<f64>> {
    if values.len() != expected {
        return None;
    }
    values
        .iter()
        .map(|v| v.filter(|e| e.is_finite()))
        .collect()
}

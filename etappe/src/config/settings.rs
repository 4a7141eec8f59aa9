//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.
//! These are pure data types with no parsing or serialization logic.

use std::path::PathBuf;
use std::time::Duration;

use crate::elevation::{ElevationConfig, GradientBands};
use crate::trip::CacheTtls;

const HOUR: u64 = 3600;
const DAY: u64 = 24 * HOUR;

/// Complete application configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    /// Upstream provider settings
    pub provider: ProviderSettings,
    /// Cache location and lifetimes
    pub cache: CacheSettings,
    /// Elevation sampling and gradient bands
    pub elevation: ElevationSettings,
    /// Stage planning
    pub stages: StagesSettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

/// Upstream provider configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderSettings {
    /// openrouteservice API key, sent as the Authorization header
    pub api_key: Option<String>,
    /// Base URL of the provider API
    pub base_url: String,
    /// Routing profile, e.g. `driving-car` or `driving-hgv`
    pub profile: String,
    /// Timeout in seconds for HTTP requests
    pub timeout: u64,
}

impl ProviderSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

/// Cache configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheSettings {
    /// Cache root directory
    pub directory: PathBuf,
    /// Entries older than this many days are removed by the cleanup sweep
    pub lifetime_days: u64,
    /// Freshness of cached routes in hours
    pub route_ttl_hours: u64,
    /// Freshness of cached elevation data in days
    pub elevation_ttl_days: u64,
    /// Freshness of cached geocoding answers in days
    pub geocode_ttl_days: u64,
}

impl CacheSettings {
    /// Maximum entry age kept by the cleanup sweep.
    pub fn lifetime(&self) -> Duration {
        Duration::from_secs(self.lifetime_days * DAY)
    }

    /// Per-category freshness windows.
    pub fn ttls(&self) -> CacheTtls {
        CacheTtls {
            route: Duration::from_secs(self.route_ttl_hours * HOUR),
            elevation: Duration::from_secs(self.elevation_ttl_days * DAY),
            geocode: Duration::from_secs(self.geocode_ttl_days * DAY),
        }
    }
}

/// Elevation configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ElevationSettings {
    /// Keep every Nth point when thinning long stages
    pub sample_stride: usize,
    /// Only stages with more points than this are thinned
    pub sample_threshold: usize,
    /// Gradient band edges in metres
    pub gradient_bands: GradientBands,
}

impl ElevationSettings {
    pub fn to_config(&self) -> ElevationConfig {
        ElevationConfig {
            sample_stride: self.sample_stride,
            sample_threshold: self.sample_threshold,
            gradient_bands: self.gradient_bands.clone(),
        }
    }
}

/// Stage planning configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct StagesSettings {
    /// Target stage length in kilometres
    pub length_km: f64,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    /// Log directory
    pub directory: PathBuf,
    /// Log file name within the directory
    pub file: String,
}

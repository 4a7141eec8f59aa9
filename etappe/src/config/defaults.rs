//! Default values for every configuration key.

use std::path::PathBuf;

use super::settings::*;
use crate::elevation::{GradientBands, DEFAULT_SAMPLE_STRIDE, DEFAULT_SAMPLE_THRESHOLD};
use crate::provider::{DEFAULT_PROFILE, DEFAULT_TIMEOUT_SECS};
use crate::trip::DEFAULT_STAGE_LENGTH_KM;

/// Default openrouteservice API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.openrouteservice.org";

/// Default cache entry lifetime (30 days).
pub const DEFAULT_CACHE_LIFETIME_DAYS: u64 = 30;

/// Default route freshness (24 hours).
pub const DEFAULT_ROUTE_TTL_HOURS: u64 = 24;

/// Default elevation freshness (30 days).
pub const DEFAULT_ELEVATION_TTL_DAYS: u64 = 30;

/// Default geocoding freshness (90 days). Place names rarely move.
pub const DEFAULT_GEOCODE_TTL_DAYS: u64 = 90;

/// Default log directory, relative to the working directory.
pub const DEFAULT_LOG_DIRECTORY: &str = "logs";

/// Default log file name.
pub const DEFAULT_LOG_FILE: &str = "etappe.log";

/// Default cache root: the platform cache directory plus `etappe`.
pub fn default_cache_directory() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("etappe")
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            provider: ProviderSettings {
                api_key: None,
                base_url: DEFAULT_BASE_URL.to_string(),
                profile: DEFAULT_PROFILE.to_string(),
                timeout: DEFAULT_TIMEOUT_SECS,
            },
            cache: CacheSettings {
                directory: default_cache_directory(),
                lifetime_days: DEFAULT_CACHE_LIFETIME_DAYS,
                route_ttl_hours: DEFAULT_ROUTE_TTL_HOURS,
                elevation_ttl_days: DEFAULT_ELEVATION_TTL_DAYS,
                geocode_ttl_days: DEFAULT_GEOCODE_TTL_DAYS,
            },
            elevation: ElevationSettings {
                sample_stride: DEFAULT_SAMPLE_STRIDE,
                sample_threshold: DEFAULT_SAMPLE_THRESHOLD,
                gradient_bands: GradientBands::default(),
            },
            stages: StagesSettings {
                length_km: DEFAULT_STAGE_LENGTH_KM,
            },
            logging: LoggingSettings {
                directory: PathBuf::from(DEFAULT_LOG_DIRECTORY),
                file: DEFAULT_LOG_FILE.to_string(),
            },
        }
    }
}

//! INI serialization logic for converting `ConfigFile` → INI string.
//!
//! This module contains the `to_config_string()` function that produces
//! the commented INI representation written to `config.ini`.

use std::path::Path;

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let api_key = config.provider.api_key.as_deref().unwrap_or("");

    format!(
        r#"[provider]
; openrouteservice API key, sent as the Authorization header
; Get one at: https://openrouteservice.org/dev/#/signup
api_key = {}
; Base URL of the provider API (override for a self-hosted instance)
base_url = {}
; Routing profile: driving-car, driving-hgv, cycling-regular, foot-hiking, ...
profile = {}
; HTTP request timeout in seconds
timeout = {}

[cache]
; Cache root directory. Each category is stored in its own subdirectory
directory = {}
; Cleanup sweep removes entries older than this many days
lifetime_days = {}
; Routes are refetched after this many hours
route_ttl_hours = {}
; Elevation data is refetched after this many days
elevation_ttl_days = {}
; Geocoding answers are refetched after this many days
geocode_ttl_days = {}

[elevation]
; Stages with more points than sample_threshold are thinned to every
; sample_stride-th point before elevation lookups
sample_stride = {}
sample_threshold = {}
; Gradient band edges in metres, ascending and comma separated.
; "5,15" counts segments climbing or descending <5 m, 5-15 m and >=15 m
gradient_bands = {}

[stages]
; Target stage length in kilometres (0 or less: one stage per leg)
length_km = {}

[logging]
; Log directory and file name. The file is truncated on each start
directory = {}
file = {}
"#,
        api_key,
        config.provider.base_url,
        config.provider.profile,
        config.provider.timeout,
        path_to_string(&config.cache.directory),
        config.cache.lifetime_days,
        config.cache.route_ttl_hours,
        config.cache.elevation_ttl_days,
        config.cache.geocode_ttl_days,
        config.elevation.sample_stride,
        config.elevation.sample_threshold,
        config.elevation.gradient_bands,
        config.stages.length_km,
        path_to_string(&config.logging.directory),
        config.logging.file,
    )
}

/// Convert a path to a string, replacing home directory with ~.
pub(super) fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}

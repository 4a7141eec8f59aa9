//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This module contains the `parse_ini()` function and its helpers.
//! It is the single place where INI key names are mapped to struct fields.

use std::path::PathBuf;
use std::str::FromStr;

use ini::{Ini, Properties};

use super::file::ConfigFileError;
use super::settings::ConfigFile;
use crate::elevation::GradientBands;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [provider] section
    if let Some(section) = ini.section(Some("provider")) {
        if let Some(v) = non_empty(section, "api_key") {
            config.provider.api_key = Some(v.to_string());
        }
        if let Some(v) = non_empty(section, "base_url") {
            if !v.starts_with("http://") && !v.starts_with("https://") {
                return Err(invalid("provider", "base_url", v, "must be an http(s) URL"));
            }
            config.provider.base_url = v.trim_end_matches('/').to_string();
        }
        if let Some(v) = non_empty(section, "profile") {
            config.provider.profile = v.to_string();
        }
        if let Some(v) = section.get("timeout") {
            config.provider.timeout =
                parse_positive(v, "provider", "timeout", "must be a positive integer (seconds)")?;
        }
    }

    // [cache] section
    if let Some(section) = ini.section(Some("cache")) {
        if let Some(v) = non_empty(section, "directory") {
            config.cache.directory = expand_tilde(v);
        }
        if let Some(v) = section.get("lifetime_days") {
            config.cache.lifetime_days =
                parse_positive(v, "cache", "lifetime_days", "must be a positive integer (days)")?;
        }
        if let Some(v) = section.get("route_ttl_hours") {
            config.cache.route_ttl_hours = parse_positive(
                v,
                "cache",
                "route_ttl_hours",
                "must be a positive integer (hours)",
            )?;
        }
        if let Some(v) = section.get("elevation_ttl_days") {
            config.cache.elevation_ttl_days = parse_positive(
                v,
                "cache",
                "elevation_ttl_days",
                "must be a positive integer (days)",
            )?;
        }
        if let Some(v) = section.get("geocode_ttl_days") {
            config.cache.geocode_ttl_days = parse_positive(
                v,
                "cache",
                "geocode_ttl_days",
                "must be a positive integer (days)",
            )?;
        }
    }

    // [elevation] section
    if let Some(section) = ini.section(Some("elevation")) {
        if let Some(v) = section.get("sample_stride") {
            config.elevation.sample_stride =
                parse_positive(v, "elevation", "sample_stride", "must be a positive integer")?;
        }
        if let Some(v) = section.get("sample_threshold") {
            config.elevation.sample_threshold =
                parse_value(v, "elevation", "sample_threshold", "must be an integer")?;
        }
        if let Some(v) = section.get("gradient_bands") {
            config.elevation.gradient_bands =
                v.parse::<GradientBands>()
                    .map_err(|e| invalid("elevation", "gradient_bands", v, &e.to_string()))?;
        }
    }

    // [stages] section
    if let Some(section) = ini.section(Some("stages")) {
        if let Some(v) = section.get("length_km") {
            // Zero or less is valid and yields one stage per leg
            let length: f64 = parse_value(v, "stages", "length_km", "must be a number")?;
            if !length.is_finite() {
                return Err(invalid("stages", "length_km", v, "must be a finite number"));
            }
            config.stages.length_km = length;
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = non_empty(section, "directory") {
            config.logging.directory = expand_tilde(v);
        }
        if let Some(v) = non_empty(section, "file") {
            config.logging.file = v.to_string();
        }
    }

    Ok(config)
}

/// Trimmed value of `key`, or `None` when missing or blank.
fn non_empty<'a>(section: &'a Properties, key: &str) -> Option<&'a str> {
    section.get(key).map(str::trim).filter(|v| !v.is_empty())
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_value<T: FromStr>(
    value: &str,
    section: &str,
    key: &str,
    reason: &str,
) -> Result<T, ConfigFileError> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid(section, key, value, reason))
}

fn parse_positive<T>(value: &str, section: &str, key: &str, reason: &str) -> Result<T, ConfigFileError>
where
    T: FromStr + PartialOrd + Default,
{
    let parsed: T = parse_value(value, section, key, reason)?;
    if parsed <= T::default() {
        return Err(invalid(section, key, value, reason));
    }
    Ok(parsed)
}

/// Expand ~ to home directory in paths.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

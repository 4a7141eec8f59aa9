//! CLI runner for common setup and operations.
//!
//! Encapsulates config loading, logging initialization, the opportunistic
//! cache sweep and planner construction so command handlers stay small.

use std::path::Path;

use etappe::cache::CacheStore;
use etappe::config::ConfigFile;
use etappe::logging::{init_logging, LoggingGuard};
use etappe::provider::{OrsElevation, OrsGeocoding, OrsRouting, ReqwestClient};
use etappe::trip::TripPlanner;
use tracing::{info, warn};

use crate::error::CliError;

/// Planner over the live openrouteservice endpoints.
pub type CliPlanner = TripPlanner<
    OrsRouting<ReqwestClient>,
    OrsElevation<ReqwestClient>,
    OrsGeocoding<ReqwestClient>,
>;

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    _logging_guard: LoggingGuard,
    /// Loaded configuration file
    config: ConfigFile,
    cache: CacheStore,
}

impl CliRunner {
    /// Load config, start logging and sweep the cache if a sweep is due.
    pub fn new(config_path: Option<&Path>) -> Result<Self, CliError> {
        let runner = Self::without_sweep(config_path)?;
        runner.sweep_if_due();
        Ok(runner)
    }

    /// Same as [`CliRunner::new`] but leaves the cache untouched.
    pub fn without_sweep(config_path: Option<&Path>) -> Result<Self, CliError> {
        let config = match config_path {
            Some(path) => ConfigFile::load_from(path)?,
            None => ConfigFile::load()?,
        };

        let logging_guard = init_logging(&config.logging.directory, &config.logging.file)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;
        info!("etappe v{}", etappe::VERSION);

        let cache = CacheStore::open(&config.cache.directory)?;

        Ok(Self {
            _logging_guard: logging_guard,
            config,
            cache,
        })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    /// Build a planner over the configured provider and cache.
    pub fn planner(&self) -> Result<CliPlanner, CliError> {
        let provider = &self.config.provider;
        if provider.api_key.is_none() {
            warn!("No api_key configured; the public openrouteservice API will reject requests");
        }

        let http_client = ReqwestClient::with_timeout(provider.timeout(), provider.api_key.as_deref())?;

        Ok(TripPlanner::new(
            OrsRouting::new(http_client.clone(), &provider.base_url, &provider.profile),
            OrsElevation::new(http_client.clone(), &provider.base_url),
            OrsGeocoding::new(http_client, &provider.base_url),
            self.cache.clone(),
            self.config.cache.ttls(),
            self.config.elevation.to_config(),
        ))
    }

    /// A failed sweep never stops the command.
    fn sweep_if_due(&self) {
        let sweeper = self.cache.sweeper(self.config.cache.lifetime());
        if let Err(e) = sweeper.sweep_if_due() {
            warn!(error = %e, "Startup cache cleanup failed");
        }
    }
}

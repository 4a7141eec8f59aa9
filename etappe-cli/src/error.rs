//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;

use etappe::cache::CacheError;
use etappe::config::ConfigFileError;
use etappe::provider::ProviderError;
use etappe::trip::TripError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration file could not be read or written
    Config(ConfigFileError),
    /// Config file already exists and `--force` was not given
    ConfigExists(String),
    /// Cache directory operation failed
    Cache(CacheError),
    /// Failed to set up the HTTP client
    Provider(ProviderError),
    /// Planning failed
    Trip(TripError),
    /// Argument that clap accepted but the library rejects
    InvalidInput(String),
    /// Failed to serialize JSON output
    Output(serde_json::Error),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Trip(TripError::Provider(ProviderError::UpstreamUnavailable(_))) => {
                eprintln!();
                eprintln!("The routing service could not be reached. Check that:");
                eprintln!("  1. api_key is set in the [provider] section of config.ini");
                eprintln!("  2. base_url points at a reachable openrouteservice instance");
                eprintln!("Previously planned routes are still served from the cache.");
            }
            CliError::ConfigExists(_) => {
                eprintln!("Use 'etappe config init --force' to overwrite it.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(e) => write!(f, "Configuration error: {}", e),
            CliError::ConfigExists(path) => write!(f, "Config file already exists: {}", path),
            CliError::Cache(e) => write!(f, "Cache error: {}", e),
            CliError::Provider(e) => write!(f, "Failed to create HTTP client: {}", e),
            CliError::Trip(e) => write!(f, "{}", e),
            CliError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            CliError::Output(e) => write!(f, "Failed to write JSON output: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) => Some(e),
            CliError::Cache(e) => Some(e),
            CliError::Provider(e) => Some(e),
            CliError::Trip(e) => Some(e),
            CliError::Output(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e)
    }
}

impl From<CacheError> for CliError {
    fn from(e: CacheError) -> Self {
        CliError::Cache(e)
    }
}

impl From<ProviderError> for CliError {
    fn from(e: ProviderError) -> Self {
        CliError::Provider(e)
    }
}

impl From<TripError> for CliError {
    fn from(e: TripError) -> Self {
        CliError::Trip(e)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Output(e)
    }
}

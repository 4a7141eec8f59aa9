//! User configuration stored in `~/.etappe/config.ini`.
//!
//! The file is INI with one section per concern:
//!
//! ```ini
//! [provider]
//! api_key = ...
//! profile = driving-car
//!
//! [cache]
//! lifetime_days = 30
//!
//! [stages]
//! length_km = 300
//! ```
//!
//! Missing files and missing keys fall back to the values in [`defaults`].

mod defaults;
mod file;
mod parser;
mod settings;
mod writer;

pub use defaults::*;
pub use file::{config_file_path, ConfigFileError};
pub use settings::{
    CacheSettings, ConfigFile, ElevationSettings, LoggingSettings, ProviderSettings,
    StagesSettings,
};

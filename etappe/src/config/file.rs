//! Reading and writing `config.ini` on disk.
//!
//! An absent file is not an error: every setting has a default, so a fresh
//! install plans trips as soon as an API key is supplied on the command line
//! or written into the `[provider]` section.

use ini::Ini;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::parser::parse_ini;
use super::settings::ConfigFile;
use super::writer::to_config_string;

const CONFIG_DIR_NAME: &str = ".etappe";
const CONFIG_FILE_NAME: &str = "config.ini";

#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// Unreadable file or malformed INI
    #[error("Cannot read configuration: {0}")]
    ReadError(#[from] ini::Error),

    #[error("Cannot write configuration: {0}")]
    WriteError(String),

    /// A key is present but its value is unusable
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },

    #[error("Cannot create configuration directory: {0}")]
    DirectoryError(io::Error),
}

impl ConfigFile {
    /// Settings from `~/.etappe/config.ini`, or the defaults when it is absent.
    pub fn load() -> Result<Self, ConfigFileError> {
        Self::load_from(&config_file_path())
    }

    /// Settings from `path`, or the defaults when it is absent.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        match path.try_exists() {
            Ok(true) => parse_ini(&Ini::load_from_file(path)?),
            Ok(false) => Ok(Self::default()),
            Err(e) => Err(ConfigFileError::ReadError(ini::Error::Io(e))),
        }
    }

    /// Writes the commented INI form to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigFileError> {
        match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => {
                std::fs::create_dir_all(dir).map_err(ConfigFileError::DirectoryError)?
            }
            _ => {}
        }
        std::fs::write(path, self.to_ini_string())
            .map_err(|e| ConfigFileError::WriteError(format!("{}: {}", path.display(), e)))
    }

    pub fn to_ini_string(&self) -> String {
        to_config_string(self)
    }
}

/// `~/.etappe/config.ini`; relative to the working directory when there is no home.
pub fn config_file_path() -> PathBuf {
    let dir = match dirs::home_dir() {
        Some(home) => home.join(CONFIG_DIR_NAME),
        None => PathBuf::from(CONFIG_DIR_NAME),
    };
    dir.join(CONFIG_FILE_NAME)
}

//! Configuration for the folio portfolio.
//!
//! Settings and page content are read from a TOML file. Every field has a
//! default, so a partial file (or none at all) still yields a full page.

mod error;
mod profile;
mod settings;

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

pub use error::ConfigError;
pub use profile::{ContactLink, Profile, Project, Testimonial, TimelineEntry};
pub use settings::Settings;

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "FOLIO_CONFIG";

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub settings: Settings,
    pub profile: Profile,
}

impl Config {
    /// Resolve the config file path: `$FOLIO_CONFIG`, else the platform
    /// config directory.
    pub fn path() -> Result<PathBuf, ConfigError> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Ok(PathBuf::from(path));
        }
        ProjectDirs::from("", "", "folio")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Load from the default location, falling back to defaults on any error.
    ///
    /// Also returns the path that changes may be saved to. See [`Config::open`].
    pub fn load() -> (Self, Option<PathBuf>) {
        match Self::path() {
            Ok(path) => Self::open(path),
            Err(err) => {
                warn!("{err}; using default configuration");
                (Self::default(), None)
            }
        }
    }

    /// Load from `path`, falling back to defaults on any error.
    ///
    /// The path is handed back only when it is safe to write: the file was
    /// read, or does not exist yet. A file that exists but failed to load is
    /// left alone.
    pub fn open(path: PathBuf) -> (Self, Option<PathBuf>) {
        match Self::load_from(&path) {
            Ok(config) => (config, Some(path)),
            Err(err) => {
                warn!("{err}; using default configuration, changes will not be saved");
                (Self::default(), None)
            }
        }
    }

    /// Load from `path`. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse TOML text.
    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Save to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let text = toml::to_string_pretty(self)?;
        std::fs::write(path, text).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("saved config to {}", path.display());
        Ok(())
    }
}

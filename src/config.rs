//! Configuration and on-disk layout.
//!
//! The configuration is a small JSON file holding two switches:
//!
//! ```json
//! {
//!   "clean_downloads": true,
//!   "delete_node_modules": false
//! }
//! ```
//!
//! A cleanup run never falls back to defaults: if the file is missing or
//! invalid the run aborts before touching anything.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const APP_NAME: &str = "saafsafai";
pub const CONFIG_FILE_NAME: &str = "saafsafai.json";
pub const SERVICE_NAME: &str = "saafsafai.service";

/// Errors that can occur while loading or saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found at the specified path.
    #[error("Configuration file not found at {}. Run 'saafsafai --setup' to configure", .0.display())]
    NotFound(PathBuf),
    /// IO error while reading configuration.
    #[error("Failed to read configuration {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Invalid JSON syntax or structure.
    #[error("Invalid configuration {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// IO error while writing configuration.
    #[error("Failed to write configuration {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Which cleanup phases are enabled. A missing key means the phase is off.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Sort `~/Downloads` and delete partial downloads.
    pub clean_downloads: bool,
    /// Remove `node_modules` directories untouched for 30 days.
    pub delete_node_modules: bool,
}

impl Config {
    /// Loads configuration from `path`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if the file does not exist,
    /// `ConfigError::Read` if it cannot be read and `ConfigError::Parse` if
    /// it is not valid configuration JSON.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ConfigError::NotFound(path.to_path_buf()),
            _ => ConfigError::Read {
                path: path.to_path_buf(),
                source: e,
            },
        })?;

        serde_json::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Writes configuration as pretty JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |e| ConfigError::Write {
            path: path.to_path_buf(),
            source: e,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }

        let json = serde_json::to_string_pretty(self).map_err(|e| ConfigError::Write {
            path: path.to_path_buf(),
            source: std::io::Error::new(ErrorKind::InvalidData, e),
        })?;

        fs::write(path, json).map_err(write_err)
    }
}

/// Every location the tool reads or writes, derived from a home directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    pub home: PathBuf,
    pub downloads: PathBuf,
    pub config_file: PathBuf,
    pub log_dir: PathBuf,
    pub systemd_unit_dir: PathBuf,
    pub install_dir: PathBuf,
}

impl AppPaths {
    /// Lays out all paths under `home`.
    ///
    /// # Examples
    ///
    /// ```
    /// use saafsafai::config::AppPaths;
    /// use std::path::Path;
    ///
    /// let paths = AppPaths::from_home("/home/me");
    /// assert_eq!(paths.downloads, Path::new("/home/me/Downloads"));
    /// assert_eq!(paths.config_file, Path::new("/home/me/.config/saafsafai.json"));
    /// ```
    pub fn from_home(home: impl Into<PathBuf>) -> Self {
        let home = home.into();
        Self {
            downloads: home.join("Downloads"),
            config_file: home.join(".config").join(CONFIG_FILE_NAME),
            log_dir: home
                .join(".local")
                .join("share")
                .join(APP_NAME)
                .join("logs"),
            systemd_unit_dir: home.join(".config").join("systemd").join("user"),
            install_dir: home.join(".local").join("bin"),
            home,
        }
    }

    /// Uses the current user's home directory.
    pub fn discover() -> Option<Self> {
        dirs::home_dir().map(Self::from_home)
    }

    /// Where setup installs the binary.
    pub fn installed_binary(&self) -> PathBuf {
        self.install_dir.join(APP_NAME)
    }

    pub fn service_file(&self) -> PathBuf {
        self.systemd_unit_dir.join(SERVICE_NAME)
    }
}

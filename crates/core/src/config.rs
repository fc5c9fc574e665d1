//! Desk configuration file (`userdesk.toml`)
//!
//! ```toml
//! [storage]
//! backend = "sqlite"            # or "memory"
//! path = "/var/lib/userdesk.db" # optional, defaults to the platform data dir
//!
//! [seed]
//! path = "seed.json"            # optional JSON array of users
//!
//! [session]
//! reset_on_cold_start = true
//! min_password_len = 4
//! ```
//!
//! Every section and field has a default, so a missing or empty file is the
//! default configuration.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::{Error, Result};
use crate::seed::Seed;

/// Name of the config file inside the platform config dir
pub const CONFIG_FILENAME: &str = "userdesk.toml";

const DATABASE_FILENAME: &str = "userdesk.db";

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeskConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub seed: SeedConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

/// Which store backs the desk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Sqlite,
    Memory,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: Backend,
    /// SQLite file; `None` means `<data dir>/userdesk.db`
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeedConfig {
    /// JSON seed file; `None` means the built-in admin account
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Reset the directory to the seed when the users view is entered
    /// without a session
    #[serde(default = "default_reset_on_cold_start")]
    pub reset_on_cold_start: bool,
    #[serde(default = "default_min_password_len")]
    pub min_password_len: usize,
}

fn default_reset_on_cold_start() -> bool {
    true
}

fn default_min_password_len() -> usize {
    4
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            reset_on_cold_start: default_reset_on_cold_start(),
            min_password_len: default_min_password_len(),
        }
    }
}

impl DeskConfig {
    /// Parse from TOML text
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Load from `path`; a missing file yields the defaults
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        match std::fs::read_to_string(path.as_ref()) {
            Ok(content) => Self::from_toml_str(&content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No config file, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// `<config dir>/userdesk.toml`, when the platform has a config dir
    pub fn default_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILENAME))
    }
}

impl StorageConfig {
    /// Resolved SQLite path
    pub fn database_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.path {
            return Ok(path.clone());
        }

        let dirs = project_dirs().ok_or_else(|| {
            Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "Could not determine data directory",
            ))
        })?;
        Ok(dirs.data_dir().join(DATABASE_FILENAME))
    }
}

impl SeedConfig {
    pub fn load(&self) -> Result<Seed> {
        match &self.path {
            Some(path) => Seed::from_file(path),
            None => Ok(Seed::builtin()),
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("dev", "onyx", "userdesk")
}

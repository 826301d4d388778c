//! Configuration file
//!
//! `config.toml` lives in `$BKT_CONFIG_DIR` when set, otherwise in the
//! platform config directory (`~/.config/bkt` on Linux). It holds output
//! defaults, the default bucket and the connection profiles.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::profile::Profile;

/// Current configuration schema version
pub const SCHEMA_VERSION: u32 = 1;

/// Environment variable overriding the configuration directory
pub const CONFIG_DIR_ENV: &str = "BKT_CONFIG_DIR";

const CONFIG_FILE: &str = "config.toml";

/// Output format used when `--json` is not given
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
}

/// When to colour human output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

/// Contents of `config.toml`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub schema_version: u32,

    #[serde(default)]
    pub defaults: Defaults,

    #[serde(default)]
    pub profiles: Vec<Profile>,
}

/// The `[defaults]` table
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    pub output: OutputFormat,

    pub color: ColorMode,

    /// Show spinners while transfers run
    pub progress: bool,

    /// Bucket used when a path omits one and `--bucket` is not given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket: Option<String>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: OutputFormat::Human,
            color: ColorMode::Auto,
            progress: true,
            bucket: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            defaults: Defaults::default(),
            profiles: Vec::new(),
        }
    }
}

impl Config {
    /// Parse a configuration document, upgrading older schemas
    pub fn from_toml(content: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(content)?;

        if config.schema_version > SCHEMA_VERSION {
            return Err(Error::Config(format!(
                "config schema {} is newer than supported version {SCHEMA_VERSION}; upgrade bkt",
                config.schema_version
            )));
        }
        // Schema 0 files only lack the version field.
        config.schema_version = SCHEMA_VERSION;

        Ok(config)
    }

    /// Look up a profile by name
    pub fn profile(&self, name: &str) -> Result<&Profile> {
        self.profiles
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| Error::ProfileNotFound(name.to_string()))
    }
}

/// Reads and writes `config.toml`
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Use the default configuration location
    pub fn new() -> Result<Self> {
        Ok(Self::with_path(config_dir()?.join(CONFIG_FILE)))
    }

    /// Use an explicit file path
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Load the configuration, or the defaults when no file exists yet
    pub fn load(&self) -> Result<Config> {
        match std::fs::read_to_string(&self.config_path) {
            Ok(content) => Config::from_toml(&content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Config::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Write the configuration, readable by the owner only
    pub fn save(&self, config: &Config) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.config_path, toml::to_string_pretty(config)?)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.config_path, std::fs::Permissions::from_mode(0o600))?;
        }

        Ok(())
    }
}

fn config_dir() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV).filter(|d| !d.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    dirs::config_dir()
        .map(|dir| dir.join("bkt"))
        .ok_or_else(|| Error::Config("could not determine config directory".into()))
}

//! TOML configuration file loading
//!
//! Supports `~/.config/homeskill/config.toml` as a persistent config source.
//! All sections are optional; the file is a partial overlay on top of
//! defaults, and environment variables override it in turn.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::DeviceConfig;
use crate::{Error, Result};

/// Top-level TOML configuration file schema
#[derive(Debug, Default, Deserialize)]
pub struct HomeskillConfigFile {
    #[serde(default)]
    pub server: ServerFileConfig,

    /// Identity provider and authorized account
    #[serde(default)]
    pub identity: IdentityFileConfig,

    /// Hook API endpoint and token
    #[serde(default)]
    pub backend: BackendFileConfig,

    /// Burst and wait tuning
    #[serde(default)]
    pub dispatch: DispatchFileConfig,

    /// Appliances exposed to the voice assistant
    #[serde(default)]
    pub devices: Vec<DeviceConfig>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ServerFileConfig {
    pub port: Option<u16>,
}

#[derive(Debug, Default, Deserialize)]
pub struct IdentityFileConfig {
    pub profile_url: Option<String>,
    pub authorized_user_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct BackendFileConfig {
    pub base_url: Option<String>,
    pub token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DispatchFileConfig {
    pub attempts: Option<u32>,
    pub timeout_ms: Option<u64>,
    pub poll_interval_ms: Option<u64>,
    pub request_timeout_ms: Option<u64>,
    pub max_in_flight: Option<usize>,
    pub exit_when_all_failed: Option<bool>,
}

/// Load the TOML config file
///
/// With an explicit path the file must exist. Without one the standard path
/// is used and a missing file yields the defaults.
///
/// # Errors
///
/// Returns error if the file cannot be read or parsed
pub fn load_config_file(path: Option<&Path>) -> Result<HomeskillConfigFile> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => match config_file_path() {
            Some(path) if path.exists() => path,
            _ => {
                tracing::debug!("no config file, using defaults");
                return Ok(HomeskillConfigFile::default());
            }
        },
    };

    let content = std::fs::read_to_string(&path).map_err(|e| {
        Error::Config(format!("failed to read {}: {e}", path.display()))
    })?;
    let config: HomeskillConfigFile = toml::from_str(&content)?;

    tracing::info!(
        path = %path.display(),
        devices = config.devices.len(),
        "loaded config file"
    );
    Ok(config)
}

/// Return the config file path: `~/.config/homeskill/config.toml`
#[must_use]
pub fn config_file_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.config_dir().join("homeskill").join("config.toml"))
}

//! Campaign Settings
//!
//! JSON settings persistence plus the client configuration: which cluster to
//! talk to, at what commitment, with which program and wallet.

mod config;

pub use config::{ClientConfig, Network, WalletConfig, DEFAULT_EXPECTED_PROVIDER, SERVICE_NAME};

use std::fs;
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::debug;

use campaign_keystore::default_config_dir_for;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to read settings {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write settings {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse settings {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Failed to encode settings: {0}")]
    Encode(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SettingsError>;

/// A config value of type `T` bound to the JSON file it was loaded from.
pub struct Settings<T> {
    pub config: T,
    path: PathBuf,
}

impl<T: Serialize + DeserializeOwned + Default> Settings<T> {
    /// Load settings from `custom_path` or the service default, writing
    /// defaults on first run.
    pub fn load_or_default(service: &str, custom_path: Option<&Path>) -> Result<Self> {
        let path = custom_path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| default_settings_path(service));

        if !path.exists() {
            debug!("Creating default settings at {}", path.display());
            let settings = Self {
                config: T::default(),
                path,
            };
            settings.save()?;
            return Ok(settings);
        }

        debug!("Loading settings from {}", path.display());
        let content = fs::read_to_string(&path).map_err(|source| SettingsError::Read {
            path: path.clone(),
            source,
        })?;
        let config = serde_json::from_str(&content).map_err(|source| SettingsError::Parse {
            path: path.clone(),
            source,
        })?;
        Ok(Self { config, path })
    }

    /// Write the current config back to its file.
    pub fn save(&self) -> Result<()> {
        let content = serde_json::to_string_pretty(&self.config)?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| SettingsError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&self.path, content).map_err(|source| SettingsError::Write {
            path: self.path.clone(),
            source,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Default settings file for a service.
pub fn default_settings_path(service: &str) -> PathBuf {
    default_config_dir_for(service).join("settings.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(name);
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_first_load_writes_defaults() {
        let dir = scratch("campaign-settings-test");
        let path = dir.join("settings.json");

        let settings: Settings<ClientConfig> =
            Settings::load_or_default(SERVICE_NAME, Some(&path)).unwrap();
        assert_eq!(settings.config, ClientConfig::default());
        assert!(path.exists());

        let reloaded: Settings<ClientConfig> =
            Settings::load_or_default(SERVICE_NAME, Some(&path)).unwrap();
        assert_eq!(reloaded.config, ClientConfig::default());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = scratch("campaign-settings-test-save");
        let path = dir.join("settings.json");

        let mut settings: Settings<ClientConfig> =
            Settings::load_or_default(SERVICE_NAME, Some(&path)).unwrap();
        settings.config.network = Network::Localnet;
        settings.config.confirm_poll_interval_ms = 50;
        settings.save().unwrap();

        let loaded: Settings<ClientConfig> =
            Settings::load_or_default(SERVICE_NAME, Some(&path)).unwrap();
        assert_eq!(loaded.config.network, Network::Localnet);
        assert_eq!(loaded.config.confirm_poll_interval_ms, 50);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_parse_error_names_file() {
        let dir = scratch("campaign-settings-test-bad");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("settings.json");
        fs::write(&path, "{ not json").unwrap();

        let err = Settings::<ClientConfig>::load_or_default(SERVICE_NAME, Some(&path))
            .err()
            .unwrap();
        assert!(matches!(err, SettingsError::Parse { .. }));
        assert!(err.to_string().contains("settings.json"));

        let _ = fs::remove_dir_all(&dir);
    }
}

//! Configuration management
//!
//! Endpoints and the token file location can come from a flag, an
//! environment variable, or `config.toml`.
//! Priority: CLI argument / environment variable > config.toml > built-in default

use super::Result;
use crate::error::StorageError;
use crate::utils::validation::validate_url;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const TOKEN_FILE_NAME: &str = "secrets.json";
pub const DEFAULT_BASE_URL: &str = "https://dba-api-xxxviii-zjyo.onxplorx.app";
const WEBHOOK_PATH: &str = "/v1/data";

/// Contents of `config.toml`. Every field is optional.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct Config {
    /// Remote API base URL (login lives at `<base_url>/v1/users/login`)
    pub base_url: Option<String>,
    /// Endpoint receiving the analysis payload
    pub webhook_url: Option<String>,
    /// Location of the token file
    pub token_path: Option<PathBuf>,
}

/// Values supplied on the command line or through the environment.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub base_url: Option<String>,
    pub webhook_url: Option<String>,
}

/// Fully resolved settings, injected into the services at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub base_url: String,
    pub webhook_url: String,
    pub token_path: PathBuf,
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path).map_err(|source| StorageError::FileIo {
            path: path.to_string_lossy().to_string(),
            source,
        })?;

        let config: Config =
            toml::from_str(&content).map_err(|e| StorageError::ConfigParseError {
                message: format!("Failed to parse config file: {}", e),
            })?;

        Ok(config)
    }

    /// Merge file values with overrides and defaults.
    ///
    /// The webhook defaults to `<base_url>/v1/data`, so overriding only the
    /// base URL moves both endpoints. Relative token paths are resolved
    /// against `config_dir`.
    pub fn resolve(
        &self,
        overrides: SettingsOverrides,
        config_dir: &Path,
    ) -> crate::Result<Settings> {
        let base_url = pick(overrides.base_url, self.base_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = base_url.trim_end_matches('/').to_string();
        validate_url(&base_url)?;

        let webhook_url = pick(overrides.webhook_url, self.webhook_url.clone())
            .unwrap_or_else(|| format!("{}{}", base_url, WEBHOOK_PATH));
        validate_url(&webhook_url)?;

        let token_path = match &self.token_path {
            Some(p) if p.is_absolute() => p.clone(),
            Some(p) => config_dir.join(p),
            None => config_dir.join(TOKEN_FILE_NAME),
        };

        Ok(Settings {
            base_url,
            webhook_url,
            token_path,
        })
    }
}

fn pick(primary: Option<String>, fallback: Option<String>) -> Option<String> {
    primary
        .filter(|s| !s.trim().is_empty())
        .or(fallback.filter(|s| !s.trim().is_empty()))
}

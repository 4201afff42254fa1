//! Storage layer for dblyser
//!
//! Handles the configuration file and the local token store.
//! Both live under the per-user config directory (`<config_dir>/dblyser/`).

use crate::error::StorageError;
use std::path::PathBuf;

pub mod config;
pub mod token_store;

type Result<T> = std::result::Result<T, StorageError>;

const APP_DIR_NAME: &str = "dblyser";

/// Directory holding `config.toml` and `secrets.json`.
/// An explicit directory (from `--config-dir`) wins over the OS default.
pub fn app_config_dir(override_dir: Option<&str>) -> Result<PathBuf> {
    match override_dir {
        Some(dir) => Ok(PathBuf::from(dir)),
        None => {
            let config_dir = dirs::config_dir().ok_or(StorageError::ConfigDirNotFound)?;
            Ok(config_dir.join(APP_DIR_NAME))
        }
    }
}

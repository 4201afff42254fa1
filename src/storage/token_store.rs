//! File-backed token storage
//!
//! Tokens are kept in a flat `key -> token` JSON object. Writes replace the
//! file through a sibling temp file and a rename, so readers never observe a
//! partially written map.

use super::Result;
use crate::error::StorageError;
use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Key the login token is stored under.
pub const AUTH_TOKEN_KEY: &str = "auth_token";

#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Store `token` under `key`, overwriting any previous value.
    pub fn save_token(&self, key: &str, token: &str) -> Result<()> {
        let mut tokens = self.read_all()?;
        tokens.insert(key.to_string(), token.to_string());
        self.write_all(&tokens)
    }

    /// Fetch the token stored under `key`. A missing file reads as empty.
    pub fn get_token(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    /// Remove `key`. Returns whether a token was present.
    pub fn delete_token(&self, key: &str) -> Result<bool> {
        let mut tokens = self.read_all()?;
        if tokens.remove(key).is_none() {
            return Ok(false);
        }
        self.write_all(&tokens)?;
        Ok(true)
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let content = fs::read_to_string(&self.path).map_err(|source| StorageError::FileIo {
            path: self.display_path(),
            source,
        })?;

        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&content).map_err(|e| StorageError::TokenFileCorrupt {
            path: self.display_path(),
            message: e.to_string(),
        })
    }

    fn write_all(&self, tokens: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| StorageError::FileIo {
                path: parent.to_string_lossy().to_string(),
                source,
            })?;
        }

        let content =
            serde_json::to_string_pretty(tokens).map_err(|e| StorageError::Serialization {
                message: e.to_string(),
            })?;

        let tmp_path = self.path.with_extension("json.tmp");
        let tmp_err = |source| StorageError::FileIo {
            path: tmp_path.to_string_lossy().to_string(),
            source,
        };
        let mut file = open_private(&tmp_path).map_err(tmp_err)?;
        file.write_all(content.as_bytes()).map_err(tmp_err)?;
        file.sync_all().map_err(tmp_err)?;
        drop(file);

        fs::rename(&tmp_path, &self.path).map_err(|source| StorageError::FileIo {
            path: self.display_path(),
            source,
        })?;

        Ok(())
    }

    fn display_path(&self) -> String {
        self.path.to_string_lossy().to_string()
    }
}

/// Open `path` for writing, owner read/write only from the moment it exists.
/// A stale file left by an earlier run is narrowed before anything is written.
#[cfg(unix)]
fn open_private(path: &Path) -> std::io::Result<File> {
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    file.set_permissions(fs::Permissions::from_mode(0o600))?;
    Ok(file)
}

#[cfg(not(unix))]
fn open_private(path: &Path) -> std::io::Result<File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
}

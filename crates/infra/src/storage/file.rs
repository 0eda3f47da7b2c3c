//! File-backed token storage
//!
//! A flat JSON object (`{"sp_access_token": "...", ...}`) on disk. A missing
//! file is an empty store. Every write replaces the file through a temp file
//! and a rename, so a crash never leaves half a session behind.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use smartpantry_common::auth::TokenStorage;
use smartpantry_domain::{Result, SmartPantryError};
use tokio::sync::Mutex;
use tracing::debug;

use crate::errors::InfraError;

type Items = BTreeMap<String, String>;

/// Token storage persisted as one JSON file at a fixed path
#[derive(Debug)]
pub struct FileTokenStorage {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process
    write_lock: Mutex<()>,
}

impl FileTokenStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), write_lock: Mutex::new(()) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the backing file. A missing file is not an error.
    ///
    /// # Errors
    /// Returns `SmartPantryError::Storage` if the file exists but cannot be
    /// removed.
    pub async fn clear(&self) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(InfraError::from(e).into()),
        }
    }

    async fn read_items(&self) -> Result<Items> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Items::new()),
            Err(e) => return Err(InfraError::from(e).into()),
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Items::new());
        }
        serde_json::from_slice(&bytes).map_err(|e| {
            SmartPantryError::Storage(format!(
                "session file {} is corrupt: {}",
                self.path.display(),
                e
            ))
        })
    }

    async fn write_items(&self, items: &Items) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(InfraError::from)?;
        }

        let bytes = serde_json::to_vec_pretty(items).map_err(InfraError::from)?;
        let tmp = self.temp_path();
        tokio::fs::write(&tmp, bytes).await.map_err(InfraError::from)?;
        restrict_permissions(&tmp).await?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(InfraError::from)?;

        debug!(path = %self.path.display(), keys = items.len(), "Session file written");
        Ok(())
    }

    async fn update(&self, apply: impl FnOnce(&mut Items) -> bool) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut items = self.read_items().await?;
        if apply(&mut items) {
            self.write_items(&items).await?;
        }
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map_or_else(OsString::new, OsString::from);
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[cfg(unix)]
async fn restrict_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
        .await
        .map_err(|e| InfraError::from(e).into())
}

#[cfg(not(unix))]
async fn restrict_permissions(_path: &Path) -> Result<()> {
    Ok(())
}

#[async_trait]
impl TokenStorage for FileTokenStorage {
    async fn get_item(&self, key: &str) -> std::result::Result<Option<String>, String> {
        let items = self.read_items().await.map_err(|e| e.to_string())?;
        Ok(items.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> std::result::Result<(), String> {
        self.update(|items| {
            items.insert(key.to_string(), value.to_string());
            true
        })
        .await
        .map_err(|e| e.to_string())
    }

    async fn remove_item(&self, key: &str) -> std::result::Result<(), String> {
        self.update(|items| items.remove(key).is_some()).await.map_err(|e| e.to_string())
    }
}

//! Profile persistence. The service only needs an ordered list of profiles,
//! so the default backend is a JSON array on disk.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::errors::AppError;
use crate::models::profile::{demo_profiles, PlayerProfile};
use crate::scouting::dedup::find_duplicate;

#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn list(&self) -> Result<Vec<PlayerProfile>, AppError>;

    /// Appends unless the profile duplicates an existing one.
    /// Returns the new profile's index.
    async fn append(&self, profile: PlayerProfile) -> Result<usize, AppError>;

    async fn remove(&self, index: usize) -> Result<PlayerProfile, AppError>;

    async fn replace_all(&self, profiles: Vec<PlayerProfile>) -> Result<(), AppError>;
}

/// Stores profiles as a pretty-printed JSON array. A missing file reads as the
/// demo set. Writes go through a temp file and a rename.
pub struct JsonFileStore {
    path: PathBuf,
    // Serializes read-modify-write cycles.
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> Result<Vec<PlayerProfile>, AppError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                AppError::Storage(format!("{} is not a profile array: {e}", self.path.display()))
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("{} missing, serving demo profiles", self.path.display());
                Ok(demo_profiles())
            }
            Err(e) => Err(storage_error(&self.path, e)),
        }
    }

    async fn write(&self, profiles: &[PlayerProfile]) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| storage_error(parent, e))?;
        }

        let json = serde_json::to_vec_pretty(profiles)
            .map_err(|e| AppError::Storage(format!("failed to encode profiles: {e}")))?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| storage_error(&tmp, e))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| storage_error(&self.path, e))
    }
}

fn storage_error(path: &Path, e: std::io::Error) -> AppError {
    AppError::Storage(format!("{}: {e}", path.display()))
}

#[async_trait]
impl ProfileStore for JsonFileStore {
    async fn list(&self) -> Result<Vec<PlayerProfile>, AppError> {
        let _guard = self.lock.lock().await;
        self.read().await
    }

    async fn append(&self, profile: PlayerProfile) -> Result<usize, AppError> {
        let _guard = self.lock.lock().await;
        let mut profiles = self.read().await?;

        if let Some(warning) = find_duplicate(&profile, &profiles) {
            return Err(AppError::DuplicateProfile(warning));
        }

        info!("Saving profile '{}' ({})", profile.name, profile.birth_year);
        profiles.push(profile);
        self.write(&profiles).await?;
        Ok(profiles.len() - 1)
    }

    async fn remove(&self, index: usize) -> Result<PlayerProfile, AppError> {
        let _guard = self.lock.lock().await;
        let mut profiles = self.read().await?;
        if index >= profiles.len() {
            return Err(AppError::NotFound(format!("No profile at position {index}")));
        }
        let removed = profiles.remove(index);
        self.write(&profiles).await?;
        info!("Removed profile '{}'", removed.name);
        Ok(removed)
    }

    async fn replace_all(&self, profiles: Vec<PlayerProfile>) -> Result<(), AppError> {
        let _guard = self.lock.lock().await;
        self.write(&profiles).await
    }
}

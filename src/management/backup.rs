use std::path::{Path, PathBuf};

use chrono::Local;

use crate::{
    SyncError,
    types::{BackupRecord, BackupTrack, CatalogTrack, TrackDescriptor},
    utils,
};

pub const SOURCE_BACKUP_PREFIX: &str = "playlist_backup";
pub const TARGET_BACKUP_PREFIX: &str = "plex_backup";

/// Writes point-in-time JSON snapshots of a playlist before it is changed.
///
/// Every call produces a new file; existing backups are never overwritten.
pub struct BackupManager {
    dir: PathBuf,
}

impl BackupManager {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Snapshots the source descriptors of a playlist.
    pub async fn backup_source(
        &self,
        name: &str,
        descriptors: &[TrackDescriptor],
    ) -> Result<PathBuf, SyncError> {
        let tracks = descriptors.iter().map(BackupTrack::from).collect();
        self.write(SOURCE_BACKUP_PREFIX, name, tracks).await
    }

    /// Snapshots the current membership of an existing target playlist.
    pub async fn backup_target(
        &self,
        name: &str,
        tracks: &[CatalogTrack],
    ) -> Result<PathBuf, SyncError> {
        let tracks = tracks.iter().map(BackupTrack::from).collect();
        self.write(TARGET_BACKUP_PREFIX, name, tracks).await
    }

    async fn write(
        &self,
        prefix: &str,
        name: &str,
        tracks: Vec<BackupTrack>,
    ) -> Result<PathBuf, SyncError> {
        async_fs::create_dir_all(&self.dir).await?;

        let timestamp = utils::file_timestamp(Local::now());
        let record = BackupRecord {
            name: name.to_string(),
            timestamp: timestamp.clone(),
            tracks,
        };

        let stem = format!(
            "{}_{}_{}",
            prefix,
            utils::sanitize_file_component(name),
            timestamp
        );
        let path = utils::unique_path(&self.dir, &stem, "json");
        let json = serde_json::to_string_pretty(&record)?;
        async_fs::write(&path, json).await?;

        Ok(path)
    }

    /// Reads a backup document back, e.g. to restore a playlist by hand.
    pub async fn load(path: &Path) -> Result<BackupRecord, SyncError> {
        let content = async_fs::read_to_string(path).await?;
        Ok(serde_json::from_str(&content)?)
    }
}

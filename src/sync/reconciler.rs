use std::{path::PathBuf, sync::Arc};

use crate::{
    SyncError,
    catalog::TargetCatalog,
    config::Settings,
    info,
    management::{BackupManager, UnmatchedLogManager},
    success,
    types::{CatalogTrack, MatchResult, PlaylistSyncJob, TrackDescriptor},
    warning,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileAction {
    Created,
    Replaced,
    /// Nothing matched, so the target playlist was left alone.
    Skipped,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReconcileSummary {
    pub playlist: String,
    pub total: usize,
    pub matched: usize,
    pub unmatched: usize,
    pub action: ReconcileAction,
    /// Snapshot of the source descriptors.
    pub backup: Option<PathBuf>,
    /// Snapshot of the target playlist before its membership was replaced.
    pub target_backup: Option<PathBuf>,
    pub unmatched_log: Option<PathBuf>,
}

impl ReconcileSummary {
    /// Matched tracks as a fraction of all tracks, `0.0` for an empty playlist.
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.matched as f64 / self.total as f64
    }
}

/// Makes a target playlist's membership equal to the matched entries of a job.
pub struct PlaylistReconciler {
    target: Arc<dyn TargetCatalog>,
    backups: BackupManager,
    unmatched_logs: UnmatchedLogManager,
}

impl PlaylistReconciler {
    pub fn new(
        target: Arc<dyn TargetCatalog>,
        backups: BackupManager,
        unmatched_logs: UnmatchedLogManager,
    ) -> Self {
        Self {
            target,
            backups,
            unmatched_logs,
        }
    }

    pub fn from_settings(target: Arc<dyn TargetCatalog>, settings: &Settings) -> Self {
        Self::new(
            target,
            BackupManager::new(&settings.backup_dir),
            UnmatchedLogManager::new(&settings.log_dir),
        )
    }

    /// Applies the results of one job to the target catalog.
    ///
    /// With at least one match, the source descriptors are backed up and the
    /// playlist is created, or its membership replaced when a playlist of that
    /// name exists. Unmatched descriptors are written to a log. Writing the log
    /// is advisory: a failure there is only reported.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Reconciliation`] if the backup or any target call
    /// fails. Replacing membership is not transactional, so a failure after the
    /// removal can leave the target playlist empty.
    pub async fn reconcile(
        &self,
        job: &PlaylistSyncJob,
        results: &[MatchResult],
    ) -> Result<ReconcileSummary, SyncError> {
        let matched: Vec<CatalogTrack> = results.iter().filter_map(|r| r.matched.clone()).collect();
        let unmatched: Vec<TrackDescriptor> = results
            .iter()
            .filter(|r| !r.is_matched())
            .map(|r| r.descriptor.clone())
            .collect();

        let mut summary = ReconcileSummary {
            playlist: job.name.clone(),
            total: results.len(),
            matched: matched.len(),
            unmatched: unmatched.len(),
            action: ReconcileAction::Skipped,
            backup: None,
            target_backup: None,
            unmatched_log: None,
        };

        if !unmatched.is_empty() {
            match self.unmatched_logs.write(&job.name, &unmatched).await {
                Ok(path) => {
                    info!("Unmatched tracks logged to: {}", path.display());
                    summary.unmatched_log = Some(path);
                }
                Err(e) => warning!("Cannot write unmatched log for '{}': {}", job.name, e),
            }
        }

        if matched.is_empty() {
            info!("No tracks were matched, playlist '{}' not created", job.name);
            return Ok(summary);
        }

        let descriptors: Vec<TrackDescriptor> =
            results.iter().map(|r| r.descriptor.clone()).collect();
        let backup = self
            .backups
            .backup_source(&job.name, &descriptors)
            .await
            .map_err(|e| reconciliation_error(&job.name, e))?;
        info!("Playlist backup created: {}", backup.display());
        summary.backup = Some(backup);

        let existing = self
            .target
            .find_playlist_by_name(&job.name)
            .await
            .map_err(|e| reconciliation_error(&job.name, e))?;

        match existing {
            Some(playlist) => {
                info!("Found existing playlist '{}', updating", job.name);
                let current = self
                    .target
                    .playlist_items(&playlist)
                    .await
                    .map_err(|e| reconciliation_error(&job.name, e))?;
                if !current.is_empty() {
                    let path = self
                        .backups
                        .backup_target(&job.name, &current)
                        .await
                        .map_err(|e| reconciliation_error(&job.name, e))?;
                    summary.target_backup = Some(path);
                }

                self.target
                    .replace_membership(&playlist, &matched)
                    .await
                    .map_err(|e| reconciliation_error(&job.name, e))?;
                success!(
                    "Updated playlist '{}' with {} tracks",
                    job.name,
                    matched.len()
                );
                summary.action = ReconcileAction::Replaced;
            }
            None => {
                self.target
                    .create_playlist(&job.name, &matched)
                    .await
                    .map_err(|e| reconciliation_error(&job.name, e))?;
                success!(
                    "Created playlist '{}' with {} tracks",
                    job.name,
                    matched.len()
                );
                summary.action = ReconcileAction::Created;
            }
        }

        Ok(summary)
    }
}

fn reconciliation_error(playlist: &str, e: SyncError) -> SyncError {
    match e {
        SyncError::Reconciliation { .. } => e,
        other => SyncError::Reconciliation {
            playlist: playlist.to_string(),
            message: other.to_string(),
        },
    }
}

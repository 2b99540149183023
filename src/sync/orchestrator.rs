use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::{
    SyncError,
    catalog::SourceCatalog,
    debug,
    matching::MatchResolver,
    sync::{
        events::{EventSink, ProgressMode, SyncEvent},
        reconciler::{PlaylistReconciler, ReconcileSummary},
    },
    types::{MatchResult, PlaylistSyncJob, TrackDescriptor},
    warning,
};

/// What happens to the rest of a run when a playlist cannot be reconciled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Report the error and skip all remaining playlists.
    #[default]
    AbortRun,
    /// Record the failure and continue with the next playlist.
    SkipPlaylist,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobFailure {
    pub playlist: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncReport {
    pub summaries: Vec<ReconcileSummary>,
    pub failures: Vec<JobFailure>,
    /// Set when the run stopped early because cancellation was requested.
    pub cancelled: bool,
}

impl SyncReport {
    pub fn total_tracks(&self) -> usize {
        self.summaries.iter().map(|s| s.total).sum()
    }

    pub fn matched_tracks(&self) -> usize {
        self.summaries.iter().map(|s| s.matched).sum()
    }
}

/// Drives resolution and reconciliation across a list of playlists.
///
/// Everything runs sequentially on one task: one playlist at a time, one track
/// at a time. Cancellation is checked before each playlist and before each
/// track, never in the middle of a remote call.
pub struct SyncOrchestrator {
    source: Arc<dyn SourceCatalog>,
    resolver: MatchResolver,
    reconciler: PlaylistReconciler,
    progress_mode: ProgressMode,
    failure_policy: FailurePolicy,
}

impl SyncOrchestrator {
    pub fn new(
        source: Arc<dyn SourceCatalog>,
        resolver: MatchResolver,
        reconciler: PlaylistReconciler,
    ) -> Self {
        Self {
            source,
            resolver,
            reconciler,
            progress_mode: ProgressMode::default(),
            failure_policy: FailurePolicy::default(),
        }
    }

    pub fn with_progress_mode(mut self, mode: ProgressMode) -> Self {
        self.progress_mode = mode;
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Runs the sync on a background task and returns its handle.
    pub fn spawn(
        self,
        jobs: Vec<PlaylistSyncJob>,
        events: EventSink,
        cancel: CancellationToken,
    ) -> JoinHandle<Result<SyncReport, SyncError>> {
        tokio::spawn(async move { self.run(&jobs, &events, &cancel).await })
    }

    /// Syncs `jobs` in order, reporting through `events`.
    ///
    /// Tracks that fail to resolve become unmatched and never stop the run. A
    /// playlist interrupted by cancellation is not reconciled.
    ///
    /// # Errors
    ///
    /// Fetching a playlist's tracks failing is fatal. A reconciliation failure
    /// is fatal under [`FailurePolicy::AbortRun`]. In both cases an
    /// [`SyncEvent::Error`] is emitted and no [`SyncEvent::Finished`] follows.
    pub async fn run(
        &self,
        jobs: &[PlaylistSyncJob],
        events: &EventSink,
        cancel: &CancellationToken,
    ) -> Result<SyncReport, SyncError> {
        let mut report = SyncReport::default();
        let total_jobs = jobs.len();

        'jobs: for (job_index, job) in jobs.iter().enumerate() {
            if cancel.is_cancelled() {
                report.cancelled = true;
                break;
            }

            events.status(format!(
                "Processing playlist {}/{}: {}",
                job_index + 1,
                total_jobs,
                job.name
            ));

            let descriptors = match self.fetch_descriptors(job).await {
                Ok(descriptors) => descriptors,
                Err(e) => {
                    events.emit(SyncEvent::Error(e.to_string()));
                    return Err(e);
                }
            };

            let mut results = Vec::with_capacity(descriptors.len());
            for (track_index, descriptor) in descriptors.iter().enumerate() {
                if cancel.is_cancelled() {
                    report.cancelled = true;
                    break 'jobs;
                }

                events.status(format!(
                    "Searching for: {} by {}",
                    descriptor.title,
                    descriptor.artists_display()
                ));
                let outcome = self.resolver.resolve(descriptor).await;
                results.push(MatchResult {
                    descriptor: descriptor.clone(),
                    matched: outcome.into_track(),
                });

                events.progress(self.progress_mode.track_progress(
                    job_index,
                    track_index,
                    descriptors.len(),
                    total_jobs,
                ));
            }

            if descriptors.is_empty() {
                if let Some(progress) = self.progress_mode.empty_job_progress(job_index, total_jobs)
                {
                    events.progress(progress);
                }
            }

            match self.reconciler.reconcile(job, &results).await {
                Ok(summary) => {
                    events.status(format!(
                        "Completed playlist: {} ({}/{} matched)",
                        job.name, summary.matched, summary.total
                    ));
                    events.emit(SyncEvent::JobCompleted(summary.clone()));
                    report.summaries.push(summary);
                }
                Err(e) => match self.failure_policy {
                    FailurePolicy::AbortRun => {
                        events.emit(SyncEvent::Error(e.to_string()));
                        return Err(e);
                    }
                    FailurePolicy::SkipPlaylist => {
                        warning!("Skipping playlist '{}': {}", job.name, e);
                        events.status(format!("Failed to sync playlist {}: {}", job.name, e));
                        report.failures.push(JobFailure {
                            playlist: job.name.clone(),
                            message: e.to_string(),
                        });
                    }
                },
            }
        }

        if report.cancelled {
            events.status("Sync cancelled");
        }
        events.emit(SyncEvent::Finished(report.clone()));
        Ok(report)
    }

    /// Fetches every page of a playlist's tracks.
    async fn fetch_descriptors(
        &self,
        job: &PlaylistSyncJob,
    ) -> Result<Vec<TrackDescriptor>, SyncError> {
        let mut descriptors = Vec::new();
        let mut cursor = None;

        loop {
            let page = self.source.fetch_playlist_tracks(&job.id, cursor).await?;
            descriptors.extend(page.items);
            match page.next {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        debug!("Fetched {} tracks for '{}'", descriptors.len(), job.name);
        Ok(descriptors)
    }
}

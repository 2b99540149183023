//! Notifications the sync worker sends to whoever started it.

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

use crate::sync::{orchestrator::SyncReport, reconciler::ReconcileSummary};

#[derive(Debug, Clone, PartialEq)]
pub enum SyncEvent {
    Status(String),
    /// Percentage in `0..=100`.
    Progress(u8),
    JobCompleted(ReconcileSummary),
    /// A run-level failure. No further events follow it.
    Error(String),
    Finished(SyncReport),
}

/// How per-track progress is turned into a percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProgressMode {
    /// Exact integer arithmetic, plus a job-boundary value for playlists with
    /// no tracks, so the stream is non-decreasing and ends at 100.
    #[default]
    Normalized,
    /// The historical floating-point formula. Empty playlists emit nothing.
    Legacy,
}

impl ProgressMode {
    /// Progress after finishing track `track_index` of job `job_index`.
    pub fn track_progress(
        &self,
        job_index: usize,
        track_index: usize,
        tracks_in_job: usize,
        total_jobs: usize,
    ) -> u8 {
        match self {
            ProgressMode::Normalized => {
                normalized_progress(job_index, track_index, tracks_in_job, total_jobs)
            }
            ProgressMode::Legacy => {
                legacy_progress(job_index, track_index, tracks_in_job, total_jobs)
            }
        }
    }

    /// Progress to report after a job without tracks, if any.
    pub fn empty_job_progress(&self, job_index: usize, total_jobs: usize) -> Option<u8> {
        match self {
            ProgressMode::Normalized => Some(percent(job_index + 1, total_jobs)),
            ProgressMode::Legacy => None,
        }
    }
}

/// `floor((job_index + (track_index + 1) / tracks_in_job) / total_jobs * 100)`
/// without floating point.
pub fn normalized_progress(
    job_index: usize,
    track_index: usize,
    tracks_in_job: usize,
    total_jobs: usize,
) -> u8 {
    if tracks_in_job == 0 {
        return percent(job_index, total_jobs);
    }
    percent(
        job_index * tracks_in_job + track_index + 1,
        total_jobs * tracks_in_job,
    )
}

/// `floor(((job_index * n + track_index + 1) / (total_jobs * n)) * 100)` in
/// `f64`, where `n` is the number of tracks in the current job.
pub fn legacy_progress(
    job_index: usize,
    track_index: usize,
    tracks_in_job: usize,
    total_jobs: usize,
) -> u8 {
    let done = (job_index * tracks_in_job + track_index + 1) as f64;
    let total = (total_jobs * tracks_in_job) as f64;
    if total == 0.0 {
        return 0;
    }
    ((done / total) * 100.0).floor().clamp(0.0, 100.0) as u8
}

fn percent(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    (done.min(total) * 100 / total) as u8
}

/// Sending half of the event channel.
///
/// Sending never fails from the worker's point of view: if the receiver was
/// dropped, events are discarded and the run continues.
#[derive(Debug, Clone)]
pub struct EventSink {
    tx: UnboundedSender<SyncEvent>,
}

impl EventSink {
    pub fn new(tx: UnboundedSender<SyncEvent>) -> Self {
        Self { tx }
    }

    pub fn channel() -> (Self, UnboundedReceiver<SyncEvent>) {
        let (tx, rx) = unbounded_channel();
        (Self::new(tx), rx)
    }

    pub fn emit(&self, event: SyncEvent) {
        let _ = self.tx.send(event);
    }

    pub fn status(&self, message: impl Into<String>) {
        self.emit(SyncEvent::Status(message.into()));
    }

    pub fn progress(&self, value: u8) {
        self.emit(SyncEvent::Progress(value));
    }
}

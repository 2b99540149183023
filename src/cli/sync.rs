use std::sync::Arc;

use indicatif::{ProgressBar, ProgressStyle};
use tokio_util::sync::CancellationToken;

use crate::{
    catalog::{SourceCatalog, TargetCatalog},
    cli::context,
    error, info, success,
    sync::{
        EventSink, FailurePolicy, PlaylistReconciler, ProgressMode, ReconcileSummary, SyncEvent,
        SyncOrchestrator, SyncReport,
    },
    types::PlaylistSyncJob,
    warning,
};

#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    pub all: bool,
    pub playlists: Vec<String>,
    pub legacy_progress: bool,
    pub keep_going: bool,
}

pub async fn sync(options: SyncOptions) {
    let settings = context::settings();
    let source = context::spotify(&settings).await;

    let available = match source.fetch_playlists().await {
        Ok(playlists) => playlists,
        Err(e) => error!("Cannot fetch playlists from Spotify. Err: {}", e),
    };

    let jobs: Vec<PlaylistSyncJob> = if options.all {
        available.iter().map(PlaylistSyncJob::from).collect()
    } else {
        let mut jobs = Vec::new();
        for name in &options.playlists {
            match available
                .iter()
                .find(|p| p.name.to_lowercase() == name.to_lowercase())
            {
                Some(playlist) => jobs.push(PlaylistSyncJob::from(playlist)),
                None => warning!("Playlist '{}' not found on Spotify", name),
            }
        }
        jobs
    };

    if jobs.is_empty() {
        error!("No playlists selected. Use --all or --playlist <NAME>.");
    }

    let target: Arc<dyn TargetCatalog> = Arc::new(context::plex(&settings).await);
    let resolver = context::resolver(target.clone(), &settings);
    let reconciler = PlaylistReconciler::from_settings(target, &settings);
    let source: Arc<dyn SourceCatalog> = Arc::new(source);

    let orchestrator = SyncOrchestrator::new(source, resolver, reconciler)
        .with_progress_mode(if options.legacy_progress {
            ProgressMode::Legacy
        } else {
            ProgressMode::Normalized
        })
        .with_failure_policy(if options.keep_going {
            FailurePolicy::SkipPlaylist
        } else {
            FailurePolicy::AbortRun
        });

    info!("Syncing {} playlist(s) to Plex", jobs.len());

    let (events, mut rx) = EventSink::channel();
    let cancel = CancellationToken::new();
    let handle = orchestrator.spawn(jobs, events, cancel.clone());

    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warning!("Cancelling after the current track...");
            ctrl_c.cancel();
        }
    });

    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::with_template("{bar:40.cyan/blue} {pos:>3}% {wide_msg}")
            .unwrap()
            .progress_chars("=> "),
    );

    while let Some(event) = rx.recv().await {
        match event {
            SyncEvent::Status(message) => pb.set_message(message),
            SyncEvent::Progress(value) => pb.set_position(value as u64),
            SyncEvent::JobCompleted(summary) => pb.println(format_summary(&summary)),
            SyncEvent::Error(message) => pb.abandon_with_message(message),
            SyncEvent::Finished(_) => pb.finish_and_clear(),
        }
    }

    match handle.await {
        Ok(Ok(report)) => print_report(&report),
        Ok(Err(e)) => error!("Sync failed: {}", e),
        Err(e) => error!("Sync worker stopped unexpectedly: {}", e),
    }
}

fn format_summary(summary: &ReconcileSummary) -> String {
    format!(
        "Matching Summary for '{}':\n  Total tracks: {}\n  Matched: {}\n  Unmatched: {}\n  Success rate: {:.1}%",
        summary.playlist,
        summary.total,
        summary.matched,
        summary.unmatched,
        summary.success_rate() * 100.0
    )
}

fn print_report(report: &SyncReport) {
    for failure in &report.failures {
        warning!("Playlist '{}' failed: {}", failure.playlist, failure.message);
    }

    if report.cancelled {
        warning!(
            "Sync cancelled after {} playlist(s)",
            report.summaries.len()
        );
    }

    success!(
        "Synced {} playlist(s): {}/{} tracks matched",
        report.summaries.len(),
        report.matched_tracks(),
        report.total_tracks()
    );
}

mod common;

use std::sync::Arc;

use common::{FakeSource, FakeTarget, TargetCall, descriptor, track};
use plexsync::{
    SyncError,
    catalog::{SourceCatalog, TargetCatalog},
    management::{BackupManager, UnmatchedLogManager},
    matching::MatchResolver,
    sync::{
        EventSink, FailurePolicy, PlaylistReconciler, ProgressMode, ReconcileAction,
        SyncEvent, SyncOrchestrator,
    },
    types::{PlaylistSyncJob, TrackDescriptor},
};
use tempfile::TempDir;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio_util::sync::CancellationToken;

fn library() -> FakeTarget {
    FakeTarget::with_library(vec![
        track("1", "Hello", "Adele"),
        track("2", "TNT", "AC/DC"),
        track("3", "Like a Prayer", "Madonna"),
    ])
}

fn mix() -> Vec<TrackDescriptor> {
    vec![
        descriptor("Hello", &["Adele"]),
        descriptor("T.N.T", &["AC/DC"]),
        descriptor("Missing Song", &["Nobody"]),
    ]
}

fn classics() -> Vec<TrackDescriptor> {
    vec![
        descriptor("Like a Prayer", &["Madonna"]),
        descriptor("Hello", &["Adele"]),
    ]
}

fn source() -> Arc<FakeSource> {
    Arc::new(
        FakeSource::new()
            .playlist("sp-mix", "Mix", mix())
            .playlist("sp-empty", "Empty", vec![])
            .playlist("sp-classics", "Classics", classics()),
    )
}

fn jobs() -> Vec<PlaylistSyncJob> {
    vec![
        PlaylistSyncJob::new("sp-mix", "Mix"),
        PlaylistSyncJob::new("sp-empty", "Empty"),
        PlaylistSyncJob::new("sp-classics", "Classics"),
    ]
}

fn orchestrator(
    source: &Arc<FakeSource>,
    target: &Arc<FakeTarget>,
    dir: &TempDir,
) -> SyncOrchestrator {
    let source: Arc<dyn SourceCatalog> = source.clone();
    let target: Arc<dyn TargetCatalog> = target.clone();
    let reconciler = PlaylistReconciler::new(
        target.clone(),
        BackupManager::new(dir.path().join("backups")),
        UnmatchedLogManager::new(dir.path().join("logs")),
    );
    SyncOrchestrator::new(source, MatchResolver::new(target, None), reconciler)
}

fn drain(rx: &mut UnboundedReceiver<SyncEvent>) -> Vec<SyncEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

fn progress(events: &[SyncEvent]) -> Vec<u8> {
    events
        .iter()
        .filter_map(|e| match e {
            SyncEvent::Progress(p) => Some(*p),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn test_full_run_reports_normalized_progress() {
    let dir = TempDir::new().unwrap();
    let source = source();
    let target = Arc::new(library());
    let (sink, mut rx) = EventSink::channel();

    let report = orchestrator(&source, &target, &dir)
        .run(&jobs(), &sink, &CancellationToken::new())
        .await
        .unwrap();
    let events = drain(&mut rx);

    assert_eq!(progress(&events), vec![11, 22, 33, 66, 83, 100]);
    assert_eq!(
        events.first(),
        Some(&SyncEvent::Status("Processing playlist 1/3: Mix".to_string()))
    );
    assert!(events.contains(&SyncEvent::Status(
        "Searching for: T.N.T by AC/DC".to_string()
    )));
    assert!(events.contains(&SyncEvent::Status(
        "Completed playlist: Mix (2/3 matched)".to_string()
    )));
    assert_eq!(events.last(), Some(&SyncEvent::Finished(report.clone())));

    let actions: Vec<ReconcileAction> = report.summaries.iter().map(|s| s.action).collect();
    assert_eq!(
        actions,
        vec![
            ReconcileAction::Created,
            ReconcileAction::Skipped,
            ReconcileAction::Created,
        ]
    );
    assert_eq!(report.total_tracks(), 5);
    assert_eq!(report.matched_tracks(), 4);
    assert!(!report.cancelled);
    assert!(report.failures.is_empty());

    assert_eq!(
        target.membership("Mix"),
        Some(vec!["1".to_string(), "2".to_string()])
    );
    assert_eq!(
        target.membership("Classics"),
        Some(vec!["3".to_string(), "1".to_string()])
    );
    assert_eq!(target.membership("Empty"), None);
}

#[tokio::test]
async fn test_legacy_progress_skips_empty_playlists() {
    let dir = TempDir::new().unwrap();
    let source = source();
    let target = Arc::new(library());
    let (sink, mut rx) = EventSink::channel();

    orchestrator(&source, &target, &dir)
        .with_progress_mode(ProgressMode::Legacy)
        .run(&jobs(), &sink, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(progress(&drain(&mut rx)), vec![11, 22, 33, 83, 100]);
}

#[tokio::test]
async fn test_job_completed_events_follow_each_playlist() {
    let dir = TempDir::new().unwrap();
    let source = source();
    let target = Arc::new(library());
    let (sink, mut rx) = EventSink::channel();

    orchestrator(&source, &target, &dir)
        .run(&jobs(), &sink, &CancellationToken::new())
        .await
        .unwrap();

    let completed: Vec<String> = drain(&mut rx)
        .into_iter()
        .filter_map(|e| match e {
            SyncEvent::JobCompleted(summary) => Some(summary.playlist),
            _ => None,
        })
        .collect();
    assert_eq!(completed, vec!["Mix", "Empty", "Classics"]);
}

#[tokio::test]
async fn test_cancel_before_start_touches_nothing() {
    let dir = TempDir::new().unwrap();
    let source = source();
    let target = Arc::new(library());
    let (sink, mut rx) = EventSink::channel();
    let cancel = CancellationToken::new();
    cancel.cancel();

    let report = orchestrator(&source, &target, &dir)
        .run(&jobs(), &sink, &cancel)
        .await
        .unwrap();

    assert!(report.cancelled);
    assert!(report.summaries.is_empty());
    assert!(source.fetches().is_empty());
    assert!(target.calls().is_empty());
    assert_eq!(
        drain(&mut rx),
        vec![
            SyncEvent::Status("Sync cancelled".to_string()),
            SyncEvent::Finished(report),
        ]
    );
}

#[tokio::test]
async fn test_cancel_mid_playlist_stops_before_next_track() {
    let dir = TempDir::new().unwrap();
    let source = source();
    let cancel = CancellationToken::new();
    let target = Arc::new(library().cancel_on_search(1, cancel.clone()));
    let (sink, _rx) = EventSink::channel();

    let report = orchestrator(&source, &target, &dir)
        .run(&jobs(), &sink, &cancel)
        .await
        .unwrap();

    // the in-flight resolution finishes, nothing after it starts
    assert_eq!(target.searches(), vec!["hello"]);
    assert_eq!(target.write_calls(), 0);
    assert!(!target
        .calls()
        .iter()
        .any(|c| matches!(c, TargetCall::FindPlaylist(_))));
    assert!(report.cancelled);
    assert!(report.summaries.is_empty());
    assert!(!dir.path().join("backups").exists());
    assert_eq!(source.fetches().len(), 1);
}

#[tokio::test]
async fn test_reconcile_failure_aborts_run_by_default() {
    let dir = TempDir::new().unwrap();
    let source = source();
    let target = Arc::new(library().failing_writes_for("Mix"));
    let (sink, mut rx) = EventSink::channel();

    let err = orchestrator(&source, &target, &dir)
        .run(&jobs(), &sink, &CancellationToken::new())
        .await
        .unwrap_err();
    let events = drain(&mut rx);

    assert!(matches!(err, SyncError::Reconciliation { .. }));
    assert!(matches!(events.last(), Some(SyncEvent::Error(_))));
    assert!(!events.iter().any(|e| matches!(e, SyncEvent::Finished(_))));
    let fetched: Vec<String> = source.fetches().into_iter().map(|(id, _)| id).collect();
    assert_eq!(fetched, vec!["sp-mix"]);
}

#[tokio::test]
async fn test_skip_playlist_policy_continues_after_failure() {
    let dir = TempDir::new().unwrap();
    let source = source();
    let target = Arc::new(library().failing_writes_for("Mix"));
    let (sink, mut rx) = EventSink::channel();

    let report = orchestrator(&source, &target, &dir)
        .with_failure_policy(FailurePolicy::SkipPlaylist)
        .run(&jobs(), &sink, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].playlist, "Mix");
    assert_eq!(report.summaries.len(), 2);
    assert_eq!(
        target.membership("Classics"),
        Some(vec!["3".to_string(), "1".to_string()])
    );
    assert!(matches!(drain(&mut rx).last(), Some(SyncEvent::Finished(_))));
}

#[tokio::test]
async fn test_fetch_failure_is_fatal() {
    let dir = TempDir::new().unwrap();
    let source = Arc::new(
        FakeSource::new()
            .playlist("sp-mix", "Mix", mix())
            .failing(),
    );
    let target = Arc::new(library());
    let (sink, mut rx) = EventSink::channel();

    let err = orchestrator(&source, &target, &dir)
        .with_failure_policy(FailurePolicy::SkipPlaylist)
        .run(&jobs(), &sink, &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, SyncError::Source(_)));
    assert!(matches!(drain(&mut rx).last(), Some(SyncEvent::Error(_))));
    assert!(target.calls().is_empty());
}

#[tokio::test]
async fn test_follows_source_pagination() {
    let dir = TempDir::new().unwrap();
    let tracks: Vec<TrackDescriptor> = (1..=5)
        .map(|n| descriptor(&format!("Song {}", n), &["Artist"]))
        .collect();
    let source = Arc::new(
        FakeSource::new()
            .playlist("sp-long", "Long", tracks)
            .page_size(2),
    );
    let target = Arc::new(library());
    let (sink, _rx) = EventSink::channel();

    let report = orchestrator(&source, &target, &dir)
        .run(
            &[PlaylistSyncJob::new("sp-long", "Long")],
            &sink,
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(
        source.fetches(),
        vec![
            ("sp-long".to_string(), None),
            ("sp-long".to_string(), Some("2".to_string())),
            ("sp-long".to_string(), Some("4".to_string())),
        ]
    );
    assert_eq!(report.summaries[0].total, 5);
}

#[tokio::test]
async fn test_search_failures_leave_tracks_unmatched() {
    let dir = TempDir::new().unwrap();
    let source = source();
    let target = Arc::new(library().failing_search());
    let (sink, _rx) = EventSink::channel();

    let report = orchestrator(&source, &target, &dir)
        .run(
            &[PlaylistSyncJob::new("sp-mix", "Mix")],
            &sink,
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    let summary = &report.summaries[0];
    assert_eq!(summary.action, ReconcileAction::Skipped);
    assert_eq!(summary.unmatched, 3);
    assert!(summary.unmatched_log.is_some());
    assert_eq!(target.write_calls(), 0);
}

#[tokio::test]
async fn test_spawned_run_reports_through_handle() {
    let dir = TempDir::new().unwrap();
    let source = source();
    let target = Arc::new(library());
    let (sink, mut rx) = EventSink::channel();

    let handle = orchestrator(&source, &target, &dir).spawn(
        vec![PlaylistSyncJob::new("sp-classics", "Classics")],
        sink,
        CancellationToken::new(),
    );
    let report = handle.await.unwrap().unwrap();

    assert_eq!(report.matched_tracks(), 2);
    let events = drain(&mut rx);
    assert_eq!(events.last(), Some(&SyncEvent::Finished(report)));
}

//! Playlist reconciliation and the orchestrator that drives a sync run.

pub mod events;
pub mod orchestrator;
pub mod reconciler;

pub use events::{EventSink, ProgressMode, SyncEvent};
pub use orchestrator::{FailurePolicy, JobFailure, SyncOrchestrator, SyncReport};
pub use reconciler::{PlaylistReconciler, ReconcileAction, ReconcileSummary};

//! Error type shared by the catalog clients, the reconciler and the orchestrator.
//!
//! Resolution outcomes are not errors: a track without an acceptable candidate is
//! [`crate::matching::MatchOutcome::Unmatched`], and an unusable assistant reply is an
//! [`crate::matching::AssistantChoice`]. Only failures that must be contained or
//! propagated live here.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    /// A required setting is missing or malformed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Connecting to or fetching from a catalog kept failing after all attempts.
    #[error("{operation} failed after {attempts} attempt(s): {message}")]
    Connection {
        operation: String,
        attempts: u32,
        message: String,
    },

    /// The source catalog returned something unusable.
    #[error("Source catalog error: {0}")]
    Source(String),

    /// The target catalog returned something unusable.
    #[error("Target catalog error: {0}")]
    Target(String),

    /// Creating or replacing a target playlist failed.
    #[error("Failed to reconcile playlist '{playlist}': {message}")]
    Reconciliation { playlist: String, message: String },

    /// The assistant is not configured or its call failed.
    #[error("Assistant unavailable: {0}")]
    Assistant(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}


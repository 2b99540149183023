//! Collaborator contracts consumed by the matching engine and the sync orchestrator.
//!
//! The HTTP clients in [`crate::spotify`], [`crate::plex`] and [`crate::assistant`]
//! implement these traits. Handles are confined to the sync worker: nothing here
//! is called concurrently while a sync is in progress.

use async_trait::async_trait;

use crate::{
    SyncError,
    types::{CatalogTrack, SourcePlaylist, TrackDescriptor},
};

/// One page of a paginated track listing.
#[derive(Debug, Clone, Default)]
pub struct TrackPage {
    pub items: Vec<TrackDescriptor>,
    /// Opaque cursor for the next page; `None` once the listing is exhausted.
    pub next: Option<String>,
}

/// A playlist that exists in the target catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistHandle {
    pub id: String,
    pub name: String,
}

#[async_trait]
pub trait SourceCatalog: Send + Sync {
    async fn fetch_playlists(&self) -> Result<Vec<SourcePlaylist>, SyncError>;

    /// Fetches one page of a playlist's tracks. Pass `None` for the first page
    /// and the returned `next` cursor afterwards.
    async fn fetch_playlist_tracks(
        &self,
        playlist_id: &str,
        cursor: Option<String>,
    ) -> Result<TrackPage, SyncError>;
}

#[async_trait]
pub trait TargetCatalog: Send + Sync {
    /// Substring/token search over track titles.
    async fn search(&self, query: &str) -> Result<Vec<CatalogTrack>, SyncError>;

    async fn find_playlist_by_name(&self, name: &str)
    -> Result<Option<PlaylistHandle>, SyncError>;

    async fn playlist_items(&self, playlist: &PlaylistHandle)
    -> Result<Vec<CatalogTrack>, SyncError>;

    async fn create_playlist(
        &self,
        name: &str,
        entries: &[CatalogTrack],
    ) -> Result<PlaylistHandle, SyncError>;

    /// Makes the playlist's membership exactly `entries`. Not transactional: a
    /// failure part-way may leave the playlist empty.
    async fn replace_membership(
        &self,
        playlist: &PlaylistHandle,
        entries: &[CatalogTrack],
    ) -> Result<(), SyncError>;
}

/// A text-completion service used to pick between candidates.
#[async_trait]
pub trait Assistant: Send + Sync {
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, SyncError>;
}

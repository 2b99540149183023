//! # Spotify Integration Module
//!
//! The source catalog. [`SpotifyClient`] implements [`SourceCatalog`] on top of
//! the Spotify Web API:
//!
//! - `GET /me/playlists` - the user's playlists, paged 50 at a time
//! - `GET /playlists/{id}/tracks` - a playlist's tracks, paged 100 at a time
//!
//! Pages are followed through the `next` URL Spotify returns, which is also the
//! cursor handed back to the orchestrator. Every request runs under the
//! client's [`RetryPolicy`]; a `429 Too Many Requests` honours `Retry-After`
//! before counting as a failed attempt.
//!
//! ## Authentication
//!
//! Requests use the access token cached by [`TokenManager`], refreshed with the
//! client credentials shortly before it expires. Obtaining the first token
//! (the interactive login) is not part of this crate.
//!
//! ## Made For You
//!
//! Personalized playlists (Discover Weekly, Release Radar, Daily Mix, ...) show
//! up in the user's playlist listing once followed. They are flagged through
//! [`SourcePlaylist::made_for_you`] so the CLI can list them first.

pub mod playlists;

use std::collections::HashSet;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;

use crate::{
    SyncError,
    catalog::{SourceCatalog, TrackPage},
    config::Settings,
    debug,
    management::TokenManager,
    retry::{RetryPolicy, with_retry},
    types::{
        SourcePlaylist, SpotifyPlaylistTracksResponse, SpotifyPlaylistsResponse, TrackDescriptor,
    },
};

/// Spotify Web API client acting as the source catalog.
///
/// Holds one HTTP client for all requests and the [`TokenManager`] behind an
/// async mutex, so a refresh triggered by one request is seen by the next.
pub struct SpotifyClient {
    http: Client,
    api_url: String,
    tokens: Mutex<TokenManager>,
    retry: RetryPolicy,
}

impl SpotifyClient {
    /// Creates a client for the configured API base URL.
    ///
    /// # Arguments
    ///
    /// * `settings` - Supplies the API base URL (a trailing `/` is ignored) and
    ///   the retry policy applied to every request
    /// * `tokens` - Token cache used to authenticate requests
    pub fn new(settings: &Settings, tokens: TokenManager) -> Self {
        Self {
            http: Client::new(),
            api_url: settings.spotify_api_url.trim_end_matches('/').to_string(),
            tokens: Mutex::new(tokens),
            retry: settings.retry,
        }
    }

    /// Builds a client from the settings and the cached token.
    ///
    /// # Arguments
    ///
    /// * `settings` - Runtime configuration holding the API URLs and client
    ///   credentials
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Config`] if the cached `token.json` cannot be read,
    /// which usually means the user has not logged in yet, and
    /// [`SyncError::Json`] if the file is not a valid token.
    pub async fn from_settings(settings: &Settings) -> Result<Self, SyncError> {
        let tokens = TokenManager::load(settings).await?;
        Ok(Self::new(settings, tokens))
    }

    /// Authenticated GET of one page, decoded as `T`, under the retry policy.
    ///
    /// # Arguments
    ///
    /// * `url` - Full request URL, including paging parameters
    /// * `operation` - Human readable name used in retry warnings and errors
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Connection`] once every attempt failed. Token refresh
    /// failures, HTTP errors and rate limiting all count as failed attempts.
    async fn get<T>(&self, url: &str, operation: &str) -> Result<T, SyncError>
    where
        T: DeserializeOwned + Send,
    {
        with_retry(&self.retry, operation, || async move {
            let token = self.tokens.lock().await.get_valid_token().await?;
            playlists::get_page::<T>(&self.http, url, &token).await
        })
        .await
    }
}

#[async_trait]
impl SourceCatalog for SpotifyClient {
    /// Fetches every playlist of the current user.
    ///
    /// Follows the `next` links until the listing is exhausted. A playlist that
    /// appears on more than one page is only returned once, at its first
    /// position. Made For You playlists are flagged by name.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Connection`] if a page cannot be fetched after all
    /// retry attempts.
    async fn fetch_playlists(&self) -> Result<Vec<SourcePlaylist>, SyncError> {
        let mut playlists = Vec::new();
        let mut seen_ids = HashSet::new();
        let mut next = Some(playlists::playlists_url(&self.api_url));

        while let Some(url) = next {
            let page: SpotifyPlaylistsResponse = self.get(&url, "Fetch Spotify playlists").await?;
            debug!("Fetched {} playlists from {}", page.items.len(), url);

            for playlist in page.items {
                if !seen_ids.insert(playlist.id.clone()) {
                    continue;
                }
                playlists.push(SourcePlaylist {
                    made_for_you: playlists::is_made_for_you(&playlist.name),
                    track_count: playlist.tracks.map(|t| t.total),
                    id: playlist.id,
                    name: playlist.name,
                });
            }
            next = page.next;
        }

        Ok(playlists)
    }

    /// Fetches one page of a playlist's tracks.
    ///
    /// # Arguments
    ///
    /// * `playlist_id` - Spotify ID of the playlist
    /// * `cursor` - `None` for the first page, otherwise the `next` URL of the
    ///   previous page
    ///
    /// # Returns
    ///
    /// The page's tracks as [`TrackDescriptor`]s and the cursor of the next page.
    /// Tracks that are no longer available (`null` in the response) are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Connection`] if the page cannot be fetched after all
    /// retry attempts.
    async fn fetch_playlist_tracks(
        &self,
        playlist_id: &str,
        cursor: Option<String>,
    ) -> Result<TrackPage, SyncError> {
        let url =
            cursor.unwrap_or_else(|| playlists::playlist_tracks_url(&self.api_url, playlist_id));
        let page: SpotifyPlaylistTracksResponse =
            self.get(&url, "Fetch Spotify playlist tracks").await?;

        let items: Vec<TrackDescriptor> = page
            .items
            .into_iter()
            .filter_map(|item| item.track)
            .map(TrackDescriptor::from)
            .collect();
        debug!("Fetched {} tracks for playlist {}", items.len(), playlist_id);

        Ok(TrackPage {
            items,
            next: page.next,
        })
    }
}

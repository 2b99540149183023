//! # Plex Integration Module
//!
//! The target catalog. [`PlexClient`] talks to a Plex Media Server over its
//! HTTP API with `Accept: application/json` and implements [`TargetCatalog`]:
//!
//! - `GET /` and `GET /library/sections` - server identity and the music
//!   section, resolved once in [`PlexClient::connect`] with retry
//! - `GET /library/sections/{key}/all?type=10&title=` - track search
//! - `GET /playlists?playlistType=audio` - playlist lookup by name
//! - `GET /playlists/{id}/items` - current membership
//! - `POST /playlists` - create with a `server://` item URI
//! - `DELETE` then `PUT /playlists/{id}/items` - replace membership
//!
//! Replacing membership is two calls. If the second one fails the playlist is
//! left empty; the reconciler's backups are the way back.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, header::ACCEPT};
use serde::de::DeserializeOwned;

use crate::{
    SyncError,
    catalog::{PlaylistHandle, TargetCatalog},
    config::Settings,
    debug, info,
    retry::{RetryPolicy, with_retry},
    success,
    types::{
        CatalogTrack, PlexMetadataContainer, PlexResponse, PlexSections, PlexServerIdentity,
    },
    warning,
};

const TOKEN_HEADER: &str = "X-Plex-Token";
const TRACK_TYPE: &str = "10";
const MUSIC_SECTION_TYPE: &str = "artist";

pub struct PlexClient {
    http: Client,
    base_url: String,
    token: String,
    retry: RetryPolicy,
    machine_id: String,
    section_key: String,
}

impl PlexClient {
    /// Connects to the server and resolves the music library section.
    ///
    /// Both lookups run under the configured retry policy. Running out of
    /// attempts is fatal and returned as [`SyncError::Connection`].
    pub async fn connect(settings: &Settings) -> Result<Self, SyncError> {
        let mut client = Self {
            http: Client::new(),
            base_url: settings.plex_url.trim_end_matches('/').to_string(),
            token: settings.plex_token.clone(),
            retry: settings.retry,
            machine_id: String::new(),
            section_key: String::new(),
        };

        info!("Connecting to Plex server at {}", client.base_url);
        let identity: PlexResponse<PlexServerIdentity> =
            client.fetch_with_retry("/", "Connect to Plex").await?;
        let sections: PlexResponse<PlexSections> = client
            .fetch_with_retry("/library/sections", "Fetch Plex music library")
            .await?;

        let music_sections: Vec<_> = sections
            .media_container
            .directories
            .into_iter()
            .filter(|d| d.kind == MUSIC_SECTION_TYPE)
            .collect();
        let section = match music_sections
            .iter()
            .find(|d| d.title == settings.plex_music_section)
        {
            Some(section) => section.clone(),
            None => match music_sections.first() {
                Some(section) => {
                    warning!(
                        "No music library named '{}', using '{}'",
                        settings.plex_music_section,
                        section.title
                    );
                    section.clone()
                }
                None => {
                    return Err(SyncError::Target(
                        "Plex server has no music library".to_string(),
                    ));
                }
            },
        };

        let identity = identity.media_container;
        client.machine_id = identity.machine_identifier;
        client.section_key = section.key;
        success!(
            "Connected to Plex server: {}",
            identity
                .friendly_name
                .as_deref()
                .unwrap_or(client.machine_id.as_str())
        );

        Ok(client)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}{}", self.base_url, path))
            .header(TOKEN_HEADER, &self.token)
            .header(ACCEPT, "application/json")
    }

    async fn send_json<T>(&self, request: RequestBuilder) -> Result<T, SyncError>
    where
        T: DeserializeOwned,
    {
        let response = request.send().await?.error_for_status()?;
        Ok(response.json::<T>().await?)
    }

    async fn fetch_with_retry<T>(&self, path: &str, operation: &str) -> Result<T, SyncError>
    where
        T: DeserializeOwned + Send,
    {
        with_retry(&self.retry, operation, || async move {
            self.send_json::<T>(self.request(Method::GET, path)).await
        })
        .await
    }

    /// `server://` URI addressing the given library items on this server.
    pub fn items_uri(&self, entries: &[CatalogTrack]) -> String {
        let ids: Vec<&str> = entries.iter().map(|t| t.id.as_str()).collect();
        format!(
            "server://{}/com.plexapp.plugins.library/library/metadata/{}",
            self.machine_id,
            ids.join(",")
        )
    }

    fn reconciliation_error(playlist: &str, e: SyncError) -> SyncError {
        SyncError::Reconciliation {
            playlist: playlist.to_string(),
            message: e.to_string(),
        }
    }
}

#[async_trait]
impl TargetCatalog for PlexClient {
    async fn search(&self, query: &str) -> Result<Vec<CatalogTrack>, SyncError> {
        let path = format!("/library/sections/{}/all", self.section_key);
        let request = self
            .request(Method::GET, &path)
            .query(&[("type", TRACK_TYPE), ("title", query)]);
        let response: PlexResponse<PlexMetadataContainer> = self.send_json(request).await?;

        let tracks: Vec<CatalogTrack> = response
            .media_container
            .metadata
            .into_iter()
            .map(CatalogTrack::from)
            .collect();
        debug!("Plex search '{}' returned {} tracks", query, tracks.len());
        Ok(tracks)
    }

    async fn find_playlist_by_name(
        &self,
        name: &str,
    ) -> Result<Option<PlaylistHandle>, SyncError> {
        let request = self
            .request(Method::GET, "/playlists")
            .query(&[("playlistType", "audio")]);
        let response: PlexResponse<PlexMetadataContainer> = self.send_json(request).await?;

        Ok(response
            .media_container
            .metadata
            .into_iter()
            .find(|p| p.title == name)
            .map(|p| PlaylistHandle {
                id: p.rating_key,
                name: p.title,
            }))
    }

    async fn playlist_items(
        &self,
        playlist: &PlaylistHandle,
    ) -> Result<Vec<CatalogTrack>, SyncError> {
        let path = format!("/playlists/{}/items", playlist.id);
        let response: PlexResponse<PlexMetadataContainer> =
            self.send_json(self.request(Method::GET, &path)).await?;

        Ok(response
            .media_container
            .metadata
            .into_iter()
            .map(CatalogTrack::from)
            .collect())
    }

    async fn create_playlist(
        &self,
        name: &str,
        entries: &[CatalogTrack],
    ) -> Result<PlaylistHandle, SyncError> {
        let uri = self.items_uri(entries);
        let request = self.request(Method::POST, "/playlists").query(&[
            ("type", "audio"),
            ("title", name),
            ("smart", "0"),
            ("uri", uri.as_str()),
        ]);
        let response: PlexResponse<PlexMetadataContainer> = self
            .send_json(request)
            .await
            .map_err(|e| Self::reconciliation_error(name, e))?;

        response
            .media_container
            .metadata
            .into_iter()
            .next()
            .map(|p| PlaylistHandle {
                id: p.rating_key,
                name: p.title,
            })
            .ok_or_else(|| SyncError::Reconciliation {
                playlist: name.to_string(),
                message: "Plex did not return the created playlist".to_string(),
            })
    }

    async fn replace_membership(
        &self,
        playlist: &PlaylistHandle,
        entries: &[CatalogTrack],
    ) -> Result<(), SyncError> {
        let path = format!("/playlists/{}/items", playlist.id);

        self.request(Method::DELETE, &path)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| Self::reconciliation_error(&playlist.name, e.into()))?;

        if entries.is_empty() {
            return Ok(());
        }

        let uri = self.items_uri(entries);
        self.request(Method::PUT, &path)
            .query(&[("uri", uri.as_str())])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| Self::reconciliation_error(&playlist.name, e.into()))?;

        Ok(())
    }
}

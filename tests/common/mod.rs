#![allow(dead_code)]

use std::{
    collections::{HashMap, HashSet},
    sync::Mutex,
};

use async_trait::async_trait;
use plexsync::{
    SyncError,
    catalog::{Assistant, PlaylistHandle, SourceCatalog, TargetCatalog, TrackPage},
    types::{CatalogTrack, SourcePlaylist, TrackDescriptor},
};
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, PartialEq)]
pub enum TargetCall {
    Search(String),
    FindPlaylist(String),
    PlaylistItems(String),
    Create(String, Vec<String>),
    Replace(String, Vec<String>),
}

/// In-memory target catalog. Searches are case-insensitive substring matches
/// over the library unless a query has a scripted answer.
#[derive(Default)]
pub struct FakeTarget {
    library: Vec<CatalogTrack>,
    scripted: HashMap<String, Vec<CatalogTrack>>,
    playlists: Mutex<Vec<(PlaylistHandle, Vec<CatalogTrack>)>>,
    calls: Mutex<Vec<TargetCall>>,
    fail_search: bool,
    fail_writes_for: HashSet<String>,
    cancel_on_search: Option<(usize, CancellationToken)>,
}

impl FakeTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_library(tracks: Vec<CatalogTrack>) -> Self {
        Self {
            library: tracks,
            ..Self::default()
        }
    }

    pub fn script(mut self, query: &str, tracks: Vec<CatalogTrack>) -> Self {
        self.scripted.insert(query.to_string(), tracks);
        self
    }

    pub fn failing_search(mut self) -> Self {
        self.fail_search = true;
        self
    }

    pub fn failing_writes_for(mut self, playlist: &str) -> Self {
        self.fail_writes_for.insert(playlist.to_string());
        self
    }

    /// Cancels `token` while serving the `nth` search call (1-based).
    pub fn cancel_on_search(mut self, nth: usize, token: CancellationToken) -> Self {
        self.cancel_on_search = Some((nth, token));
        self
    }

    pub fn calls(&self) -> Vec<TargetCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn searches(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                TargetCall::Search(q) => Some(q),
                _ => None,
            })
            .collect()
    }

    pub fn write_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, TargetCall::Create(..) | TargetCall::Replace(..)))
            .count()
    }

    /// Current membership (ids) of the named playlist.
    pub fn membership(&self, name: &str) -> Option<Vec<String>> {
        self.playlists
            .lock()
            .unwrap()
            .iter()
            .find(|(handle, _)| handle.name == name)
            .map(|(_, tracks)| tracks.iter().map(|t| t.id.clone()).collect())
    }

    pub fn playlist_count(&self) -> usize {
        self.playlists.lock().unwrap().len()
    }

    fn record(&self, call: TargetCall) {
        self.calls.lock().unwrap().push(call);
    }
}

fn ids(tracks: &[CatalogTrack]) -> Vec<String> {
    tracks.iter().map(|t| t.id.clone()).collect()
}

#[async_trait]
impl TargetCatalog for FakeTarget {
    async fn search(&self, query: &str) -> Result<Vec<CatalogTrack>, SyncError> {
        self.record(TargetCall::Search(query.to_string()));

        if let Some((nth, token)) = &self.cancel_on_search {
            if self.searches().len() == *nth {
                token.cancel();
            }
        }

        if self.fail_search {
            return Err(SyncError::Target("search unavailable".to_string()));
        }

        if let Some(tracks) = self.scripted.get(query) {
            return Ok(tracks.clone());
        }

        let needle = query.to_lowercase();
        Ok(self
            .library
            .iter()
            .filter(|t| t.title.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn find_playlist_by_name(
        &self,
        name: &str,
    ) -> Result<Option<PlaylistHandle>, SyncError> {
        self.record(TargetCall::FindPlaylist(name.to_string()));
        Ok(self
            .playlists
            .lock()
            .unwrap()
            .iter()
            .find(|(handle, _)| handle.name == name)
            .map(|(handle, _)| handle.clone()))
    }

    async fn playlist_items(
        &self,
        playlist: &PlaylistHandle,
    ) -> Result<Vec<CatalogTrack>, SyncError> {
        self.record(TargetCall::PlaylistItems(playlist.id.clone()));
        Ok(self
            .playlists
            .lock()
            .unwrap()
            .iter()
            .find(|(handle, _)| handle.id == playlist.id)
            .map(|(_, tracks)| tracks.clone())
            .unwrap_or_default())
    }

    async fn create_playlist(
        &self,
        name: &str,
        entries: &[CatalogTrack],
    ) -> Result<PlaylistHandle, SyncError> {
        self.record(TargetCall::Create(name.to_string(), ids(entries)));
        if self.fail_writes_for.contains(name) {
            return Err(SyncError::Target("create rejected".to_string()));
        }

        let mut playlists = self.playlists.lock().unwrap();
        let handle = PlaylistHandle {
            id: format!("pl-{}", playlists.len() + 1),
            name: name.to_string(),
        };
        playlists.push((handle.clone(), entries.to_vec()));
        Ok(handle)
    }

    async fn replace_membership(
        &self,
        playlist: &PlaylistHandle,
        entries: &[CatalogTrack],
    ) -> Result<(), SyncError> {
        self.record(TargetCall::Replace(playlist.id.clone(), ids(entries)));
        if self.fail_writes_for.contains(&playlist.name) {
            return Err(SyncError::Target("replace rejected".to_string()));
        }

        let mut playlists = self.playlists.lock().unwrap();
        if let Some((_, tracks)) = playlists.iter_mut().find(|(h, _)| h.id == playlist.id) {
            *tracks = entries.to_vec();
        }
        Ok(())
    }
}

/// In-memory source catalog serving fixed pages of descriptors.
pub struct FakeSource {
    playlists: Vec<SourcePlaylist>,
    tracks: HashMap<String, Vec<TrackDescriptor>>,
    page_size: usize,
    fail_fetch: bool,
    fetches: Mutex<Vec<(String, Option<String>)>>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self {
            playlists: Vec::new(),
            tracks: HashMap::new(),
            page_size: 100,
            fail_fetch: false,
            fetches: Mutex::new(Vec::new()),
        }
    }

    pub fn playlist(mut self, id: &str, name: &str, tracks: Vec<TrackDescriptor>) -> Self {
        self.playlists.push(SourcePlaylist {
            id: id.to_string(),
            name: name.to_string(),
            track_count: Some(tracks.len() as u64),
            made_for_you: false,
        });
        self.tracks.insert(id.to_string(), tracks);
        self
    }

    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail_fetch = true;
        self
    }

    pub fn fetches(&self) -> Vec<(String, Option<String>)> {
        self.fetches.lock().unwrap().clone()
    }
}

#[async_trait]
impl SourceCatalog for FakeSource {
    async fn fetch_playlists(&self) -> Result<Vec<SourcePlaylist>, SyncError> {
        Ok(self.playlists.clone())
    }

    async fn fetch_playlist_tracks(
        &self,
        playlist_id: &str,
        cursor: Option<String>,
    ) -> Result<TrackPage, SyncError> {
        self.fetches
            .lock()
            .unwrap()
            .push((playlist_id.to_string(), cursor.clone()));

        if self.fail_fetch {
            return Err(SyncError::Source("source unreachable".to_string()));
        }

        let tracks = self.tracks.get(playlist_id).cloned().unwrap_or_default();
        let start: usize = cursor.map(|c| c.parse().unwrap()).unwrap_or(0);
        let end = (start + self.page_size).min(tracks.len());
        let next = (end < tracks.len()).then(|| end.to_string());

        Ok(TrackPage {
            items: tracks[start..end].to_vec(),
            next,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssistantCall {
    pub system: String,
    pub user: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Assistant that always gives the same reply, or always fails.
pub struct FakeAssistant {
    reply: Option<String>,
    calls: Mutex<Vec<AssistantCall>>,
}

impl FakeAssistant {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<AssistantCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Assistant for FakeAssistant {
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, SyncError> {
        self.calls.lock().unwrap().push(AssistantCall {
            system: system_prompt.to_string(),
            user: user_prompt.to_string(),
            max_tokens,
            temperature,
        });
        self.reply
            .clone()
            .ok_or_else(|| SyncError::Assistant("service unavailable".to_string()))
    }
}

pub fn track(id: &str, title: &str, artist: &str) -> CatalogTrack {
    CatalogTrack::new(id, title, artist)
}

pub fn descriptor(title: &str, artists: &[&str]) -> TrackDescriptor {
    TrackDescriptor::new(title, artists)
}

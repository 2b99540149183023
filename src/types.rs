use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// A source-catalog track awaiting resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackDescriptor {
    pub title: String,
    pub artists: Vec<String>,
    pub source_id: String,
    /// Link back to the track in the source catalog, when it has one.
    pub url: Option<String>,
}

impl TrackDescriptor {
    pub fn new(title: &str, artists: &[&str]) -> Self {
        Self {
            title: title.to_string(),
            artists: artists.iter().map(|a| a.to_string()).collect(),
            source_id: String::new(),
            url: None,
        }
    }

    pub fn artists_display(&self) -> String {
        self.artists.join(", ")
    }
}

/// A track as indexed by the target catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogTrack {
    pub id: String,
    pub title: String,
    pub artist_name: String,
    /// Only set on aggregate-artist entries; may list the performing artists.
    pub original_title: Option<String>,
}

impl CatalogTrack {
    pub fn new(id: &str, title: &str, artist_name: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            artist_name: artist_name.to_string(),
            original_title: None,
        }
    }

    pub fn with_original_title(mut self, original_title: &str) -> Self {
        self.original_title = Some(original_title.to_string());
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchCandidate {
    pub track: CatalogTrack,
    /// Title similarity plus artist similarity, plus 1.0 for a direct match.
    pub score: f64,
    pub direct_match: bool,
}

/// The outcome for one descriptor in one sync run.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub descriptor: TrackDescriptor,
    pub matched: Option<CatalogTrack>,
}

impl MatchResult {
    pub fn is_matched(&self) -> bool {
        self.matched.is_some()
    }
}

/// One playlist to sync. Its tracks are fetched lazily by the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistSyncJob {
    pub id: String,
    pub name: String,
}

impl PlaylistSyncJob {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
        }
    }
}

/// A playlist as listed by the source catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePlaylist {
    pub id: String,
    pub name: String,
    pub track_count: Option<u64>,
    /// Personalized playlists generated by the source catalog.
    pub made_for_you: bool,
}

impl From<&SourcePlaylist> for PlaylistSyncJob {
    fn from(playlist: &SourcePlaylist) -> Self {
        PlaylistSyncJob {
            id: playlist.id.clone(),
            name: playlist.name.clone(),
        }
    }
}

/// One entry of a backup document. Source descriptors and target tracks
/// serialize with their own shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BackupTrack {
    Source { title: String, artists: Vec<String> },
    Target { title: String, artist: String },
}

impl From<&TrackDescriptor> for BackupTrack {
    fn from(descriptor: &TrackDescriptor) -> Self {
        BackupTrack::Source {
            title: descriptor.title.clone(),
            artists: descriptor.artists.clone(),
        }
    }
}

impl From<&CatalogTrack> for BackupTrack {
    fn from(track: &CatalogTrack) -> Self {
        BackupTrack::Target {
            title: track.title.clone(),
            artist: track.artist_name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupRecord {
    pub name: String,
    pub timestamp: String,
    pub tracks: Vec<BackupTrack>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

#[derive(Tabled)]
pub struct PlaylistTableRow {
    pub name: String,
    pub tracks: String,
    pub kind: String,
}

// Spotify Web API

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyPlaylistsResponse {
    pub items: Vec<SpotifyPlaylist>,
    pub next: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyPlaylist {
    pub id: String,
    pub name: String,
    pub tracks: Option<SpotifyTracksRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyTracksRef {
    pub total: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyPlaylistTracksResponse {
    pub items: Vec<SpotifyPlaylistItem>,
    pub next: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyPlaylistItem {
    /// `null` for tracks that are no longer available.
    pub track: Option<SpotifyTrack>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyTrack {
    pub id: Option<String>,
    pub uri: Option<String>,
    pub name: String,
    pub artists: Vec<SpotifyArtist>,
    pub external_urls: Option<SpotifyExternalUrls>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyArtist {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyExternalUrls {
    pub spotify: Option<String>,
}

impl From<SpotifyTrack> for TrackDescriptor {
    fn from(track: SpotifyTrack) -> Self {
        TrackDescriptor {
            title: track.name,
            artists: track.artists.into_iter().map(|a| a.name).collect(),
            source_id: track.id.or(track.uri).unwrap_or_default(),
            url: track.external_urls.and_then(|u| u.spotify),
        }
    }
}

// Plex Media Server API

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlexResponse<T> {
    #[serde(rename = "MediaContainer")]
    pub media_container: T,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlexServerIdentity {
    #[serde(rename = "machineIdentifier")]
    pub machine_identifier: String,
    #[serde(rename = "friendlyName", default)]
    pub friendly_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlexSections {
    #[serde(rename = "Directory", default)]
    pub directories: Vec<PlexDirectory>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlexDirectory {
    pub key: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlexMetadataContainer {
    #[serde(rename = "Metadata", default)]
    pub metadata: Vec<PlexMetadata>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlexMetadata {
    #[serde(rename = "ratingKey")]
    pub rating_key: String,
    pub title: String,
    #[serde(rename = "grandparentTitle", default)]
    pub grandparent_title: Option<String>,
    #[serde(rename = "originalTitle", default)]
    pub original_title: Option<String>,
}

impl From<PlexMetadata> for CatalogTrack {
    fn from(metadata: PlexMetadata) -> Self {
        CatalogTrack {
            id: metadata.rating_key,
            title: metadata.title,
            artist_name: metadata.grandparent_title.unwrap_or_default(),
            original_title: metadata.original_title,
        }
    }
}

// Assistant (messages API)

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantRequest {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub system: String,
    pub messages: Vec<AssistantMessage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantResponse {
    pub content: Vec<AssistantContentBlock>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantContentBlock {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: Option<String>,
}

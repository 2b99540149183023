use std::time::Duration;

use reqwest::{Client, StatusCode, header::RETRY_AFTER};
use serde::de::DeserializeOwned;
use tokio::time::sleep;

use crate::{SyncError, warning};

/// Names of the personalized playlists Spotify generates for a user.
pub const MADE_FOR_YOU_NAMES: [&str; 6] = [
    "Discover Weekly",
    "Release Radar",
    "Daily Mix",
    "On Repeat",
    "Repeat Rewind",
    "Your Time Capsule",
];

/// Upper bound for a server-requested rate-limit wait.
const MAX_RETRY_AFTER_SECS: u64 = 120;

pub const PLAYLISTS_PAGE_SIZE: u32 = 50;
pub const TRACKS_PAGE_SIZE: u32 = 100;

/// Whether a playlist name belongs to a Made For You playlist.
///
/// Matches by case-sensitive containment, so numbered variants such as
/// "Daily Mix 3" are recognized.
pub fn is_made_for_you(name: &str) -> bool {
    MADE_FOR_YOU_NAMES.iter().any(|n| name.contains(n))
}

/// First page of the current user's playlists.
pub fn playlists_url(api_url: &str) -> String {
    format!(
        "{uri}/me/playlists?limit={limit}",
        uri = api_url,
        limit = PLAYLISTS_PAGE_SIZE
    )
}

/// First page of a playlist's tracks.
pub fn playlist_tracks_url(api_url: &str, playlist_id: &str) -> String {
    format!(
        "{uri}/playlists/{id}/tracks?limit={limit}",
        uri = api_url,
        id = playlist_id,
        limit = TRACKS_PAGE_SIZE
    )
}

/// Performs one authenticated GET and decodes the JSON body.
///
/// A 429 response waits for the server's `Retry-After` (capped) and is then
/// returned as an error, so the surrounding retry counts it as a failed attempt.
///
/// # Arguments
///
/// * `client` - Shared HTTP client
/// * `url` - Full request URL
/// * `token` - Valid access token, sent as a bearer token
///
/// # Errors
///
/// Returns [`SyncError::Source`] after a rate-limit wait, and
/// [`SyncError::Http`] for network errors, non-success statuses and bodies that
/// do not decode as `T`.
pub async fn get_page<T: DeserializeOwned + Send>(
    client: &Client,
    url: &str,
    token: &str,
) -> Result<T, SyncError> {
    let response = client.get(url).bearer_auth(token).send().await?;

    if response.status() == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(1)
            .min(MAX_RETRY_AFTER_SECS);
        warning!("Rate limited by Spotify, waiting {}s", retry_after);
        sleep(Duration::from_secs(retry_after)).await;
        return Err(SyncError::Source("Rate limited by Spotify".to_string()));
    }

    let response = response.error_for_status()?;
    Ok(response.json::<T>().await?)
}

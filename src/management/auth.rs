use std::path::PathBuf;

use chrono::Utc;
use reqwest::Client;

use crate::{SyncError, config, config::Settings, types::Token};

/// Seconds before expiry at which the cached token is refreshed.
const REFRESH_MARGIN_SECS: u64 = 240;

/// Holds the cached Spotify token and refreshes it when it is about to expire.
///
/// The interactive login that first writes `token.json` happens outside this
/// crate; the manager only reads, refreshes and persists it.
pub struct TokenManager {
    token: Token,
    token_url: String,
    client_id: String,
    client_secret: String,
}

impl TokenManager {
    pub fn new(token: Token, settings: &Settings) -> Self {
        TokenManager {
            token,
            token_url: settings.spotify_token_url.clone(),
            client_id: settings.spotify_client_id.clone(),
            client_secret: settings.spotify_client_secret.clone(),
        }
    }

    pub async fn load(settings: &Settings) -> Result<Self, SyncError> {
        let path = Self::token_path();
        let content = async_fs::read_to_string(&path).await.map_err(|e| {
            SyncError::Config(format!(
                "Cannot read Spotify token at {}: {}",
                path.display(),
                e
            ))
        })?;
        let token: Token = serde_json::from_str(&content)?;
        Ok(Self::new(token, settings))
    }

    pub async fn persist(&self) -> Result<(), SyncError> {
        let path = Self::token_path();
        if let Some(parent) = path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(&self.token)?;
        async_fs::write(path, json).await?;
        Ok(())
    }

    /// Returns an access token, refreshing and persisting it first if needed.
    pub async fn get_valid_token(&mut self) -> Result<String, SyncError> {
        if self.is_expired() {
            self.token = self.refresh_token().await?;
            self.persist().await?;
        }

        Ok(self.token.access_token.clone())
    }

    fn is_expired(&self) -> bool {
        let now = Utc::now().timestamp() as u64;
        let expires_at = self.token.obtained_at + self.token.expires_in;
        now >= expires_at.saturating_sub(REFRESH_MARGIN_SECS)
    }

    async fn refresh_token(&self) -> Result<Token, SyncError> {
        let client = Client::new();
        let res = client
            .post(&self.token_url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", &self.token.refresh_token),
            ])
            .send()
            .await?;

        if !res.status().is_success() {
            return Err(SyncError::Source(format!(
                "Token refresh failed with status {}",
                res.status()
            )));
        }

        let json: serde_json::Value = res.json().await?;
        refreshed_token(&self.token, &json, Utc::now().timestamp() as u64)
    }

    pub fn token_path() -> PathBuf {
        config::data_dir().join("cache").join("token.json")
    }
}

/// Builds the token that replaces `previous` from a refresh response.
///
/// Spotify only sends a new refresh token when it rotates it, so the previous
/// refresh token and scope are kept when the response omits them.
///
/// # Errors
///
/// Returns [`SyncError::Source`] if the response carries no (or an empty)
/// access token.
pub fn refreshed_token(
    previous: &Token,
    response: &serde_json::Value,
    obtained_at: u64,
) -> Result<Token, SyncError> {
    let access_token = response["access_token"]
        .as_str()
        .filter(|t| !t.is_empty())
        .ok_or_else(|| {
            SyncError::Source("Token refresh response has no access token".to_string())
        })?;

    Ok(Token {
        access_token: access_token.to_string(),
        refresh_token: response["refresh_token"]
            .as_str()
            .unwrap_or(previous.refresh_token.as_str())
            .to_string(),
        scope: response["scope"]
            .as_str()
            .unwrap_or(previous.scope.as_str())
            .to_string(),
        expires_in: response["expires_in"].as_i64().unwrap_or(3600) as u64,
        obtained_at,
    })
}

use std::sync::Arc;

use crate::{
    assistant::AnthropicClient,
    catalog::TargetCatalog,
    config::Settings,
    error,
    matching::{Disambiguator, MatchResolver},
    plex::PlexClient,
    spotify::SpotifyClient,
};

pub fn settings() -> Settings {
    match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => error!("Cannot load configuration. Err: {}", e),
    }
}

pub async fn spotify(settings: &Settings) -> SpotifyClient {
    match SpotifyClient::from_settings(settings).await {
        Ok(client) => client,
        Err(e) => error!(
            "Failed to load Spotify token. Log in to Spotify first.\n Error: {}",
            e
        ),
    }
}

pub async fn plex(settings: &Settings) -> PlexClient {
    match PlexClient::connect(settings).await {
        Ok(client) => client,
        Err(e) => error!("Cannot connect to Plex. Err: {}", e),
    }
}

/// A resolver over `target`, with assisted disambiguation when an assistant
/// API key is configured.
pub fn resolver(target: Arc<dyn TargetCatalog>, settings: &Settings) -> MatchResolver {
    let disambiguator = settings
        .assistant
        .as_ref()
        .map(|assistant| Disambiguator::new(Arc::new(AnthropicClient::new(assistant))));
    MatchResolver::new(target, disambiguator)
}

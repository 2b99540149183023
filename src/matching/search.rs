use std::sync::Arc;

use crate::{
    SyncError,
    catalog::TargetCatalog,
    debug,
    matching::{
        normalize::{
            TitleForms, first_word, letters_only, normalize_title, strip_symbols,
            truncate_at_delimiter,
        },
        score::similarity,
    },
    types::{CatalogTrack, TrackDescriptor},
    utils,
};

/// Artist similarity a secondary-tier result needs to stay in the candidate set.
pub const RECALL_ARTIST_THRESHOLD: f64 = 0.6;

/// Issues the cascade of title queries against the target catalog.
///
/// The catalog only supports substring/token search, so recall comes from
/// trying several derived forms of the title rather than from fuzzy queries.
pub struct CandidateSearcher {
    target: Arc<dyn TargetCatalog>,
}

impl CandidateSearcher {
    pub fn new(target: Arc<dyn TargetCatalog>) -> Self {
        Self { target }
    }

    /// Tiers 1-3: normalized title, raw title, title truncated at its first
    /// delimiter. Each tier only runs if the previous one returned nothing.
    pub async fn primary(
        &self,
        descriptor: &TrackDescriptor,
        forms: &TitleForms,
    ) -> Result<Vec<CatalogTrack>, SyncError> {
        let queries = [
            forms.plain.clone(),
            descriptor.title.clone(),
            truncate_at_delimiter(&descriptor.title),
        ];

        for (tier, query) in queries.iter().enumerate() {
            if query.is_empty() {
                continue;
            }
            let tracks = self.target.search(query).await?;
            debug!(
                "Tier {} query '{}' returned {} tracks",
                tier + 1,
                query,
                tracks.len()
            );
            if !tracks.is_empty() {
                return Ok(tracks);
            }
        }

        Ok(Vec::new())
    }

    /// Tiers 4-6: letters only, first word, symbols stripped.
    ///
    /// All three always run. The union is narrowed to entries whose artist is
    /// reasonably close to one of the descriptor's artists and deduplicated by
    /// catalog id, first occurrence first.
    pub async fn secondary(
        &self,
        descriptor: &TrackDescriptor,
    ) -> Result<Vec<CatalogTrack>, SyncError> {
        let queries = [
            letters_only(&descriptor.title),
            first_word(&descriptor.title),
            strip_symbols(&descriptor.title),
        ];

        let mut tracks = Vec::new();
        for (tier, query) in queries.iter().enumerate() {
            if query.is_empty() {
                continue;
            }
            let found = self.target.search(query).await?;
            debug!(
                "Tier {} query '{}' returned {} tracks",
                tier + 4,
                query,
                found.len()
            );
            tracks.extend(found);
        }

        let artists: Vec<String> = descriptor
            .artists
            .iter()
            .map(|a| normalize_title(a))
            .collect();
        tracks.retain(|track| {
            let track_artist = normalize_title(&track.artist_name);
            artists
                .iter()
                .any(|a| similarity(a, &track_artist) > RECALL_ARTIST_THRESHOLD)
        });
        utils::dedup_by_id(&mut tracks);

        Ok(tracks)
    }
}

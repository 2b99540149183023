use std::sync::Arc;

use crate::{
    SyncError,
    catalog::TargetCatalog,
    debug, info,
    matching::{
        disambiguate::Disambiguator,
        normalize::TitleForms,
        score::{aggregate_artist_matches, evaluate, rank},
        search::CandidateSearcher,
    },
    success,
    types::{CatalogTrack, MatchCandidate, TrackDescriptor},
    warning,
};

/// Result of resolving one descriptor. Not finding a match is an expected
/// outcome, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchOutcome {
    Matched(CatalogTrack),
    Unmatched,
}

impl MatchOutcome {
    pub fn into_track(self) -> Option<CatalogTrack> {
        match self {
            MatchOutcome::Matched(track) => Some(track),
            MatchOutcome::Unmatched => None,
        }
    }
}

/// The stage at which a resolution terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// A primary-tier candidate passed the acceptance rule.
    ScoreAccept,
    /// A secondary-tier candidate had the exact title and a matching artist.
    ExactTitleCheck,
    /// The assistant was asked. The outcome may still be unmatched.
    Disambiguate,
    /// Every step ran without producing a match.
    Exhausted,
    /// A search call failed and the descriptor was given up on.
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub outcome: MatchOutcome,
    pub stage: Stage,
}

impl Resolution {
    fn matched(track: CatalogTrack, stage: Stage) -> Self {
        Self {
            outcome: MatchOutcome::Matched(track),
            stage,
        }
    }

    fn unmatched(stage: Stage) -> Self {
        Self {
            outcome: MatchOutcome::Unmatched,
            stage,
        }
    }
}

/// Resolves source descriptors to target-catalog tracks.
///
/// Runs the primary search cascade and scores its results. If nothing is
/// accepted, runs the secondary cascade, looks for an exact title, and finally
/// asks the assistant when one is configured.
pub struct MatchResolver {
    searcher: CandidateSearcher,
    disambiguator: Option<Disambiguator>,
}

impl MatchResolver {
    pub fn new(target: Arc<dyn TargetCatalog>, disambiguator: Option<Disambiguator>) -> Self {
        Self {
            searcher: CandidateSearcher::new(target),
            disambiguator,
        }
    }

    pub async fn resolve(&self, descriptor: &TrackDescriptor) -> MatchOutcome {
        self.resolve_detailed(descriptor).await.outcome
    }

    /// Like [`MatchResolver::resolve`], but also reports where resolution stopped.
    ///
    /// Never fails: any error raised while searching degrades to an unmatched
    /// outcome at [`Stage::Failed`].
    pub async fn resolve_detailed(&self, descriptor: &TrackDescriptor) -> Resolution {
        match self.try_resolve(descriptor).await {
            Ok(resolution) => resolution,
            Err(e) => {
                warning!(
                    "Error finding track '{}' by {}: {}",
                    descriptor.title,
                    descriptor.artists_display(),
                    e
                );
                Resolution::unmatched(Stage::Failed)
            }
        }
    }

    async fn try_resolve(&self, descriptor: &TrackDescriptor) -> Result<Resolution, SyncError> {
        let forms = TitleForms::new(&descriptor.title);
        debug!(
            "Searching for '{}' by {} (normalized '{}', remix '{}')",
            descriptor.title,
            descriptor.artists_display(),
            forms.plain,
            forms.remix
        );

        let primary = self.searcher.primary(descriptor, &forms).await?;
        if let Some(best) = best_candidate(descriptor, &forms, &primary) {
            success!(
                "Best match found: '{}' by '{}' (score {:.2}, direct: {})",
                best.track.title,
                best.track.artist_name,
                best.score,
                best.direct_match
            );
            return Ok(Resolution::matched(best.track, Stage::ScoreAccept));
        }

        info!(
            "No match through regular matching for '{}', trying additional searches",
            descriptor.title
        );
        let secondary = self.searcher.secondary(descriptor).await?;
        if secondary.is_empty() {
            info!("No candidates found for '{}'", descriptor.title);
            return Ok(Resolution::unmatched(Stage::Exhausted));
        }

        if let Some(track) = exact_title_match(descriptor, &secondary) {
            success!(
                "Exact title match found: '{}' by '{}'",
                track.title,
                track.artist_name
            );
            return Ok(Resolution::matched(track.clone(), Stage::ExactTitleCheck));
        }

        let Some(disambiguator) = &self.disambiguator else {
            info!(
                "No assistant configured, leaving '{}' unmatched",
                descriptor.title
            );
            return Ok(Resolution::unmatched(Stage::Exhausted));
        };

        Ok(match disambiguator.choose(descriptor, &secondary).await {
            Some(index) => Resolution::matched(secondary[index].clone(), Stage::Disambiguate),
            None => Resolution::unmatched(Stage::Disambiguate),
        })
    }
}

/// Scores `tracks`, keeps the accepted ones and returns the top-ranked candidate.
pub fn best_candidate(
    descriptor: &TrackDescriptor,
    forms: &TitleForms,
    tracks: &[CatalogTrack],
) -> Option<MatchCandidate> {
    let candidates: Vec<MatchCandidate> = tracks
        .iter()
        .filter_map(|track| {
            let evaluation = evaluate(descriptor, forms, track);
            debug!(
                "  '{}' by '{}': title {:.2}, artist {:.2}, direct {}, similar {}",
                track.title,
                track.artist_name,
                evaluation.title_score,
                evaluation.artist_score,
                evaluation.is_direct(),
                evaluation.is_similar()
            );
            evaluation.into_candidate(track)
        })
        .collect();

    rank(candidates).into_iter().next()
}

/// First candidate whose title equals the descriptor's title ignoring case and
/// whose artist contains one of the descriptor's artists, or that is an
/// aggregate-artist entry crediting one of them.
pub fn exact_title_match<'a>(
    descriptor: &TrackDescriptor,
    candidates: &'a [CatalogTrack],
) -> Option<&'a CatalogTrack> {
    let title = descriptor.title.to_lowercase();
    candidates.iter().find(|track| {
        if track.title.to_lowercase() != title {
            return false;
        }
        let track_artist = track.artist_name.to_lowercase();
        descriptor
            .artists
            .iter()
            .filter(|a| !a.is_empty())
            .any(|a| track_artist.contains(&a.to_lowercase()))
            || aggregate_artist_matches(track, &descriptor.artists)
    })
}

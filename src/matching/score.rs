//! Similarity metric and the direct/similarity acceptance rules.

use std::cmp::Ordering;

use crate::{
    matching::normalize::{TitleForms, normalize_title},
    types::{CatalogTrack, MatchCandidate, TrackDescriptor},
};

/// Artist credited on compilation entries whose performers live in `original_title`.
pub const AGGREGATE_ARTIST: &str = "Various Artists";

/// Above this, two titles or two artist names count as similar.
pub const SIMILARITY_THRESHOLD: f64 = 0.8;

/// Bonus added to candidates whose title and artist both match directly.
pub const DIRECT_MATCH_BONUS: f64 = 1.0;

/// Character-level similarity ratio in `[0, 1]`.
///
/// Computed as `2 * LCS(a, b) / (|a| + |b|)` where LCS is the longest common
/// subsequence of characters, which makes the ratio symmetric. Two empty
/// strings are identical.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * lcs_len(&a, &b) as f64 / total as f64
}

fn lcs_len(a: &[char], b: &[char]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    for ca in a {
        for (j, cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Substring containment in either direction. Empty strings never match.
fn contains_either(a: &str, b: &str) -> bool {
    !a.is_empty() && !b.is_empty() && (a.contains(b) || b.contains(a))
}

/// Whether an aggregate-artist entry lists one of the descriptor's artists in
/// its original title.
pub fn aggregate_artist_matches(track: &CatalogTrack, artists: &[String]) -> bool {
    if track.artist_name != AGGREGATE_ARTIST {
        return false;
    }
    let Some(original_title) = &track.original_title else {
        return false;
    };
    let original_title = original_title.to_lowercase();
    artists
        .iter()
        .filter(|a| !a.is_empty())
        .any(|a| original_title.contains(&a.to_lowercase()))
}

/// How one catalog track compares against one descriptor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    /// Best title similarity across the plain and remix forms.
    pub title_score: f64,
    /// Best artist similarity across the descriptor's artists.
    pub artist_score: f64,
    pub direct_title: bool,
    pub direct_artist: bool,
    pub similar_title: bool,
    pub similar_artist: bool,
}

impl Evaluation {
    pub fn is_direct(&self) -> bool {
        self.direct_title && self.direct_artist
    }

    pub fn is_similar(&self) -> bool {
        self.similar_title && self.similar_artist
    }

    pub fn accepted(&self) -> bool {
        self.is_direct() || self.is_similar()
    }

    pub fn score(&self) -> f64 {
        let bonus = if self.is_direct() {
            DIRECT_MATCH_BONUS
        } else {
            0.0
        };
        self.title_score + self.artist_score + bonus
    }

    /// The candidate this evaluation describes, if the acceptance rule keeps it.
    pub fn into_candidate(self, track: &CatalogTrack) -> Option<MatchCandidate> {
        self.accepted().then(|| MatchCandidate {
            track: track.clone(),
            score: self.score(),
            direct_match: self.is_direct(),
        })
    }
}

/// Compares a catalog track against a descriptor whose title forms are
/// already computed.
pub fn evaluate(
    descriptor: &TrackDescriptor,
    forms: &TitleForms,
    track: &CatalogTrack,
) -> Evaluation {
    let track_forms = TitleForms::new(&track.title);
    let track_artist = normalize_title(&track.artist_name);
    let artists: Vec<String> = descriptor
        .artists
        .iter()
        .map(|a| normalize_title(a))
        .collect();

    let title_score = similarity(&track_forms.plain, &forms.plain)
        .max(similarity(&track_forms.remix, &forms.remix));
    let artist_score = artists
        .iter()
        .map(|a| similarity(&track_artist, a))
        .fold(0.0, f64::max);

    let direct_title = forms.raw.to_lowercase() == track.title.to_lowercase()
        || forms.plain == track_forms.plain
        || forms.remix == track_forms.remix;
    let track_artist_lower = track.artist_name.to_lowercase();
    let direct_artist = descriptor
        .artists
        .iter()
        .any(|a| a.to_lowercase() == track_artist_lower);

    let similar_title = title_score > SIMILARITY_THRESHOLD
        || contains_either(&forms.plain, &track_forms.plain)
        || contains_either(&forms.remix, &track_forms.remix);
    let similar_artist = artist_score > SIMILARITY_THRESHOLD
        || artists.iter().any(|a| contains_either(a, &track_artist))
        || aggregate_artist_matches(track, &descriptor.artists);

    Evaluation {
        title_score,
        artist_score,
        direct_title,
        direct_artist,
        similar_title,
        similar_artist,
    }
}

/// Orders kept candidates by `(direct_match, score)` descending.
///
/// The sort is stable, so equal candidates keep their discovery order and the
/// winner is always index 0.
pub fn rank(mut candidates: Vec<MatchCandidate>) -> Vec<MatchCandidate> {
    candidates.sort_by(|a, b| {
        b.direct_match
            .cmp(&a.direct_match)
            .then(b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal))
    });
    candidates
}

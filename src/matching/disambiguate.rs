//! Assisted disambiguation: asks an external text-completion service to pick one
//! candidate by index when the deterministic rules are inconclusive.

use std::sync::Arc;

use crate::{
    catalog::Assistant,
    debug, info,
    types::{CatalogTrack, TrackDescriptor},
    warning,
};

pub const SYSTEM_PROMPT: &str =
    "You are a music matching assistant. Only respond with the index number of the best match.";

const NO_MATCH_REPLIES: [&str; 4] = ["-", "-1", "n/a", "none"];

/// What an assistant reply means for the candidate list it was given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssistantChoice {
    Index(usize),
    NoMatch,
    Unparsable(String),
    OutOfRange(i64),
}

/// One line per candidate: `"{index}: '{title}' by '{artist}'"`.
pub fn candidate_lines(candidates: &[CatalogTrack]) -> Vec<String> {
    candidates
        .iter()
        .enumerate()
        .map(|(i, t)| format!("{}: '{}' by '{}'", i, t.title, t.artist_name))
        .collect()
}

/// The `(system, user)` prompt pair asking for a single index or `-1`.
pub fn build_prompt(descriptor: &TrackDescriptor, candidates: &[CatalogTrack]) -> (String, String) {
    let user = format!(
        "Given the Spotify track '{title}' by '{artists}', find the best matching track from \
         this list and reply ONLY with the index number. If no good match exists, reply with -1.\n\n\
         Note that titles might have variations (e.g., 'T.N.T' could be 'TNT' or 'T N T'), and \
         artist names might differ slightly.\n\n\
         Tracks:\n{tracks}",
        title = descriptor.title,
        artists = descriptor.artists_display(),
        tracks = candidate_lines(candidates).join("\n"),
    );
    (SYSTEM_PROMPT.to_string(), user)
}

/// Interprets a reply against a list of `candidate_count` candidates.
///
/// `-`, `-1`, `n/a` and `none` (any case) mean no match. Anything else must be
/// an integer inside the list to select a candidate.
pub fn parse_choice(reply: &str, candidate_count: usize) -> AssistantChoice {
    let reply = reply.trim();
    if NO_MATCH_REPLIES.contains(&reply.to_lowercase().as_str()) {
        return AssistantChoice::NoMatch;
    }

    match reply.parse::<i64>() {
        Ok(index) if index >= 0 && (index as usize) < candidate_count => {
            AssistantChoice::Index(index as usize)
        }
        Ok(index) => AssistantChoice::OutOfRange(index),
        Err(_) => AssistantChoice::Unparsable(reply.to_string()),
    }
}

pub struct Disambiguator {
    assistant: Arc<dyn Assistant>,
}

impl Disambiguator {
    pub fn new(assistant: Arc<dyn Assistant>) -> Self {
        Self { assistant }
    }

    /// Asks the assistant to pick one of `candidates`.
    ///
    /// Returns the chosen index, or `None` when the assistant declines, replies
    /// with something unusable, or the call itself fails. None of these abort
    /// the resolution.
    pub async fn choose(
        &self,
        descriptor: &TrackDescriptor,
        candidates: &[CatalogTrack],
    ) -> Option<usize> {
        if candidates.is_empty() {
            return None;
        }

        let (system, prompt) = build_prompt(descriptor, candidates);
        debug!("Sending disambiguation request:\n{}", prompt);

        let reply = match self.assistant.complete(&system, &prompt, 1, 0.0).await {
            Ok(reply) => reply,
            Err(e) => {
                warning!("Error during assisted matching: {}", e);
                return None;
            }
        };

        match parse_choice(&reply, candidates.len()) {
            AssistantChoice::Index(index) => {
                info!(
                    "Assistant suggested match: {}: '{}' by '{}'",
                    index, candidates[index].title, candidates[index].artist_name
                );
                Some(index)
            }
            AssistantChoice::NoMatch => {
                info!("Assistant found no suitable match");
                None
            }
            AssistantChoice::OutOfRange(index) => {
                warning!("Assistant response index out of range: {}", index);
                None
            }
            AssistantChoice::Unparsable(raw) => {
                warning!("Could not parse assistant response as integer: {}", raw);
                None
            }
        }
    }
}

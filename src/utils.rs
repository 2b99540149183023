use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Local};

use crate::types::CatalogTrack;

/// Timestamp used in artifact file names and backup documents.
pub fn file_timestamp(now: DateTime<Local>) -> String {
    now.format("%Y%m%d_%H%M%S").to_string()
}

/// Timestamp written into the header of unmatched-track logs.
pub fn log_timestamp(now: DateTime<Local>) -> String {
    now.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Makes a playlist name safe to embed in a file name.
///
/// Path separators and characters that are reserved on common filesystems
/// become `_`. An empty result becomes `playlist`.
pub fn sanitize_file_component(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if sanitized.is_empty() {
        "playlist".to_string()
    } else {
        sanitized
    }
}

/// `dir/stem.ext`, or `dir/stem_N.ext` with the smallest `N` that does not
/// exist yet.
pub fn unique_path(dir: &Path, stem: &str, extension: &str) -> PathBuf {
    let candidate = dir.join(format!("{}.{}", stem, extension));
    if !candidate.exists() {
        return candidate;
    }

    (1..)
        .map(|n| dir.join(format!("{}_{}.{}", stem, n, extension)))
        .find(|path| !path.exists())
        .unwrap_or(candidate)
}

/// Removes tracks whose catalog id was already seen, keeping the first occurrence.
pub fn dedup_by_id(tracks: &mut Vec<CatalogTrack>) {
    let mut seen_ids = HashSet::new();
    tracks.retain(|track| seen_ids.insert(track.id.clone()));
}

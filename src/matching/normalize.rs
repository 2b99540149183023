//! Pure text transforms applied to titles and artist names before comparison.

use once_cell::sync::Lazy;
use regex::Regex;

static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s-]").unwrap());
static SYMBOLS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s]").unwrap());
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static PARENTHESES: Lazy<Regex> = Lazy::new(|| Regex::new(r"[()]").unwrap());
static FEATURING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\(?\b(?:featuring|feat|ft)\b\.?\s+").unwrap());
static DELIMITER: Lazy<Regex> = Lazy::new(|| Regex::new(r" -|–|\(").unwrap());

/// Remix patterns applied in order to an already normalized title.
///
/// Release-format qualifiers ("- Radio Edit", "- Album Version") collapse to
/// the bare kind. Any other qualifier names a different recording and is kept:
/// "- Club Mix" becomes "club mix", "- Acoustic Version" becomes
/// "acoustic version".
static REMIX_PATTERNS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    vec![
        (
            Regex::new(r"(?i)\s*[-–]\s*([\w\s]*?mix)\s*$").unwrap(),
            " $1",
        ),
        (
            Regex::new(&format!(
                r"(?i)\s*[-–]\s*(?:(?:{})\s+)?(remix|edit|version)\s*$",
                RELEASE_QUALIFIERS.join("|")
            ))
            .unwrap(),
            " $1",
        ),
        (
            Regex::new(r"(?i)\s*[-–]\s*([\w\s]*?\s(?:remix|edit|version))\s*$").unwrap(),
            " $1",
        ),
    ]
});

/// Qualifiers that only describe a release format, not a different recording.
const RELEASE_QUALIFIERS: [&str; 8] = [
    "radio", "single", "album", "original", "extended", "short", "clean", "explicit",
];

const LIVE_INDICATORS: [&str; 8] = [
    "(live)",
    "(live at",
    "(live in",
    "(recorded live",
    "(performed live",
    "- live",
    "- live at",
    "- live in",
];

/// Folds case and punctuation so differently punctuated titles compare equal.
///
/// Periods are dropped outright ("T.N.T" becomes "tnt"), every other character
/// that is not a word character, whitespace or hyphen becomes a space, runs of
/// whitespace collapse, and the result is lowercased and trimmed.
pub fn normalize_title(s: &str) -> String {
    let without_periods = s.replace('.', "");
    let spaced = NON_WORD.replace_all(&without_periods, " ");
    collapse_whitespace(&spaced).to_lowercase()
}

/// [`normalize_title`] for values that may be absent; `None` becomes `""`.
pub fn normalize_optional(s: Option<&str>) -> String {
    s.map(normalize_title).unwrap_or_default()
}

/// Rewrites "feat.", "ft." and "featuring" (with or without an opening
/// parenthesis) to a single `feat ` token.
pub fn normalize_featuring(s: &str) -> String {
    FEATURING.replace_all(s, "feat ").into_owned()
}

/// Second normalized form used only for remix-aware comparison.
///
/// Applies [`normalize_title`], drops the separator in front of a trailing mix,
/// remix, edit or version suffix (and a release-format qualifier before it),
/// then strips parentheses.
pub fn normalize_remix_title(title: &str) -> String {
    let mut normalized = normalize_title(title);
    for (pattern, replacement) in REMIX_PATTERNS.iter() {
        normalized = pattern.replace(&normalized, *replacement).into_owned();
    }
    let normalized = PARENTHESES.replace_all(&normalized, "");
    collapse_whitespace(&normalized)
}

/// Whether the title carries one of the usual live-recording markers.
///
/// The check runs on the lowercased, whitespace-collapsed title; parentheses
/// must survive for the "(live ..." markers to be seen.
pub fn is_live_version(title: &str) -> bool {
    let lowered = collapse_whitespace(&title.to_lowercase());
    LIVE_INDICATORS
        .iter()
        .any(|indicator| lowered.contains(indicator))
}

/// The title's alphanumeric characters only, e.g. "T.N.T." becomes "TNT".
pub fn letters_only(title: &str) -> String {
    title.chars().filter(|c| c.is_alphanumeric()).collect()
}

pub fn first_word(title: &str) -> String {
    title.split_whitespace().next().unwrap_or_default().to_string()
}

/// The title with every character that is neither word nor whitespace removed.
pub fn strip_symbols(title: &str) -> String {
    SYMBOLS.replace_all(title, "").trim().to_string()
}

/// The part of the title in front of the first " -", "–" or "(".
pub fn truncate_at_delimiter(title: &str) -> String {
    match DELIMITER.find(title) {
        Some(m) => title[..m.start()].trim().to_string(),
        None => title.trim().to_string(),
    }
}

fn collapse_whitespace(s: &str) -> String {
    WHITESPACE.replace_all(s, " ").trim().to_string()
}

/// The forms of one title that the scorer compares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleForms {
    pub raw: String,
    pub plain: String,
    pub remix: String,
}

impl TitleForms {
    pub fn new(raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
            plain: normalize_title(raw),
            remix: normalize_remix_title(&normalize_featuring(raw)),
        }
    }
}

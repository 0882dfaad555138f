//! String normalization helpers for feed items.
//!
//! Everything here is pure and synchronous. The aggregator uses these helpers
//! to turn a loosely shaped feed item into a clean [`ArticleRecord`] and to
//! decide whether two headlines describe the same story.
//!
//! # Similarity heuristic
//!
//! [`is_similar_title`] is a deliberately crude containment check, not a
//! semantic duplicate detector. Its thresholds ([`SIMILARITY_THRESHOLD`] and
//! [`MIN_SIMILAR_TITLE_CHARS`]) are part of the observable behavior and must
//! not be tuned casually.
//!
//! [`ArticleRecord`]: crate::models::ArticleRecord

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;
use url::Url;

/// Fraction of the shorter title's tokens that must appear in the longer one.
pub const SIMILARITY_THRESHOLD: f64 = 0.70;

/// Normalized titles shorter than this (in characters) are never near-duplicates.
pub const MIN_SIMILAR_TITLE_CHARS: usize = 10;

/// Trailing `" - Outlet"` suffix. The outlet segment may not contain a dash.
static SOURCE_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*-\s*([^-]+)$").unwrap());

/// Anything that is neither a word character nor whitespace. `\w` is
/// Unicode-aware, so Hangul, Kana, Cyrillic etc. survive.
static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s]").unwrap());

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Strip a trailing `" - Source"` suffix from a raw headline.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(clean_title("Fed Raises Rates - Reuters"), "Fed Raises Rates");
/// assert_eq!(clean_title("No suffix here"), "No suffix here");
/// ```
pub fn clean_title(raw: &str) -> String {
    SOURCE_SUFFIX.replace(raw, "").trim().to_string()
}

/// Extract the outlet name from a raw headline's `" - Source"` suffix.
///
/// Returns `None` when the headline has no suffix or the suffix is blank.
pub fn source_from_title(raw: &str) -> Option<String> {
    SOURCE_SUFFIX
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Resolve a redirector link to the article it points at.
///
/// If `raw`'s host is one of `redirector_hosts` (or a subdomain of one), the
/// query string is searched for the first parameter whose percent-decoded
/// value is an absolute `http`/`https` URL, and that value is returned.
/// In every other case `raw` is returned unchanged.
///
/// # Arguments
///
/// * `raw` - The link exactly as it appeared in the feed
/// * `redirector_hosts` - Hostnames known to wrap the real article URL
///
/// # Examples
///
/// ```ignore
/// let hosts = vec!["news.example.com".to_string()];
/// assert_eq!(
///     canonicalize_link(
///         "https://news.example.com/rss/articles/CBM?url=https%3A%2F%2Freal-site.com%2Fstory",
///         &hosts,
///     ),
///     "https://real-site.com/story"
/// );
/// ```
pub fn canonicalize_link(raw: &str, redirector_hosts: &[String]) -> String {
    let Ok(parsed) = Url::parse(raw) else {
        return raw.to_string();
    };
    let Some(host) = parsed.host_str() else {
        return raw.to_string();
    };
    if !redirector_hosts.iter().any(|r| host_matches(host, r)) {
        return raw.to_string();
    }

    // Percent-decode only; a literal `+` in the target stays a `+`.
    parsed
        .query()
        .unwrap_or_default()
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .filter_map(|(_, value)| urlencoding::decode(value).ok())
        .find(|value| {
            Url::parse(value).is_ok_and(|target| matches!(target.scheme(), "http" | "https"))
        })
        .map(|value| value.into_owned())
        .unwrap_or_else(|| raw.to_string())
}

fn host_matches(host: &str, redirector: &str) -> bool {
    let host = host.to_ascii_lowercase();
    let redirector = redirector.trim().to_ascii_lowercase();
    host == redirector || host.ends_with(&format!(".{redirector}"))
}

/// Normalize a title for similarity comparison.
///
/// Lower-cases, removes every character that is not a word character or
/// whitespace, collapses whitespace runs to a single space and trims.
/// Applying it twice gives the same result as applying it once.
pub fn normalize_title(title: &str) -> String {
    let lowered = title.to_lowercase();
    let stripped = NON_WORD.replace_all(&lowered, "");
    WHITESPACE_RUN.replace_all(&stripped, " ").trim().to_string()
}

/// Containment heuristic over two *normalized* titles.
///
/// The shorter title is split on spaces and each token is looked up as a
/// substring of the longer title. The pair is similar when at least
/// [`SIMILARITY_THRESHOLD`] of the tokens are found. When both titles have
/// the same length, `accepted` is treated as the shorter one.
///
/// Titles under [`MIN_SIMILAR_TITLE_CHARS`] characters are never similar.
pub fn is_similar_title(candidate: &str, accepted: &str) -> bool {
    let candidate_len = candidate.chars().count();
    let accepted_len = accepted.chars().count();
    if candidate_len < MIN_SIMILAR_TITLE_CHARS || accepted_len < MIN_SIMILAR_TITLE_CHARS {
        return false;
    }

    let (shorter, longer) = if candidate_len < accepted_len {
        (candidate, accepted)
    } else {
        (accepted, candidate)
    };

    let words: Vec<&str> = shorter.split(' ').collect();
    let matched = words.iter().filter(|w| longer.contains(**w)).count();

    matched as f64 / words.len() as f64 >= SIMILARITY_THRESHOLD
}

/// Reduce an HTML (or plain) description to a single line of text.
///
/// Returns `None` when nothing but markup and whitespace is left.
pub fn plain_text_snippet(description: &str) -> Option<String> {
    let fragment = Html::parse_fragment(description);
    let text = fragment
        .root_element()
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ");

    if text.is_empty() { None } else { Some(text) }
}

//! Heuristic gate deciding whether a chat message is an image-search request.
//!
//! Six independent vocabulary categories are checked; a message passes when
//! at least two match. This is a precision/recall tradeoff rather than a hard
//! gate: a false negative falls through to normal chat handling, and a false
//! positive usually resolves to a keyword intent with an odd term and a
//! harmless "no results" response.

use once_cell::sync::Lazy;
use regex::Regex;

static ACTION_VERBS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(show|find|search|get|display|list|give|look)\b").unwrap());

static IMAGE_NOUNS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(image|images|photo|photos|picture|pictures|pic|pics)\b").unwrap()
});

static TATTOO_TERMS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\btattoo(s|ed)?\b|\bink(ed)?\b").unwrap());

static LOCATION_TERMS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(folder|directory|path|in|from)\b").unwrap());

static BODY_PART_TERMS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(arm|leg|back|chest|face|neck|shoulder|hand|foot|ankle|thigh|calf|forearm|wrist)s?\b",
    )
    .unwrap()
});

static SIMILARITY_TERMS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(similar|like|resembles?|matching)\b").unwrap());

/// Minimum number of vocabulary categories that must match.
const MIN_CATEGORY_MATCHES: usize = 2;

/// True when `text` is likely asking for an image search.
pub fn looks_like_image_search(text: &str) -> bool {
    let categories: [&Regex; 6] = [
        &ACTION_VERBS,
        &IMAGE_NOUNS,
        &TATTOO_TERMS,
        &LOCATION_TERMS,
        &BODY_PART_TERMS,
        &SIMILARITY_TERMS,
    ];

    let matches = categories.iter().filter(|re| re.is_match(text)).count();
    matches >= MIN_CATEGORY_MATCHES
}

//! Text normalisation for scraped cell content

use regex::Regex;
use std::sync::LazyLock;

/// Shown in place of a price the page left blank.
pub const UNAVAILABLE: &str = "--";

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("Invalid regex"));

static ENTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(?:#[0-9]+|#[xX][0-9a-fA-F]+|[a-zA-Z][a-zA-Z0-9]*);").expect("Invalid regex")
});

// ASCII digits only
static TIMESTAMP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]{4})[-/.]([0-9]{2})[-/.]([0-9]{2})\s+([0-9]{2}:[0-9]{2}:[0-9]{2})")
        .expect("Invalid regex")
});

/// Removes tags and entities and trims the result.
pub fn strip_markup(text: &str) -> String {
    let untagged = TAG_RE.replace_all(text, "");
    ENTITY_RE.replace_all(&untagged, " ").trim().to_string()
}

/// Cleans a captured price cell, substituting [`UNAVAILABLE`] for blanks.
pub fn normalize_price(text: &str) -> String {
    let price = strip_markup(text);
    if price.is_empty() {
        UNAVAILABLE.to_string()
    } else {
        price
    }
}

/// First `YYYY-MM-DD HH:MM:SS` style timestamp in `markup`, with the date
/// separators rewritten to `-`.
pub fn extract_timestamp(markup: &str) -> Option<String> {
    TIMESTAMP_RE
        .captures(markup)
        .map(|caps| format!("{}-{}-{} {}", &caps[1], &caps[2], &caps[3], &caps[4]))
}

//! Text canonicalization applied before any matching.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref PUNCTUATION: Regex = Regex::new(r"[^\w\s'-]").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// Lower-case, strip punctuation (hyphens and apostrophes survive) and
/// collapse whitespace. Whitespace-only input yields an empty string.
pub fn normalize(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    let stripped = PUNCTUATION.replace_all(lowered.trim(), " ");
    let collapsed = WHITESPACE.replace_all(&stripped, " ");
    collapsed.trim().to_string()
}

//! Text normalization used for phrase matching.
//!
//! Both the query phrase and every string field are folded to lower case
//! and stripped of ASCII punctuation before comparison. Whitespace and
//! non-ASCII characters pass through untouched, so `"état: prêt!"` becomes
//! `"état prêt"`.

/// Lower-case `input` and remove all ASCII punctuation.
pub fn normalize(input: &str) -> String {
    input
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_ascii_punctuation())
        .collect()
}

/// Returns true when the normalized form of `value` contains
/// `normalized_phrase` as a contiguous substring.
///
/// `normalized_phrase` must already be normalized. Values that normalize to
/// the empty string never match.
pub fn contains_phrase(value: &str, normalized_phrase: &str) -> bool {
    let value = normalize(value);
    !value.is_empty() && value.contains(normalized_phrase)
}

//! Text cleanup for model output and file names.

use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Regex to collapse runs of whitespace into one space.
static WHITESPACE_COLLAPSE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Regex to collapse runs of dashes produced by slugging.
static DASH_RUN_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-{2,}").unwrap());

/// Characters that become a dash in a slug.
const SEPARATOR_CHARS: &[char] = &[' ', '-', '_', '.'];

/// Slug used when nothing usable is left of the input.
const FALLBACK_SLUG: &str = "deck";

/// Collapse whitespace runs (including newlines) and trim.
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_COLLAPSE_REGEX
        .replace_all(text, " ")
        .trim()
        .to_string()
}

/// Turn a topic into a file-system-safe name.
///
/// Accents are stripped, letters lowercased, separators turned into single
/// dashes and everything else dropped: `"Energía solar — 2025"` becomes
/// `"energia-solar-2025"`. An empty result becomes `"deck"`.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());

    for c in text.nfkd().filter(|c| !is_combining_mark(*c)) {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if SEPARATOR_CHARS.contains(&c) {
            slug.push('-');
        }
    }

    let slug = DASH_RUN_REGEX.replace_all(&slug, "-");
    let slug = slug.trim_matches('-');

    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  Hello   world  "), "Hello world");
        assert_eq!(collapse_whitespace("Line one\n\tLine two"), "Line one Line two");
        assert_eq!(collapse_whitespace("   "), "");
    }

    #[test]
    fn test_slugify_strips_accents() {
        assert_eq!(slugify("Energía solar — 2025"), "energia-solar-2025");
        assert_eq!(slugify("Café Über"), "cafe-uber");
    }

    #[test]
    fn test_slugify_separators() {
        assert_eq!(slugify("wind_power.v2"), "wind-power-v2");
        assert_eq!(slugify("--Wind -- Power--"), "wind-power");
    }

    #[test]
    fn test_slugify_drops_punctuation() {
        assert_eq!(slugify("What's new? (2024)"), "whats-new-2024");
    }

    #[test]
    fn test_slugify_fallback() {
        assert_eq!(slugify(""), "deck");
        assert_eq!(slugify("!!! ???"), "deck");
    }

    #[test]
    fn test_slugify_keeps_non_latin_letters() {
        assert_eq!(slugify("風力 発電"), "風力-発電");
    }
}

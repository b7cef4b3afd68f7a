//! Shared text normalization for comparison keys and slugs.
//!
//! Every sort key, dedup key, and identifier in the pipeline goes through
//! these functions. Both are pure: identical input always yields identical
//! output, independent of locale or environment.

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Runs of whitespace, underscores and slashes become a single hyphen.
static SEPARATOR_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s_/]+").unwrap());

/// Anything outside the slug-safe alphabet is dropped.
static SLUG_UNSAFE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9-]+").unwrap());

/// Repeated hyphens collapse to one.
static HYPHEN_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"-+").unwrap());

/// Check if a character is a Unicode combining mark (diacritical mark).
/// Used to filter out accents during normalization.
pub fn is_combining_mark(c: char) -> bool {
    matches!(c as u32, 0x0300..=0x036F | 0x1AB0..=0x1AFF | 0x1DC0..=0x1DFF | 0xFE20..=0xFE2F)
}

/// Canonicalize a string for comparison and sorting.
/// NFKD decomposition, combining marks stripped, lowercased, trimmed.
/// e.g., "  José " → "jose", "Motörhead" → "motorhead"
pub fn normalize_text(s: &str) -> String {
    let stripped: String = s.nfkd().filter(|c| !is_combining_mark(*c)).collect();
    stripped.to_lowercase().trim().to_string()
}

/// Render a display string as a lowercase, hyphen-separated, URL-safe slug.
/// e.g., "Guns & Roses" → "guns-and-roses", "AC/DC" → "ac-dc"
///
/// An all-punctuation or empty input slugifies to the empty string; callers
/// building identifiers must substitute a fallback token first.
pub fn slugify(s: &str) -> String {
    let s = normalize_text(s);
    let s = s.replace('&', " and ");
    let s = SEPARATOR_RUNS.replace_all(&s, "-");
    let s = SLUG_UNSAFE.replace_all(&s, "");
    let s = HYPHEN_RUNS.replace_all(&s, "-");
    s.trim_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_text_basic() {
        assert_eq!(normalize_text("  Bon Jovi  "), "bon jovi");
        assert_eq!(normalize_text("JOSÉ"), "jose");
        assert_eq!(normalize_text("Motörhead"), "motorhead");
        assert_eq!(normalize_text("Beyoncé"), "beyonce");
    }

    #[test]
    fn test_normalize_text_is_idempotent() {
        let once = normalize_text("Sigur Rós");
        assert_eq!(normalize_text(&once), once);
    }

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Bon Jovi"), "bon-jovi");
        assert_eq!(slugify("Livin' on a Prayer"), "livin-on-a-prayer");
        assert_eq!(slugify("AC/DC"), "ac-dc");
        assert_eq!(slugify("some_snake_case"), "some-snake-case");
    }

    #[test]
    fn test_slugify_ampersand() {
        assert_eq!(slugify("Guns & Roses"), "guns-and-roses");
        assert_eq!(slugify("Simon&Garfunkel"), "simon-and-garfunkel");
    }

    #[test]
    fn test_slugify_accents() {
        assert_eq!(slugify("José González"), "jose-gonzalez");
        assert_eq!(slugify("Céline Dion"), "celine-dion");
    }

    #[test]
    fn test_slugify_collapses_hyphens() {
        assert_eq!(slugify("a -- b"), "a-b");
        assert_eq!(slugify("--edge--"), "edge");
    }

    #[test]
    fn test_slugify_degenerate_inputs() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("!!!"), "");
        assert_eq!(slugify("¿¡…!?"), "");
    }
}

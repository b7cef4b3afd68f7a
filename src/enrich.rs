//! Lyrics-site URL guessing for raw song records.
//!
//! Fills `lyrics_url` with a musixmatch-style slug guess and
//! `fallback_url` with a search-engine query, never overwriting values
//! already present. Idempotent by design; safe to re-run over an already
//! enriched file.

use any_ascii::any_ascii;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use unicode_normalization::UnicodeNormalization;
use url::form_urlencoded;

use crate::normalize::is_combining_mark;

static RE_FEATURING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s+(?:feat\.?|ft\.?|featuring)\b.*$").unwrap());
static RE_PARENS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*\([^)]*\)").unwrap());
static RE_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s*-\s*(?:Remastered|Live|Version)\b.*$").unwrap());
static SEPARATOR_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s_/]+").unwrap());
static WHITESPACE_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static HYPHEN_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"-+").unwrap());

/// NFKD accent stripping that keeps case, unlike the pipeline normalizer.
/// Lyrics-site slugs are case-preserving.
fn strip_accents(s: &str) -> String {
    s.nfkd().filter(|c| !is_combining_mark(*c)).collect()
}

fn clean_artist_for_slug(artist: &str) -> String {
    let artist = strip_accents(artist);
    RE_FEATURING.replace(artist.trim(), "").to_string()
}

fn clean_title_for_slug(title: &str) -> String {
    let title = strip_accents(title);
    let title = RE_PARENS.replace_all(title.trim(), "").to_string();
    let title = RE_SUFFIX.replace(title.trim(), "").trim().to_string();
    // Y.M.C.A. is always styled with periods on lyrics sites.
    let letters_only: String = title.chars().filter(char::is_ascii_alphabetic).collect();
    if letters_only.to_uppercase() == "YMCA" {
        return "Y.M.C.A.".to_string();
    }
    title
}

/// Case-preserving slug in the musixmatch path style: `&` → `and`,
/// apostrophes become hyphens, punctuation other than `.` and `-` is
/// dropped, whitespace runs hyphenate. Leftover non-ASCII is
/// transliterated so the path stays URL-safe.
fn slugify_for_lyrics_site(s: &str) -> String {
    let s = s.replace('&', " and ");
    let s = SEPARATOR_RUNS.replace_all(&s, " ");
    let s = s.trim().replace(['\'', '\u{2019}', '\u{2018}'], "-");
    let s = any_ascii(&s);
    let s: String = s
        .chars()
        .filter(|c| !c.is_ascii_punctuation() || matches!(*c, '.' | '-'))
        .collect();
    let s = WHITESPACE_RUNS.replace_all(&s, "-");
    let s = HYPHEN_RUNS.replace_all(&s, "-");
    s.trim_matches('-').to_string()
}

/// Guess the lyrics page URL for a song.
pub fn build_lyrics_url(artist: &str, title: &str) -> String {
    let artist_slug = slugify_for_lyrics_site(&clean_artist_for_slug(artist));
    let title_slug = slugify_for_lyrics_site(&clean_title_for_slug(title));
    format!("https://www.musixmatch.com/lyrics/{artist_slug}/{title_slug}")
}

/// Search keyword by category: Latin-language repertoires search better
/// with the local word for lyrics.
fn query_keyword(categories: &[String]) -> &'static str {
    if categories.iter().any(|c| c == "Latin" || c == "Portuguese") {
        "letra"
    } else if categories.iter().any(|c| c == "Italian" || c == "Italian Classics") {
        "testo"
    } else {
        "lyrics"
    }
}

/// Search-engine fallback URL with the title quoted and localization
/// pinned for reproducible results.
pub fn build_fallback_url(title: &str, artist: &str, categories: &[String]) -> String {
    let keyword = query_keyword(categories);
    let query = format!("{keyword} \"{title}\" {artist}");
    let params: String = form_urlencoded::Serializer::new(String::new())
        .append_pair("q", query.trim())
        .append_pair("hl", "en")
        .append_pair("gl", "US")
        .append_pair("pws", "0")
        .finish();
    format!("https://www.google.com/search?{params}")
}

fn pick_first<'a>(record: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a str> {
    keys.iter().find_map(|key| {
        record
            .get(*key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|v| !v.is_empty())
    })
}

/// Absent, null or empty-string — the states enrichment may fill.
fn is_blank(record: &Map<String, Value>, key: &str) -> bool {
    match record.get(key) {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

fn record_categories(record: &Map<String, Value>) -> Vec<String> {
    match record.get("category") {
        Some(Value::String(s)) => vec![s.clone()],
        Some(Value::Array(list)) => list
            .iter()
            .filter_map(|v| v.as_str())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

/// Enrich a raw record list with missing `lyrics_url`/`fallback_url`
/// fields, without overwriting existing values. Non-object entries are
/// dropped.
pub fn enrich_records(records: Vec<Value>) -> Vec<Value> {
    let mut out = Vec::with_capacity(records.len());
    for record in records {
        let Value::Object(mut rec) = record else { continue };

        let title = pick_first(&rec, &["name", "title", "song"]).unwrap_or("").to_string();
        let artist = pick_first(&rec, &["artist", "singer", "band"]).unwrap_or("").to_string();
        let categories = record_categories(&rec);

        if is_blank(&rec, "lyrics_url") && !title.is_empty() && !artist.is_empty() {
            rec.insert(
                "lyrics_url".to_string(),
                Value::String(build_lyrics_url(&artist, &title)),
            );
        }
        if is_blank(&rec, "fallback_url") && (!title.is_empty() || !artist.is_empty()) {
            rec.insert(
                "fallback_url".to_string(),
                Value::String(build_fallback_url(&title, &artist, &categories)),
            );
        }

        out.push(Value::Object(rec));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lyrics_url_basic() {
        assert_eq!(
            build_lyrics_url("Bon Jovi", "Livin' on a Prayer"),
            "https://www.musixmatch.com/lyrics/Bon-Jovi/Livin-on-a-Prayer"
        );
    }

    #[test]
    fn test_lyrics_url_strips_featuring_and_parens() {
        assert_eq!(
            build_lyrics_url("Queen feat. David Bowie", "Under Pressure (Live at Wembley)"),
            "https://www.musixmatch.com/lyrics/Queen/Under-Pressure"
        );
    }

    #[test]
    fn test_lyrics_url_ymca_special_case() {
        assert_eq!(
            build_lyrics_url("Village People", "YMCA"),
            "https://www.musixmatch.com/lyrics/Village-People/Y.M.C.A."
        );
    }

    #[test]
    fn test_lyrics_url_ampersand_and_accents() {
        assert_eq!(
            build_lyrics_url("Simon & Garfunkel", "Cécilia"),
            "https://www.musixmatch.com/lyrics/Simon-and-Garfunkel/Cecilia"
        );
    }

    #[test]
    fn test_fallback_url_keyword_by_category() {
        let latin = build_fallback_url("Bamboléo", "Gipsy Kings", &["Latin".to_string()]);
        assert!(latin.contains("q=letra+%22Bambol%C3%A9o%22+Gipsy+Kings"));

        let italian = build_fallback_url("Volare", "Domenico Modugno", &["Italian Classics".to_string()]);
        assert!(italian.contains("q=testo+"));

        let default = build_fallback_url("Song", "Artist", &["Rock".to_string()]);
        assert!(default.contains("q=lyrics+%22Song%22+Artist"));
        assert!(default.contains("hl=en") && default.contains("gl=US") && default.contains("pws=0"));
    }

    #[test]
    fn test_enrich_fills_only_missing_fields() {
        let records = vec![
            json!({"name": "Song A", "artist": "Artist A"}),
            json!({"name": "Song B", "artist": "Artist B", "lyrics_url": "https://example.com/keep"}),
        ];
        let out = enrich_records(records);
        let a = out[0].as_object().unwrap();
        assert!(a.get("lyrics_url").unwrap().as_str().unwrap().contains("musixmatch.com"));
        assert!(a.contains_key("fallback_url"));

        let b = out[1].as_object().unwrap();
        assert_eq!(b.get("lyrics_url"), Some(&json!("https://example.com/keep")));
    }

    #[test]
    fn test_enrich_is_idempotent() {
        let records = vec![json!({"name": "Song", "artist": "Artist"})];
        let once = enrich_records(records);
        let twice = enrich_records(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_enrich_skips_non_objects_and_incomplete() {
        let records = vec![json!("junk"), json!({"name": "Only Title"})];
        let out = enrich_records(records);
        assert_eq!(out.len(), 1);
        let rec = out[0].as_object().unwrap();
        // No artist: no lyrics guess, but the search fallback still helps.
        assert!(!rec.contains_key("lyrics_url"));
        assert!(rec.contains_key("fallback_url"));
    }
}

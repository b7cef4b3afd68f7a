//! Trigram search index for client-side fuzzy matching.
//!
//! Index-only: no scoring or ranking lives here. The contract is a stable,
//! reproducible trigram set per song for identical normalized text; the
//! client decides what to do with it.

use rustc_hash::FxHashSet;

use crate::models::{Dataset, SearchEntry, SearchIndex, Song, SEARCH_INDEX_VERSION, UNCATEGORIZED};
use crate::normalize::normalize_text;

/// All length-3 substrings of the input padded with two spaces on each
/// side, deduplicated preserving first occurrence. Padding lets edge
/// trigrams anchor on word boundaries.
pub fn trigrams(text: &str) -> Vec<String> {
    let padded = format!("  {text}  ");
    let chars: Vec<char> = padded.chars().collect();
    let mut seen: FxHashSet<String> = FxHashSet::default();
    let mut out = Vec::new();
    for window in chars.windows(3) {
        let gram: String = window.iter().collect();
        if seen.insert(gram.clone()) {
            out.push(gram);
        }
    }
    out
}

/// Display categories feeding the haystack: a `categories` list carried in
/// `extra` (string entries only), or the single canonical category.
fn display_categories(song: &Song) -> Vec<String> {
    if let Some(serde_json::Value::Array(list)) = song.extra.get("categories") {
        return list
            .iter()
            .filter_map(|v| v.as_str())
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect();
    }
    let single = song.category.trim();
    if single.is_empty() {
        vec![UNCATEGORIZED.to_string()]
    } else {
        vec![single.to_string()]
    }
}

fn entry_for(song: &Song) -> SearchEntry {
    let t = normalize_text(song.title.as_deref().unwrap_or(""));
    let a = normalize_text(song.artist.as_deref().unwrap_or(""));
    let c = normalize_text(&display_categories(song).join(" "));
    let g = trigrams(&format!("{t} {a} {c}"));
    SearchEntry {
        id: song.id.clone(),
        t,
        a,
        c,
        g,
    }
}

/// One entry per song, dataset order preserved.
pub fn build_search_index(dataset: &Dataset) -> SearchIndex {
    SearchIndex {
        version: SEARCH_INDEX_VERSION,
        songs: dataset.songs.iter().map(entry_for).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MappedSong;
    use crate::pipeline::build_dataset;
    use serde_json::json;

    #[test]
    fn test_trigrams_cover_edges() {
        assert_eq!(trigrams("abc"), vec!["  a", " ab", "abc", "bc ", "c  "]);
    }

    #[test]
    fn test_trigrams_dedupe_preserving_order() {
        assert_eq!(trigrams("aaaa"), vec!["  a", " aa", "aaa", "aa ", "a  "]);
    }

    #[test]
    fn test_trigrams_empty_input() {
        assert_eq!(trigrams(""), vec!["   "]);
    }

    #[test]
    fn test_trigrams_are_reproducible() {
        assert_eq!(trigrams("livin' on a prayer"), trigrams("livin' on a prayer"));
    }

    fn song(title: &str, artist: &str, category: &str) -> MappedSong {
        MappedSong {
            title: Some(title.to_string()),
            artist: Some(artist.to_string()),
            category: category.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_index_entry_fields() {
        let dataset = build_dataset(
            vec![song("Livin' on a Prayer", "Bon Jovi", "Rock")],
            &["Rock".to_string()],
        );
        let index = build_search_index(&dataset);
        assert_eq!(index.version, SEARCH_INDEX_VERSION);
        assert_eq!(index.songs.len(), 1);
        let entry = &index.songs[0];
        assert_eq!(entry.id, "song:bon-jovi:livin-on-a-prayer");
        assert_eq!(entry.t, "livin' on a prayer");
        assert_eq!(entry.a, "bon jovi");
        assert_eq!(entry.c, "rock");
        assert!(entry.g.contains(&"pra".to_string()));
    }

    #[test]
    fn test_index_uses_extra_categories_list() {
        let mut s = song("Song", "Artist", "Rock");
        s.extra
            .insert("categories".to_string(), json!(["Rock", "Pop", 7, " "]));
        let dataset = build_dataset(vec![s], &["Rock".to_string()]);
        let index = build_search_index(&dataset);
        // Only non-blank string entries feed the haystack.
        assert_eq!(index.songs[0].c, "rock pop");
    }
}

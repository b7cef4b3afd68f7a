//! The normalization pipeline core: dedup, identity, ordering.
//!
//! Input order is an explicit contract, not an accident. First-seen-wins
//! dedup and first-seen artist display names mean that reordering
//! duplicate inputs changes which record survives; the tests pin this down
//! rather than papering over it.

use rustc_hash::FxHashSet;

use crate::models::{Artist, Dataset, DedupKey, MappedSong, Song, UNCATEGORIZED};
use crate::normalize::{normalize_text, slugify};

/// Slug with an identifier-safe fallback for absent or all-punctuation
/// input.
fn slug_or(text: Option<&str>, fallback: &str) -> String {
    let slug = slugify(text.unwrap_or(fallback));
    if slug.is_empty() {
        fallback.to_string()
    } else {
        slug
    }
}

/// Collapse songs sharing a normalized (artist, title) key.
/// First occurrence survives with all its fields; later duplicates are
/// dropped entirely, no merging.
pub fn dedupe_songs(songs: Vec<MappedSong>) -> Vec<MappedSong> {
    let mut seen: FxHashSet<DedupKey> = FxHashSet::default();
    let mut out = Vec::with_capacity(songs.len());
    for song in songs {
        let key = (
            normalize_text(song.artist.as_deref().unwrap_or("")),
            normalize_text(song.title.as_deref().unwrap_or("")),
        );
        if seen.insert(key) {
            out.push(song);
        }
    }
    out
}

/// Assign stable identifiers: `song:<artist-slug>:<title-slug>` and
/// `artist:<artist-slug>`, with `unknown`/`untitled` fallbacks when a slug
/// reduces to empty.
pub fn assign_identity(songs: Vec<MappedSong>) -> Vec<Song> {
    songs
        .into_iter()
        .map(|song| {
            let artist_slug = slug_or(song.artist.as_deref(), "unknown");
            let title_slug = slug_or(song.title.as_deref(), "untitled");
            Song {
                id: format!("song:{artist_slug}:{title_slug}"),
                artist_id: format!("artist:{artist_slug}"),
                title: song.title,
                artist: song.artist,
                category: song.category,
                lyrics_url: song.lyrics_url,
                extra: song.extra,
            }
        })
        .collect()
}

/// Derive the artist set from the deduplicated songs, one artist per
/// distinct slug. The display name is the artist string of the first song
/// encountered for that slug, in input order; spelling variants that
/// normalize identically merge silently. Songs without an artist
/// contribute nothing. Result is sorted by normalized name.
pub fn build_artists(songs: &[Song]) -> Vec<Artist> {
    let mut seen: FxHashSet<String> = FxHashSet::default();
    let mut artists = Vec::new();
    for song in songs {
        let Some(name) = song.artist.as_deref().map(str::trim).filter(|n| !n.is_empty()) else {
            continue;
        };
        let slug = slug_or(Some(name), "unknown");
        if seen.insert(slug.clone()) {
            artists.push(Artist {
                id: format!("artist:{slug}"),
                name: name.to_string(),
                slug,
            });
        }
    }
    artists.sort_by_cached_key(|artist| normalize_text(&artist.name));
    artists
}

/// The output category sequence: the supplied allow-list with
/// `Uncategorized` appended when absent.
pub fn order_categories(categories: &[String]) -> Vec<String> {
    let mut out = categories.to_vec();
    if !out.iter().any(|c| c == UNCATEGORIZED) {
        out.push(UNCATEGORIZED.to_string());
    }
    out
}

/// Position of a song's category in the output sequence; unlisted
/// categories sort after all known ones.
fn category_rank(category: &str, categories: &[String]) -> usize {
    categories
        .iter()
        .position(|c| c == category)
        .unwrap_or(categories.len())
}

/// Deterministic total order: category rank, then normalized artist, then
/// normalized title, ascending. Stable for ties.
pub fn sort_songs(songs: &mut [Song], categories: &[String]) {
    songs.sort_by_cached_key(|song| {
        (
            category_rank(&song.category, categories),
            normalize_text(song.artist.as_deref().unwrap_or("")),
            normalize_text(song.title.as_deref().unwrap_or("")),
        )
    });
}

/// Run the full pipeline over mapped songs: dedup, identity, artist
/// derivation, category ordering, canonical sort. `meta` is left for the
/// caller to attach.
pub fn build_dataset(mapped: Vec<MappedSong>, categories: &[String]) -> Dataset {
    let mut songs = assign_identity(dedupe_songs(mapped));
    let artists = build_artists(&songs);
    let categories = order_categories(categories);
    sort_songs(&mut songs, &categories);
    Dataset {
        categories,
        artists,
        songs,
        meta: None,
    }
}

//! Source ingestion: payload shape resolution and field mapping.
//!
//! Raw song lists arrive in two shapes: a JSON array of records, or an
//! object whose `categories` member maps category names to record arrays.
//! The shape is resolved once here; nothing downstream knows which one was
//! supplied. Field names vary by origin, so each canonical field is probed
//! through an ordered alias list, first non-blank string wins.

use anyhow::{bail, Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use std::path::Path;

use crate::models::{ExtraFields, MappedSong, UNCATEGORIZED};

// ============================================================================
// Field Aliases
// ============================================================================

const TITLE_ALIASES: [&str; 4] = ["title", "song", "name", "track"];
const ARTIST_ALIASES: [&str; 3] = ["artist", "singer", "band"];
const CATEGORY_ALIASES: [&str; 4] = ["category", "genre", "style", "cat"];
const LYRICS_ALIASES: [&str; 4] = ["lyrics_url", "lyrics", "letra", "url_letra"];

/// Lyrics URLs are only retained when they are absolute HTTP(S) URLs.
static HTTP_URL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^https?://").unwrap());

// ============================================================================
// Payload Shapes
// ============================================================================

/// The two accepted top-level shapes, resolved once at ingestion.
#[derive(Clone, Debug)]
pub enum SourcePayload {
    /// Plain array of song-like records.
    Records(Vec<Value>),
    /// Object keyed by category name, each holding an array of records.
    ByCategory(Map<String, Value>),
}

impl SourcePayload {
    /// Classify a parsed JSON document. Anything else is structurally
    /// fatal: the pipeline cannot proceed without a recognizable schema.
    pub fn from_value(data: Value, origin: &Path) -> Result<Self> {
        match data {
            Value::Array(records) => Ok(SourcePayload::Records(records)),
            Value::Object(mut obj) => match obj.remove("categories") {
                Some(Value::Object(by_cat)) => Ok(SourcePayload::ByCategory(by_cat)),
                _ => bail!("Unsupported JSON structure in {}", origin.display()),
            },
            _ => bail!("Unsupported JSON structure in {}", origin.display()),
        }
    }

    /// Flatten into raw record objects, source order preserved.
    /// Records under a category key inherit that key as their default
    /// `category` before alias probing, so it wins over `genre`-style
    /// aliases. Non-object entries are dropped silently.
    pub fn into_records(self) -> Vec<Map<String, Value>> {
        let mut records = Vec::new();
        match self {
            SourcePayload::Records(items) => {
                for item in items {
                    if let Value::Object(obj) = item {
                        records.push(obj);
                    }
                }
            }
            SourcePayload::ByCategory(by_cat) => {
                for (cat, items) in by_cat {
                    let Value::Array(items) = items else { continue };
                    for item in items {
                        if let Value::Object(mut obj) = item {
                            obj.entry("category".to_string())
                                .or_insert_with(|| Value::String(cat.clone()));
                            records.push(obj);
                        }
                    }
                }
            }
        }
        records
    }
}

// ============================================================================
// Field Mapping
// ============================================================================

/// First alias whose value is a non-blank string.
fn pick<'a>(record: &'a Map<String, Value>, aliases: &[&str]) -> Option<&'a str> {
    aliases.iter().find_map(|key| {
        record
            .get(*key)
            .and_then(Value::as_str)
            .filter(|v| !v.trim().is_empty())
    })
}

/// Map one raw record onto the canonical song schema.
///
/// Raw keys that do not coincide with a canonical field set here are
/// preserved verbatim in `extra` (including the winning alias key when it
/// differs from the canonical name), before the category default applies.
pub fn map_record(record: &Map<String, Value>) -> MappedSong {
    let title = pick(record, &TITLE_ALIASES).map(|v| v.trim().to_string());
    let artist = pick(record, &ARTIST_ALIASES).map(|v| v.trim().to_string());
    let category = pick(record, &CATEGORY_ALIASES).map(|v| v.trim().to_string());
    let lyrics_url = pick(record, &LYRICS_ALIASES)
        .map(str::trim)
        .filter(|v| HTTP_URL.is_match(v))
        .map(str::to_string);

    let mut extra = ExtraFields::new();
    for (key, value) in record {
        let consumed = (title.is_some() && key == "title")
            || (artist.is_some() && key == "artist")
            || (category.is_some() && key == "category")
            || (lyrics_url.is_some() && key == "lyrics_url");
        if !consumed {
            extra.insert(key.clone(), value.clone());
        }
    }

    MappedSong {
        title,
        artist,
        category: category.unwrap_or_else(|| UNCATEGORIZED.to_string()),
        lyrics_url,
        extra,
    }
}

// ============================================================================
// Input Readers
// ============================================================================

/// Read and map a song list file. A missing file is an empty list; a file
/// that fails to parse or has an unrecognized top-level shape aborts the
/// build.
pub fn read_songs(path: &Path) -> Result<Vec<MappedSong>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let data: Value = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse JSON in {}", path.display()))?;
    let payload = SourcePayload::from_value(data, path)?;
    Ok(payload.into_records().iter().map(map_record).collect())
}

/// Read the category allow-list: one category per non-blank trimmed line,
/// order preserved. A missing file is an empty list.
pub fn read_categories(path: &Path) -> Result<Vec<String>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

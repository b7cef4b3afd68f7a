//! Core data models for the songbook build pipeline.
//!
//! This module contains all struct definitions, type aliases, and shared
//! constants used throughout the normalization pipeline and its outputs.

use serde::Serialize;
use serde_json::{Map, Value};

// ============================================================================
// Shared Constants
// ============================================================================

/// Default category for songs without one. The only place this literal
/// exists; the mapper, sorter, validator, search index and renderers all
/// go through this constant.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Schema version attached to the dataset's `meta` block.
pub const DATASET_VERSION: u32 = 1;

/// Schema version of the client search index.
pub const SEARCH_INDEX_VERSION: u32 = 1;

// ============================================================================
// Type Aliases
// ============================================================================

/// Dedup key: (normalized artist, normalized title). Two songs sharing a
/// key are the same logical song; the first one seen survives.
pub type DedupKey = (String, String);

/// Unrecognized source fields carried through the pipeline untouched.
/// Never participates in ordering, validation, or identity.
pub type ExtraFields = Map<String, Value>;

// ============================================================================
// Song Models
// ============================================================================

/// Song after field mapping but before identity assignment.
/// `title`/`artist` stay optional: incomplete records are kept and flagged
/// by the validator rather than dropped.
#[derive(Clone, Debug, Default)]
pub struct MappedSong {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub category: String,
    pub lyrics_url: Option<String>,
    pub extra: ExtraFields,
}

/// Canonical song with stable identifiers. Immutable once built.
#[derive(Clone, Debug, Serialize)]
pub struct Song {
    /// `song:<artist-slug>:<title-slug>`, globally unique after dedup.
    pub id: String,
    /// `artist:<artist-slug>`, foreign key into the artist set.
    pub artist_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lyrics_url: Option<String>,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub extra: ExtraFields,
}

/// Artist derived from the deduplicated song set. One per distinct slug;
/// case/diacritic spelling variants merge, keeping the first-seen name.
#[derive(Clone, Debug, Serialize)]
pub struct Artist {
    /// `artist:<slug>`
    pub id: String,
    /// First-encountered display form for this slug, in input order.
    pub name: String,
    pub slug: String,
}

// ============================================================================
// Dataset
// ============================================================================

/// Build metadata attached by the caller, not the pipeline.
#[derive(Clone, Debug, Serialize)]
pub struct Meta {
    /// ISO-8601 UTC timestamp of the build.
    pub generated_at: String,
    pub version: u32,
}

/// The sole externally visible artifact of the core pipeline.
#[derive(Clone, Debug, Serialize)]
pub struct Dataset {
    pub categories: Vec<String>,
    pub artists: Vec<Artist>,
    pub songs: Vec<Song>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

// ============================================================================
// Validation Report
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueField {
    Title,
    Artist,
    Category,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    Missing,
    InvalidCategory,
}

/// One content-quality finding. Never blocks artifact generation.
#[derive(Clone, Debug, Serialize)]
pub struct ValidationIssue {
    pub id: String,
    pub field: IssueField,
    pub error: IssueKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// Literal sizes of the dataset collections plus the flattened issue count.
#[derive(Clone, Copy, Debug, Default, Serialize)]
pub struct ValidationSummary {
    pub songs: usize,
    pub artists: usize,
    pub categories: usize,
    pub issues: usize,
}

/// Derived, read-only; regenerated on every build.
#[derive(Clone, Debug, Serialize)]
pub struct ValidationReport {
    pub summary: ValidationSummary,
    pub issues: Vec<ValidationIssue>,
}

// ============================================================================
// Search Index
// ============================================================================

/// Compact per-song entry for client-side fuzzy search.
/// Short keys keep the shipped JSON small.
#[derive(Clone, Debug, Serialize)]
pub struct SearchEntry {
    pub id: String,
    /// Normalized title.
    pub t: String,
    /// Normalized artist.
    pub a: String,
    /// Normalized categories, space-joined.
    pub c: String,
    /// Trigrams of the padded haystack, first occurrence order.
    pub g: Vec<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct SearchIndex {
    pub version: u32,
    pub songs: Vec<SearchEntry>,
}

//! Dataset validation: schema completeness and category membership.
//!
//! Purely observational. The report never mutates the dataset and never
//! blocks artifact generation; content-quality findings are surfaced for
//! external review instead of being silently dropped.

use rustc_hash::FxHashSet;
use serde_json::Value;

use crate::models::{
    Dataset, IssueField, IssueKind, Song, ValidationIssue, ValidationReport, ValidationSummary,
    UNCATEGORIZED,
};

/// The category values a song claims, in report order. Supports both the
/// canonical single-category field and a `categories` list carried through
/// the `extra` side channel; blank entries fall back to the default.
fn song_categories(song: &Song) -> Vec<String> {
    if let Some(Value::Array(list)) = song.extra.get("categories") {
        return list
            .iter()
            .map(|value| {
                let text = match value {
                    Value::String(s) => s.trim().to_string(),
                    other => other.to_string(),
                };
                if text.is_empty() {
                    UNCATEGORIZED.to_string()
                } else {
                    text
                }
            })
            .collect();
    }
    let single = song.category.trim();
    vec![if single.is_empty() {
        UNCATEGORIZED.to_string()
    } else {
        single.to_string()
    }]
}

/// Check every song for blank required fields and unknown categories.
/// `categories` is the external allow-list; `Uncategorized` is always a
/// member of the validity domain.
pub fn validate_dataset(dataset: &Dataset, categories: &[String]) -> ValidationReport {
    let mut allowed: FxHashSet<&str> = categories.iter().map(String::as_str).collect();
    allowed.insert(UNCATEGORIZED);

    let mut issues = Vec::new();
    for song in &dataset.songs {
        let blank = |field: &Option<String>| {
            field.as_deref().map_or(true, |v| v.trim().is_empty())
        };
        if blank(&song.title) {
            issues.push(ValidationIssue {
                id: song.id.clone(),
                field: IssueField::Title,
                error: IssueKind::Missing,
                value: None,
            });
        }
        if blank(&song.artist) {
            issues.push(ValidationIssue {
                id: song.id.clone(),
                field: IssueField::Artist,
                error: IssueKind::Missing,
                value: None,
            });
        }
        for category in song_categories(song) {
            if !allowed.contains(category.as_str()) {
                issues.push(ValidationIssue {
                    id: song.id.clone(),
                    field: IssueField::Category,
                    error: IssueKind::InvalidCategory,
                    value: Some(category),
                });
            }
        }
    }

    ValidationReport {
        summary: ValidationSummary {
            songs: dataset.songs.len(),
            artists: dataset.artists.len(),
            categories: dataset.categories.len(),
            issues: issues.len(),
        },
        issues,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MappedSong;
    use crate::pipeline::build_dataset;
    use serde_json::json;

    fn mapped(title: &str, artist: &str, category: &str) -> MappedSong {
        MappedSong {
            title: (!title.is_empty()).then(|| title.to_string()),
            artist: (!artist.is_empty()).then(|| artist.to_string()),
            category: category.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_clean_dataset_has_no_issues() {
        let cats = vec!["Rock".to_string()];
        let dataset = build_dataset(vec![mapped("Livin' on a Prayer", "Bon Jovi", "Rock")], &cats);
        let report = validate_dataset(&dataset, &cats);
        assert!(report.issues.is_empty());
        assert_eq!(report.summary.songs, 1);
        assert_eq!(report.summary.artists, 1);
        // Allow-list plus the appended default.
        assert_eq!(report.summary.categories, 2);
        assert_eq!(report.summary.issues, 0);
    }

    #[test]
    fn test_missing_fields_are_flagged_not_dropped() {
        let cats = vec!["Rock".to_string()];
        let dataset = build_dataset(vec![mapped("", "", UNCATEGORIZED)], &cats);
        let report = validate_dataset(&dataset, &cats);
        assert_eq!(dataset.songs.len(), 1);
        assert_eq!(report.issues.len(), 2);
        assert!(report
            .issues
            .iter()
            .any(|i| i.field == IssueField::Title && i.error == IssueKind::Missing));
        assert!(report
            .issues
            .iter()
            .any(|i| i.field == IssueField::Artist && i.error == IssueKind::Missing));
        // Default category is always valid.
        assert!(!report.issues.iter().any(|i| i.field == IssueField::Category));
    }

    #[test]
    fn test_invalid_category_carries_value() {
        let cats = vec!["Rock".to_string()];
        let dataset = build_dataset(vec![mapped("Song", "Artist", "Vaporwave")], &cats);
        let report = validate_dataset(&dataset, &cats);
        assert_eq!(report.issues.len(), 1);
        let issue = &report.issues[0];
        assert_eq!(issue.field, IssueField::Category);
        assert_eq!(issue.error, IssueKind::InvalidCategory);
        assert_eq!(issue.value.as_deref(), Some("Vaporwave"));
        assert_eq!(issue.id, dataset.songs[0].id);
    }

    #[test]
    fn test_categories_list_shape_from_extra() {
        let cats = vec!["Rock".to_string(), "Pop".to_string()];
        let mut song = mapped("Song", "Artist", "Rock");
        song.extra
            .insert("categories".to_string(), json!(["Pop", "Jazz", "  "]));
        let dataset = build_dataset(vec![song], &cats);
        let report = validate_dataset(&dataset, &cats);
        // "Pop" is allowed, blank maps to the default; only "Jazz" is flagged.
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].value.as_deref(), Some("Jazz"));
    }

    #[test]
    fn test_summary_counts_match_collections() {
        let cats = vec!["Rock".to_string()];
        let dataset = build_dataset(
            vec![
                mapped("One", "A", "Rock"),
                mapped("Two", "B", "Nope"),
                mapped("", "C", "Rock"),
            ],
            &cats,
        );
        let report = validate_dataset(&dataset, &cats);
        assert_eq!(report.summary.songs, dataset.songs.len());
        assert_eq!(report.summary.artists, dataset.artists.len());
        assert_eq!(report.summary.categories, dataset.categories.len());
        assert_eq!(report.summary.issues, report.issues.len());
        assert_eq!(report.issues.len(), 2);
    }
}

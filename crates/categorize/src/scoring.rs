//! Point-based category scoring over custom and built-in vocabularies.
//!
//! Custom names score against labels by exact (+100) or substring (+10)
//! match. Built-in categories score +1 per keyword/label substring overlap
//! and need at least 2 points to count. An entry with the same name in both
//! vocabularies is blended: a strong custom score suppresses the built-in
//! contribution, a weak one has it added on top, capped below an exact
//! match.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::builtin::{BUILTIN_CATEGORIES, BuiltinCategory};

/// Label equals the custom category name.
pub const EXACT_MATCH_POINTS: u32 = 100;
/// Label and custom category name contain one another.
pub const PARTIAL_MATCH_POINTS: u32 = 10;
/// Label and built-in keyword contain one another.
pub const KEYWORD_MATCH_POINTS: u32 = 1;
/// Minimum score for a built-in category to be kept and for any category
/// to be suggested.
pub const MIN_SUGGESTION_SCORE: u32 = 2;
/// Custom scores at or above this suppress the same-named built-in score.
pub const BUILTIN_SUPPRESSION_SCORE: u32 = 50;
/// Built-in and blended scores stay strictly below an exact custom match.
pub const BUILTIN_SCORE_CAP: u32 = EXACT_MATCH_POINTS - 1;

pub const DEFAULT_MAX_SUGGESTIONS: usize = 5;

/// Separator for composite category values.
pub const CATEGORY_SEPARATOR: char = ',';

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub name: String,
    pub score: u32,
}

fn normalize_labels<S: AsRef<str>>(labels: &[S]) -> Vec<String> {
    labels
        .iter()
        .map(|l| l.as_ref().trim().to_lowercase())
        .filter(|l| !l.is_empty())
        .collect()
}

fn overlaps(a: &str, b: &str) -> bool {
    a.contains(b) || b.contains(a)
}

fn custom_points(label: &str, name: &str) -> u32 {
    if label == name {
        EXACT_MATCH_POINTS
    } else if overlaps(label, name) {
        PARTIAL_MATCH_POINTS
    } else {
        0
    }
}

fn keyword_score(labels: &[String], category: &BuiltinCategory) -> u32 {
    let hits = category
        .keywords
        .iter()
        .flat_map(|keyword| labels.iter().filter(move |label| overlaps(label, keyword)))
        .count() as u32;
    (hits * KEYWORD_MATCH_POINTS).min(BUILTIN_SCORE_CAP)
}

/// Rank every category that any label points at, best first.
///
/// Custom entries are evaluated before built-in ones and the sort is
/// stable, so ties keep that order.
pub fn score_categories<S: AsRef<str>>(
    labels: &[S],
    custom: &BTreeSet<String>,
) -> Vec<CategoryScore> {
    let labels = normalize_labels(labels);
    let mut scores: Vec<CategoryScore> = Vec::new();

    for name in custom {
        // Composite values should have been split upstream.
        if name.contains(CATEGORY_SEPARATOR) {
            continue;
        }
        let needle = name.trim().to_lowercase();
        if needle.is_empty() {
            continue;
        }
        let score: u32 = labels.iter().map(|l| custom_points(l, &needle)).sum();
        if score > 0 {
            scores.push(CategoryScore {
                name: name.trim().to_string(),
                score,
            });
        }
    }

    for category in BUILTIN_CATEGORIES {
        let score = keyword_score(&labels, category);
        if score < MIN_SUGGESTION_SCORE {
            continue;
        }

        let existing = scores
            .iter_mut()
            .find(|s| s.name.to_lowercase() == category.name.to_lowercase());
        match existing {
            Some(entry) if entry.score >= BUILTIN_SUPPRESSION_SCORE => {},
            Some(entry) => entry.score = (entry.score + score).min(BUILTIN_SCORE_CAP),
            None => scores.push(CategoryScore {
                name: category.name.to_string(),
                score,
            }),
        }
    }

    scores.sort_by(|a, b| b.score.cmp(&a.score));
    scores
}

/// Up to `max` distinct names from a ranked list that reach
/// [`MIN_SUGGESTION_SCORE`].
///
/// When nothing qualifies but the list is non-empty the top entry is
/// returned anyway. An empty list gives an empty result.
pub fn top_suggestions(ranked: &[CategoryScore], max: usize) -> Vec<String> {
    let max = max.max(1);
    let mut names: Vec<String> = Vec::with_capacity(max);

    for entry in ranked.iter().filter(|s| s.score >= MIN_SUGGESTION_SCORE) {
        if names.len() == max {
            break;
        }
        if !names.contains(&entry.name) {
            names.push(entry.name.clone());
        }
    }

    if names.is_empty()
        && let Some(top) = ranked.first()
    {
        names.push(top.name.clone());
    }
    names
}

/// Score `labels` and return up to `max` suggested category names.
pub fn suggest_multiple_categories<S: AsRef<str>>(
    labels: &[S],
    custom: &BTreeSet<String>,
    max: usize,
) -> Vec<String> {
    top_suggestions(&score_categories(labels, custom), max)
}

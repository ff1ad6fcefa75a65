/// Statistics, sorting and filtering over an aggregated catalog.
///
/// Calorie values live as text in the records; everything here parses them
/// on the fly and counts unparsable rows as skipped instead of failing.
use crate::catalog::{Catalog, Record};
use std::collections::BTreeMap;

/// Label used for records whose storage path was too shallow to carry a
/// category.
pub const UNCLASSIFIED: &str = "(unclassified)";

/// Summary of the calorie values across a catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct CalorieStats {
    /// Records whose calorie value parsed as a number.
    pub counted: usize,
    /// Records with an absent or unparsable calorie value.
    pub skipped: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

/// Computes calorie statistics, or `None` when no record has a parsable
/// calorie value.
pub fn calorie_stats(catalog: &Catalog) -> Option<CalorieStats> {
    let mut values = Vec::new();
    let mut skipped = 0;
    for record in catalog.records() {
        match record.calories() {
            Some(value) => values.push(value),
            None => skipped += 1,
        }
    }
    if values.is_empty() {
        return None;
    }

    let sum: f64 = values.iter().sum();
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    Some(CalorieStats {
        counted: values.len(),
        skipped,
        min,
        max,
        mean: sum / values.len() as f64,
    })
}

/// Counts records per category, sorted by category name.
pub fn count_by_category(catalog: &Catalog) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for record in catalog.records() {
        let category = record
            .hierarchy()
            .map(|h| h.category.clone())
            .unwrap_or_else(|| UNCLASSIFIED.to_string());
        *counts.entry(category).or_insert(0) += 1;
    }
    counts
}

/// Records sorted by name, case-insensitively.
pub fn sorted_by_name(catalog: &Catalog) -> Vec<&Record> {
    let mut records: Vec<&Record> = catalog.records().iter().collect();
    records.sort_by_key(|record| record.name().trim().to_lowercase());
    records
}

/// Records sorted by ascending calorie value; rows whose value does not
/// parse go last.
pub fn sorted_by_calories(catalog: &Catalog) -> Vec<&Record> {
    let mut records: Vec<&Record> = catalog.records().iter().collect();
    records.sort_by(|a, b| match (a.calories(), b.calories()) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
    records
}

/// Records whose category equals `category` after normalization.
pub fn filter_by_category<'a>(catalog: &'a Catalog, category: &str) -> Vec<&'a Record> {
    let wanted = crate::paths::normalize_label(category);
    catalog
        .records()
        .iter()
        .filter(|record| {
            record
                .hierarchy()
                .is_some_and(|h| h.category == wanted)
        })
        .collect()
}

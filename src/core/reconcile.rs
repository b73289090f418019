use crate::domain::model::{IssueEntry, ReadingEntry, SeriesKey, SeriesRecord, WorkingSet};
use std::collections::HashMap;

/// Counts produced by one merge, reported in the run summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub catalog_series: usize,
    pub reading_list_series: usize,
    pub new_series: usize,
}

/// Merge the persisted catalog with freshly parsed reading-list entries into
/// the working set for this run.
///
/// Reading-list entries are grouped into distinct issue numbers per series
/// (first encounter wins). A series already in the catalog keeps its
/// metadata fields and has its issue list recomputed from the reading lists,
/// reusing existing entries so a previously resolved issue id is never
/// replaced by the sentinel. A series absent from the catalog is seeded
/// fully unresolved. Catalog series not referenced by any reading list are
/// carried through untouched.
pub fn merge(catalog: Vec<SeriesRecord>, entries: &[ReadingEntry]) -> (WorkingSet, MergeStats) {
    let catalog_series = catalog.len();

    let mut set = WorkingSet::new();
    for record in catalog {
        set.insert(record.key.clone(), record);
    }

    let grouped = group_by_series(entries);
    let reading_list_series = grouped.len();

    for (key, numbers) in grouped {
        // Catalog rows may have been written with commas stripped from the
        // series name; try that spelling before treating the key as new.
        let existing_key = if set.contains_key(&key) {
            Some(key.clone())
        } else {
            let stripped = key.without_commas();
            set.contains_key(&stripped).then_some(stripped)
        };

        let mut matched = false;
        if let Some(record) = existing_key.and_then(|k| set.get_mut(&k)) {
            record.issues = rebuild_issue_list(&record.issues, &numbers);
            matched = true;
        }
        if !matched {
            let issues = numbers.iter().map(IssueEntry::unresolved).collect();
            set.insert(key.clone(), SeriesRecord::new_unresolved(key, issues));
        }
    }

    let stats = MergeStats {
        catalog_series,
        reading_list_series,
        new_series: set.len() - catalog_series,
    };
    (set, stats)
}

/// Distinct issue numbers per series key, both in first-encounter order.
fn group_by_series(entries: &[ReadingEntry]) -> Vec<(SeriesKey, Vec<String>)> {
    let mut order: Vec<SeriesKey> = Vec::new();
    let mut numbers: HashMap<SeriesKey, Vec<String>> = HashMap::new();

    for entry in entries {
        let key = SeriesKey::new(entry.series.clone(), entry.year.clone());
        let list = numbers.entry(key.clone()).or_insert_with(|| {
            order.push(key.clone());
            Vec::new()
        });
        if !list.iter().any(|n| n == &entry.number) {
            list.push(entry.number.clone());
        }
    }

    order
        .into_iter()
        .map(|key| {
            let list = numbers.remove(&key).unwrap_or_default();
            (key, list)
        })
        .collect()
}

/// The issue list after a merge: every reading-list number, backed by the
/// existing catalog entry when one exists.
fn rebuild_issue_list(existing: &[IssueEntry], numbers: &[String]) -> Vec<IssueEntry> {
    numbers
        .iter()
        .map(|number| {
            existing
                .iter()
                .find(|issue| &issue.number == number)
                .cloned()
                .unwrap_or_else(|| IssueEntry::unresolved(number))
        })
        .collect()
}

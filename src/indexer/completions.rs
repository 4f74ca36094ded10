//! Merges every indexed file's entries into one completion list.

use std::collections::HashSet;

use crate::indexer::extractor::{FileRecord, SymbolEntry};

/// Holds the merged list. It is rebuilt from scratch after every index
/// mutation: files in index order, entries in record order, first display
/// key wins.
#[derive(Debug, Default)]
pub struct CompletionAggregator {
    entries: Vec<SymbolEntry>,
}

impl CompletionAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rebuild<'a>(&mut self, records: impl IntoIterator<Item = &'a FileRecord>) {
        self.entries = merge(records);
    }

    pub fn entries(&self) -> &[SymbolEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub fn merge<'a>(records: impl IntoIterator<Item = &'a FileRecord>) -> Vec<SymbolEntry> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut merged = Vec::new();
    for record in records {
        for entry in record.iter() {
            if seen.insert(entry.display.as_str()) {
                merged.push(entry.clone());
            }
        }
    }
    merged
}

/// Entries whose trigger starts with `prefix`, case-insensitively
pub fn filter_prefix<'a>(entries: &'a [SymbolEntry], prefix: &str) -> Vec<&'a SymbolEntry> {
    let prefix = prefix.to_lowercase();
    entries
        .iter()
        .filter(|e| e.trigger().to_lowercase().starts_with(&prefix))
        .collect()
}

/// Entries ranked by Jaro-Winkler similarity of their trigger to `query`,
/// best first, dropping those below `threshold`
pub fn rank_fuzzy<'a>(
    entries: &'a [SymbolEntry],
    query: &str,
    threshold: f64,
) -> Vec<(&'a SymbolEntry, f64)> {
    let query = query.to_lowercase();
    let mut ranked: Vec<(&SymbolEntry, f64)> = entries
        .iter()
        .map(|e| (e, strsim::jaro_winkler(&query, &e.trigger().to_lowercase())))
        .filter(|(_, score)| *score >= threshold)
        .collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    ranked
}

//! Reconciliation of the keyword and typographic entry lists.

use std::collections::HashSet;

use ossature_core::{Outline, OutlineEntry};

/// Merge the keyword-derived entries with the typographically classified
/// ones. Keyword entries take priority and appear first, in keyword order;
/// typographic entries whose text was not already found by the keyword scan
/// follow, in document order. Exact duplicate (category, text) pairs keep
/// their first occurrence only, and the result is indexed in that order.
pub fn reconcile(
    keyword_entries: Vec<OutlineEntry>,
    typographic_entries: Vec<OutlineEntry>,
) -> Outline {
    let known_texts: HashSet<&str> = keyword_entries
        .iter()
        .map(|entry| entry.text.as_str())
        .collect();

    let fresh: Vec<OutlineEntry> = typographic_entries
        .into_iter()
        .filter(|entry| !known_texts.contains(entry.text.as_str()))
        .collect();

    let mut seen = HashSet::new();
    let entries = keyword_entries
        .into_iter()
        .chain(fresh)
        .filter(|entry| seen.insert((entry.category.clone(), entry.text.clone())))
        .collect();

    Outline::new(entries)
}

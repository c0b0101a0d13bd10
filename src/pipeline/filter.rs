//! Filter stage: reduces the sorted entries to those matching the query.
//!
//! Matching is case-insensitive substring containment against the name or the
//! email field. Relative order of the input is preserved; the stage only drops
//! rows, it never reorders them.

use crate::domain::Entry;

/// Keeps the entries whose name or email contains `query`.
///
/// The empty query matches everything and returns the input unchanged. Field
/// values are always present on a decoded [`Entry`], so there is no
/// missing-field code path here either.
#[must_use]
pub fn apply(entries: &[Entry], query: &str) -> Vec<Entry> {
    if query.is_empty() {
        return entries.to_vec();
    }

    let needle = query.to_lowercase();
    entries
        .iter()
        .filter(|entry| {
            entry.name.to_lowercase().contains(&needle)
                || entry.email.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}

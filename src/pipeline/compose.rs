//! Compose stage: annotates the page slice into display-ready rows.
//!
//! The last stage of the pipeline. Takes the paginated entries and attaches
//! everything the renderer needs per row: the resolved category label, the
//! session favorite flag, and the relative creation-time label. Pure and
//! total; both lookups it depends on are total by construction.

use crate::app::state::FavoriteSet;
use crate::domain::{CategorySet, Entry};
use crate::ui::viewmodel::EntryRow;

/// Builds the row view models for one page of entries.
#[must_use]
pub fn apply(page: &[Entry], favorites: &FavoriteSet, categories: &CategorySet) -> Vec<EntryRow> {
    page.iter()
        .map(|entry| EntryRow {
            id: entry.id.clone(),
            name: entry.name.clone(),
            email: entry.email.clone(),
            user: entry.user.clone(),
            category_label: categories.lookup(&entry.category).name,
            added_label: entry.added_ago(),
            is_favorite: favorites.contains(&entry.id),
        })
        .collect()
}

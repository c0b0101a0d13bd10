//! The memoized entry list pipeline.
//!
//! This module wires the four derivation stages into one cached value. Every
//! recomputation pass runs the stages in the fixed order
//! Sort → Filter → Paginate → Compose, each stage consuming only the previous
//! stage's cached output plus the relevant piece of view state. A pass names
//! the first dirty stage and recomputes from there; everything upstream is
//! reused as-is.
//!
//! Which stage is dirty follows from what changed:
//!
//! | change                    | first dirty stage |
//! |---------------------------|-------------------|
//! | snapshot replaced         | Sort              |
//! | sort spec                 | Sort              |
//! | search query              | Filter            |
//! | page index or size        | Paginate          |
//! | favorites                 | Compose           |
//!
//! Stages are re-derived from scratch when they run; there is no incremental
//! diffing. With collections bounded by a user's contact list this keeps the
//! pipeline trivially correct at negligible cost.
//!
//! # Modules
//!
//! - [`sort`]: ordering by the active sort spec
//! - [`filter`]: free-text query matching
//! - [`paginate`]: page window slicing
//! - [`compose`]: row view model annotation

pub mod compose;
pub mod filter;
pub mod paginate;
pub mod sort;

use crate::app::modes::{PageState, SortSpec};
use crate::app::state::FavoriteSet;
use crate::domain::{CategorySet, Entry};
use crate::ui::viewmodel::EntryRow;

/// One stage of the derivation sequence.
///
/// Ordered: a stage is recomputed when the first dirty stage is less than or
/// equal to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Sort,
    Filter,
    Paginate,
    Compose,
}

/// Counters of how many times each stage has run.
///
/// Maintained for tracing output; tests also use them to pin down the
/// recomputation policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StageRuns {
    pub sort: u32,
    pub filter: u32,
    pub paginate: u32,
    pub compose: u32,
}

/// Cached per-stage outputs of the entry list derivation.
///
/// Owned by the view session. The session drives the stage methods in pipeline
/// order starting from the first dirty stage; each method overwrites its own
/// cache from the one before it.
#[derive(Debug, Default)]
pub struct Pipeline {
    /// Sort stage output.
    sorted: Vec<Entry>,
    /// Filter stage output, derived from `sorted`.
    filtered: Vec<Entry>,
    /// Page window into `filtered`.
    page_slice: Vec<Entry>,
    /// Length of `filtered` at the last paginate run.
    total: usize,
    /// Compose stage output, derived from `page_slice`.
    rows: Vec<EntryRow>,
    /// Stage run counters.
    runs: StageRuns,
}

impl Pipeline {
    /// Creates an empty pipeline with no cached output.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs the sort stage over a fresh snapshot.
    pub fn sort(&mut self, entries: &[Entry], spec: &SortSpec) {
        self.sorted = sort::apply(entries, spec);
        self.runs.sort += 1;
    }

    /// Runs the filter stage over the cached sort output.
    pub fn filter(&mut self, query: &str) {
        self.filtered = filter::apply(&self.sorted, query);
        self.runs.filter += 1;
    }

    /// Runs the paginate stage over the cached filter output.
    pub fn paginate(&mut self, page: &PageState) {
        let (slice, total) = paginate::apply(&self.filtered, page);
        self.page_slice = slice;
        self.total = total;
        self.runs.paginate += 1;
    }

    /// Runs the compose stage over the cached page slice.
    pub fn compose(&mut self, favorites: &FavoriteSet, categories: &CategorySet) {
        self.rows = compose::apply(&self.page_slice, favorites, categories);
        self.runs.compose += 1;
    }

    /// Number of entries matching the current filter.
    #[must_use]
    pub fn filtered_count(&self) -> usize {
        self.filtered.len()
    }

    /// Total count reported by the last paginate run.
    #[must_use]
    pub fn total_count(&self) -> usize {
        self.total
    }

    /// Display-ready rows of the current page.
    #[must_use]
    pub fn rows(&self) -> &[EntryRow] {
        &self.rows
    }

    /// Stage run counters so far.
    #[must_use]
    pub fn runs(&self) -> StageRuns {
        self.runs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::modes::{SortField, SortOrder};
    use crate::domain::EntryId;

    fn entry(id: &str, name: &str, email: &str) -> Entry {
        Entry {
            id: EntryId::from(id),
            name: name.to_string(),
            email: email.to_string(),
            ..Entry::empty()
        }
    }

    #[test]
    fn stages_chain_through_cached_outputs() {
        let entries = vec![
            entry("1", "Bob", "b@x.com"),
            entry("2", "Amy", "a@x.com"),
            entry("3", "Zed", "z@other.org"),
        ];

        let mut pipeline = Pipeline::new();
        pipeline.sort(
            &entries,
            &SortSpec {
                field: SortField::Name,
                order: SortOrder::Ascending,
            },
        );
        pipeline.filter("x.com");
        pipeline.paginate(&PageState::first(1).at(1));
        pipeline.compose(&FavoriteSet::new(), &CategorySet::builtin());

        assert_eq!(pipeline.filtered_count(), 2);
        assert_eq!(pipeline.total_count(), 2);
        assert_eq!(pipeline.rows().len(), 1);
        assert_eq!(pipeline.rows()[0].name, "Bob");
        assert_eq!(
            pipeline.runs(),
            StageRuns {
                sort: 1,
                filter: 1,
                paginate: 1,
                compose: 1,
            }
        );
    }

    #[test]
    fn stage_ordering_matches_pipeline_order() {
        assert!(Stage::Sort < Stage::Filter);
        assert!(Stage::Filter < Stage::Paginate);
        assert!(Stage::Paginate < Stage::Compose);
    }
}

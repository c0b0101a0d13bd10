//! View state and the session favorites set.
//!
//! This module defines [`ViewState`], the immutable value holding every piece
//! of user-controlled list state: the active sort, the search query, the page
//! window, the session favorites, and the configured page sizes. The reducer
//! in [`handler`](crate::app::handler) never mutates a `ViewState`; it derives
//! a replacement, and the session compares old and new values to decide which
//! pipeline stages to recompute.
//!
//! [`FavoriteSet`] is the one piece of state with set semantics. It is scoped
//! to the running session and the signed-in user: nothing persists it, and
//! signing out clears it.

use crate::app::modes::{PageState, SortSpec, DEFAULT_PAGE_SIZE};
use crate::domain::EntryId;
use std::collections::HashSet;

/// Session-local set of entries the user has starred.
///
/// Identifiers are opaque, so membership says nothing about whether the entry
/// still exists in the store. An entry deleted externally while starred leaves
/// a stale identifier behind, which is inert: it annotates nothing and costs
/// one set slot until the session ends.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FavoriteSet {
    ids: HashSet<EntryId>,
}

impl FavoriteSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy with the membership of `id` inverted.
    ///
    /// Two toggles of the same identifier restore the original set. Unknown
    /// identifiers are simply inserted; there are no error conditions.
    #[must_use]
    pub fn toggled(&self, id: &EntryId) -> Self {
        let mut ids = self.ids.clone();
        if !ids.remove(id) {
            ids.insert(id.clone());
        }
        Self { ids }
    }

    /// Reports whether `id` is currently starred.
    #[must_use]
    pub fn contains(&self, id: &EntryId) -> bool {
        self.ids.contains(id)
    }

    /// Number of starred identifiers, stale ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Reports whether nothing is starred.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Immutable snapshot of all user-controlled list state.
///
/// Replaced wholesale by the reducer on every user action. The pipeline reads
/// it; nothing writes through it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    /// Active sort field and direction.
    pub sort: SortSpec,
    /// Free-text search query; empty matches every entry.
    pub query: String,
    /// Visible page window.
    pub page: PageState,
    /// Entries starred this session.
    pub favorites: FavoriteSet,
    /// Page sizes the user may select, fixed at session creation.
    pub page_sizes: Vec<usize>,
}

impl ViewState {
    /// Creates the neutral initial state.
    ///
    /// Original order, empty query, first page at `page_size` rows, nothing
    /// starred. `page_sizes` lists the sizes the reducer will accept; an empty
    /// list falls back to `[page_size]`.
    #[must_use]
    pub fn new(page_size: usize, page_sizes: Vec<usize>) -> Self {
        let page = PageState::first(page_size);
        let page_sizes = if page_sizes.is_empty() {
            vec![page.size]
        } else {
            page_sizes
        };
        Self {
            sort: SortSpec::default(),
            query: String::new(),
            page,
            favorites: FavoriteSet::new(),
            page_sizes,
        }
    }

    /// Returns a copy with a different sort spec.
    #[must_use]
    pub fn with_sort(&self, sort: SortSpec) -> Self {
        Self {
            sort,
            ..self.clone()
        }
    }

    /// Returns a copy with a different search query.
    #[must_use]
    pub fn with_query(&self, query: String) -> Self {
        Self {
            query,
            ..self.clone()
        }
    }

    /// Returns a copy with a different page window.
    #[must_use]
    pub fn with_page(&self, page: PageState) -> Self {
        Self {
            page,
            ..self.clone()
        }
    }

    /// Returns a copy with a different favorites set.
    #[must_use]
    pub fn with_favorites(&self, favorites: FavoriteSet) -> Self {
        Self {
            favorites,
            ..self.clone()
        }
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE, vec![5, 10, 25])
    }
}

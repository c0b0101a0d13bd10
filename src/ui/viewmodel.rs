//! View model types representing renderable table state.
//!
//! This module defines the immutable view models computed from session state,
//! following the MVVM pattern. View models are display-ready: category codes
//! are already resolved to labels, favorite flags are attached, and page
//! arithmetic is done. They contain no business logic.
//!
//! # Architecture
//!
//! View models are produced by [`ViewSession::view`](crate::app::session::ViewSession::view)
//! and consumed by whatever presentation layer the host provides. The crate
//! itself never renders.

use crate::domain::EntryId;

/// Display information for a single entry row.
///
/// Represents one row in the table view. All fields are pre-computed so a
/// renderer can emit them verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryRow {
    /// Store identifier, used to dispatch row-scoped actions back in.
    pub id: EntryId,

    /// Contact display name.
    pub name: String,

    /// Contact email address.
    pub email: String,

    /// Display name of the user who created the record.
    pub user: String,

    /// Resolved category label (never the raw code).
    pub category_label: String,

    /// Relative creation time ("3h ago"), when the record carries one.
    pub added_label: Option<String>,

    /// Whether this entry is starred in the current session.
    pub is_favorite: bool,
}

/// Complete table view model for one recomputation instant.
///
/// Pairs the visible rows with the context a renderer needs around them:
/// paging controls and the signed-in banner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableViewModel {
    /// Rows of the current page, in display order.
    pub rows: Vec<EntryRow>,

    /// Number of entries matching the current filter, across all pages.
    pub total_count: usize,

    /// Zero-based index of the visible page.
    pub page_index: usize,

    /// Rows per page.
    pub page_size: usize,

    /// Number of pages the filtered sequence spans (0 when empty).
    pub page_count: usize,

    /// Whether a user is signed in.
    pub signed_in: bool,

    /// Display name for the "signed in as" banner, when available.
    pub display_name: Option<String>,
}

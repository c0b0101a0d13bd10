//! User actions and the effects they produce.
//!
//! This module defines the [`Action`] vocabulary, the discrete user intents a
//! host dispatches into a view session, and the [`Effect`] type, the side
//! effects the reducer asks the host to execute. Effects bridge pure state
//! transformations and the one delegated operation in this crate: opening the
//! external entry editor.
//!
//! The reducer returns effects rather than performing them so that state
//! transitions stay testable without any host attached.

use crate::app::modes::{EditorMode, SortField};
use crate::domain::EntryId;

/// A discrete user intent dispatched into the view session.
///
/// Each action is processed by [`reduce`](crate::app::handler::reduce), which
/// derives the next [`ViewState`](crate::app::state::ViewState) and any
/// effects. Actions carry only identifiers and plain values; resolution
/// against the current entry snapshot happens in the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Selects a sort field, flipping the direction when already active.
    ToggleSort(SortField),
    /// Returns the table to source delivery order.
    ClearSort,
    /// Replaces the free-text search query.
    SetQuery(String),
    /// Jumps to the given zero-based page index.
    SetPage(usize),
    /// Switches to another page size from the configured set.
    ///
    /// Resets the page index to 0. A size outside the configured set is
    /// ignored.
    SetPageSize(usize),
    /// Inverts the favorite marker on one entry.
    ToggleFavorite(EntryId),
    /// Opens the editor on an existing entry.
    OpenEntry(EntryId),
    /// Opens the editor on a blank entry.
    AddEntry,
}

/// A side effect the host must execute on the reducer's behalf.
///
/// Produced by [`reduce`](crate::app::handler::reduce) and resolved by the
/// session into an [`EditorRequest`](crate::app::session::EditorRequest)
/// carrying the full entry and user identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Open the external entry editor.
    OpenEditor {
        /// Entry to edit, or `None` for a blank add-mode record.
        entry: Option<EntryId>,
        /// Whether the editor creates or updates.
        mode: EditorMode,
    },
}

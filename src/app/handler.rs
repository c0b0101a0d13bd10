//! The state reducer.
//!
//! This module implements [`reduce`], the single function through which every
//! user action flows. It takes the current [`ViewState`] and an [`Action`] and
//! returns the replacement state plus any effects for the host to execute.
//!
//! # Architecture
//!
//! The reducer follows a unidirectional data flow pattern:
//! 1. The host dispatches an [`Action`] into the session
//! 2. `reduce` derives a new `ViewState` value (the old one is never mutated)
//! 3. Effects are collected and returned for resolution
//! 4. The session diffs old against new state to pick the pipeline stages to
//!    recompute
//!
//! Keeping `reduce` pure over `ViewState` means every state transition is
//! testable with two values and an equality assertion, independent of entries,
//! subscriptions, or any rendering layer.

use crate::app::actions::{Action, Effect};
use crate::app::modes::{EditorMode, SortSpec};
use crate::app::state::ViewState;

/// Processes one user action and derives the next view state.
///
/// Returns the replacement state and the effects the host must execute. For
/// actions that only change state the effect list is empty; for the editor
/// actions the state comes back unchanged and the effect carries the request.
///
/// # Parameters
///
/// * `state` - Current view state
/// * `action` - User action to process
///
/// # Examples
///
/// ```
/// use rolodex::app::handler::reduce;
/// use rolodex::app::{Action, ViewState};
///
/// let state = ViewState::default();
/// let (next, effects) = reduce(&state, &Action::SetQuery("amy".to_string()));
/// assert_eq!(next.query, "amy");
/// assert!(effects.is_empty());
/// ```
#[must_use]
pub fn reduce(state: &ViewState, action: &Action) -> (ViewState, Vec<Effect>) {
    let _span = tracing::debug_span!("reduce", action = ?action).entered();

    match action {
        Action::ToggleSort(field) => (state.with_sort(state.sort.toggled(*field)), vec![]),
        Action::ClearSort => (state.with_sort(SortSpec::default()), vec![]),
        Action::SetQuery(query) => (state.with_query(query.clone()), vec![]),
        Action::SetPage(index) => (state.with_page(state.page.at(*index)), vec![]),
        Action::SetPageSize(size) => {
            if state.page_sizes.contains(size) {
                (state.with_page(state.page.resized(*size)), vec![])
            } else {
                tracing::debug!(size = *size, allowed = ?state.page_sizes, "page size not in configured set, ignoring");
                (state.clone(), vec![])
            }
        }
        Action::ToggleFavorite(id) => {
            let favorites = state.favorites.toggled(id);
            tracing::debug!(entry_id = %id, favorite_count = favorites.len(), "favorite toggled");
            (state.with_favorites(favorites), vec![])
        }
        Action::OpenEntry(id) => (
            state.clone(),
            vec![Effect::OpenEditor {
                entry: Some(id.clone()),
                mode: EditorMode::Edit,
            }],
        ),
        Action::AddEntry => (
            state.clone(),
            vec![Effect::OpenEditor {
                entry: None,
                mode: EditorMode::Add,
            }],
        ),
    }
}

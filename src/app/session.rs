//! The view session: snapshot ownership, recomputation, and source wiring.
//!
//! This module defines [`ViewSession`], the single owner of everything one
//! table view needs: the current entry snapshot, the [`ViewState`], the
//! category table, the authentication state, and the memoized
//! [`Pipeline`]. It also provides [`connect`], which binds a session to its
//! push-based sources and returns a [`Connection`] owning the live
//! subscriptions.
//!
//! # Control flow
//!
//! Everything runs synchronously on one thread. Three inputs drive the
//! session, each ending in a pipeline refresh from the stage it dirtied:
//!
//! 1. **User actions** via [`ViewSession::dispatch`]: the reducer derives a
//!    replacement `ViewState`, the session diffs old against new to find the
//!    first dirty stage, and recomputes from there.
//! 2. **Entry snapshots** via [`ViewSession::apply_snapshot`]: the working
//!    collection is replaced atomically and the pipeline recomputes from Sort.
//! 3. **Auth changes** via [`ViewSession::apply_auth`]: the banner state
//!    updates, and a change of user clears the session favorites.
//!
//! A refresh always finishes before the next input is processed, so no stage
//! ever observes state from a previous pass.

use crate::app::actions::{Action, Effect};
use crate::app::handler::reduce;
use crate::app::modes::EditorMode;
use crate::app::state::{FavoriteSet, ViewState};
use crate::domain::{CategorySet, Entry, EntryId};
use crate::pipeline::{Pipeline, Stage, StageRuns};
use crate::source::{AuthSource, AuthState, EntryScope, EntrySource, Subscription, UserIdentity};
use crate::ui::viewmodel::TableViewModel;
use std::cell::RefCell;
use std::rc::Rc;

/// A resolved request to open the external entry editor.
///
/// Produced by [`ViewSession::dispatch`] for the host to execute. The editor
/// itself (validation, persistence) lives outside this crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorRequest {
    /// The record to edit, or a blank record in add mode.
    pub entry: Entry,
    /// Whether the editor creates or updates.
    pub mode: EditorMode,
    /// The signed-in user, attached so the editor can stamp ownership.
    pub user: Option<UserIdentity>,
}

/// Owner of one table view's complete state.
///
/// See the module documentation for the control flow. Hosts hold the session
/// directly when they drive it themselves, or behind `Rc<RefCell<_>>` when
/// wiring it to sources with [`connect`].
#[derive(Debug)]
pub struct ViewSession {
    /// Working entry snapshot, replaced wholesale on every delivery.
    entries: Vec<Entry>,
    /// User-controlled list state.
    state: ViewState,
    /// Category lookup table, fixed at construction.
    categories: CategorySet,
    /// Last observed authentication state.
    auth: AuthState,
    /// Memoized stage outputs.
    pipeline: Pipeline,
}

impl ViewSession {
    /// Creates a session over an empty snapshot.
    ///
    /// The pipeline is primed immediately so [`view`](Self::view) is valid
    /// before any snapshot arrives.
    #[must_use]
    pub fn new(state: ViewState, categories: CategorySet) -> Self {
        let mut session = Self {
            entries: Vec::new(),
            state,
            categories,
            auth: AuthState::signed_out(),
            pipeline: Pipeline::new(),
        };
        session.refresh(Stage::Sort);
        session
    }

    /// Current view state.
    #[must_use]
    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Last observed authentication state.
    #[must_use]
    pub fn auth(&self) -> &AuthState {
        &self.auth
    }

    /// The session's category table.
    #[must_use]
    pub fn categories(&self) -> &CategorySet {
        &self.categories
    }

    /// Looks an entry up in the working snapshot.
    #[must_use]
    pub fn entry(&self, id: &EntryId) -> Option<&Entry> {
        self.entries.iter().find(|e| &e.id == id)
    }

    /// Pipeline stage run counters, for diagnostics.
    #[must_use]
    pub fn stage_runs(&self) -> StageRuns {
        self.pipeline.runs()
    }

    /// Processes one user action.
    ///
    /// Reduces the action into a replacement view state, recomputes the
    /// pipeline from the first stage the change dirtied, and resolves any
    /// editor effects against the working snapshot. An editor request whose
    /// entry vanished from the snapshot is dropped with a debug log rather
    /// than surfaced as an error.
    pub fn dispatch(&mut self, action: &Action) -> Vec<EditorRequest> {
        let _span = tracing::debug_span!("dispatch", action = ?action).entered();

        let (next, effects) = reduce(&self.state, action);
        let dirty = first_dirty_stage(&self.state, &next);
        self.state = next;

        if let Some(stage) = dirty {
            self.refresh(stage);
        }

        effects
            .into_iter()
            .filter_map(|effect| self.resolve_effect(effect))
            .collect()
    }

    /// Replaces the working snapshot with a freshly delivered one.
    ///
    /// The replacement is atomic from the pipeline's point of view: the whole
    /// collection swaps and a full recomputation runs from Sort.
    pub fn apply_snapshot(&mut self, entries: Vec<Entry>) {
        tracing::debug!(entry_count = entries.len(), "entry snapshot replaced");
        self.entries = entries;
        self.refresh(Stage::Sort);
    }

    /// Applies an authentication state change.
    ///
    /// A change of signed-in user clears the favorites set, which is scoped to
    /// the current user for the current session. Identical states are ignored.
    pub fn apply_auth(&mut self, auth: AuthState) {
        if auth == self.auth {
            return;
        }
        let user_changed = self.auth.uid() != auth.uid();
        tracing::debug!(
            signed_in = auth.signed_in,
            user_changed = user_changed,
            "auth state applied"
        );
        self.auth = auth;

        if user_changed && !self.state.favorites.is_empty() {
            self.state = self.state.with_favorites(FavoriteSet::new());
            self.refresh(Stage::Compose);
        }
    }

    /// Builds the table view model for the current instant.
    #[must_use]
    pub fn view(&self) -> TableViewModel {
        let total = self.pipeline.total_count();
        let size = self.state.page.size;
        TableViewModel {
            rows: self.pipeline.rows().to_vec(),
            total_count: total,
            page_index: self.state.page.index,
            page_size: size,
            page_count: if total == 0 { 0 } else { (total + size - 1) / size },
            signed_in: self.auth.signed_in,
            display_name: self.auth.user.as_ref().map(|u| u.display_name.clone()),
        }
    }

    /// Recomputes the pipeline from `from` through Compose.
    ///
    /// After the filter output is known the page index is clamped into range,
    /// so a shrinking result set lands the user on the last non-empty page
    /// instead of a stranded empty one. An explicit jump past the end via
    /// `Action::SetPage` is left alone; only filter and sort driven shrinkage
    /// clamps.
    fn refresh(&mut self, from: Stage) {
        let _span = tracing::debug_span!(
            "refresh",
            from = ?from,
            entry_count = self.entries.len()
        )
        .entered();

        if from <= Stage::Sort {
            self.pipeline.sort(&self.entries, &self.state.sort);
        }
        if from <= Stage::Filter {
            self.pipeline.filter(&self.state.query);

            let clamped = self.state.page.clamped(self.pipeline.filtered_count());
            if clamped != self.state.page {
                tracing::debug!(index = clamped.index, "page index clamped after filter");
                self.state = self.state.with_page(clamped);
            }
        }
        if from <= Stage::Paginate {
            self.pipeline.paginate(&self.state.page);
        }
        self.pipeline.compose(&self.state.favorites, &self.categories);

        tracing::debug!(
            filtered_count = self.pipeline.filtered_count(),
            row_count = self.pipeline.rows().len(),
            "view recomputed"
        );
    }

    /// Resolves a reducer effect against the working snapshot.
    fn resolve_effect(&self, effect: Effect) -> Option<EditorRequest> {
        match effect {
            Effect::OpenEditor { entry, mode } => {
                let record = match entry {
                    Some(id) => match self.entry(&id) {
                        Some(found) => found.clone(),
                        None => {
                            tracing::debug!(entry_id = %id, "entry vanished before editor opened");
                            return None;
                        }
                    },
                    None => Entry::empty(),
                };
                Some(EditorRequest {
                    entry: record,
                    mode,
                    user: self.auth.user.clone(),
                })
            }
        }
    }
}

/// Finds the first pipeline stage invalidated by a state transition.
///
/// Returns `None` when nothing the pipeline reads has changed.
fn first_dirty_stage(old: &ViewState, new: &ViewState) -> Option<Stage> {
    if old.sort != new.sort {
        Some(Stage::Sort)
    } else if old.query != new.query {
        Some(Stage::Filter)
    } else if old.page != new.page {
        Some(Stage::Paginate)
    } else if old.favorites != new.favorites {
        Some(Stage::Compose)
    } else {
        None
    }
}

/// Live subscriptions binding a session to its sources.
///
/// Returned by [`connect`]. Tearing down (or dropping) the connection cancels
/// the entry and auth subscriptions exactly once each.
#[derive(Debug)]
pub struct Connection {
    auth_sub: Subscription,
    entry_sub: Rc<RefCell<Option<Subscription>>>,
}

impl Connection {
    /// Unregisters both observers.
    ///
    /// Consumes the connection; the session itself stays usable for direct
    /// dispatching afterwards.
    pub fn teardown(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(mut sub) = self.entry_sub.borrow_mut().take() {
            sub.cancel();
        }
        self.auth_sub.cancel();
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.release();
    }
}

/// Wires a session to an entry store and an identity provider.
///
/// Registers an auth observer and an entry snapshot observer. The entry
/// subscription is scoped to the signed-in user; whenever the auth state
/// reports a different user, the old entry subscription is cancelled and a
/// new one opens under the new scope, mirroring how the backing store's
/// per-user query is re-issued on sign-in. Snapshot deliveries flow into
/// [`ViewSession::apply_snapshot`], auth changes into
/// [`ViewSession::apply_auth`].
///
/// The returned [`Connection`] owns both subscriptions; dropping it, or
/// calling [`Connection::teardown`], unregisters everything exactly once.
pub fn connect(
    session: Rc<RefCell<ViewSession>>,
    entries: Rc<dyn EntrySource>,
    auth: Rc<dyn AuthSource>,
) -> Connection {
    let entry_sub: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

    let resubscribe = {
        let session = Rc::clone(&session);
        let entries = Rc::clone(&entries);
        let entry_sub = Rc::clone(&entry_sub);
        move |scope: EntryScope| {
            tracing::debug!(scope = ?scope, "opening entry subscription");
            let handler_session = Rc::clone(&session);
            let sub = entries.subscribe(
                scope,
                Box::new(move |snapshot| handler_session.borrow_mut().apply_snapshot(snapshot)),
            );
            // Replacing the slot drops, and thereby cancels, the old one.
            *entry_sub.borrow_mut() = Some(sub);
        }
    };

    let auth_sub = {
        let session = Rc::clone(&session);
        let resubscribe = resubscribe.clone();
        auth.subscribe(Box::new(move |state: AuthState| {
            let scope_changed = {
                let mut session = session.borrow_mut();
                let changed = session.auth().uid() != state.uid();
                session.apply_auth(state.clone());
                changed
            };
            if scope_changed {
                resubscribe(EntryScope::from_auth(&state));
            }
        }))
    };

    // The auth source may already have re-scoped us during its initial
    // delivery; otherwise open the entry subscription under the current scope.
    if entry_sub.borrow().is_none() {
        let scope = {
            let session = session.borrow();
            EntryScope::from_auth(session.auth())
        };
        resubscribe(scope);
    }

    Connection {
        auth_sub,
        entry_sub,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::modes::SortField;
    use crate::domain::UserId;
    use crate::source::{MemoryAuthSource, MemoryEntrySource, UserIdentity};

    fn entry(id: &str, name: &str, email: &str, category: &str) -> Entry {
        Entry {
            id: EntryId::from(id),
            name: name.to_string(),
            email: email.to_string(),
            category: category.to_string(),
            ..Entry::empty()
        }
    }

    fn session_with(entries: Vec<Entry>, page_size: usize) -> ViewSession {
        let mut session = ViewSession::new(
            ViewState::new(page_size, vec![1, 5, 10, 25]),
            CategorySet::builtin(),
        );
        session.apply_snapshot(entries);
        session
    }

    #[test]
    fn end_to_end_sort_filter_page_favorite() {
        let mut session = session_with(
            vec![
                entry("1", "Bob", "b@x.com", "tech"),
                entry("2", "Amy", "a@x.com", "edu"),
            ],
            1,
        );

        session.dispatch(&Action::ToggleSort(SortField::Name));
        session.dispatch(&Action::SetQuery("x.com".to_string()));

        session.dispatch(&Action::SetPage(1));
        let view = session.view();
        assert_eq!(view.total_count, 2);
        assert_eq!(view.page_count, 2);
        assert_eq!(view.rows.len(), 1);
        assert_eq!(view.rows[0].name, "Bob");

        session.dispatch(&Action::SetPage(0));
        session.dispatch(&Action::ToggleFavorite(EntryId::from("2")));
        let view = session.view();
        assert_eq!(view.rows[0].name, "Amy");
        assert!(view.rows[0].is_favorite);
    }

    #[test]
    fn favorite_toggle_recomputes_compose_only() {
        let mut session = session_with(vec![entry("1", "Amy", "a@x.com", "")], 10);
        let before = session.stage_runs();

        session.dispatch(&Action::ToggleFavorite(EntryId::from("1")));
        let after = session.stage_runs();

        assert_eq!(after.sort, before.sort);
        assert_eq!(after.filter, before.filter);
        assert_eq!(after.paginate, before.paginate);
        assert_eq!(after.compose, before.compose + 1);
    }

    #[test]
    fn page_change_skips_sort_and_filter() {
        let mut session = session_with(
            (0..30).map(|i| entry(&format!("{i}"), "x", "x@x.com", "")).collect(),
            10,
        );
        let before = session.stage_runs();

        session.dispatch(&Action::SetPage(2));
        let after = session.stage_runs();

        assert_eq!(after.sort, before.sort);
        assert_eq!(after.filter, before.filter);
        assert_eq!(after.paginate, before.paginate + 1);
        assert_eq!(after.compose, before.compose + 1);
    }

    #[test]
    fn shrinking_query_clamps_page_index() {
        let mut entries: Vec<Entry> = (0..25)
            .map(|i| entry(&format!("{i}"), &format!("person {i}"), "p@x.com", ""))
            .collect();
        entries.push(entry("odd", "zzz", "z@y.org", ""));
        let mut session = session_with(entries, 10);

        session.dispatch(&Action::SetPage(2));
        assert_eq!(session.view().rows.len(), 6);

        session.dispatch(&Action::SetQuery("zzz".to_string()));
        let view = session.view();
        assert_eq!(view.total_count, 1);
        assert_eq!(view.page_index, 0);
        assert_eq!(view.rows.len(), 1);
    }

    #[test]
    fn explicit_jump_past_end_shows_empty_page() {
        let mut session = session_with(
            (0..12).map(|i| entry(&format!("{i}"), "x", "x@x.com", "")).collect(),
            10,
        );
        session.dispatch(&Action::SetPage(5));

        let view = session.view();
        assert!(view.rows.is_empty());
        assert_eq!(view.total_count, 12);
        assert_eq!(view.page_count, 2);
    }

    #[test]
    fn open_entry_resolves_against_snapshot() {
        let mut session = session_with(vec![entry("1", "Amy", "a@x.com", "tech")], 10);
        session.apply_auth(AuthState::signed_in(UserIdentity {
            uid: UserId::from("u1"),
            display_name: "Ana".to_string(),
        }));

        let requests = session.dispatch(&Action::OpenEntry(EntryId::from("1")));
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].entry.name, "Amy");
        assert_eq!(requests[0].mode, EditorMode::Edit);
        assert_eq!(
            requests[0].user.as_ref().map(|u| u.uid.clone()),
            Some(UserId::from("u1"))
        );

        let requests = session.dispatch(&Action::OpenEntry(EntryId::from("gone")));
        assert!(requests.is_empty());

        let requests = session.dispatch(&Action::AddEntry);
        assert_eq!(requests[0].mode, EditorMode::Add);
        assert!(requests[0].entry.id.as_str().is_empty());
    }

    #[test]
    fn user_change_clears_favorites() {
        let mut session = session_with(vec![entry("1", "Amy", "a@x.com", "")], 10);
        session.dispatch(&Action::ToggleFavorite(EntryId::from("1")));
        assert!(session.view().rows[0].is_favorite);

        session.apply_auth(AuthState::signed_in(UserIdentity {
            uid: UserId::from("u2"),
            display_name: "Bob".to_string(),
        }));
        assert!(!session.view().rows[0].is_favorite);
        assert_eq!(session.view().display_name.as_deref(), Some("Bob"));
    }

    fn owned(id: &str, owner: &str) -> Entry {
        Entry {
            id: EntryId::from(id),
            name: format!("entry {id}"),
            owner: Some(UserId::from(owner)),
            ..Entry::empty()
        }
    }

    #[test]
    fn connect_rescopes_entry_subscription_on_sign_in() {
        let store = Rc::new(MemoryEntrySource::new());
        let provider = Rc::new(MemoryAuthSource::new());
        store.replace(vec![owned("1", "u1"), owned("2", "u2")]);

        let session = Rc::new(RefCell::new(ViewSession::new(
            ViewState::default(),
            CategorySet::builtin(),
        )));
        let connection = connect(
            Rc::clone(&session),
            store.clone() as Rc<dyn EntrySource>,
            provider.clone() as Rc<dyn AuthSource>,
        );

        // No user context: the session sees everything.
        assert_eq!(session.borrow().view().total_count, 2);

        provider.sign_in(UserIdentity {
            uid: UserId::from("u1"),
            display_name: "Ana".to_string(),
        });
        assert_eq!(session.borrow().view().total_count, 1);
        assert!(session.borrow().view().signed_in);

        store.upsert(owned("3", "u1"));
        store.upsert(owned("4", "u2"));
        assert_eq!(session.borrow().view().total_count, 2);

        provider.sign_out();
        assert_eq!(session.borrow().view().total_count, 4);

        connection.teardown();
        store.upsert(owned("5", "u1"));
        assert_eq!(session.borrow().view().total_count, 4);
    }

    #[test]
    fn dropping_connection_unregisters_observers() {
        let store = Rc::new(MemoryEntrySource::new());
        let provider = Rc::new(MemoryAuthSource::new());
        let session = Rc::new(RefCell::new(ViewSession::new(
            ViewState::default(),
            CategorySet::builtin(),
        )));

        {
            let _connection = connect(
                Rc::clone(&session),
                store.clone() as Rc<dyn EntrySource>,
                provider.clone() as Rc<dyn AuthSource>,
            );
        }

        store.upsert(owned("1", "u1"));
        provider.sign_in(UserIdentity {
            uid: UserId::from("u1"),
            display_name: "Ana".to_string(),
        });
        assert_eq!(session.borrow().view().total_count, 0);
        assert!(!session.borrow().view().signed_in);
    }
}

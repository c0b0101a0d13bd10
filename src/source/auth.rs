//! Authentication observer abstraction and the in-memory reference source.
//!
//! The view core never authenticates anyone. It observes an external identity
//! provider through the [`AuthSource`] trait and reacts to [`AuthState`]
//! changes: scoping the entry subscription to the signed-in user and feeding
//! the signed-in banner of the table view model.

use crate::domain::UserId;
use crate::source::subscription::Subscription;
use std::cell::RefCell;
use std::collections::{BTreeMap, HashSet};
use std::rc::Rc;

/// Callback receiving each authentication state change.
pub type AuthHandler = Box<dyn FnMut(AuthState)>;

/// Identity of the signed-in user, as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity {
    /// Stable unique identifier.
    pub uid: UserId,
    /// Name shown in the signed-in banner.
    pub display_name: String,
}

/// Snapshot of the authentication state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthState {
    /// Whether a user is signed in.
    pub signed_in: bool,
    /// The signed-in user, present exactly when `signed_in` is true.
    pub user: Option<UserIdentity>,
}

impl AuthState {
    /// State with nobody signed in.
    #[must_use]
    pub fn signed_out() -> Self {
        Self {
            signed_in: false,
            user: None,
        }
    }

    /// State with the given user signed in.
    #[must_use]
    pub fn signed_in(user: UserIdentity) -> Self {
        Self {
            signed_in: true,
            user: Some(user),
        }
    }

    /// Identifier of the signed-in user, if any.
    #[must_use]
    pub fn uid(&self) -> Option<&UserId> {
        self.user.as_ref().map(|u| &u.uid)
    }
}

impl Default for AuthState {
    fn default() -> Self {
        Self::signed_out()
    }
}

/// Abstraction over push-based identity providers.
///
/// Implementations deliver the current state synchronously on `subscribe` and
/// again on every change, until the returned [`Subscription`] is cancelled.
pub trait AuthSource {
    /// Registers an authentication observer.
    fn subscribe(&self, handler: AuthHandler) -> Subscription;
}

/// Shared mutable state of a [`MemoryAuthSource`].
#[derive(Default)]
struct AuthInner {
    state: AuthState,
    subscribers: BTreeMap<u64, AuthHandler>,
    dead: HashSet<u64>,
    next_id: u64,
}

/// In-memory identity provider with push delivery.
///
/// Drives sign-in and sign-out in tests and embedded hosts. Same
/// single-threaded `Rc<RefCell<_>>` model as
/// [`MemoryEntrySource`](crate::source::MemoryEntrySource).
#[derive(Default)]
pub struct MemoryAuthSource {
    inner: Rc<RefCell<AuthInner>>,
}

impl MemoryAuthSource {
    /// Creates a provider with nobody signed in.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Signs a user in and notifies observers.
    pub fn sign_in(&self, user: UserIdentity) {
        self.set_state(AuthState::signed_in(user));
    }

    /// Signs the current user out and notifies observers.
    pub fn sign_out(&self) {
        self.set_state(AuthState::signed_out());
    }

    /// Current state, as the provider last reported it.
    #[must_use]
    pub fn state(&self) -> AuthState {
        self.inner.borrow().state.clone()
    }

    fn set_state(&self, state: AuthState) {
        self.inner.borrow_mut().state = state.clone();
        tracing::debug!(signed_in = state.signed_in, "auth state changed");

        let mut checked_out = std::mem::take(&mut self.inner.borrow_mut().subscribers);
        for handler in checked_out.values_mut() {
            handler(state.clone());
        }

        let mut inner = self.inner.borrow_mut();
        for (id, handler) in checked_out {
            if !inner.dead.remove(&id) {
                inner.subscribers.entry(id).or_insert(handler);
            }
        }
    }
}

impl AuthSource for MemoryAuthSource {
    /// Registers an observer and immediately delivers the current state.
    fn subscribe(&self, mut handler: AuthHandler) -> Subscription {
        handler(self.inner.borrow().state.clone());

        let id = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.subscribers.insert(id, handler);
            id
        };

        let inner = Rc::clone(&self.inner);
        Subscription::new(move || {
            let mut inner = inner.borrow_mut();
            if inner.subscribers.remove(&id).is_none() {
                inner.dead.insert(id);
            }
        })
    }
}

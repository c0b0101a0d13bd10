//! Entry source abstraction and the in-memory reference implementation.
//!
//! This module defines the [`EntrySource`] trait, the seam through which the
//! external document store pushes entry snapshots into the view core. A
//! subscriber receives the complete current collection on registration and
//! again on every change; there are no partial or streaming updates within one
//! delivery.
//!
//! Scoping happens at the source: a subscription opened with
//! [`EntryScope::User`] only ever sees entries whose `owner` equals that user.
//! This criterion mirrors the backing store's per-user query and must be
//! preserved exactly, since altering it changes which data a session can see.
//!
//! [`MemoryEntrySource`] is the crate's reference implementation, used by the
//! test suite and by hosts that embed the store in-process. Real hosts
//! implement the trait over their database client.

use crate::domain::{Entry, EntryId, UserId};
use crate::source::auth::AuthState;
use crate::source::subscription::Subscription;
use std::cell::RefCell;
use std::collections::{BTreeMap, HashSet};
use std::rc::Rc;

/// Callback receiving one complete entry snapshot per delivery.
pub type SnapshotHandler = Box<dyn FnMut(Vec<Entry>)>;

/// Which entries a subscription is allowed to observe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryScope {
    /// Every entry in the store; used when no user context is active.
    All,
    /// Only entries owned by the given user.
    User(UserId),
}

impl EntryScope {
    /// Derives the scope for the current authentication state.
    #[must_use]
    pub fn from_auth(auth: &AuthState) -> Self {
        auth.uid().cloned().map_or(Self::All, Self::User)
    }

    /// Reports whether an entry is visible under this scope.
    #[must_use]
    pub fn admits(&self, entry: &Entry) -> bool {
        match self {
            Self::All => true,
            Self::User(uid) => entry.owner.as_ref() == Some(uid),
        }
    }
}

/// Abstraction over push-based entry stores.
///
/// Implementations deliver the full scoped snapshot synchronously on
/// `subscribe` and after every subsequent change, until the returned
/// [`Subscription`] is cancelled.
pub trait EntrySource {
    /// Registers a snapshot observer under the given scope.
    fn subscribe(&self, scope: EntryScope, handler: SnapshotHandler) -> Subscription;
}

/// One registered observer.
struct Subscriber {
    scope: EntryScope,
    handler: SnapshotHandler,
}

/// Shared mutable state of a [`MemoryEntrySource`].
#[derive(Default)]
struct SourceInner {
    documents: Vec<Entry>,
    subscribers: BTreeMap<u64, Subscriber>,
    /// Ids cancelled while their subscriber was checked out for delivery.
    dead: HashSet<u64>,
    next_id: u64,
}

/// In-memory entry store with push delivery.
///
/// Single-threaded by design, matching the view session's execution model;
/// shared handles use `Rc<RefCell<_>>`, never locks. Mutations
/// ([`replace`](Self::replace), [`upsert`](Self::upsert),
/// [`remove`](Self::remove)) notify every subscriber with a fresh scoped
/// snapshot.
#[derive(Default)]
pub struct MemoryEntrySource {
    inner: Rc<RefCell<SourceInner>>,
}

impl MemoryEntrySource {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole collection and notifies subscribers.
    pub fn replace(&self, entries: Vec<Entry>) {
        self.inner.borrow_mut().documents = entries;
        self.notify();
    }

    /// Inserts or updates one entry by id and notifies subscribers.
    pub fn upsert(&self, entry: Entry) {
        {
            let mut inner = self.inner.borrow_mut();
            match inner.documents.iter_mut().find(|e| e.id == entry.id) {
                Some(existing) => *existing = entry,
                None => inner.documents.push(entry),
            }
        }
        self.notify();
    }

    /// Removes one entry by id, if present, and notifies subscribers.
    pub fn remove(&self, id: &EntryId) {
        self.inner.borrow_mut().documents.retain(|e| &e.id != id);
        self.notify();
    }

    /// Number of stored entries, unscoped.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.borrow().documents.len()
    }

    /// Reports whether the store holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().documents.is_empty()
    }

    /// Delivers the current snapshot to every live subscriber.
    ///
    /// Subscribers are checked out of the registry while their handlers run so
    /// a handler may subscribe or cancel on this source without re-entrant
    /// borrows. Cancellations that land mid-delivery are honored via the dead
    /// set when checking back in.
    fn notify(&self) {
        let (documents, mut checked_out) = {
            let mut inner = self.inner.borrow_mut();
            (inner.documents.clone(), std::mem::take(&mut inner.subscribers))
        };

        for subscriber in checked_out.values_mut() {
            let snapshot: Vec<Entry> = documents
                .iter()
                .filter(|e| subscriber.scope.admits(e))
                .cloned()
                .collect();
            (subscriber.handler)(snapshot);
        }

        let mut inner = self.inner.borrow_mut();
        for (id, subscriber) in checked_out {
            if !inner.dead.remove(&id) {
                inner.subscribers.entry(id).or_insert(subscriber);
            }
        }
    }
}

impl EntrySource for MemoryEntrySource {
    /// Registers an observer and immediately delivers the current snapshot.
    fn subscribe(&self, scope: EntryScope, mut handler: SnapshotHandler) -> Subscription {
        let initial: Vec<Entry> = {
            let inner = self.inner.borrow();
            inner
                .documents
                .iter()
                .filter(|e| scope.admits(e))
                .cloned()
                .collect()
        };
        handler(initial);

        let id = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.subscribers.insert(id, Subscriber { scope, handler });
            id
        };
        tracing::debug!(subscriber_id = id, "entry subscription registered");

        let inner = Rc::clone(&self.inner);
        Subscription::new(move || {
            let mut inner = inner.borrow_mut();
            if inner.subscribers.remove(&id).is_none() {
                inner.dead.insert(id);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn owned(id: &str, owner: &str) -> Entry {
        Entry {
            id: EntryId::from(id),
            owner: Some(UserId::from(owner)),
            ..Entry::empty()
        }
    }

    #[test]
    fn subscribe_delivers_current_snapshot_immediately() {
        let source = MemoryEntrySource::new();
        source.replace(vec![owned("1", "u1")]);

        let seen: Rc<RefCell<Vec<Vec<Entry>>>> = Rc::new(RefCell::new(vec![]));
        let sink = seen.clone();
        let _sub = source.subscribe(
            EntryScope::All,
            Box::new(move |snapshot| sink.borrow_mut().push(snapshot)),
        );

        assert_eq!(seen.borrow().len(), 1);
        assert_eq!(seen.borrow()[0].len(), 1);
    }

    #[test]
    fn user_scope_filters_by_owner() {
        let source = MemoryEntrySource::new();
        let seen: Rc<RefCell<Vec<Vec<Entry>>>> = Rc::new(RefCell::new(vec![]));
        let sink = seen.clone();
        let _sub = source.subscribe(
            EntryScope::User(UserId::from("u1")),
            Box::new(move |snapshot| sink.borrow_mut().push(snapshot)),
        );

        source.replace(vec![owned("1", "u1"), owned("2", "u2"), owned("3", "u1")]);

        let last = seen.borrow().last().cloned().unwrap();
        assert_eq!(last.len(), 2);
        assert!(last.iter().all(|e| e.owner == Some(UserId::from("u1"))));
    }

    #[test]
    fn unowned_entries_are_hidden_from_user_scope() {
        let source = MemoryEntrySource::new();
        let seen: Rc<RefCell<Vec<Vec<Entry>>>> = Rc::new(RefCell::new(vec![]));
        let sink = seen.clone();
        let _sub = source.subscribe(
            EntryScope::User(UserId::from("u1")),
            Box::new(move |snapshot| sink.borrow_mut().push(snapshot)),
        );

        source.replace(vec![Entry::empty(), owned("2", "u1")]);
        assert_eq!(seen.borrow().last().map(Vec::len), Some(1));
    }

    #[test]
    fn cancelled_subscription_stops_receiving() {
        let source = MemoryEntrySource::new();
        let seen: Rc<RefCell<Vec<Vec<Entry>>>> = Rc::new(RefCell::new(vec![]));
        let sink = seen.clone();
        let mut sub = source.subscribe(
            EntryScope::All,
            Box::new(move |snapshot| sink.borrow_mut().push(snapshot)),
        );
        assert_eq!(seen.borrow().len(), 1);

        sub.cancel();
        source.replace(vec![owned("1", "u1")]);
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn upsert_updates_in_place_and_notifies() {
        let source = MemoryEntrySource::new();
        source.upsert(owned("1", "u1"));

        let mut updated = owned("1", "u1");
        updated.name = "Renamed".to_string();
        source.upsert(updated);

        assert_eq!(source.len(), 1);

        source.remove(&EntryId::from("1"));
        assert!(source.is_empty());
    }
}

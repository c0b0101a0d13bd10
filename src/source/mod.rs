//! External data source seams.
//!
//! The view core consumes two push-based collaborators it does not implement:
//! the entry store and the identity provider. This module defines the trait
//! seams for both, the cancellable [`Subscription`] handle their registrations
//! return, and in-memory reference implementations used by the test suite and
//! embedded hosts.
//!
//! # Modules
//!
//! - [`subscription`]: cancel-exactly-once observer handles
//! - [`entries`]: entry snapshot subscription and scoping
//! - [`auth`]: authentication state observation

pub mod auth;
pub mod entries;
pub mod subscription;

pub use auth::{AuthHandler, AuthSource, AuthState, MemoryAuthSource, UserIdentity};
pub use entries::{EntryScope, EntrySource, MemoryEntrySource, SnapshotHandler};
pub use subscription::Subscription;

//! Application layer: view state, the reducer, and the session.
//!
//! This module owns every piece of state the user controls and the logic that
//! transforms it:
//!
//! - [`state`]: the immutable [`ViewState`] value and the session
//!   [`FavoriteSet`]
//! - [`modes`]: sort, page, and editor mode value types
//! - [`actions`]: the user action vocabulary and reducer effects
//! - [`handler`]: the [`reduce`] function
//! - [`session`]: [`ViewSession`], source wiring, and teardown

pub mod actions;
pub mod handler;
pub mod modes;
pub mod session;
pub mod state;

pub use actions::{Action, Effect};
pub use handler::reduce;
pub use modes::{EditorMode, PageState, SortField, SortOrder, SortSpec};
pub use session::{connect, Connection, EditorRequest, ViewSession};
pub use state::{FavoriteSet, ViewState};

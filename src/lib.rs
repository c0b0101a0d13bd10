//! Rolodex: the view core of a contact-management application.
//!
//! Rolodex implements the client-side entry list pipeline: it consumes a live,
//! push-updated collection of contact records from an external document store
//! and derives the sorted, filtered, paginated, favorite-annotated table the
//! presentation layer renders. It provides:
//! - A pure, memoized derivation pipeline (sort, filter, paginate, compose)
//! - An immutable view state driven by a single reducer
//! - Session-scoped favorites and category label resolution
//! - Cancellable subscriptions to the entry store and identity provider
//!
//! # Architecture
//!
//! The crate follows a layered architecture pattern:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Host (renderer, store client, identity provider)   │  ← Not this crate
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← ViewSession
//! │  - Action reducing                                  │  ← ViewState
//! │  - Source wiring and teardown                       │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ Pipeline      │   │ Source Layer  │   │ UI Layer      │
//! │ (pipeline/)   │   │ (source/)     │   │ (ui/)         │
//! │ - Sort        │   │ - Entry sub   │   │ - View models │
//! │ - Filter      │   │ - Auth sub    │   │               │
//! │ - Paginate    │   │ - Cancel-once │   │               │
//! │ - Compose     │   │   handles     │   │               │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!         │                    │                    │
//! ┌─────────────────────────────────────────────────────┐
//! │  Infrastructure & Domain Layers                     │
//! │  - Platform paths (infrastructure/)                 │
//! │  - Entry and category models (domain/)              │
//! │  - Error types (domain/error)                       │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │  ← Optional
//! │  - OpenTelemetry tracing                            │
//! │  - File-based OTLP export                           │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: view state, the action reducer, and the session
//! - [`domain`]: core domain types (Entry, categories, errors)
//! - [`pipeline`]: the four derivation stages and their memoization
//! - [`source`]: entry store and identity provider seams
//! - [`ui`]: display-ready view model types
//! - [`infrastructure`]: platform-specific utilities (paths)
//! - `observability`: OpenTelemetry tracing (optional)
//!
//! # Initialization Flow
//!
//! 1. **Setup** (host): parse a [`Config`], optionally call
//!    [`observability::init_tracing`]
//! 2. **Session**: [`initialize`] loads the category table and returns a
//!    [`ViewSession`] over an empty snapshot
//! 3. **Wiring**: [`connect`] subscribes the session to the entry store and
//!    the identity provider; deliveries flow in synchronously from then on
//! 4. **Interaction**: the host dispatches [`Action`]s and renders
//!    [`ViewSession::view`] after each one
//! 5. **Teardown**: [`Connection::teardown`] unregisters both observers
//!    exactly once
//!
//! # Examples
//!
//! ## Driving a session directly
//!
//! ```rust
//! use rolodex::{initialize, Action, Config, Entry, SortField};
//!
//! let mut session = initialize(&Config::default());
//!
//! let doc = serde_json::json!({
//!     "name": "Amy",
//!     "email": "a@x.com",
//!     "category": "tech",
//! });
//! session.apply_snapshot(vec![Entry::from_document("doc-1", &doc)]);
//!
//! session.dispatch(&Action::ToggleSort(SortField::Name));
//! session.dispatch(&Action::SetQuery("amy".to_string()));
//!
//! let view = session.view();
//! assert_eq!(view.total_count, 1);
//! assert_eq!(view.rows[0].category_label, "Technology");
//! ```
//!
//! ## Wiring to live sources
//!
//! ```rust
//! use rolodex::source::{MemoryAuthSource, MemoryEntrySource};
//! use rolodex::{connect, initialize, Config};
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let store = Rc::new(MemoryEntrySource::new());
//! let provider = Rc::new(MemoryAuthSource::new());
//! let session = Rc::new(RefCell::new(initialize(&Config::default())));
//!
//! let connection = connect(Rc::clone(&session), store.clone(), provider.clone());
//! // Store mutations and sign-ins now push into the session synchronously.
//! connection.teardown();
//! ```
//!
//! # Key Design Decisions
//!
//! ## Immutable View State
//!
//! Sort, query, page, and favorites live in one [`ViewState`] value that the
//! reducer replaces on every action. The session diffs old against new state
//! to find the first pipeline stage the change dirtied, so a favorites toggle
//! re-runs composition only and a page turn never re-sorts.
//!
//! ## Push-Based Sources Behind Cancel-Once Handles
//!
//! Both external observers are registered through trait seams returning a
//! [`Subscription`](source::Subscription) that owns its unregistration. The
//! entry subscription is scoped to the signed-in user and re-opened when the
//! user changes, preserving the store's per-user query exactly.
//!
//! ## Total Derivations
//!
//! Nothing inside the pipeline can fail: documents decode tolerantly, unknown
//! category codes resolve to a fallback descriptor, and page windows past the
//! end produce empty slices. Errors are reserved for the edges (category file
//! loading, source registration).

pub mod app;
pub mod domain;
pub mod infrastructure;
pub mod pipeline;
pub mod source;

pub mod ui;

pub mod observability;

pub use app::{
    connect, reduce, Action, Connection, EditorMode, EditorRequest, PageState, SortField,
    SortOrder, SortSpec, ViewSession, ViewState,
};
pub use domain::{Category, CategorySet, Entry, EntryId, Result, RolodexError, UserId};
pub use ui::{EntryRow, TableViewModel};

use app::modes::DEFAULT_PAGE_SIZE;
use std::collections::BTreeMap;

/// Page sizes offered when none are configured.
const DEFAULT_PAGE_SIZES: [usize; 3] = [5, 10, 25];

/// Session configuration provided by the host.
///
/// Hosts that embed the crate behind a string-keyed configuration system can
/// parse one with [`Config::from_map`]; everything has a usable default.
#[derive(Debug, Clone)]
pub struct Config {
    /// Page sizes the user may choose between.
    ///
    /// Page-size actions outside this set are ignored. Default: `[5, 10, 25]`
    pub page_sizes: Vec<usize>,

    /// Page size active when the session starts.
    ///
    /// Falls back to the first configured size if it is not a member of
    /// `page_sizes`. Default: `10`
    pub default_page_size: usize,

    /// Path to a custom TOML category file.
    ///
    /// When unset, `categories.toml` under the configuration directory is
    /// used if present, otherwise the built-in set. See
    /// [`domain::category`] for the format.
    pub categories_file: Option<String>,

    /// Tracing level for [`observability::init_tracing`].
    ///
    /// Options: `trace`, `debug`, `info`, `warn`, `error`. Default: `"info"`
    pub trace_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            page_sizes: DEFAULT_PAGE_SIZES.to_vec(),
            default_page_size: DEFAULT_PAGE_SIZE,
            categories_file: None,
            trace_level: None,
        }
    }
}

impl Config {
    /// Parses configuration from a string-keyed map.
    ///
    /// # Parsing Rules
    ///
    /// - `page_sizes`: comma-separated integers; zero and unparsable values
    ///   are dropped, an empty result falls back to the default set
    /// - `default_page_size`: integer, falls back to 10 on parse error
    /// - `categories_file`: taken verbatim
    /// - `trace_level`: taken verbatim
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rolodex::Config;
    /// use std::collections::BTreeMap;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("page_sizes".to_string(), "10, 50, 100".to_string());
    /// map.insert("default_page_size".to_string(), "50".to_string());
    ///
    /// let config = Config::from_map(&map);
    /// assert_eq!(config.page_sizes, vec![10, 50, 100]);
    /// assert_eq!(config.default_page_size, 50);
    /// ```
    #[must_use]
    pub fn from_map(config: &BTreeMap<String, String>) -> Self {
        let page_sizes = config
            .get("page_sizes")
            .map(|s| {
                s.split(',')
                    .map(str::trim)
                    .filter_map(|p| p.parse::<usize>().ok())
                    .filter(|&n| n > 0)
                    .collect::<Vec<_>>()
            })
            .filter(|v: &Vec<usize>| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_PAGE_SIZES.to_vec());

        let default_page_size = config
            .get("default_page_size")
            .and_then(|s| s.parse::<usize>().ok())
            .filter(|&n| n > 0)
            .unwrap_or(DEFAULT_PAGE_SIZE);

        Self {
            page_sizes,
            default_page_size,
            categories_file: config.get("categories_file").cloned(),
            trace_level: config.get("trace_level").cloned(),
        }
    }
}

/// Creates a view session from configuration.
///
/// Loads the category table (custom file, configuration-directory file, or
/// built-in set, in that order of preference; load failures fall back to the
/// built-in set with a logged note) and returns a [`ViewSession`] over an
/// empty snapshot, ready for [`connect`] or direct driving.
///
/// # Example
///
/// ```rust
/// use rolodex::{initialize, Config};
///
/// let session = initialize(&Config::default());
/// assert_eq!(session.view().total_count, 0);
/// ```
#[must_use]
pub fn initialize(config: &Config) -> ViewSession {
    tracing::debug!("initializing rolodex view session");

    let categories = config.categories_file.as_ref().map_or_else(
        || {
            let fallback = infrastructure::paths::config_dir().join("categories.toml");
            if fallback.exists() {
                CategorySet::from_file(&fallback).unwrap_or_else(|e| {
                    tracing::debug!(path = ?fallback, error = %e, "failed to load category file, using built-in set");
                    CategorySet::builtin()
                })
            } else {
                CategorySet::builtin()
            }
        },
        |path| {
            CategorySet::from_file(path).unwrap_or_else(|e| {
                tracing::debug!(path = %path, error = %e, "failed to load category file, using built-in set");
                CategorySet::builtin()
            })
        },
    );

    let page_size = if config.page_sizes.contains(&config.default_page_size) {
        config.default_page_size
    } else {
        config
            .page_sizes
            .first()
            .copied()
            .unwrap_or(DEFAULT_PAGE_SIZE)
    };

    ViewSession::new(ViewState::new(page_size, config.page_sizes.clone()), categories)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_map_drops_invalid_page_sizes() {
        let mut map = BTreeMap::new();
        map.insert("page_sizes".to_string(), "0, nope, 20,".to_string());
        let config = Config::from_map(&map);
        assert_eq!(config.page_sizes, vec![20]);
    }

    #[test]
    fn from_map_falls_back_on_empty_values() {
        let mut map = BTreeMap::new();
        map.insert("page_sizes".to_string(), ", ,".to_string());
        map.insert("default_page_size".to_string(), "zero".to_string());
        let config = Config::from_map(&map);
        assert_eq!(config.page_sizes, DEFAULT_PAGE_SIZES.to_vec());
        assert_eq!(config.default_page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn initialize_reconciles_default_page_size() {
        let config = Config {
            page_sizes: vec![20, 40],
            default_page_size: 10,
            ..Config::default()
        };
        let session = initialize(&config);
        assert_eq!(session.state().page.size, 20);
    }

    #[test]
    fn initialize_falls_back_on_unreadable_category_file() {
        let config = Config {
            categories_file: Some("/nonexistent/categories.toml".to_string()),
            ..Config::default()
        };
        let session = initialize(&config);
        assert_eq!(session.categories().lookup("tech").name, "Technology");
    }
}

//! Entry domain model and document decoding.
//!
//! This module defines the core `Entry` type representing one contact record owned
//! by the external document store. Entries are read-only to this crate: the store
//! creates, updates, and deletes them, and the view core only consumes snapshots.
//!
//! Records arrive as schemaless JSON documents, so decoding is deliberately
//! tolerant: a missing or mistyped field degrades to an empty value instead of
//! failing, keeping the pipeline total even over stale or half-migrated data.

use serde::{Deserialize, Serialize};

/// Number of seconds in one minute.
const SECONDS_PER_MINUTE: i64 = 60;

/// Number of seconds in one hour.
const SECONDS_PER_HOUR: i64 = 3600;

/// Number of seconds in one day.
const SECONDS_PER_DAY: i64 = 86400;

/// Opaque, stable identifier of an entry document.
///
/// Assigned by the external store; unique per record and never reused. The view
/// core compares and stores these but attaches no meaning to their contents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub String);

impl EntryId {
    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EntryId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque identifier of a user, as issued by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// One contact record as read from the document store.
///
/// All text fields default to the empty string when the backing document omits
/// them, so every entry can flow through sorting, filtering, and composition
/// without a missing-field code path. `owner` and `added_at` are optional
/// because older documents predate those fields.
///
/// # Fields
///
/// - `id`: store-assigned document identifier
/// - `name`: contact display name
/// - `email`: contact email address
/// - `user`: display name of the user who created the record
/// - `category`: category code, resolved to a label via
///   [`CategorySet::lookup`](crate::domain::CategorySet::lookup)
/// - `owner`: identifier of the owning user, used for subscription scoping
/// - `added_at`: unix timestamp when the record was created
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub category: String,
    #[serde(default, rename = "userid", skip_serializing_if = "Option::is_none")]
    pub owner: Option<UserId>,
    #[serde(default, rename = "dateAdded", skip_serializing_if = "Option::is_none")]
    pub added_at: Option<i64>,
}

impl Entry {
    /// Creates the blank entry handed to the editor in add mode.
    ///
    /// Every field is empty; the store assigns a real identifier when the
    /// editor persists the record.
    ///
    /// # Examples
    ///
    /// ```
    /// use rolodex::domain::Entry;
    ///
    /// let entry = Entry::empty();
    /// assert!(entry.id.as_str().is_empty());
    /// assert!(entry.name.is_empty());
    /// ```
    #[must_use]
    pub fn empty() -> Self {
        Self {
            id: EntryId(String::new()),
            name: String::new(),
            email: String::new(),
            user: String::new(),
            category: String::new(),
            owner: None,
            added_at: None,
        }
    }

    /// Decodes an entry from a raw store document.
    ///
    /// The store keeps the document identifier outside the document body, so the
    /// caller supplies it separately. Decoding never fails: missing or mistyped
    /// text fields become empty strings, and missing `userid`/`dateAdded` fields
    /// become `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rolodex::domain::Entry;
    ///
    /// let doc = serde_json::json!({ "name": "Amy", "email": "a@x.com" });
    /// let entry = Entry::from_document("doc-1", &doc);
    /// assert_eq!(entry.name, "Amy");
    /// assert_eq!(entry.category, "");
    /// assert!(entry.owner.is_none());
    /// ```
    #[must_use]
    pub fn from_document(id: impl Into<EntryId>, doc: &serde_json::Value) -> Self {
        let text = |key: &str| {
            doc.get(key)
                .and_then(serde_json::Value::as_str)
                .unwrap_or_default()
                .to_string()
        };

        Self {
            id: id.into(),
            name: text("name"),
            email: text("email"),
            user: text("user"),
            category: text("category"),
            owner: doc
                .get("userid")
                .and_then(serde_json::Value::as_str)
                .map(UserId::from),
            added_at: doc.get("dateAdded").and_then(serde_json::Value::as_i64),
        }
    }

    /// Returns a human-readable string describing how long ago the entry was added.
    ///
    /// Returns `None` when the backing document carries no `dateAdded` field.
    /// The format varies based on the time elapsed:
    /// - Less than 1 minute: "just now"
    /// - Less than 1 hour: "Xm ago" (e.g., "5m ago")
    /// - Less than 1 day: "Xh ago" (e.g., "3h ago")
    /// - 1 day or more: "Xd ago" (e.g., "7d ago")
    ///
    /// # Examples
    ///
    /// ```
    /// use rolodex::domain::Entry;
    ///
    /// let mut entry = Entry::empty();
    /// assert!(entry.added_ago().is_none());
    ///
    /// entry.added_at = Some(chrono::Utc::now().timestamp() - 300);
    /// assert_eq!(entry.added_ago().as_deref(), Some("5m ago"));
    /// ```
    #[must_use]
    pub fn added_ago(&self) -> Option<String> {
        let added = self.added_at?;
        let now = chrono::Utc::now().timestamp();
        let diff = now - added;

        Some(if diff < SECONDS_PER_MINUTE {
            "just now".to_string()
        } else if diff < SECONDS_PER_HOUR {
            let mins = diff / SECONDS_PER_MINUTE;
            format!("{mins}m ago")
        } else if diff < SECONDS_PER_DAY {
            let hours = diff / SECONDS_PER_HOUR;
            format!("{hours}h ago")
        } else {
            let days = diff / SECONDS_PER_DAY;
            format!("{days}d ago")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_document_decodes_all_fields() {
        let doc = serde_json::json!({
            "name": "Bob",
            "email": "b@x.com",
            "user": "Ana Admin",
            "category": "tech",
            "userid": "uid-7",
            "dateAdded": 1700000000,
        });

        let entry = Entry::from_document("doc-9", &doc);
        assert_eq!(entry.id, EntryId::from("doc-9"));
        assert_eq!(entry.name, "Bob");
        assert_eq!(entry.email, "b@x.com");
        assert_eq!(entry.user, "Ana Admin");
        assert_eq!(entry.category, "tech");
        assert_eq!(entry.owner, Some(UserId::from("uid-7")));
        assert_eq!(entry.added_at, Some(1_700_000_000));
    }

    #[test]
    fn from_document_tolerates_missing_and_mistyped_fields() {
        let doc = serde_json::json!({ "name": 42, "dateAdded": "not a number" });

        let entry = Entry::from_document("doc-0", &doc);
        assert_eq!(entry.name, "");
        assert_eq!(entry.email, "");
        assert_eq!(entry.category, "");
        assert!(entry.owner.is_none());
        assert!(entry.added_at.is_none());
    }

    #[test]
    fn added_ago_buckets() {
        let now = chrono::Utc::now().timestamp();
        let mut entry = Entry::empty();

        entry.added_at = Some(now - 10);
        assert_eq!(entry.added_ago().as_deref(), Some("just now"));

        entry.added_at = Some(now - 3 * SECONDS_PER_HOUR);
        assert_eq!(entry.added_ago().as_deref(), Some("3h ago"));

        entry.added_at = Some(now - 2 * SECONDS_PER_DAY);
        assert_eq!(entry.added_ago().as_deref(), Some("2d ago"));
    }
}

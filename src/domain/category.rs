//! Category descriptors and the category lookup table.
//!
//! This module defines the static mapping from a category code to its display
//! descriptor. The set of descriptors is fixed when a view session is created,
//! either from the built-in default set or from a custom TOML file, and never
//! changes afterwards.
//!
//! Category codes originate in externally-owned documents and may be stale or
//! unknown, so lookup is total: an unrecognized code resolves to a defined
//! fallback descriptor instead of an error.
//!
//! # TOML Format
//!
//! ```toml
//! name = "crm"
//!
//! [[categories]]
//! code = "tech"
//! name = "Technology"
//!
//! [[categories]]
//! code = "finance"
//! name = "Finance"
//! ```

use crate::domain::error::{Result, RolodexError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Display label used for codes no descriptor covers.
const FALLBACK_LABEL: &str = "Unknown";

/// Display descriptor for one category code.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Category {
    /// Short code stored on entry documents.
    pub code: String,
    /// Human-readable label shown in the table.
    pub name: String,
}

impl Category {
    /// Returns the fallback descriptor used for unrecognized codes.
    #[must_use]
    pub fn unknown() -> Self {
        Self {
            code: String::new(),
            name: FALLBACK_LABEL.to_string(),
        }
    }
}

/// Immutable table of category descriptors.
///
/// Built once per session from the built-in defaults or a TOML file. Lookup
/// never fails; see [`CategorySet::lookup`].
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CategorySet {
    /// Human-readable name of the set.
    pub name: String,
    /// Descriptors in declaration order.
    categories: Vec<Category>,
}

impl CategorySet {
    /// Returns the built-in default category set.
    ///
    /// The defaults are embedded in the binary from `categories/default.toml`.
    /// If the embedded asset fails to parse the set is empty, in which case
    /// every code resolves to the fallback descriptor.
    #[must_use]
    pub fn builtin() -> Self {
        toml::from_str(include_str!("../../categories/default.toml")).unwrap_or_else(|_| Self {
            name: "default".to_string(),
            categories: Vec::new(),
        })
    }

    /// Loads a category set from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`RolodexError::Io`] if the file cannot be read and
    /// [`RolodexError::Categories`] if it is not valid category TOML.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        toml::from_str(&contents).map_err(|e| RolodexError::Categories(e.to_string()))
    }

    /// Resolves a category code to its display descriptor.
    ///
    /// Total over every input: unknown and empty codes resolve to
    /// [`Category::unknown`], never an error, since codes come from external,
    /// possibly stale documents.
    ///
    /// # Examples
    ///
    /// ```
    /// use rolodex::domain::CategorySet;
    ///
    /// let categories = CategorySet::builtin();
    /// assert_eq!(categories.lookup("tech").name, "Technology");
    /// assert_eq!(categories.lookup("NO_SUCH_CODE").name, "Unknown");
    /// ```
    #[must_use]
    pub fn lookup(&self, code: &str) -> Category {
        self.categories
            .iter()
            .find(|c| c.code == code)
            .cloned()
            .unwrap_or_else(Category::unknown)
    }

    /// Returns the descriptors in declaration order.
    ///
    /// Used by hosts to render category pickers in the entry editor.
    #[must_use]
    pub fn all(&self) -> &[Category] {
        &self.categories
    }
}

impl Default for CategorySet {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn builtin_resolves_known_codes() {
        let set = CategorySet::builtin();
        assert_eq!(set.lookup("finance").name, "Finance");
        assert_eq!(set.lookup("other").name, "Other");
    }

    #[test]
    fn unknown_code_resolves_to_fallback() {
        let set = CategorySet::builtin();
        let descriptor = set.lookup("UNKNOWN_CODE");
        assert_eq!(descriptor, Category::unknown());
        assert_eq!(set.lookup("").name, "Unknown");
    }

    #[test]
    fn from_file_loads_custom_set() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(
            file,
            "name = \"custom\"\n\n[[categories]]\ncode = \"vip\"\nname = \"Very Important\"\n"
        )
        .expect("write");

        let set = CategorySet::from_file(file.path()).expect("load");
        assert_eq!(set.name, "custom");
        assert_eq!(set.lookup("vip").name, "Very Important");
        assert_eq!(set.lookup("tech").name, "Unknown");
    }

    #[test]
    fn from_file_rejects_bad_toml() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "categories = \"not a table\"").expect("write");

        let err = CategorySet::from_file(file.path()).expect_err("parse failure");
        assert!(matches!(err, RolodexError::Categories(_)));
    }
}

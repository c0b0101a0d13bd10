//! Sort, pagination, and editor mode types.
//!
//! This module defines the small value types that parameterize the view
//! pipeline: which field the table is sorted on and in which direction, which
//! window of the filtered result is visible, and whether the entry editor is
//! being opened to add or to edit a record.
//!
//! All of these are plain immutable values. User actions never mutate them in
//! place; the reducer derives a replacement value instead.

use serde::{Deserialize, Serialize};

/// Page size used when none is configured.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Field an entry table can be ordered by.
///
/// `Original` is a passthrough: the table shows entries in the order the
/// source delivered them, and no comparison runs at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortField {
    /// Source delivery order, unchanged.
    Original,
    /// Contact display name.
    Name,
    /// Contact email address.
    Email,
    /// Category code.
    Category,
}

/// Direction applied to the active sort field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    /// Returns the opposite direction.
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

/// Active sort field plus direction.
///
/// The default is the neutral state: original order, ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: SortField,
    pub order: SortOrder,
}

impl SortSpec {
    /// Derives the spec after the user selects a sort field.
    ///
    /// Selecting the field that is already active flips the direction;
    /// selecting any other field activates it ascending.
    ///
    /// # Examples
    ///
    /// ```
    /// use rolodex::app::modes::{SortField, SortOrder, SortSpec};
    ///
    /// let spec = SortSpec::default().toggled(SortField::Name);
    /// assert_eq!(spec.order, SortOrder::Ascending);
    ///
    /// let spec = spec.toggled(SortField::Name);
    /// assert_eq!(spec.order, SortOrder::Descending);
    /// ```
    #[must_use]
    pub fn toggled(self, field: SortField) -> Self {
        if self.field == field {
            Self {
                field,
                order: self.order.flipped(),
            }
        } else {
            Self {
                field,
                order: SortOrder::Ascending,
            }
        }
    }
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            field: SortField::Original,
            order: SortOrder::Ascending,
        }
    }
}

/// Visible window into the filtered entry sequence.
///
/// `size` is always positive; construction sites guarantee it by falling back
/// to [`DEFAULT_PAGE_SIZE`] when handed zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageState {
    /// Zero-based page index.
    pub index: usize,
    /// Rows per page.
    pub size: usize,
}

impl PageState {
    /// Creates the first page with the given size.
    #[must_use]
    pub fn first(size: usize) -> Self {
        Self {
            index: 0,
            size: if size == 0 { DEFAULT_PAGE_SIZE } else { size },
        }
    }

    /// Derives the state after a jump to another page, same size.
    #[must_use]
    pub const fn at(self, index: usize) -> Self {
        Self {
            index,
            size: self.size,
        }
    }

    /// Derives the state after a page-size change.
    ///
    /// The index resets to 0 so the new window starts from the top of the
    /// filtered sequence.
    #[must_use]
    pub fn resized(self, size: usize) -> Self {
        Self::first(size)
    }

    /// Derives the state with the index clamped into range for `total` rows.
    ///
    /// A shrinking filter or sort change can leave the index pointing past the
    /// last page; clamping keeps the last non-empty page visible. With zero
    /// rows the index clamps to 0.
    #[must_use]
    pub fn clamped(self, total: usize) -> Self {
        if total == 0 {
            return self.at(0);
        }
        let last = (total - 1) / self.size;
        self.at(self.index.min(last))
    }
}

impl Default for PageState {
    fn default() -> Self {
        Self::first(DEFAULT_PAGE_SIZE)
    }
}

/// Whether the entry editor opens on a blank record or an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    /// Create a new entry from a blank record.
    Add,
    /// Edit the selected existing entry.
    Edit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggling_same_field_flips_order() {
        let spec = SortSpec::default().toggled(SortField::Email);
        assert_eq!(spec.field, SortField::Email);
        assert_eq!(spec.order, SortOrder::Ascending);

        let flipped = spec.toggled(SortField::Email);
        assert_eq!(flipped.order, SortOrder::Descending);

        let other = flipped.toggled(SortField::Category);
        assert_eq!(other.field, SortField::Category);
        assert_eq!(other.order, SortOrder::Ascending);
    }

    #[test]
    fn resize_resets_index() {
        let page = PageState::first(10).at(4);
        assert_eq!(page.resized(25), PageState { index: 0, size: 25 });
    }

    #[test]
    fn zero_size_falls_back_to_default() {
        assert_eq!(PageState::first(0).size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn clamp_keeps_last_nonempty_page() {
        let page = PageState::first(10).at(7);
        assert_eq!(page.clamped(35).index, 3);
        assert_eq!(page.clamped(0).index, 0);
        assert_eq!(page.clamped(100).index, 7);
    }
}

//! Pagination stage: slices the filtered entries into the visible window.

use crate::app::modes::PageState;
use crate::domain::Entry;

/// Returns the page slice plus the total filtered count.
///
/// The slice is `entries[index * size .. index * size + size]` clipped to the
/// available length. A window starting past the end yields an empty slice,
/// never an error; callers that want to avoid showing one clamp the index
/// first with [`PageState::clamped`]. The count covers the whole input and is
/// what page controls are rendered from.
///
/// # Examples
///
/// ```
/// use rolodex::app::modes::PageState;
/// use rolodex::pipeline::paginate;
///
/// let (slice, total) = paginate::apply(&[], &PageState::first(10));
/// assert!(slice.is_empty());
/// assert_eq!(total, 0);
/// ```
#[must_use]
pub fn apply(entries: &[Entry], page: &PageState) -> (Vec<Entry>, usize) {
    let total = entries.len();
    let start = page.index.saturating_mul(page.size).min(total);
    let end = start.saturating_add(page.size).min(total);
    (entries[start..end].to_vec(), total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EntryId;

    fn entries(count: usize) -> Vec<Entry> {
        (0..count)
            .map(|i| Entry {
                id: EntryId(format!("e{i}")),
                ..Entry::empty()
            })
            .collect()
    }

    #[test]
    fn first_page_takes_leading_entries() {
        let input = entries(7);
        let (slice, total) = apply(&input, &PageState::first(10));
        assert_eq!(slice.len(), 7);
        assert_eq!(total, 7);

        let (slice, _) = apply(&input, &PageState::first(3));
        assert_eq!(slice, input[..3].to_vec());
    }

    #[test]
    fn window_past_end_is_empty_with_correct_total() {
        let input = entries(12);
        let page = PageState::first(10).at(5);
        let (slice, total) = apply(&input, &page);
        assert!(slice.is_empty());
        assert_eq!(total, 12);
    }

    #[test]
    fn last_page_may_be_partial() {
        let input = entries(12);
        let (slice, total) = apply(&input, &PageState::first(10).at(1));
        assert_eq!(slice, input[10..].to_vec());
        assert_eq!(total, 12);
    }
}

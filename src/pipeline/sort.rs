//! Sort stage: orders entries by the active sort spec.
//!
//! Comparison is case-insensitive and locale-independent: keys are lowercased
//! and compared by Unicode code point, the same way on every machine. The sort
//! is stable, so entries with equal keys keep their source order.

use crate::app::modes::{SortField, SortOrder, SortSpec};
use crate::domain::Entry;

/// Orders a snapshot of entries according to `spec`.
///
/// With `SortField::Original` the input order passes through untouched; the
/// source's current order is taken as "original" at sort time, no historical
/// order is remembered. Otherwise entries are compared on the lowercased value
/// of the active field, descending by inverting the comparator. Inverting
/// preserves stability because equal keys still compare equal.
///
/// Field values are always present on a decoded [`Entry`] (missing document
/// fields decode to empty strings), so an absent value simply compares as `""`
/// and sorts ahead of everything else ascending.
#[must_use]
pub fn apply(entries: &[Entry], spec: &SortSpec) -> Vec<Entry> {
    if spec.field == SortField::Original {
        return entries.to_vec();
    }

    let mut ordered = entries.to_vec();
    ordered.sort_by(|a, b| {
        let ordering = key_of(a, spec.field).cmp(&key_of(b, spec.field));
        match spec.order {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    });
    ordered
}

/// Lowercased comparison key for one entry under a sort field.
fn key_of(entry: &Entry, field: SortField) -> String {
    let value = match field {
        SortField::Name => &entry.name,
        SortField::Email => &entry.email,
        SortField::Category => &entry.category,
        // Handled by the passthrough above; harmless if reached.
        SortField::Original => return String::new(),
    };
    value.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EntryId;

    fn entry(id: &str, name: &str, email: &str, category: &str) -> Entry {
        Entry {
            id: EntryId::from(id),
            name: name.to_string(),
            email: email.to_string(),
            user: String::new(),
            category: category.to_string(),
            owner: None,
            added_at: None,
        }
    }

    fn ids(entries: &[Entry]) -> Vec<&str> {
        entries.iter().map(|e| e.id.as_str()).collect()
    }

    #[test]
    fn original_order_is_identity() {
        let input = vec![
            entry("1", "Bob", "b@x.com", "tech"),
            entry("2", "Amy", "a@x.com", "edu"),
        ];
        let spec = SortSpec::default();
        assert_eq!(apply(&input, &spec), input);
    }

    #[test]
    fn name_ascending_orders_case_insensitively() {
        let input = vec![
            entry("1", "bob", "", ""),
            entry("2", "Amy", "", ""),
            entry("3", "carl", "", ""),
        ];
        let spec = SortSpec {
            field: SortField::Name,
            order: SortOrder::Ascending,
        };
        assert_eq!(ids(&apply(&input, &spec)), vec!["2", "1", "3"]);
    }

    #[test]
    fn descending_reverses_ascending_for_unique_keys() {
        let input = vec![
            entry("1", "Bob", "", ""),
            entry("2", "Amy", "", ""),
            entry("3", "Carl", "", ""),
        ];
        let asc = apply(
            &input,
            &SortSpec {
                field: SortField::Name,
                order: SortOrder::Ascending,
            },
        );
        let mut desc = apply(
            &input,
            &SortSpec {
                field: SortField::Name,
                order: SortOrder::Descending,
            },
        );
        desc.reverse();
        assert_eq!(asc, desc);
    }

    #[test]
    fn equal_keys_keep_input_order() {
        let input = vec![
            entry("1", "Amy", "z@x.com", ""),
            entry("2", "Amy", "a@x.com", ""),
            entry("3", "Amy", "m@x.com", ""),
        ];
        let spec = SortSpec {
            field: SortField::Name,
            order: SortOrder::Descending,
        };
        assert_eq!(ids(&apply(&input, &spec)), vec!["1", "2", "3"]);
    }

    #[test]
    fn missing_field_sorts_as_empty_string() {
        let input = vec![
            entry("1", "Bob", "", "tech"),
            entry("2", "", "", "edu"),
        ];
        let spec = SortSpec {
            field: SortField::Name,
            order: SortOrder::Ascending,
        };
        assert_eq!(ids(&apply(&input, &spec)), vec!["2", "1"]);
    }
}

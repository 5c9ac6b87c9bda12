//! Snapshot differ.
//!
//! Pure comparison of two snapshots keyed by [`PropertyId`]. Duplicate ids
//! inside one snapshot collapse to a single id for the added/removed sets,
//! and the first occurrence wins when a field value is compared.

use std::collections::BTreeSet;

use crate::models::{Field, PropertyId, Snapshot};

/// One watched-field change for an id present in both snapshots
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChange {
    pub id: PropertyId,
    pub field: Field,
    pub old: String,
    pub new: String,
}

/// Three-way difference between a previous and a current snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Delta {
    pub added: BTreeSet<PropertyId>,
    pub removed: BTreeSet<PropertyId>,
    pub changed: Vec<FieldChange>,
}

impl Delta {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.changed.is_empty()
    }
}

/// Ids in `current` that `previous` does not have
pub fn compute_added(previous: &Snapshot, current: &Snapshot) -> BTreeSet<PropertyId> {
    let before = previous.ids();
    current
        .ids()
        .into_iter()
        .filter(|id| !before.contains(id))
        .cloned()
        .collect()
}

/// Ids in `previous` that `current` no longer has
pub fn compute_removed(previous: &Snapshot, current: &Snapshot) -> BTreeSet<PropertyId> {
    compute_added(current, previous)
}

/// Raw-text changes of `field` for ids present in both snapshots.
///
/// Values are compared as literal strings, so `"3,000万円"` and `"3000万円"`
/// differ. Output follows the first-occurrence order of `current`.
pub fn compute_changed(previous: &Snapshot, current: &Snapshot, field: Field) -> Vec<FieldChange> {
    let before = previous.index();
    let mut seen = BTreeSet::new();
    let mut changes = Vec::new();

    for record in current.records() {
        if !seen.insert(&record.id) {
            continue;
        }
        let Some(old) = before.get(&record.id) else {
            continue;
        };
        let (old_value, new_value) = (old.get(field), record.get(field));
        if old_value != new_value {
            changes.push(FieldChange {
                id: record.id.clone(),
                field,
                old: old_value.to_string(),
                new: new_value.to_string(),
            });
        }
    }

    changes
}

/// Full delta with `field` as the watched column
pub fn diff(previous: &Snapshot, current: &Snapshot, field: Field) -> Delta {
    Delta {
        added: compute_added(previous, current),
        removed: compute_removed(previous, current),
        changed: compute_changed(previous, current, field),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::record;

    fn ids(raw: &[&str]) -> BTreeSet<PropertyId> {
        raw.iter().map(|id| PropertyId::new(*id)).collect()
    }

    #[test]
    fn new_listing_is_added() {
        let previous = Snapshot::new(vec![record("a", "100")]);
        let current = Snapshot::new(vec![record("a", "100"), record("b", "200")]);

        let delta = diff(&previous, &current, Field::Price);
        assert_eq!(delta.added, ids(&["b"]));
        assert!(delta.removed.is_empty());
        assert!(delta.changed.is_empty());
    }

    #[test]
    fn vanished_listing_is_removed() {
        let previous = Snapshot::new(vec![record("a", "100")]);
        let current = Snapshot::empty();

        let delta = diff(&previous, &current, Field::Price);
        assert!(delta.added.is_empty());
        assert_eq!(delta.removed, ids(&["a"]));
        assert!(delta.changed.is_empty());
    }

    #[test]
    fn price_change_is_reported_with_both_values() {
        let previous = Snapshot::new(vec![record("a", "100")]);
        let current = Snapshot::new(vec![record("a", "150")]);

        let delta = diff(&previous, &current, Field::Price);
        assert!(delta.added.is_empty());
        assert!(delta.removed.is_empty());
        assert_eq!(
            delta.changed,
            vec![FieldChange {
                id: PropertyId::new("a"),
                field: Field::Price,
                old: "100".to_string(),
                new: "150".to_string(),
            }]
        );
    }

    #[test]
    fn prices_are_compared_as_text() {
        let previous = Snapshot::new(vec![record("a", "3,000万円")]);
        let current = Snapshot::new(vec![record("a", "3000万円")]);

        assert_eq!(compute_changed(&previous, &current, Field::Price).len(), 1);
    }

    #[test]
    fn unwatched_field_changes_are_ignored() {
        let previous = Snapshot::new(vec![record("a", "100")]);
        let mut renamed = record("a", "100");
        renamed.name = "renamed".to_string();
        let current = Snapshot::new(vec![renamed]);

        assert!(compute_changed(&previous, &current, Field::Price).is_empty());
        assert_eq!(compute_changed(&previous, &current, Field::Name).len(), 1);
    }

    #[test]
    fn duplicates_compare_first_occurrence_once() {
        let previous = Snapshot::new(vec![record("a", "100"), record("a", "500")]);
        let current = Snapshot::new(vec![record("a", "100"), record("a", "700")]);

        assert!(compute_changed(&previous, &current, Field::Price).is_empty());

        let current = Snapshot::new(vec![record("a", "120"), record("a", "100")]);
        let changes = compute_changed(&previous, &current, Field::Price);
        assert_eq!(changes.len(), 1);
        assert_eq!((changes[0].old.as_str(), changes[0].new.as_str()), ("100", "120"));
    }

    #[test]
    fn changes_follow_current_order() {
        let previous = Snapshot::new(vec![record("a", "1"), record("b", "1"), record("c", "1")]);
        let current = Snapshot::new(vec![record("c", "2"), record("a", "2"), record("b", "1")]);

        let order: Vec<_> = compute_changed(&previous, &current, Field::Price)
            .into_iter()
            .map(|c| c.id.to_string())
            .collect();
        assert_eq!(order, vec!["c", "a"]);
    }

    #[test]
    fn identical_snapshots_have_empty_delta() {
        let snapshot = Snapshot::new(vec![record("a", "1"), record("b", "2")]);
        assert!(diff(&snapshot, &snapshot, Field::Price).is_empty());
    }
}

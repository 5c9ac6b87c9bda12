use std::collections::BTreeSet;

use proptest::prelude::*;

use property_watch::diff::diff;
use property_watch::{
    compute_added, compute_changed, compute_removed, Field, PropertyId, PropertyRecord, Snapshot,
};

fn record(id: &str, price: &str) -> PropertyRecord {
    PropertyRecord {
        id: PropertyId::new(id),
        name: format!("{id} heights"),
        url: format!("https://suumo.jp/ms/chuko/{id}/"),
        price: price.to_string(),
        location: "東京都目黒区".to_string(),
        station: "東急東横線「学芸大学」徒歩8分".to_string(),
        area: "55.1m2".to_string(),
        floor_plan: "2LDK".to_string(),
        balcony: "7.2m2".to_string(),
        built_date: "1999年10月".to_string(),
        company: String::new(),
    }
}

fn snapshot(rows: &[(&str, &str)]) -> Snapshot {
    Snapshot::new(rows.iter().map(|(id, price)| record(id, price)).collect())
}

fn id_set(snapshot: &Snapshot) -> BTreeSet<PropertyId> {
    snapshot.ids().into_iter().cloned().collect()
}

fn arb_snapshot() -> impl Strategy<Value = Snapshot> {
    let id = prop::sample::select(vec!["a", "b", "c", "d", "e", "f"]);
    let price = prop::sample::select(vec!["100", "150", "3,000万円", "3000万円"]);
    prop::collection::vec((id, price), 0..12).prop_map(|rows| {
        Snapshot::new(rows.into_iter().map(|(id, price)| record(id, price)).collect())
    })
}

#[test]
fn listing_added() {
    let previous = snapshot(&[("a", "100")]);
    let current = snapshot(&[("a", "100"), ("b", "200")]);

    let delta = diff(&previous, &current, Field::Price);
    assert_eq!(delta.added, BTreeSet::from([PropertyId::new("b")]));
    assert!(delta.removed.is_empty());
    assert!(delta.changed.is_empty());
}

#[test]
fn listing_removed() {
    let previous = snapshot(&[("a", "100")]);
    let current = snapshot(&[]);

    let delta = diff(&previous, &current, Field::Price);
    assert!(delta.added.is_empty());
    assert_eq!(delta.removed, BTreeSet::from([PropertyId::new("a")]));
    assert!(delta.changed.is_empty());
}

#[test]
fn listing_repriced() {
    let previous = snapshot(&[("a", "100")]);
    let current = snapshot(&[("a", "150")]);

    let delta = diff(&previous, &current, Field::Price);
    assert!(delta.added.is_empty());
    assert!(delta.removed.is_empty());
    let changed: Vec<_> = delta
        .changed
        .iter()
        .map(|c| (c.id.as_str(), c.old.as_str(), c.new.as_str()))
        .collect();
    assert_eq!(changed, vec![("a", "100", "150")]);
}

#[test]
fn first_run_diffs_against_empty() {
    let current = snapshot(&[("a", "100")]);
    let delta = diff(&Snapshot::empty(), &current, Field::Price);

    assert_eq!(delta.added, BTreeSet::from([PropertyId::new("a")]));
    assert!(delta.removed.is_empty());
    assert!(delta.changed.is_empty());
}

proptest! {
    #[test]
    fn added_and_removed_are_disjoint(p in arb_snapshot(), c in arb_snapshot()) {
        let added = compute_added(&p, &c);
        let removed = compute_removed(&p, &c);
        prop_assert!(added.is_disjoint(&removed));
    }

    #[test]
    fn id_sets_partition(p in arb_snapshot(), c in arb_snapshot()) {
        let (ids_p, ids_c) = (id_set(&p), id_set(&c));
        let common: BTreeSet<_> = ids_p.intersection(&ids_c).cloned().collect();

        let rebuilt_c: BTreeSet<_> = common.union(&compute_added(&p, &c)).cloned().collect();
        let rebuilt_p: BTreeSet<_> = common.union(&compute_removed(&p, &c)).cloned().collect();
        prop_assert_eq!(rebuilt_c, ids_c);
        prop_assert_eq!(rebuilt_p, ids_p);
    }

    #[test]
    fn diff_against_itself_is_empty(p in arb_snapshot()) {
        prop_assert!(compute_added(&p, &p).is_empty());
        prop_assert!(compute_removed(&p, &p).is_empty());
        prop_assert!(compute_changed(&p, &p, Field::Price).is_empty());
    }

    #[test]
    fn added_mirrors_removed(p in arb_snapshot(), c in arb_snapshot()) {
        prop_assert_eq!(compute_added(&p, &c), compute_removed(&c, &p));
    }

    #[test]
    fn changed_ids_are_shared_and_unique(p in arb_snapshot(), c in arb_snapshot()) {
        let (ids_p, ids_c) = (id_set(&p), id_set(&c));
        let changed = compute_changed(&p, &c, Field::Price);

        let mut seen = BTreeSet::new();
        for change in &changed {
            prop_assert!(ids_p.contains(&change.id) && ids_c.contains(&change.id));
            prop_assert!(seen.insert(change.id.clone()));
            prop_assert_ne!(&change.old, &change.new);
        }
    }
}

#![cfg(feature = "content-hash")]

// ContentHashList integration suite.
//
// Keys come from SHA-512 over canonical JSON, so they are stable across
// instances and runs, and structurally equal values collide by design.
use hash_list::{ContentHash, ContentHashList, HashList, HashListError, KeyStrategy};
use serde::Serialize;
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};

#[derive(Clone, Debug, PartialEq, Serialize)]
struct Reading {
    sensor: String,
    value: f64,
    tags: HashMap<String, String>,
}

fn reading(sensor: &str, value: f64, tags: &[(&str, &str)]) -> Reading {
    Reading {
        sensor: sensor.to_string(),
        value,
        tags: tags
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    }
}

// Test: the canonical string scenario.
// Verifies: duplicate "a" rejected with count unchanged; remove("b") works;
// get(key("a")) returns "a".
#[test]
fn string_scenario() {
    let mut l: ContentHashList<String> = ContentHashList::default();
    for s in ["a", "b", "c"] {
        l.add(s.to_string()).unwrap();
    }
    assert_eq!(l.count(), 3);

    let ka = l.key_of(&"a".to_string()).unwrap();
    assert_eq!(
        l.add("a".to_string()),
        Err(HashListError::DuplicateKey(ka))
    );
    assert_eq!(l.count(), 3);

    assert_eq!(l.remove(&"b".to_string()), Ok(true));
    assert_eq!(l.count(), 2);
    assert_eq!(l.get(ka).unwrap(), "a");
}

// Test: keys are pinned values, equal for &str and String, across instances.
#[test]
fn keys_are_stable_across_instances() {
    let mut first: ContentHashList<&str> = ContentHashList::default();
    let mut second: ContentHashList<String> = HashList::with_strategy(ContentHash::new());
    let k1 = first.add("a").unwrap();
    let k2 = second.add("a".to_string()).unwrap();
    assert_eq!(k1, k2);
    assert_eq!(k1, -985080462);
}

// Test: structural equality decides identity.
// Verifies: readings with equal fields (tags inserted in different order)
// collide; differing readings do not.
#[test]
fn structurally_equal_values_collide() {
    let mut l: ContentHashList<Reading> = ContentHashList::default();
    l.add(reading("t1", 20.5, &[("room", "lab"), ("floor", "2")]))
        .unwrap();
    let same = reading("t1", 20.5, &[("floor", "2"), ("room", "lab")]);
    assert!(l.contains(&same).unwrap());
    assert!(matches!(l.add(same), Err(HashListError::DuplicateKey(_))));
    l.add(reading("t1", 20.6, &[("room", "lab"), ("floor", "2")]))
        .unwrap();
    assert_eq!(l.count(), 2);
}

// Test: domain-separated strategies produce different keys for one value.
#[test]
fn domains_do_not_mix() {
    let plain: ContentHashList<&str> = ContentHashList::default();
    let tagged: ContentHashList<&str> = HashList::with_strategy(ContentHash::with_domain("demo"));
    assert_ne!(plain.key_of(&"a").unwrap(), tagged.key_of(&"a").unwrap());
    assert_eq!(tagged.key_of(&"a").unwrap(), 1001625444);
}

// Test: unserializable elements.
// Verifies: Serialization error is surfaced by add and by lookups; the list
// is untouched.
#[test]
fn serialization_errors_surface() {
    let mut l: ContentHashList<BTreeMap<Vec<u8>, u8>> = ContentHashList::default();
    let mut bad = BTreeMap::new();
    bad.insert(vec![1], 1);
    assert!(matches!(l.add(bad.clone()), Err(HashListError::Serialization(_))));
    assert!(matches!(l.contains(&bad), Err(HashListError::Serialization(_))));
    assert!(matches!(l.index_of(&bad), Err(HashListError::Serialization(_))));
    assert!(matches!(l.remove(&bad), Err(HashListError::Serialization(_))));
    assert!(l.is_empty());
}

// Test: key drift through interior mutability.
// Assumes: keys are computed once, at insertion.
// Verifies: after mutating a stored RefCell, lookups by the new content miss
// while the old key still resolves; rekey realigns the entry.
#[test]
fn interior_mutation_drifts_key() {
    let mut l: ContentHashList<RefCell<String>> = ContentHashList::default();
    let old = l.add(RefCell::new("before".to_string())).unwrap();
    *l.get(old).unwrap().borrow_mut() = "after".to_string();

    let needle = RefCell::new("after".to_string());
    assert!(!l.contains(&needle).unwrap());
    assert_eq!(*l.get(old).unwrap().borrow(), "after");

    let fresh = l.rekey(old).unwrap();
    assert_eq!(fresh, ContentHash::new().key(&needle).unwrap());
    assert!(l.contains(&needle).unwrap());
    assert!(matches!(l.get(old), Err(HashListError::KeyNotFound(_))));
}

// Test: floats JSON cannot encode.
// Assumes: NaN and the infinities have no canonical encoding.
// Verifies: they fail with Serialization instead of sharing the `null` key
// with None; None and finite values are still stored side by side.
#[test]
fn non_finite_floats_are_not_keyed() {
    let mut l: ContentHashList<Option<f64>> = ContentHashList::default();
    for v in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        assert!(
            matches!(l.add(Some(v)), Err(HashListError::Serialization(_))),
            "{v} must not be keyed"
        );
        assert!(matches!(l.contains(&Some(v)), Err(HashListError::Serialization(_))));
    }
    assert!(l.is_empty());

    l.add(None).unwrap();
    l.add(Some(1.5)).unwrap();
    assert_eq!(l.count(), 2);
    assert!(l.contains(&None).unwrap());
    assert!(l.contains(&Some(1.5)).unwrap());
}

// HashList integration suite.
//
// Each test documents what behavior is being verified and which
// invariants are assumed or asserted. The core invariants exercised:
// - Uniqueness: adding an element whose key is taken fails with
//   DuplicateKey and leaves the list unchanged.
// - Round-trip: after a successful add, contains() is true and get(key)
//   returns the element.
// - Hash-as-index: index_of/get/remove_at speak in hash keys, never in
//   positions.
// - Bounds: copy_to validates offset and capacity before writing.
use hash_list::{HashList, HashListError, IdentityHash, KeyStrategy, PresentOnly, NOT_FOUND};
use std::collections::hash_map::RandomState;
use std::collections::BTreeSet;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct User {
    id: u32,
    name: String,
}

fn user(id: u32, name: &str) -> User {
    User {
        id,
        name: name.to_string(),
    }
}

// Test: round-trip through the public surface.
// Assumes: distinct users have distinct 32-bit keys.
// Verifies: count, contains, index_of and get agree after adds.
#[test]
fn add_contains_get_round_trip() {
    let mut l = HashList::new();
    let users = [user(1, "ann"), user(2, "bob"), user(3, "cy")];
    let mut keys = Vec::new();
    for u in users.iter().cloned() {
        keys.push(l.add(u).expect("distinct users add"));
    }
    assert_eq!(l.count(), 3);
    for (u, k) in users.iter().zip(&keys) {
        assert!(l.contains(u).unwrap());
        assert_eq!(l.index_of(u).unwrap(), *k);
        assert_eq!(l.get(*k).unwrap(), u);
    }
}

// Test: the "index" is a hash key, not a position.
// Verifies: positions 0..N-1 do not address the inserted elements.
#[test]
fn index_is_not_a_position() {
    let l = HashList::from_elements(["x", "y", "z"]).unwrap();
    let keys: BTreeSet<i32> = l.keys().collect();
    let positions: BTreeSet<i32> = (0..3).collect();
    assert_ne!(keys, positions);
    for p in 0..3 {
        if !keys.contains(&p) {
            assert_eq!(l.get(p), Err(HashListError::KeyNotFound(p)));
        }
    }
}

// Test: duplicate rejection.
// Verifies: DuplicateKey carries the taken key; count is unchanged.
#[test]
fn duplicate_rejected_count_unchanged() {
    let mut l = HashList::new();
    let k = l.add(user(7, "eve")).unwrap();
    let err = l.add(user(7, "eve")).unwrap_err();
    assert_eq!(err, HashListError::DuplicateKey(k));
    assert_eq!(err.to_string(), format!("an element with hash key {k} already exists"));
    assert_eq!(l.count(), 1);
}

// Test: remove on absent elements.
// Verifies: returns false without error, and the same on repetition.
#[test]
fn remove_absent_twice() {
    let mut l = HashList::from_elements([user(1, "a")]).unwrap();
    let ghost = user(9, "ghost");
    assert_eq!(l.remove(&ghost), Ok(false));
    assert_eq!(l.remove(&ghost), Ok(false));
    assert_eq!(l.count(), 1);
}

// Test: remove_at by key.
// Verifies: returns the owned element; a second call fails with KeyNotFound.
#[test]
fn remove_at_returns_element() {
    let mut l = HashList::from_elements([user(1, "a"), user(2, "b")]).unwrap();
    let k = l.index_of(&user(2, "b")).unwrap();
    assert_eq!(l.remove_at(k).unwrap(), user(2, "b"));
    assert_eq!(l.remove_at(k), Err(HashListError::KeyNotFound(k)));
    assert_eq!(l.index_of(&user(2, "b")).unwrap(), NOT_FOUND);
}

// Test: copy_to bounds.
// Verifies: InvalidArgument for negative, past-the-end and too-small cases;
// success copies exactly count() elements at the offset.
#[test]
fn copy_to_bounds() {
    let l = HashList::from_elements([10u16, 20, 30]).unwrap();
    let mut buf = [0u16; 5];
    for offset in [-1isize, -100, 6, 3, 4] {
        assert!(
            matches!(
                l.copy_to(&mut buf, offset),
                Err(HashListError::InvalidArgument { .. })
            ),
            "offset {offset} must be rejected"
        );
    }
    assert_eq!(buf, [0; 5]);

    l.copy_to(&mut buf, 2).unwrap();
    assert_eq!(buf[..2], [0, 0]);
    let copied: BTreeSet<u16> = buf[2..].iter().copied().collect();
    assert_eq!(copied, [10, 20, 30].into());
}

// Test: insert_at is unsupported.
#[test]
fn insert_at_always_unsupported() {
    let mut l: HashList<u8> = HashList::new();
    let err = l.insert_at(0, 1).unwrap_err();
    assert!(matches!(err, HashListError::UnsupportedOperation(_)));
    assert!(l.is_empty());
}

// Test: identity keys are stable across instances with the default hasher,
// and self-consistent with a randomized one.
#[test]
fn identity_keys_across_instances() {
    let a = HashList::from_elements([user(1, "a")]).unwrap();
    let b = HashList::from_elements([user(1, "a")]).unwrap();
    assert_eq!(a.keys().collect::<Vec<_>>(), b.keys().collect::<Vec<_>>());

    let mut r = HashList::with_strategy(IdentityHash::with_hasher(RandomState::new()));
    let k = r.add(user(1, "a")).unwrap();
    assert_eq!(r.key_of(&user(1, "a")).unwrap(), k);
}

// Test: absent elements through PresentOnly.
// Verifies: None is an InvalidElement on every keyed operation; the list is
// untouched.
#[test]
fn absent_elements_are_invalid() {
    let mut l: HashList<Option<User>, PresentOnly<IdentityHash>> =
        HashList::default();
    let k = l.add(Some(user(1, "a"))).unwrap();
    assert_eq!(k, IdentityHash::new().key(&user(1, "a")).unwrap());

    assert!(matches!(l.add(None), Err(HashListError::InvalidElement(_))));
    assert!(matches!(l.contains(&None), Err(HashListError::InvalidElement(_))));
    assert!(matches!(l.remove(&None), Err(HashListError::InvalidElement(_))));
    assert_eq!(l.count(), 1);
}

// Test: owned and borrowed iteration cover the same elements.
#[test]
fn iteration_owned_and_borrowed() {
    let l = HashList::from_elements(["p", "q"]).unwrap();
    let mut seen = Vec::new();
    for e in &l {
        seen.push(*e);
    }
    seen.sort();
    let mut owned: Vec<&str> = l.clone().into_iter().collect();
    owned.sort();
    assert_eq!(seen, owned);
    let mut v = l.to_vec();
    v.sort();
    assert_eq!(v, vec!["p", "q"]);
}

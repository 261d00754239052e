#![cfg(test)]

// Property tests for HashList kept inside the crate so the structural
// layer's table hasher and the strategies can be swapped freely.

use crate::hash_list::{HashList, NOT_FOUND};
use crate::strategy::{IdentityHash, KeyStrategy};
use crate::{HashKey, HashListError};
use proptest::prelude::*;
use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::hash::{BuildHasher, Hasher};

// Pool-indexed operations to improve shrinking: indices shrink to earlier
// elements, pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Add(usize),
    Remove(usize),
    RemoveAt(usize),
    Set(usize, usize),
    Contains(String),
    IndexOf(usize),
    CopyTo(isize, usize),
    Clear,
    Iterate,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,5}", 1..=8).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let contains_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            4 => idx.clone().prop_map(OpI::Add),
            2 => idx.clone().prop_map(OpI::Remove),
            2 => idx.clone().prop_map(OpI::RemoveAt),
            1 => (idx.clone(), idx.clone()).prop_map(|(k, e)| OpI::Set(k, e)),
            2 => prop_oneof![
                contains_pool.prop_map(|s: String| s),
                "[a-z]{0,5}".prop_map(|s| s)
            ]
            .prop_map(OpI::Contains),
            2 => idx.clone().prop_map(OpI::IndexOf),
            1 => (-2isize..12, 0usize..12).prop_map(|(o, n)| OpI::CopyTo(o, n)),
            1 => Just(OpI::Clear),
            1 => Just(OpI::Iterate),
        ];
        proptest::collection::vec(op, 1..60).prop_map(move |ops| (pool.clone(), ops))
    })
}

// Squeezes every hash into four values so distinct elements collide often.
#[derive(Clone, Default)]
struct NarrowBuildHasher;
struct NarrowHasher(DefaultHasher);
impl BuildHasher for NarrowBuildHasher {
    type Hasher = NarrowHasher;
    fn build_hasher(&self) -> Self::Hasher {
        NarrowHasher(DefaultHasher::new())
    }
}
impl Hasher for NarrowHasher {
    fn write(&mut self, bytes: &[u8]) {
        self.0.write(bytes);
    }
    fn finish(&self) -> u64 {
        self.0.finish() & 3
    }
}

// Runs the op sequence against HashList and a HashMap<HashKey, String> model.
// Invariants exercised after every op:
// - `add` succeeds iff the element's key is free; otherwise DuplicateKey and
//   the list is unchanged.
// - `contains`/`index_of` agree with key presence in the model.
// - `remove`/`remove_at` report and apply removals exactly like the model.
// - `set` overwrites unconditionally.
// - `copy_to` rejects bad bounds and otherwise copies exactly `count()` elements.
// - iteration yields the model's (key, element) pairs; len parity holds.
fn run_state_machine<H>(
    mut sut: HashList<String, H>,
    pool: Vec<String>,
    ops: Vec<OpI>,
) -> Result<(), TestCaseError>
where
    H: KeyStrategy<String>,
{
    let mut model: HashMap<HashKey, String> = HashMap::new();
    for op in ops {
        match op {
            OpI::Add(i) => {
                let e = pool[i].clone();
                let k = sut.key_of(&e).unwrap();
                let already = model.contains_key(&k);
                match sut.add(e.clone()) {
                    Ok(rk) => {
                        prop_assert!(!already, "add must fail on taken key");
                        prop_assert_eq!(rk, k);
                        model.insert(k, e);
                    }
                    Err(HashListError::DuplicateKey(dk)) => {
                        prop_assert!(already, "duplicate error only when key exists");
                        prop_assert_eq!(dk, k);
                    }
                    Err(other) => prop_assert!(false, "unexpected error {:?}", other),
                }
            }
            OpI::Remove(i) => {
                let k = sut.key_of(&pool[i]).unwrap();
                let removed = sut.remove(&pool[i]).unwrap();
                prop_assert_eq!(removed, model.remove(&k).is_some());
            }
            OpI::RemoveAt(i) => {
                let k = sut.key_of(&pool[i]).unwrap();
                match (sut.remove_at(k), model.remove(&k)) {
                    (Ok(v), Some(mv)) => prop_assert_eq!(v, mv),
                    (Err(HashListError::KeyNotFound(nk)), None) => prop_assert_eq!(nk, k),
                    (got, want) => prop_assert!(false, "remove_at mismatch: {:?} vs {:?}", got, want),
                }
            }
            OpI::Set(ki, ei) => {
                let k = sut.key_of(&pool[ki]).unwrap();
                let prev = sut.set(k, pool[ei].clone());
                prop_assert_eq!(prev, model.insert(k, pool[ei].clone()));
            }
            OpI::Contains(s) => {
                let k = sut.key_of(&s).unwrap();
                prop_assert_eq!(sut.contains(&s).unwrap(), model.contains_key(&k));
            }
            OpI::IndexOf(i) => {
                let k = sut.key_of(&pool[i]).unwrap();
                let expected = if model.contains_key(&k) { k } else { NOT_FOUND };
                prop_assert_eq!(sut.index_of(&pool[i]).unwrap(), expected);
            }
            OpI::CopyTo(offset, len) => {
                let mut buf = vec!["#".to_string(); len];
                let fits = offset >= 0
                    && (offset as usize) <= len
                    && len - offset as usize >= model.len();
                match sut.copy_to(&mut buf, offset) {
                    Ok(()) => {
                        prop_assert!(fits);
                        let start = offset as usize;
                        let end = start + model.len();
                        prop_assert!(buf[..start].iter().all(|s| s == "#"));
                        prop_assert!(buf[end..].iter().all(|s| s == "#"));
                        let mut copied = buf[start..end].to_vec();
                        let mut expected: Vec<String> = model.values().cloned().collect();
                        copied.sort();
                        expected.sort();
                        prop_assert_eq!(copied, expected);
                    }
                    Err(HashListError::InvalidArgument { .. }) => {
                        prop_assert!(!fits);
                        prop_assert!(buf.iter().all(|s| s == "#"));
                    }
                    Err(other) => prop_assert!(false, "unexpected error {:?}", other),
                }
            }
            OpI::Clear => {
                sut.clear();
                model.clear();
            }
            OpI::Iterate => {
                let s_entries: BTreeMap<HashKey, String> =
                    sut.entries().map(|(k, v)| (k, v.clone())).collect();
                let m_entries: BTreeMap<HashKey, String> =
                    model.iter().map(|(k, v)| (*k, v.clone())).collect();
                prop_assert_eq!(s_entries, m_entries);
                let s_elems: BTreeSet<&String> = sut.iter().collect();
                let m_elems: BTreeSet<&String> = model.values().collect();
                prop_assert_eq!(s_elems, m_elems);
            }
        }

        // Post-conditions after each op
        prop_assert_eq!(sut.count(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        for (k, v) in &model {
            prop_assert_eq!(sut.get(*k).unwrap(), v);
        }
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        run_state_machine(HashList::new(), pool, ops)?;
    }
}

// Property: Same state-machine invariants under heavy key collisions: with
// only four possible keys, distinct elements are regularly rejected as
// duplicates.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        let sut = HashList::with_strategy(IdentityHash::with_hasher(NarrowBuildHasher));
        run_state_machine(sut, pool, ops)?;
    }
}

#[cfg(feature = "content-hash")]
proptest! {
    #![proptest_config(ProptestConfig { cases: 32, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_content_hash((pool, ops) in arb_scenario()) {
        run_state_machine(crate::ContentHashList::default(), pool, ops)?;
    }
}

// Property: Elements with pairwise-distinct keys are all stored and each is
// retrievable under its own key.
proptest! {
    #[test]
    fn prop_distinct_keys_all_stored(elems in proptest::collection::btree_set(any::<u64>(), 0..50)) {
        let list = HashList::from_elements(elems.iter().copied());
        let keys: BTreeSet<HashKey> = elems
            .iter()
            .map(|e| IdentityHash::new().key(e).unwrap())
            .collect();
        // Only meaningful when the 32-bit keys happen to be distinct.
        prop_assume!(keys.len() == elems.len());
        let list = list.unwrap();
        prop_assert_eq!(list.count(), elems.len());
        for e in &elems {
            let k = list.key_of(e).unwrap();
            prop_assert_eq!(list.get(k).unwrap(), e);
        }
    }
}

//! Property-based tests for the incremental hasher.
//!
//! Folding elements one at a time must agree with the one-shot hash for
//! every input length, whatever the bytes and wherever a fold is paused
//! and persisted.

use proptest::prelude::*;
use vrds_core::{hash, Element, HashState};

fn element_strategy() -> impl Strategy<Value = Element> {
    any::<[u8; 32]>().prop_map(Element::from_bytes)
}

fn elements_strategy() -> impl Strategy<Value = Vec<Element>> {
    prop::collection::vec(element_strategy(), 0..24)
}

proptest! {
    #[test]
    fn fold_of_wide_elements_equals_hash(values in elements_strategy()) {
        let folded = values
            .iter()
            .fold(HashState::initial(), |state, v| state.update(*v))
            .finalize();
        prop_assert_eq!(folded, hash(&values));
    }

    #[test]
    fn pending_tracks_parity(values in elements_strategy()) {
        let state = HashState::initial().update_all(&values);
        prop_assert_eq!(state.has_pending(), values.len() % 2 == 1);
    }

    #[test]
    fn persisted_state_resumes(values in elements_strategy(), split in 0usize..24) {
        let split = split.min(values.len());
        let (head, tail) = values.split_at(split);

        let paused = HashState::initial().update_all(head);
        let json = serde_json::to_string(&paused).unwrap();
        let resumed: HashState = serde_json::from_str(&json).unwrap();

        prop_assert_eq!(resumed, paused);
        prop_assert_eq!(resumed.update_all(tail).finalize(), hash(&values));
    }

    #[test]
    fn appending_changes_hash(values in elements_strategy(), extra in element_strategy()) {
        let mut longer = values.clone();
        longer.push(extra);
        prop_assert_ne!(hash(&values), hash(&longer));
    }
}

#[test]
fn test_lengths_zero_through_ten() {
    for n in 0..=10u64 {
        let values: Vec<Element> = (0..n).map(|i| Element::from_u64(i * 7 + 3)).collect();
        assert_eq!(
            HashState::initial().update_all(&values).finalize(),
            hash(&values),
            "length {n}"
        );
    }
}

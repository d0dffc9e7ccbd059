//! Rate-2 sponge hashing with single-element buffering.
//!
//! The sponge keeps three slots and absorbs two elements per permutation.
//! Variable-length input is padded with a single [`Element::ONE`] followed by
//! zeros up to the next full chunk, so inputs of different lengths never
//! collide through padding.
//!
//! [`HashState`] lets a caller push elements one at a time (for example one
//! predecessor id per fold step) and still land on exactly the digest that
//! [`hash`] computes for the whole list at once.

use crate::element::Element;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

pub const WIDTH: usize = 3;
pub const RATE: usize = 2;

const PERMUTATION_DOMAIN: &[u8] = b"vrds/sponge/v1";

/// The three-slot internal accumulator.
pub type SpongeState = [Element; WIDTH];

/// The fixed starting accumulator.
pub fn initial_state() -> SpongeState {
    [Element::ZERO; WIDTH]
}

/// Round function of the sponge. Each output slot commits to the full input state.
pub fn permute(state: &SpongeState) -> SpongeState {
    let mut out = [Element::ZERO; WIDTH];
    for (lane, slot) in out.iter_mut().enumerate() {
        let mut hasher = Sha256::new();
        hasher.update(PERMUTATION_DOMAIN);
        hasher.update([lane as u8]);
        for element in state {
            hasher.update(element.as_bytes());
        }
        let digest = hasher.finalize();
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&digest);
        *slot = Element::from_bytes(bytes);
    }
    out
}

/// Add one full chunk into the rate lanes and permute.
pub fn absorb(state: &SpongeState, chunk: [Element; RATE]) -> SpongeState {
    let mut next = *state;
    next[0] = next[0].xor(&chunk[0]);
    next[1] = next[1].xor(&chunk[1]);
    permute(&next)
}

/// One-shot hash of an arbitrary number of elements.
pub fn hash(inputs: &[Element]) -> Element {
    let mut padded = Vec::with_capacity(inputs.len() + RATE);
    padded.extend_from_slice(inputs);
    padded.push(Element::ONE);
    if padded.len() % RATE != 0 {
        padded.push(Element::ZERO);
    }

    let mut state = initial_state();
    for chunk in padded.chunks_exact(RATE) {
        state = absorb(&state, [chunk[0], chunk[1]]);
    }
    state[0]
}

/// Accumulator for hashing a sequence one element at a time.
///
/// Holds at most one pending element; every second [`HashState::update`]
/// absorbs the buffered pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HashState {
    state: SpongeState,
    pending: Option<Element>,
}

impl HashState {
    pub fn initial() -> Self {
        HashState {
            state: initial_state(),
            pending: None,
        }
    }

    #[must_use]
    pub fn update(&self, value: Element) -> Self {
        match self.pending {
            None => HashState {
                state: self.state,
                pending: Some(value),
            },
            Some(buffered) => HashState {
                state: absorb(&self.state, [buffered, value]),
                pending: None,
            },
        }
    }

    #[must_use]
    pub fn update_all<'a>(&self, values: impl IntoIterator<Item = &'a Element>) -> Self {
        values
            .into_iter()
            .fold(*self, |state, value| state.update(*value))
    }

    /// Pad and squeeze. Does not consume the state; the same state always
    /// finalizes to the same digest.
    pub fn finalize(&self) -> Element {
        let last = match self.pending {
            None => [Element::ONE, Element::ZERO],
            Some(buffered) => [buffered, Element::ONE],
        };
        absorb(&self.state, last)[0]
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn accumulator(&self) -> &SpongeState {
        &self.state
    }
}

impl Default for HashState {
    fn default() -> Self {
        Self::initial()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn squares(n: u64) -> Vec<Element> {
        (0..n).map(|i| Element::from_u64(i * i)).collect()
    }

    #[test]
    fn test_fold_matches_one_shot_for_small_lengths() {
        for n in 0..=10 {
            let input = squares(n);
            let folded = HashState::initial().update_all(&input).finalize();
            assert_eq!(folded, hash(&input), "length {}", n);
        }
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(HashState::initial().finalize(), hash(&[]));
    }

    #[test]
    fn test_buffer_alternates() {
        let a = HashState::initial();
        assert!(!a.has_pending());

        let b = a.update(Element::from_u64(1));
        assert!(b.has_pending());
        assert_eq!(b.accumulator(), a.accumulator());

        let c = b.update(Element::from_u64(2));
        assert!(!c.has_pending());
        assert_ne!(c.accumulator(), a.accumulator());
    }

    #[test]
    fn test_padding_separates_lengths() {
        assert_ne!(hash(&[]), hash(&[Element::ZERO]));
        assert_ne!(hash(&[Element::ONE]), hash(&[]));
        assert_ne!(
            hash(&[Element::ZERO]),
            hash(&[Element::ZERO, Element::ZERO])
        );
    }

    #[test]
    fn test_order_matters() {
        let a = Element::from_u64(1);
        let b = Element::from_u64(2);
        assert_ne!(hash(&[a, b]), hash(&[b, a]));
    }

    proptest! {
        #[test]
        fn fold_equals_one_shot(values in prop::collection::vec(any::<u64>(), 0..40)) {
            let input: Vec<Element> = values.into_iter().map(Element::from_u64).collect();
            let folded = HashState::initial().update_all(&input).finalize();
            prop_assert_eq!(folded, hash(&input));
        }

        #[test]
        fn split_fold_equals_one_shot(
            values in prop::collection::vec(any::<u64>(), 0..30),
            split in 0usize..30
        ) {
            let input: Vec<Element> = values.into_iter().map(Element::from_u64).collect();
            let split = split.min(input.len());
            let (head, tail) = input.split_at(split);
            let folded = HashState::initial().update_all(head).update_all(tail).finalize();
            prop_assert_eq!(folded, hash(&input));
        }
    }
}

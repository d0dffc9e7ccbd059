//! The fixed, ordered set of replicas allowed to increment a counter.

use crate::state::CounterState;
use ed25519_dalek::{Signature, SigningKey, VerifyingKey};
use rand::{CryptoRng, RngCore};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReplicaSet {
    keys: Vec<VerifyingKey>,
}

impl ReplicaSet {
    pub fn new(keys: Vec<VerifyingKey>) -> Self {
        ReplicaSet { keys }
    }

    /// Fresh keys for `count` replicas. Signing key `k` belongs to replica `k + 1`.
    pub fn generate<R: RngCore + CryptoRng>(count: usize, rng: &mut R) -> (Self, Vec<SigningKey>) {
        let signing_keys: Vec<SigningKey> = (0..count).map(|_| SigningKey::generate(&mut *rng)).collect();
        let keys = signing_keys.iter().map(SigningKey::verifying_key).collect();
        (ReplicaSet { keys }, signing_keys)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Key of replica `replica` (1-based).
    pub fn key(&self, replica: usize) -> Option<&VerifyingKey> {
        replica.checked_sub(1).and_then(|slot| self.keys.get(slot))
    }

    pub fn contains(&self, replica: usize) -> bool {
        self.key(replica).is_some()
    }

    /// Whether the owner of `slot` (0-based) signed `state`.
    pub fn verify(&self, slot: usize, state: &CounterState, signature: &Signature) -> bool {
        match self.keys.get(slot) {
            Some(key) => key.verify_strict(&state.signing_bytes(), signature).is_ok(),
            None => false,
        }
    }

    /// Bound into the counter program's fingerprint, so counters over
    /// different replica sets never accept each other's attestations.
    pub fn parameters(&self) -> Vec<u8> {
        self.keys.iter().flat_map(|k| k.to_bytes()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::Signer;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_generate_and_lookup() {
        let mut rng = StdRng::seed_from_u64(1);
        let (replicas, signing_keys) = ReplicaSet::generate(3, &mut rng);
        assert_eq!(replicas.len(), 3);
        assert_eq!(replicas.key(1), Some(&signing_keys[0].verifying_key()));
        assert!(replicas.key(0).is_none());
        assert!(replicas.key(4).is_none());
        assert!(replicas.contains(3));
    }

    #[test]
    fn test_verify_only_owner() {
        let mut rng = StdRng::seed_from_u64(2);
        let (replicas, signing_keys) = ReplicaSet::generate(2, &mut rng);
        let state = CounterState::from_slots(vec![1, 0]);
        let signature = signing_keys[0].sign(&state.signing_bytes());

        assert!(replicas.verify(0, &state, &signature));
        assert!(!replicas.verify(1, &state, &signature));
        assert!(!replicas.verify(7, &state, &signature));
        assert!(!replicas.verify(0, &CounterState::from_slots(vec![2, 0]), &signature));
    }

    #[test]
    fn test_parameters_follow_order() {
        let mut rng = StdRng::seed_from_u64(3);
        let (replicas, _) = ReplicaSet::generate(2, &mut rng);
        let mut keys = vec![*replicas.key(2).unwrap(), *replicas.key(1).unwrap()];
        let swapped = ReplicaSet::new(keys.clone());
        assert_ne!(replicas.parameters(), swapped.parameters());

        keys.reverse();
        assert_eq!(ReplicaSet::new(keys).parameters(), replicas.parameters());
    }
}

//! The counter vector.

use serde::{Deserialize, Serialize};
use std::fmt;
use vrds_core::Lattice;

/// One slot per replica; slot `k` belongs to replica `k + 1`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CounterState {
    slots: Vec<u64>,
}

impl CounterState {
    pub fn zeros(replicas: usize) -> Self {
        CounterState {
            slots: vec![0; replicas],
        }
    }

    pub fn from_slots(slots: Vec<u64>) -> Self {
        CounterState { slots }
    }

    pub fn slots(&self) -> &[u64] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Slot value; slots past the end read as zero.
    pub fn get(&self, slot: usize) -> u64 {
        self.slots.get(slot).copied().unwrap_or(0)
    }

    pub fn sum(&self) -> u64 {
        self.slots.iter().fold(0u64, |acc, v| acc.saturating_add(*v))
    }

    /// Copy with `slot` (0-based) raised by one. Grows the vector if needed.
    pub fn incremented(&self, slot: usize) -> Self {
        let mut slots = self.slots.clone();
        if slots.len() <= slot {
            slots.resize(slot + 1, 0);
        }
        slots[slot] = slots[slot].saturating_add(1);
        CounterState { slots }
    }

    /// The message a replica signs to authorize this state.
    pub fn signing_bytes(&self) -> Vec<u8> {
        self.slots.iter().flat_map(|v| v.to_le_bytes()).collect()
    }
}

impl Lattice for CounterState {
    fn bottom() -> Self {
        CounterState::default()
    }

    fn join(&self, other: &Self) -> Self {
        let len = self.len().max(other.len());
        CounterState {
            slots: (0..len).map(|k| self.get(k).max(other.get(k))).collect(),
        }
    }
}

impl fmt::Display for CounterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?}", self.sum(), self.slots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeros_and_sum() {
        let state = CounterState::zeros(5);
        assert_eq!(state.len(), 5);
        assert_eq!(state.sum(), 0);
        assert_eq!(CounterState::from_slots(vec![1, 2, 3]).sum(), 6);
    }

    #[test]
    fn test_incremented_touches_one_slot() {
        let state = CounterState::zeros(3).incremented(1);
        assert_eq!(state.slots(), &[0, 1, 0]);
        assert_eq!(state.incremented(1).slots(), &[0, 2, 0]);
    }

    #[test]
    fn test_join_is_pointwise_max() {
        let a = CounterState::from_slots(vec![3, 0, 1]);
        let b = CounterState::from_slots(vec![1, 2, 1]);
        assert_eq!(a.join(&b).slots(), &[3, 2, 1]);
    }

    #[test]
    fn test_join_pads_shorter_state() {
        let a = CounterState::from_slots(vec![4]);
        let b = CounterState::from_slots(vec![1, 5]);
        assert_eq!(a.join(&b).slots(), &[4, 5]);
        assert_eq!(a.join(&CounterState::bottom()), a);
    }

    #[test]
    fn test_signing_bytes_little_endian() {
        let state = CounterState::from_slots(vec![1, 256]);
        let bytes = state.signing_bytes();
        assert_eq!(bytes.len(), 16);
        assert_eq!(bytes[0], 1);
        assert_eq!(bytes[9], 1);
    }

    #[test]
    fn test_display() {
        let state = CounterState::from_slots(vec![1, 1, 0]);
        assert_eq!(state.to_string(), "2 [1, 1, 0]");
    }
}

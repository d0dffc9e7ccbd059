//! Join-semilattices.
//!
//! Mergeable replica state implements [`Lattice`]. The join must satisfy
//!  - a ⊔ b = b ⊔ a
//!  - (a ⊔ b) ⊔ c = a ⊔ (b ⊔ c)
//!  - a ⊔ a = a
//!
//! so replicas converge no matter in which order states are merged.

use std::cmp::Ordering;

pub trait Lattice: Clone + PartialEq {
    /// Identity element for [`Lattice::join`].
    fn bottom() -> Self;

    /// Least upper bound of two states.
    fn join(&self, other: &Self) -> Self;

    /// Order induced by the join: `a ≤ b` iff `a ⊔ b = b`.
    /// `None` means the two states are concurrent.
    fn partial_cmp_lattice(&self, other: &Self) -> Option<Ordering> {
        let joined = self.join(other);
        match (&joined == self, &joined == other) {
            (true, true) => Some(Ordering::Equal),
            (false, true) => Some(Ordering::Less),
            (true, false) => Some(Ordering::Greater),
            (false, false) => None,
        }
    }

    fn leq(&self, other: &Self) -> bool {
        matches!(
            self.partial_cmp_lattice(other),
            Some(Ordering::Less | Ordering::Equal)
        )
    }

    fn join_assign(&mut self, other: &Self) {
        *self = self.join(other);
    }

    /// Fold any number of states, starting from bottom.
    fn join_all<'a>(states: impl IntoIterator<Item = &'a Self>) -> Self
    where
        Self: 'a,
    {
        states
            .into_iter()
            .fold(Self::bottom(), |acc, state| acc.join(state))
    }
}

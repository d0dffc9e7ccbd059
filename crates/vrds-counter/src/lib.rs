//! # vrds-counter
//!
//! A grow-only counter with one slot per replica, where every transition is
//! attested. Anyone holding the counter's verification key can check a
//! state without seeing the increments that led to it.
//!
//! Rules enforced on `increment` by replica `i` (1-based):
//! 1. Only slot `i - 1` changes, and only by one
//! 2. The new vector is signed by replica `i`
//! 3. The old sum is divisible by `i`
//!
//! `merge` takes the pointwise maximum, so states form a join-semilattice
//! and replicas converge whatever order merges happen in.
//!
//! ## Example
//!
//! ```rust
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//! use vrds_attest::SigningAttester;
//! use vrds_counter::{GatedCounter, ReplicaSet};
//!
//! let attester = SigningAttester::from_seed([3u8; 32]);
//! let (replicas, keys) = ReplicaSet::generate(2, &mut StdRng::seed_from_u64(0));
//! let counter = GatedCounter::new(&attester, replicas);
//!
//! let initial = counter.initial().unwrap();
//! let a = counter.increment(&initial, 1, &keys[0]).unwrap();
//! let b = counter.increment(&initial, 2, &keys[1]).unwrap();
//! let merged = counter.merge(&a, &b).unwrap();
//! assert_eq!(counter.value(&merged).unwrap(), 2);
//! ```

mod counter;
mod error;
mod program;
mod replicas;
mod state;

pub use counter::GatedCounter;
pub use error::{CounterError, Result};
pub use program::{CounterAttestation, CounterCall, CounterProgram, ValidCounter};
pub use replicas::ReplicaSet;
pub use state::CounterState;

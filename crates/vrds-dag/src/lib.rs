//! # vrds-dag
//!
//! An append-only hash DAG in which every update carries an attestation
//! that it was built correctly on top of attested predecessors.
//!
//! Checking the attestation of a head is enough to trust the whole history
//! behind it: each fold step re-verifies the predecessor it absorbs.
//!
//! Rules enforced for every update:
//! 1. A root has depth 0 and its group id is the hash of its content
//! 2. A non-root shares the group id of each predecessor
//! 3. Its depth is exactly one more than the deepest predecessor
//! 4. Exactly the declared number of predecessors is folded, in order
//!
//! ## Example
//!
//! ```rust
//! use vrds_attest::SigningAttester;
//! use vrds_dag::DagProver;
//!
//! let attester = SigningAttester::from_seed([1u8; 32]);
//! let prover = DagProver::new(&attester);
//!
//! let root = prover.prove_text_update("first update", &[]).unwrap();
//! let root_valid = root.verify(&prover).unwrap();
//!
//! let child = prover.prove_text_update("second update", &[root_valid]).unwrap();
//! assert_eq!(child.update.depth, 1);
//! assert_eq!(child.update.predecessors, vec![root.id()]);
//! ```

mod error;
mod fold;
mod program;
mod store;
mod update;

pub use error::{DagError, Result};
pub use fold::DagInnerState;
pub use program::{AttestedUpdate, DagAttestation, DagCall, DagProgram, DagProver, ValidDag};
pub use store::{MemoryUpdateStore, StoreStats, UpdateStore};
pub use update::{group_id_for, next_depth, LegacyUpdate, Update, UpdateRecord};

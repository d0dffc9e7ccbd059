//! # vrds-core
//!
//! Leaf building blocks shared by every verifiable structure in the workspace:
//!
//! - [`Element`]: a 32-byte field-sized word, the unit of hashing
//! - [`sponge`]: a rate-2 sponge, the one-shot [`hash`] and the buffering
//!   [`HashState`] that absorbs one element at a time
//! - [`Lattice`]: the join-semilattice trait implemented by mergeable state
//!
//! ## Example
//!
//! ```rust
//! use vrds_core::{hash, Element, HashState};
//!
//! let inputs: Vec<Element> = (0..5u64).map(Element::from_u64).collect();
//!
//! let folded = inputs
//!     .iter()
//!     .fold(HashState::initial(), |state, e| state.update(*e))
//!     .finalize();
//!
//! assert_eq!(folded, hash(&inputs));
//! ```

pub mod element;
pub mod error;
pub mod lattice;
pub mod sponge;

pub use element::Element;
pub use error::{CoreError, Result};
pub use lattice::Lattice;
pub use sponge::{hash, HashState};

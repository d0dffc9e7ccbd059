//! Error types for the DAG fold protocol and update store.

use thiserror::Error;
use vrds_attest::AttestError;
use vrds_core::{CoreError, Element};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DagError {
    #[error("Invalid root: a root update needs depth 0 and group id = hash(content), got depth {depth}")]
    InvalidRoot { depth: u64 },

    #[error("Depth not monotonic: update depth {depth} is not above predecessor depth {predecessor_depth}")]
    DepthNotMonotonic { depth: u64, predecessor_depth: u64 },

    #[error("Group mismatch: expected {}, predecessor has {}", .expected.short(), .found.short())]
    GroupMismatch { expected: Element, found: Element },

    #[error("More predecessors folded than declared")]
    PredecessorCountExceeded,

    #[error("Too few predecessors: {remaining} declared predecessors were never folded")]
    TooFewPredecessors { remaining: u64 },

    #[error("Depth too high: {depth} exceeds every predecessor depth + 1")]
    DepthTooHigh { depth: u64 },

    #[error("Predecessor attestation does not verify")]
    UnverifiedPredecessor,

    #[error("Update id {} does not match attested id {}", .update.short(), .attested.short())]
    IdMismatch { update: Element, attested: Element },

    #[error("Missing predecessors: {0:?}")]
    MissingPredecessors(Vec<Element>),

    #[error(transparent)]
    Attest(#[from] AttestError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl From<serde_json::Error> for DagError {
    fn from(err: serde_json::Error) -> Self {
        DagError::Attest(AttestError::from(err))
    }
}

pub type Result<T> = std::result::Result<T, DagError>;

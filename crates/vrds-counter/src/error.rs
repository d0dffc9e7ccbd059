//! Error types for the gated counter.

use thiserror::Error;
use vrds_attest::AttestError;

/// Replica indices in errors are 1-based, as passed to `increment`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CounterError {
    #[error("Gate closed for replica {replica}: sum {sum} is not divisible by {replica}")]
    GateViolation { replica: usize, sum: u64 },

    #[error("Unknown replica {replica}: counter has {count} replicas")]
    UnknownReplica { replica: usize, count: usize },

    #[error("Signature does not verify for replica {replica}")]
    BadSignature { replica: usize },

    #[error(transparent)]
    Attest(#[from] AttestError),
}

pub type Result<T> = std::result::Result<T, CounterError>;

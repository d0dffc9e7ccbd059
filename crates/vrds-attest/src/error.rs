//! Error types for attestation production and checking.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AttestError {
    /// The witnesses handed to a program do not satisfy its constraints.
    #[error("Witness violation in {method}: {reason}")]
    WitnessViolation { method: String, reason: String },

    #[error("Verification failed for {method} attestation of program {program}")]
    VerificationFailure { program: String, method: String },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl AttestError {
    pub fn witness(method: &str, reason: impl Into<String>) -> Self {
        AttestError::WitnessViolation {
            method: method.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for AttestError {
    fn from(err: serde_json::Error) -> Self {
        AttestError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AttestError>;

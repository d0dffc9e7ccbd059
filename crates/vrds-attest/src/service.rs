//! The attestation service contract.

use crate::attestation::Attestation;
use crate::key::VerificationKey;
use crate::program::Program;
use serde::Serialize;

/// Narrow interface to whatever engine produces and checks attestations.
///
/// `prove` is allowed to be slow. It must be deterministic in its inputs so
/// that a failed or abandoned call can simply be repeated.
pub trait AttestationService {
    /// Idempotent per program.
    fn compile<P: Program>(&self, program: &P) -> VerificationKey;

    /// Execute `call` and attest to its output. Program errors pass through
    /// unchanged and no attestation is produced.
    fn prove<P: Program>(
        &self,
        program: &P,
        public_input: P::Input,
        call: P::Call,
    ) -> Result<Attestation<P::Input, P::Output>, P::Error>;

    fn verify<I: Serialize, O: Serialize>(&self, attestation: &Attestation<I, O>, key: &VerificationKey) -> bool;
}

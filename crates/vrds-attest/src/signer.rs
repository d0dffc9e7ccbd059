//! In-process attester backed by an Ed25519 key.
//!
//! The attester runs the claimed computation itself and signs the resulting
//! `(program, method, input, output)` digest. Anyone holding the matching
//! [`VerificationKey`] can check the result without re-running anything.
//! This is a transparent attester: witnesses are not hidden from it.

use crate::attestation::{Attestation, Seal};
use crate::key::{ServiceConfig, ServiceConfigBuilder, VerificationKey};
use crate::program::{ProgramDescriptor, Program, ProofContext};
use crate::service::AttestationService;
use ed25519_dalek::{Signature, Signer, SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use serde::Serialize;
use tracing::{debug, info, warn};

pub struct SigningAttester {
    signing_key: SigningKey,
    config: ServiceConfig,
}

impl SigningAttester {
    pub fn new(config: ServiceConfig) -> Self {
        let signing_key = match config.seed {
            Some(seed) => SigningKey::from_bytes(&seed),
            None => SigningKey::generate(&mut OsRng),
        };
        SigningAttester { signing_key, config }
    }

    /// Deterministic attester, mostly for tests and reproducible runs.
    pub fn from_seed(seed: [u8; 32]) -> Self {
        Self::new(ServiceConfigBuilder::new().seed(seed).build())
    }

    pub fn verifying_key(&self) -> VerifyingKey {
        self.signing_key.verifying_key()
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    fn key_for(&self, descriptor: &ProgramDescriptor) -> VerificationKey {
        let program = descriptor.fingerprint();
        self.config.key_cache.get_or_insert_with(program, || {
            debug!(attester = %self.config.label, program = %descriptor.name, "compiled program");
            VerificationKey::new(program, self.verifying_key().to_bytes())
        })
    }
}

impl Default for SigningAttester {
    fn default() -> Self {
        Self::new(ServiceConfigBuilder::new().build())
    }
}

impl AttestationService for SigningAttester {
    fn compile<P: Program>(&self, program: &P) -> VerificationKey {
        self.key_for(&program.descriptor())
    }

    fn prove<P: Program>(
        &self,
        program: &P,
        public_input: P::Input,
        call: P::Call,
    ) -> Result<Attestation<P::Input, P::Output>, P::Error> {
        let descriptor = program.descriptor();
        let key = self.key_for(&descriptor);
        let method = P::method(&call);

        let ctx = ProofContext::new(self, key);
        let output = program.execute(&public_input, call, &ctx)?;

        let unsealed = Attestation::from_parts(key.program(), method, public_input, output, Seal::default());
        let digest = unsealed.digest().map_err(P::Error::from)?;
        let signature = self.signing_key.sign(&digest);

        info!(
            attester = %self.config.label,
            program = %descriptor.name,
            method,
            "attested"
        );
        Ok(unsealed.with_seal(Seal::from_bytes(signature.to_bytes().to_vec())))
    }

    fn verify<I: Serialize, O: Serialize>(&self, attestation: &Attestation<I, O>, key: &VerificationKey) -> bool {
        if attestation.program() != key.program() {
            warn!(
                expected = %key.program().short(),
                found = %attestation.program().short(),
                "attestation belongs to another program"
            );
            return false;
        }
        let Ok(attester) = VerifyingKey::from_bytes(key.attester()) else {
            return false;
        };
        let Ok(signature) = Signature::from_slice(attestation.seal().as_bytes()) else {
            return false;
        };
        let digest = match attestation.digest() {
            Ok(digest) => digest,
            Err(e) => {
                warn!(error = %e, "attestation digest failed");
                return false;
            }
        };
        attester.verify_strict(&digest, &signature).is_ok()
    }
}

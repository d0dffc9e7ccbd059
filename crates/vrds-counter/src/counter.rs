//! Driving the counter program against an attestation service.

use crate::error::{CounterError, Result};
use crate::program::{CounterAttestation, CounterCall, CounterProgram, ValidCounter};
use crate::replicas::ReplicaSet;
use ed25519_dalek::{Signer, SigningKey};
use tracing::{debug, info_span};
use vrds_attest::{AttestationService, VerificationKey, Verified};

/// A G-Counter whose replicas may only increment their own slot, only with
/// their own signature, and only while the current sum is divisible by their
/// 1-based index.
pub struct GatedCounter<'a, S: AttestationService> {
    service: &'a S,
    program: CounterProgram,
    key: VerificationKey,
}

impl<'a, S: AttestationService> GatedCounter<'a, S> {
    pub fn new(service: &'a S, replicas: ReplicaSet) -> Self {
        let program = CounterProgram::new(replicas);
        let key = service.compile(&program);
        GatedCounter { service, program, key }
    }

    pub fn replicas(&self) -> &ReplicaSet {
        self.program.replicas()
    }

    pub fn key(&self) -> &VerificationKey {
        &self.key
    }

    pub fn verify(&self, attestation: CounterAttestation) -> Result<ValidCounter> {
        Ok(Verified::new(attestation, &self.key, self.service)?)
    }

    /// All slots zero.
    pub fn initial(&self) -> Result<CounterAttestation> {
        self.service.prove(&self.program, (), CounterCall::Initial)
    }

    /// Raise slot `replica - 1` by one, signed with `signing_key`.
    ///
    /// The old attestation is checked inside the program; a forged one fails
    /// with a verification error before any gate is evaluated.
    pub fn increment(
        &self,
        old: &CounterAttestation,
        replica: usize,
        signing_key: &SigningKey,
    ) -> Result<CounterAttestation> {
        if !self.replicas().contains(replica) {
            return Err(CounterError::UnknownReplica {
                replica,
                count: self.replicas().len(),
            });
        }

        let span = info_span!("increment", replica, sum = old.claimed_output().sum());
        let _guard = span.enter();

        let new = old.claimed_output().incremented(replica - 1);
        let signature = signing_key.sign(&new.signing_bytes());
        let attestation = self.service.prove(
            &self.program,
            (),
            CounterCall::Increment {
                old: old.clone(),
                new,
                signature,
            },
        )?;

        debug!(state = %attestation.claimed_output(), "incremented");
        Ok(attestation)
    }

    /// Pointwise maximum of two attested states.
    pub fn merge(&self, left: &CounterAttestation, right: &CounterAttestation) -> Result<CounterAttestation> {
        let attestation = self.service.prove(
            &self.program,
            (),
            CounterCall::Merge {
                left: left.clone(),
                right: right.clone(),
            },
        )?;
        debug!(state = %attestation.claimed_output(), "merged");
        Ok(attestation)
    }

    /// Sum of a verified state.
    pub fn value(&self, attestation: &CounterAttestation) -> Result<u64> {
        Ok(self.verify(attestation.clone())?.output().sum())
    }
}

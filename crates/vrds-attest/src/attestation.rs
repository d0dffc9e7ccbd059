//! Attestations and the sealed [`Verified`] capability.

use crate::error::{AttestError, Result};
use crate::key::VerificationKey;
use crate::program::Fingerprint;
use crate::service::AttestationService;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

const SEAL_DOMAIN: &[u8] = b"vrds/attestation/v1";

/// Opaque bytes produced by the attester over an attestation's digest.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seal(#[serde(with = "hex::serde")] Vec<u8>);

impl Seal {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Seal(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// A certificate that `method` of `program` produced `public_output` from
/// `public_input`.
///
/// The output is only a *claim* until checked; [`Verified`] is the checked form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attestation<I, O> {
    program: Fingerprint,
    method: String,
    public_input: I,
    public_output: O,
    seal: Seal,
}

impl<I, O> Attestation<I, O> {
    pub fn from_parts(
        program: Fingerprint,
        method: impl Into<String>,
        public_input: I,
        public_output: O,
        seal: Seal,
    ) -> Self {
        Attestation {
            program,
            method: method.into(),
            public_input,
            public_output,
            seal,
        }
    }

    pub fn program(&self) -> Fingerprint {
        self.program
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn public_input(&self) -> &I {
        &self.public_input
    }

    /// The output as claimed by whoever handed over this attestation.
    pub fn claimed_output(&self) -> &O {
        &self.public_output
    }

    pub fn seal(&self) -> &Seal {
        &self.seal
    }

    pub fn with_seal(mut self, seal: Seal) -> Self {
        self.seal = seal;
        self
    }
}

impl<I: Serialize, O: Serialize> Attestation<I, O> {
    /// The message the seal is computed over. Independent of the seal itself.
    pub fn digest(&self) -> Result<[u8; 32]> {
        let input = serde_json::to_vec(&self.public_input)?;
        let output = serde_json::to_vec(&self.public_output)?;

        let mut hasher = Sha256::new();
        hasher.update(SEAL_DOMAIN);
        hasher.update(self.program.as_bytes());
        hasher.update((self.method.len() as u64).to_le_bytes());
        hasher.update(self.method.as_bytes());
        hasher.update((input.len() as u64).to_le_bytes());
        hasher.update(&input);
        hasher.update((output.len() as u64).to_le_bytes());
        hasher.update(&output);

        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&hasher.finalize());
        Ok(bytes)
    }

    /// Serialize into the blob that is persisted next to the attested value.
    pub fn to_blob(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }
}

impl<I: DeserializeOwned, O: DeserializeOwned> Attestation<I, O> {
    pub fn from_blob(blob: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(blob)?)
    }
}

/// An attestation that has passed [`AttestationService::verify`].
///
/// There is no other way to build one: downstream code that takes a
/// `Verified` never sees unchecked state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Verified<I, O> {
    attestation: Attestation<I, O>,
}

impl<I: Serialize, O: Serialize> Verified<I, O> {
    pub fn new<S: AttestationService>(
        attestation: Attestation<I, O>,
        key: &VerificationKey,
        service: &S,
    ) -> Result<Self> {
        if service.verify(&attestation, key) {
            Ok(Verified { attestation })
        } else {
            tracing::warn!(
                program = %attestation.program.short(),
                method = %attestation.method,
                "rejected attestation"
            );
            Err(AttestError::VerificationFailure {
                program: attestation.program.short(),
                method: attestation.method,
            })
        }
    }
}

impl<I, O> Verified<I, O> {
    pub fn output(&self) -> &O {
        &self.attestation.public_output
    }

    pub fn public_input(&self) -> &I {
        &self.attestation.public_input
    }

    pub fn attestation(&self) -> &Attestation<I, O> {
        &self.attestation
    }

    pub fn into_attestation(self) -> Attestation<I, O> {
        self.attestation
    }
}

//! Claimed computations.
//!
//! A [`Program`] is the unit the attestation service compiles and proves. It
//! declares its public input/output types, a call type carrying the method
//! selector plus private witnesses, and an `execute` that either produces the
//! public output or rejects the witnesses.

use crate::attestation::{Attestation, Verified};
use crate::error::AttestError;
use crate::key::VerificationKey;
use crate::service::AttestationService;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Digest identifying a compiled program, including its parameters.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Fingerprint(#[serde(with = "hex::serde")] [u8; 32]);

impl Fingerprint {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn short(&self) -> String {
        hex::encode(&self.0[..5])
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({}...)", self.short())
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

/// Everything that determines a program's identity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProgramDescriptor {
    pub name: String,
    pub methods: Vec<&'static str>,
    /// Instance parameters, e.g. the replica key list of a counter.
    pub parameters: Vec<u8>,
}

impl ProgramDescriptor {
    pub fn new(name: impl Into<String>, methods: &[&'static str]) -> Self {
        ProgramDescriptor {
            name: name.into(),
            methods: methods.to_vec(),
            parameters: Vec::new(),
        }
    }

    pub fn with_parameters(mut self, parameters: Vec<u8>) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn fingerprint(&self) -> Fingerprint {
        let mut hasher = Sha256::new();
        hasher.update(self.name.as_bytes());
        hasher.update([0u8]);
        for method in &self.methods {
            hasher.update(method.as_bytes());
            hasher.update([0u8]);
        }
        hasher.update((self.parameters.len() as u64).to_le_bytes());
        hasher.update(&self.parameters);
        let digest = hasher.finalize();
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&digest);
        Fingerprint(bytes)
    }
}

pub trait Program {
    type Input: Clone + fmt::Debug + Serialize + DeserializeOwned;
    type Output: Clone + fmt::Debug + Serialize + DeserializeOwned;
    /// Method selector together with its private witnesses.
    type Call;
    type Error: From<AttestError>;

    fn descriptor(&self) -> ProgramDescriptor;

    /// Name of the method a call targets; bound into the attestation.
    fn method(call: &Self::Call) -> &'static str;

    /// Run the computation. Any error means no attestation is produced.
    fn execute<S: AttestationService>(
        &self,
        input: &Self::Input,
        call: Self::Call,
        ctx: &ProofContext<'_, S>,
    ) -> Result<Self::Output, Self::Error>;
}

/// Handed to [`Program::execute`] so a method can check attestations of the
/// same program (recursive composition).
pub struct ProofContext<'a, S: AttestationService> {
    service: &'a S,
    key: VerificationKey,
}

impl<'a, S: AttestationService> ProofContext<'a, S> {
    pub fn new(service: &'a S, key: VerificationKey) -> Self {
        ProofContext { service, key }
    }

    pub fn key(&self) -> &VerificationKey {
        &self.key
    }

    /// Verify an attestation under the key of the program being proved.
    pub fn verify_recursive<I, O>(&self, attestation: &Attestation<I, O>) -> Result<Verified<I, O>, AttestError>
    where
        I: Clone + Serialize,
        O: Clone + Serialize,
    {
        Verified::new(attestation.clone(), &self.key, self.service)
    }
}

//! # vrds-attest
//!
//! The boundary between verifiable data structures and the engine that
//! vouches for their transitions.
//!
//! - [`AttestationService`]: compile / prove / verify
//! - [`Program`]: a claimed computation with typed input, output and witnesses
//! - [`Attestation`]: the certificate a successful `prove` returns
//! - [`Verified`]: an attestation that passed `verify`, the only form in
//!   which attested state may be used by later computations
//! - [`SigningAttester`]: an in-process Ed25519-backed service
//!
//! ## Example
//!
//! ```rust
//! use vrds_attest::{prove_preimage, AttestationService, PreimageProgram, SigningAttester, Verified};
//! use vrds_core::{hash, Element};
//!
//! let attester = SigningAttester::from_seed([7u8; 32]);
//! let key = attester.compile(&PreimageProgram);
//!
//! let input = [Element::from_u64(1), Element::from_u64(2)];
//! let attestation = prove_preimage(&attester, &input).unwrap();
//!
//! let verified = Verified::new(attestation, &key, &attester).unwrap();
//! assert_eq!(verified.output().finalize(), hash(&input));
//! ```

mod attestation;
mod error;
mod key;
mod preimage;
mod program;
mod service;
mod signer;

pub use attestation::{Attestation, Seal, Verified};
pub use error::{AttestError, Result};
pub use key::{KeyCache, ServiceConfig, ServiceConfigBuilder, VerificationKey};
pub use preimage::{prove_preimage, PreimageAttestation, PreimageCall, PreimageProgram};
pub use program::{Fingerprint, Program, ProgramDescriptor, ProofContext};
pub use service::AttestationService;
pub use signer::SigningAttester;

//! Integration tests for the signing attester.
//!
//! Tests cover:
//! - prove / verify round trip and the sealed `Verified` wrapper
//! - tampered, foreign-program and foreign-attester attestations
//! - witness rejection, determinism, blob persistence
//! - recursive preimage proving

use proptest::prelude::*;
use serde_json::Value;
use vrds_attest::{
    prove_preimage, AttestError, Attestation, AttestationService, PreimageProgram, Program,
    ProgramDescriptor, ProofContext, SigningAttester, Verified,
};
use vrds_core::{hash, Element};

/// Attests that the public input is the square of a private witness.
struct SquareProgram;

impl Program for SquareProgram {
    type Input = u64;
    type Output = bool;
    type Call = u64;
    type Error = AttestError;

    fn descriptor(&self) -> ProgramDescriptor {
        ProgramDescriptor::new("test/square", &["check"])
    }

    fn method(_call: &u64) -> &'static str {
        "check"
    }

    fn execute<S: AttestationService>(
        &self,
        input: &u64,
        root: u64,
        _ctx: &ProofContext<'_, S>,
    ) -> Result<bool, AttestError> {
        if root.checked_mul(root) == Some(*input) {
            Ok(true)
        } else {
            Err(AttestError::witness("check", format!("{} is not a root of {}", root, input)))
        }
    }
}

fn attester() -> SigningAttester {
    SigningAttester::from_seed([3u8; 32])
}

#[test]
fn test_prove_and_verify() {
    let attester = attester();
    let key = attester.compile(&SquareProgram);

    let attestation = attester.prove(&SquareProgram, 49, 7).unwrap();
    assert!(attester.verify(&attestation, &key));

    let verified = Verified::new(attestation, &key, &attester).unwrap();
    assert_eq!(*verified.public_input(), 49);
    assert!(*verified.output());
}

#[test]
fn test_witness_violation_produces_nothing() {
    let attester = attester();
    let err = attester.prove(&SquareProgram, 50, 7).unwrap_err();
    assert!(matches!(err, AttestError::WitnessViolation { ref method, .. } if method == "check"));
}

#[test]
fn test_tampered_public_input_fails() {
    let attester = attester();
    let key = attester.compile(&SquareProgram);
    let attestation = attester.prove(&SquareProgram, 16, 4).unwrap();

    let mut json: Value = serde_json::to_value(&attestation).unwrap();
    json["public_input"] = Value::from(17u64);
    let forged: Attestation<u64, bool> = serde_json::from_value(json).unwrap();

    assert!(!attester.verify(&forged, &key));
    assert!(matches!(
        Verified::new(forged, &key, &attester),
        Err(AttestError::VerificationFailure { .. })
    ));
}

#[test]
fn test_key_of_other_program_rejects() {
    let attester = attester();
    let square = attester.prove(&SquareProgram, 9, 3).unwrap();
    let preimage_key = attester.compile(&PreimageProgram);
    assert!(!attester.verify(&square, &preimage_key));
}

#[test]
fn test_other_attester_rejects() {
    let honest = attester();
    let other = SigningAttester::from_seed([4u8; 32]);

    let attestation = other.prove(&SquareProgram, 4, 2).unwrap();
    let key = honest.compile(&SquareProgram);
    assert!(!honest.verify(&attestation, &key));
}

#[test]
fn test_proving_is_deterministic() {
    let attester = attester();
    let a = attester.prove(&SquareProgram, 25, 5).unwrap();
    let b = attester.prove(&SquareProgram, 25, 5).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_compile_is_cached() {
    let attester = attester();
    let k1 = attester.compile(&SquareProgram);
    let k2 = attester.compile(&SquareProgram);
    assert_eq!(k1, k2);
    assert_eq!(attester.config().key_cache.len(), 1);

    attester.compile(&PreimageProgram);
    assert_eq!(attester.config().key_cache.len(), 2);
}

#[test]
fn test_blob_roundtrip_still_verifies() {
    let attester = attester();
    let key = attester.compile(&SquareProgram);
    let attestation = attester.prove(&SquareProgram, 36, 6).unwrap();

    let blob = attestation.to_blob().unwrap();
    let restored: Attestation<u64, bool> = Attestation::from_blob(&blob).unwrap();
    assert_eq!(restored, attestation);
    assert!(attester.verify(&restored, &key));
}

#[test]
fn test_malformed_blob() {
    let err = Attestation::<u64, bool>::from_blob(b"{not json").unwrap_err();
    assert!(matches!(err, AttestError::Serialization(_)));
}

#[test]
fn test_preimage_chain_matches_hash() {
    let attester = attester();
    let key = attester.compile(&PreimageProgram);

    for n in 0..6u64 {
        let input: Vec<Element> = (0..n).map(|i| Element::from_u64(i * i)).collect();
        let attestation = prove_preimage(&attester, &input).unwrap();
        let verified = Verified::new(attestation, &key, &attester).unwrap();
        assert_eq!(verified.output().finalize(), hash(&input), "length {}", n);
    }
}

#[test]
fn test_preimage_rejects_forged_previous_step() {
    use vrds_attest::PreimageCall;

    let honest = attester();
    let forger = SigningAttester::from_seed([5u8; 32]);

    let forged = prove_preimage(&forger, &[Element::from_u64(1)]).unwrap();
    let err = honest
        .prove(
            &PreimageProgram,
            (),
            PreimageCall::Update {
                previous: forged,
                value: Element::from_u64(2),
            },
        )
        .unwrap_err();
    assert!(matches!(err, AttestError::VerificationFailure { .. }));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn preimage_chain_finalizes_to_hash(bytes in prop::collection::vec(any::<[u8; 32]>(), 0..12)) {
        let attester = attester();
        let key = attester.compile(&PreimageProgram);
        let input: Vec<Element> = bytes.into_iter().map(Element::from_bytes).collect();

        let attestation = prove_preimage(&attester, &input).unwrap();
        prop_assert_eq!(attestation.public_input(), &());
        let verified = Verified::new(attestation, &key, &attester).unwrap();
        prop_assert_eq!(verified.output().finalize(), hash(&input));
    }
}

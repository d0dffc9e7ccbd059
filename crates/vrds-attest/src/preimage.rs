//! Attested knowledge of a hash preimage of any length.
//!
//! Each `update` step checks the previous step's attestation and absorbs one
//! more element, so the final attestation's state finalizes to
//! `hash(input)` while the input itself never appears in any public output.

use crate::attestation::Attestation;
use crate::error::{AttestError, Result};
use crate::program::{Program, ProgramDescriptor, ProofContext};
use crate::service::AttestationService;
use vrds_core::{Element, HashState};

pub type PreimageAttestation = Attestation<(), HashState>;

#[derive(Clone, Copy, Debug, Default)]
pub struct PreimageProgram;

pub enum PreimageCall {
    InitialState,
    Update {
        previous: PreimageAttestation,
        value: Element,
    },
}

impl Program for PreimageProgram {
    type Input = ();
    type Output = HashState;
    type Call = PreimageCall;
    type Error = AttestError;

    fn descriptor(&self) -> ProgramDescriptor {
        ProgramDescriptor::new("vrds/preimage", &["initial_state", "update"])
    }

    fn method(call: &PreimageCall) -> &'static str {
        match call {
            PreimageCall::InitialState => "initial_state",
            PreimageCall::Update { .. } => "update",
        }
    }

    fn execute<S: AttestationService>(
        &self,
        _input: &(),
        call: PreimageCall,
        ctx: &ProofContext<'_, S>,
    ) -> Result<HashState> {
        match call {
            PreimageCall::InitialState => Ok(HashState::initial()),
            PreimageCall::Update { previous, value } => {
                let previous = ctx.verify_recursive(&previous)?;
                Ok(previous.output().update(value))
            }
        }
    }
}

/// Fold `input` through the program one element per attestation.
pub fn prove_preimage<S: AttestationService>(service: &S, input: &[Element]) -> Result<PreimageAttestation> {
    let program = PreimageProgram;
    let mut state = service.prove(&program, (), PreimageCall::InitialState)?;
    for value in input {
        state = service.prove(
            &program,
            (),
            PreimageCall::Update {
                previous: state,
                value: *value,
            },
        )?;
    }
    Ok(state)
}

//! The DAG program and the prover that drives it.

use crate::error::{DagError, Result};
use crate::fold::DagInnerState;
use crate::update::{group_id_for, next_depth, Update};
use serde::{Deserialize, Serialize};
use tracing::{debug, info_span};
use vrds_attest::{
    Attestation, AttestationService, Program, ProgramDescriptor, ProofContext, VerificationKey, Verified,
};
use vrds_core::Element;

pub type DagAttestation = Attestation<(), DagInnerState>;

/// A DAG state whose attestation has been checked.
pub type ValidDag = Verified<(), DagInnerState>;

#[derive(Clone, Copy, Debug, Default)]
pub struct DagProgram;

pub enum DagCall {
    Base {
        group_id: Element,
        content: Element,
        depth: u64,
        predecessor_count: u64,
    },
    Next {
        current: DagAttestation,
        predecessor: DagAttestation,
    },
}

impl Program for DagProgram {
    type Input = ();
    type Output = DagInnerState;
    type Call = DagCall;
    type Error = DagError;

    fn descriptor(&self) -> ProgramDescriptor {
        ProgramDescriptor::new("vrds/dag", &["base", "next"])
    }

    fn method(call: &DagCall) -> &'static str {
        match call {
            DagCall::Base { .. } => "base",
            DagCall::Next { .. } => "next",
        }
    }

    fn execute<S: AttestationService>(
        &self,
        _input: &(),
        call: DagCall,
        ctx: &ProofContext<'_, S>,
    ) -> Result<DagInnerState> {
        match call {
            DagCall::Base {
                group_id,
                content,
                depth,
                predecessor_count,
            } => DagInnerState::base(group_id, content, depth, predecessor_count),
            DagCall::Next { current, predecessor } => {
                let current = ctx.verify_recursive(&current)?;
                let predecessor = ctx
                    .verify_recursive(&predecessor)
                    .map_err(|_| DagError::UnverifiedPredecessor)?;
                current.output().next(predecessor.output())
            }
        }
    }
}

/// An update together with the attestation of its final fold state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttestedUpdate {
    pub update: Update,
    pub attestation: DagAttestation,
}

impl AttestedUpdate {
    pub fn id(&self) -> Element {
        self.update.id()
    }

    /// Check the attestation and that it is about this very update.
    pub fn verify<S: AttestationService>(&self, prover: &DagProver<'_, S>) -> Result<ValidDag> {
        let valid = prover.verify(self.attestation.clone())?;
        let attested = valid.output().id()?;
        let id = self.update.id();
        if attested != id {
            return Err(DagError::IdMismatch { update: id, attested });
        }
        Ok(valid)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Builds attested updates against one attestation service.
pub struct DagProver<'a, S: AttestationService> {
    service: &'a S,
    program: DagProgram,
    key: VerificationKey,
}

impl<'a, S: AttestationService> DagProver<'a, S> {
    pub fn new(service: &'a S) -> Self {
        let program = DagProgram;
        let key = service.compile(&program);
        DagProver { service, program, key }
    }

    pub fn key(&self) -> &VerificationKey {
        &self.key
    }

    pub fn verify(&self, attestation: DagAttestation) -> Result<ValidDag> {
        Ok(Verified::new(attestation, &self.key, self.service)?)
    }

    pub fn base(
        &self,
        group_id: Element,
        content: Element,
        depth: u64,
        predecessor_count: u64,
    ) -> Result<DagAttestation> {
        self.service.prove(
            &self.program,
            (),
            DagCall::Base {
                group_id,
                content,
                depth,
                predecessor_count,
            },
        )
    }

    pub fn next(&self, current: DagAttestation, predecessor: &DagAttestation) -> Result<DagAttestation> {
        self.service.prove(
            &self.program,
            (),
            DagCall::Next {
                current,
                predecessor: predecessor.clone(),
            },
        )
    }

    /// Attest a new update on top of `predecessors`, folded in the given order.
    pub fn prove_update(&self, content: Element, depth: u64, predecessors: &[ValidDag]) -> Result<AttestedUpdate> {
        let group_id = match predecessors.first() {
            None => group_id_for(content),
            Some(first) => first.output().group_id(),
        };

        let span = info_span!("prove_update", group = %group_id.short(), depth, arity = predecessors.len());
        let _guard = span.enter();

        let mut state = self.base(group_id, content, depth, predecessors.len() as u64)?;
        let mut predecessor_ids = Vec::with_capacity(predecessors.len());
        for predecessor in predecessors {
            predecessor_ids.push(predecessor.output().id()?);
            state = self.next(state, predecessor.attestation())?;
        }

        let update = Update::new(group_id, content, depth, predecessor_ids);
        let attested = state.claimed_output().id()?;
        if attested != update.id() {
            return Err(DagError::IdMismatch {
                update: update.id(),
                attested,
            });
        }

        debug!(id = %attested.short(), "update attested");
        Ok(AttestedUpdate {
            update,
            attestation: state,
        })
    }

    /// Like [`DagProver::prove_update`], with text content and the smallest valid depth.
    pub fn prove_text_update(&self, text: &str, predecessors: &[ValidDag]) -> Result<AttestedUpdate> {
        let content = Element::from_text(text)?;
        // Only finished folds carry a meaningful depth.
        for predecessor in predecessors {
            predecessor.output().id()?;
        }
        let depth = next_depth(predecessors.iter().map(|p| p.output().depth())).ok_or(
            DagError::DepthNotMonotonic {
                depth: u64::MAX,
                predecessor_depth: u64::MAX,
            },
        )?;
        self.prove_update(content, depth, predecessors)
    }
}

//! The counter program: `initial`, `increment` and `merge`.

use crate::error::{CounterError, Result};
use crate::replicas::ReplicaSet;
use crate::state::CounterState;
use ed25519_dalek::Signature;
use tracing::trace;
use vrds_attest::{AttestError, Attestation, AttestationService, Program, ProgramDescriptor, ProofContext, Verified};
use vrds_core::Lattice;

pub type CounterAttestation = Attestation<(), CounterState>;

/// A counter state whose attestation has been checked.
pub type ValidCounter = Verified<(), CounterState>;

#[derive(Clone, Debug)]
pub struct CounterProgram {
    replicas: ReplicaSet,
}

pub enum CounterCall {
    Initial,
    Increment {
        old: CounterAttestation,
        new: CounterState,
        signature: Signature,
    },
    Merge {
        left: CounterAttestation,
        right: CounterAttestation,
    },
}

impl CounterProgram {
    pub fn new(replicas: ReplicaSet) -> Self {
        CounterProgram { replicas }
    }

    pub fn replicas(&self) -> &ReplicaSet {
        &self.replicas
    }

    /// Every slot either stays put, or moves up by one with the owner's
    /// signature while the gate on the old sum is open.
    fn check_increment(&self, old: &CounterState, new: &CounterState, signature: &Signature) -> Result<()> {
        let count = self.replicas.len();
        if old.len() != count || new.len() != count {
            return Err(AttestError::witness(
                "increment",
                format!("expected {count} slots, got {} -> {}", old.len(), new.len()),
            )
            .into());
        }

        let sum = old.sum();
        let mut incremented = false;
        for slot in 0..count {
            let (before, after) = (old.get(slot), new.get(slot));
            if before == after {
                continue;
            }
            if before.checked_add(1) != Some(after) {
                return Err(AttestError::witness(
                    "increment",
                    format!("slot {slot} moved from {before} to {after}"),
                )
                .into());
            }

            let replica = slot + 1;
            if !self.replicas.verify(slot, new, signature) {
                return Err(CounterError::BadSignature { replica });
            }
            if sum % replica as u64 != 0 {
                return Err(CounterError::GateViolation { replica, sum });
            }
            trace!(replica, sum, "gate open");
            incremented = true;
        }

        if !incremented {
            return Err(AttestError::witness("increment", "no slot incremented").into());
        }
        Ok(())
    }
}

impl Program for CounterProgram {
    type Input = ();
    type Output = CounterState;
    type Call = CounterCall;
    type Error = CounterError;

    fn descriptor(&self) -> ProgramDescriptor {
        ProgramDescriptor::new("vrds/counter", &["initial", "increment", "merge"])
            .with_parameters(self.replicas.parameters())
    }

    fn method(call: &CounterCall) -> &'static str {
        match call {
            CounterCall::Initial => "initial",
            CounterCall::Increment { .. } => "increment",
            CounterCall::Merge { .. } => "merge",
        }
    }

    fn execute<S: AttestationService>(
        &self,
        _input: &(),
        call: CounterCall,
        ctx: &ProofContext<'_, S>,
    ) -> Result<CounterState> {
        match call {
            CounterCall::Initial => Ok(CounterState::zeros(self.replicas.len())),
            CounterCall::Increment { old, new, signature } => {
                let old = ctx.verify_recursive(&old)?;
                self.check_increment(old.output(), &new, &signature)?;
                Ok(new)
            }
            CounterCall::Merge { left, right } => {
                let left = ctx.verify_recursive(&left)?;
                let right = ctx.verify_recursive(&right)?;
                Ok(left.output().join(right.output()))
            }
        }
    }
}

//! The predecessor fold.
//!
//! An update with `n` predecessors is attested in `n + 1` steps: `base`
//! commits to the update's own fields and declared predecessor count, then
//! each `next` folds one predecessor in. `id` is only defined once every
//! declared predecessor has been folded and at least one of them justified
//! the claimed depth.

use crate::error::{DagError, Result};
use crate::update::group_id_for;
use serde::{Deserialize, Serialize};
use tracing::trace;
use vrds_core::{Element, HashState};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DagInnerState {
    hash_state: HashState,
    group_id: Element,
    depth: u64,
    found_depth: bool,
    remaining_predecessors: u64,
}

impl DagInnerState {
    pub fn base(group_id: Element, content: Element, depth: u64, predecessor_count: u64) -> Result<Self> {
        let is_root = predecessor_count == 0;
        if is_root && (depth != 0 || group_id != group_id_for(content)) {
            return Err(DagError::InvalidRoot { depth });
        }

        let hash_state = HashState::initial()
            .update(group_id)
            .update(content)
            .update(Element::from_u64(depth))
            .update(Element::from_u64(predecessor_count));

        Ok(DagInnerState {
            hash_state,
            group_id,
            depth,
            found_depth: is_root,
            remaining_predecessors: predecessor_count,
        })
    }

    /// Fold one predecessor. `predecessor` must itself be a finished fold.
    pub fn next(&self, predecessor: &DagInnerState) -> Result<Self> {
        if self.depth <= predecessor.depth {
            return Err(DagError::DepthNotMonotonic {
                depth: self.depth,
                predecessor_depth: predecessor.depth,
            });
        }
        if self.group_id != predecessor.group_id {
            return Err(DagError::GroupMismatch {
                expected: self.group_id,
                found: predecessor.group_id,
            });
        }
        if self.remaining_predecessors == 0 {
            return Err(DagError::PredecessorCountExceeded);
        }

        let predecessor_id = predecessor.id()?;
        trace!(predecessor = %predecessor_id.short(), remaining = self.remaining_predecessors, "fold");

        Ok(DagInnerState {
            hash_state: self.hash_state.update(predecessor_id),
            found_depth: self.found_depth || self.depth == predecessor.depth + 1,
            remaining_predecessors: self.remaining_predecessors - 1,
            ..*self
        })
    }

    pub fn id(&self) -> Result<Element> {
        if self.remaining_predecessors != 0 {
            return Err(DagError::TooFewPredecessors {
                remaining: self.remaining_predecessors,
            });
        }
        if !self.found_depth {
            return Err(DagError::DepthTooHigh { depth: self.depth });
        }
        Ok(self.hash_state.finalize())
    }

    pub fn group_id(&self) -> Element {
        self.group_id
    }

    pub fn depth(&self) -> u64 {
        self.depth
    }

    pub fn remaining_predecessors(&self) -> u64 {
        self.remaining_predecessors
    }

    pub fn found_depth(&self) -> bool {
        self.found_depth
    }
}

//! Storage for attested updates.
//!
//! Updates are indexed by id. A stored update always carried a valid
//! attestation and all of its predecessors were present when it was put, so
//! the history behind every head is complete and attested.

use crate::error::{DagError, Result};
use crate::program::{AttestedUpdate, DagProver, ValidDag};
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::debug;
use vrds_attest::AttestationService;
use vrds_core::Element;

/// Read access to a store of attested updates.
pub trait UpdateStore {
    /// The stored update with this id.
    fn get(&self, id: &Element) -> Option<&AttestedUpdate>;

    /// Whether an update with this id is stored.
    fn contains(&self, id: &Element) -> bool;

    /// Updates no other stored update names as predecessor.
    fn heads(&self) -> Vec<Element>;

    /// Stored updates naming `id` as a predecessor.
    fn children(&self, id: &Element) -> Vec<Element>;

    /// Transitive predecessors of `id`, excluding `id` itself.
    fn ancestors(&self, id: &Element) -> HashSet<Element>;

    /// Predecessors before successors.
    fn topological_order(&self) -> Vec<Element>;

    /// Number of stored updates.
    fn len(&self) -> usize;

    /// Whether nothing is stored.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Summary of a store's shape.
#[derive(Clone, Debug, PartialEq)]
pub struct StoreStats {
    pub total_updates: usize,
    pub head_count: usize,
    pub group_count: usize,
    pub max_depth: u64,
    pub avg_arity: f64,
}

/// In-memory [`UpdateStore`] keyed by update id.
#[derive(Clone, Debug, Default)]
pub struct MemoryUpdateStore {
    updates: HashMap<Element, AttestedUpdate>,
    heads: HashSet<Element>,
    children_index: HashMap<Element, HashSet<Element>>,
}

impl MemoryUpdateStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Verify and insert an update. Re-inserting a stored update is a no-op.
    pub fn put<S: AttestationService>(&mut self, record: AttestedUpdate, prover: &DagProver<'_, S>) -> Result<Element> {
        record.verify(prover)?;
        let id = record.id();

        if self.updates.contains_key(&id) {
            return Ok(id);
        }

        let missing: Vec<Element> = record
            .update
            .predecessors
            .iter()
            .filter(|p| !self.updates.contains_key(p))
            .copied()
            .collect();
        if !missing.is_empty() {
            return Err(DagError::MissingPredecessors(missing));
        }

        self.heads.insert(id);
        for predecessor in &record.update.predecessors {
            self.heads.remove(predecessor);
            self.children_index.entry(*predecessor).or_default().insert(id);
        }

        debug!(id = %id.short(), depth = record.update.depth, "stored update");
        self.updates.insert(id, record);
        Ok(id)
    }

    /// Re-check the current heads so they can be used as predecessors.
    /// Heads come back sorted by id.
    pub fn verified_heads<S: AttestationService>(&self, prover: &DagProver<'_, S>) -> Result<Vec<ValidDag>> {
        let mut heads = self.heads();
        heads.sort();
        heads
            .iter()
            .filter_map(|id| self.updates.get(id))
            .map(|record| record.verify(prover))
            .collect()
    }

    /// Shape of the stored history.
    pub fn stats(&self) -> StoreStats {
        let groups: HashSet<Element> = self.updates.values().map(|r| r.update.group_id).collect();
        let max_depth = self.updates.values().map(|r| r.update.depth).max().unwrap_or(0);
        let non_roots: Vec<usize> = self
            .updates
            .values()
            .map(|r| r.update.predecessors.len())
            .filter(|n| *n > 0)
            .collect();
        let avg_arity = if non_roots.is_empty() {
            0.0
        } else {
            non_roots.iter().sum::<usize>() as f64 / non_roots.len() as f64
        };

        StoreStats {
            total_updates: self.updates.len(),
            head_count: self.heads.len(),
            group_count: groups.len(),
            max_depth,
            avg_arity,
        }
    }
}

impl UpdateStore for MemoryUpdateStore {
    fn get(&self, id: &Element) -> Option<&AttestedUpdate> {
        self.updates.get(id)
    }

    fn contains(&self, id: &Element) -> bool {
        self.updates.contains_key(id)
    }

    fn heads(&self) -> Vec<Element> {
        self.heads.iter().copied().collect()
    }

    fn children(&self, id: &Element) -> Vec<Element> {
        self.children_index
            .get(id)
            .map(|c| c.iter().copied().collect())
            .unwrap_or_default()
    }

    fn ancestors(&self, id: &Element) -> HashSet<Element> {
        let mut seen = HashSet::new();
        let mut queue: VecDeque<Element> = VecDeque::new();

        if let Some(record) = self.updates.get(id) {
            queue.extend(record.update.predecessors.iter().copied());
        }
        while let Some(current) = queue.pop_front() {
            if !seen.insert(current) {
                continue;
            }
            if let Some(record) = self.updates.get(&current) {
                queue.extend(record.update.predecessors.iter().copied());
            }
        }
        seen
    }

    fn topological_order(&self) -> Vec<Element> {
        // Kahn's algorithm; ties broken by id so the order is reproducible.
        let mut in_degree: HashMap<Element, usize> = self
            .updates
            .iter()
            .map(|(id, r)| (*id, r.update.predecessors.len()))
            .collect();

        let mut ready: Vec<Element> = in_degree
            .iter()
            .filter(|(_, d)| **d == 0)
            .map(|(id, _)| *id)
            .collect();
        ready.sort();
        let mut queue: VecDeque<Element> = ready.into();
        let mut order = Vec::with_capacity(self.updates.len());

        while let Some(id) = queue.pop_front() {
            order.push(id);
            let mut unlocked = Vec::new();
            for child in self.children(&id) {
                let Some(record) = self.updates.get(&child) else {
                    continue;
                };
                // A predecessor listed twice still counts twice.
                let times = record.update.predecessors.iter().filter(|p| **p == id).count();
                if let Some(d) = in_degree.get_mut(&child) {
                    *d = d.saturating_sub(times);
                    if *d == 0 {
                        unlocked.push(child);
                    }
                }
            }
            unlocked.sort();
            queue.extend(unlocked);
        }
        order
    }

    fn len(&self) -> usize {
        self.updates.len()
    }
}

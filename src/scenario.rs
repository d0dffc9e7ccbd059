//! Concurrent scenarios over the attested DAG and the gated counter.
//!
//! Proving is CPU-bound, so independent branches run on the blocking pool
//! and are joined before anything depends on them.

use crate::error::{Result, ScenarioError};
use async_stream::stream;
use futures::future::join_all;
use futures::stream::{Stream, StreamExt};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};
use vrds_attest::SigningAttester;
use vrds_core::Lattice;
use vrds_counter::{CounterAttestation, CounterError, CounterState, GatedCounter, ReplicaSet};
use vrds_dag::{AttestedUpdate, DagProver, MemoryUpdateStore, UpdateStore};

/// Statistics collected while running a scenario
#[derive(Clone, Debug)]
pub struct ScenarioStats {
    pub scenario: &'static str,
    pub participants: usize,
    pub attestations: usize,
    pub rejected: usize,
    pub total_time: Duration,
    pub avg_step_time: Duration,
}

impl ScenarioStats {
    pub fn report(&self) {
        info!(
            scenario = self.scenario,
            participants = self.participants,
            attestations = self.attestations,
            rejected = self.rejected,
            total_secs = %format!("{:.3}", self.total_time.as_secs_f64()),
            avg_step_us = self.avg_step_time.as_micros() as u64,
            "scenario finished"
        );
    }
}

fn average(times: &[Duration]) -> Duration {
    if times.is_empty() {
        Duration::ZERO
    } else {
        times.iter().sum::<Duration>() / times.len() as u32
    }
}

/// Generator that yields replica index pairs for sync rounds
fn replica_pair_generator(replicas: usize, rounds: usize) -> impl Stream<Item = (usize, usize)> {
    stream! {
        let mut rng = StdRng::from_entropy();
        for _ in 0..rounds {
            let a = rng.gen_range(0..replicas);
            let b = rng.gen_range(0..replicas);
            yield (a, b);
        }
    }
}

/// A root, `branches` concurrent children of it, and one update combining
/// every child. Ends with a single head.
pub async fn dag_branches(attester: Arc<SigningAttester>, branches: usize) -> Result<ScenarioStats> {
    info!(branches, "DAG scenario: root, concurrent branches, combining update");
    let start = Instant::now();
    let prover = DagProver::new(attester.as_ref());
    let mut store = MemoryUpdateStore::new();
    let mut step_times = Vec::with_capacity(branches + 2);

    let started = Instant::now();
    let root = prover.prove_text_update("root", &[])?;
    step_times.push(started.elapsed());
    store.put(root.clone(), &prover)?;
    let root_valid = root.verify(&prover)?;

    let handles = (0..branches).map(|i| {
        let attester = Arc::clone(&attester);
        let root_valid = root_valid.clone();
        tokio::task::spawn_blocking(move || {
            let started = Instant::now();
            DagProver::new(attester.as_ref())
                .prove_text_update(&format!("branch {i}"), &[root_valid])
                .map(|update| (update, started.elapsed()))
        })
    });
    for joined in join_all(handles).await {
        let (update, elapsed) = joined??;
        step_times.push(elapsed);
        store.put(update, &prover)?;
    }
    info!(heads = store.heads().len(), "branches stored");

    let started = Instant::now();
    let heads = store.verified_heads(&prover)?;
    let combining = prover.prove_text_update("combine", &heads)?;
    step_times.push(started.elapsed());

    // Persist and reload before storing, as a peer receiving it would.
    let reloaded = AttestedUpdate::from_json(&combining.to_json()?)?;
    let head = store.put(reloaded, &prover)?;

    if store.heads() != vec![head] {
        return Err(ScenarioError::Invariant(format!(
            "expected a single head, found {}",
            store.heads().len()
        )));
    }

    let shape = store.stats();
    info!(
        head = %head.short(),
        updates = shape.total_updates,
        max_depth = shape.max_depth,
        avg_arity = shape.avg_arity,
        "history converged"
    );

    // One `base` per update plus one `next` per predecessor edge.
    let attestations = 1 + 2 * branches + (1 + branches);
    Ok(ScenarioStats {
        scenario: "dag",
        participants: branches,
        attestations,
        rejected: 0,
        total_time: start.elapsed(),
        avg_step_time: average(&step_times),
    })
}

/// Every replica increments the shared initial state concurrently, then
/// random pairs sync: the first tries another increment and merges in the
/// second's state. Closed gates are counted, not treated as failures.
pub async fn counter_replicas(attester: Arc<SigningAttester>, count: usize, rounds: usize) -> Result<ScenarioStats> {
    info!(replicas = count, rounds, "counter scenario: concurrent increments, random syncs");
    let start = Instant::now();
    let (replicas, keys) = ReplicaSet::generate(count, &mut StdRng::from_entropy());
    let counter = GatedCounter::new(attester.as_ref(), replicas.clone());
    let initial = counter.initial()?;
    let mut attestations = 1;
    let mut rejected = 0;
    let mut step_times = Vec::new();

    info!("[Phase 1/2] Sibling increments");
    let handles = keys.iter().cloned().enumerate().map(|(slot, key)| {
        let attester = Arc::clone(&attester);
        let replicas = replicas.clone();
        let initial = initial.clone();
        tokio::task::spawn_blocking(move || {
            let started = Instant::now();
            GatedCounter::new(attester.as_ref(), replicas)
                .increment(&initial, slot + 1, &key)
                .map(|state| (state, started.elapsed()))
        })
    });
    let mut states: Vec<CounterAttestation> = Vec::with_capacity(count);
    for joined in join_all(handles).await {
        let (state, elapsed) = joined??;
        step_times.push(elapsed);
        states.push(state);
        attestations += 1;
    }

    info!("[Phase 2/2] Synchronizing replicas");
    let mut pairs = Box::pin(replica_pair_generator(count, rounds));
    while let Some((a, b)) = pairs.next().await {
        if a == b {
            continue;
        }
        let started = Instant::now();

        match counter.increment(&states[a], a + 1, &keys[a]) {
            Ok(next) => {
                states[a] = next;
                attestations += 1;
            }
            Err(CounterError::GateViolation { replica, sum }) => {
                debug!(replica, sum, "gate closed");
                rejected += 1;
            }
            Err(e) => return Err(e.into()),
        }

        states[a] = counter.merge(&states[a], &states[b])?;
        attestations += 1;
        step_times.push(started.elapsed());
    }

    let Some((first, rest)) = states.split_first() else {
        return Err(ScenarioError::Invariant("no replicas".into()));
    };
    let mut converged = first.clone();
    for state in rest {
        converged = counter.merge(&converged, state)?;
        attestations += 1;
    }

    let expected = CounterState::join_all(states.iter().map(|s| s.claimed_output()));
    if converged.claimed_output() != &expected {
        return Err(ScenarioError::Invariant(format!(
            "merged state {} differs from join {}",
            converged.claimed_output(),
            expected
        )));
    }
    info!(value = counter.value(&converged)?, state = %converged.claimed_output(), "replicas converged");

    Ok(ScenarioStats {
        scenario: "counter",
        participants: count,
        attestations,
        rejected,
        total_time: start.elapsed(),
        avg_step_time: average(&step_times),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attester() -> Arc<SigningAttester> {
        Arc::new(SigningAttester::from_seed([41u8; 32]))
    }

    #[tokio::test]
    async fn test_dag_branches_converge() {
        let stats = dag_branches(attester(), 3).await.unwrap();
        assert_eq!(stats.participants, 3);
        assert_eq!(stats.attestations, 11);
    }

    #[tokio::test]
    async fn test_counter_replicas_converge() {
        let stats = counter_replicas(attester(), 4, 12).await.unwrap();
        assert_eq!(stats.participants, 4);
        assert!(stats.attestations >= 5);
    }

    #[tokio::test]
    async fn test_pair_generator_bounds() {
        let pairs: Vec<(usize, usize)> = replica_pair_generator(3, 20).collect().await;
        assert_eq!(pairs.len(), 20);
        assert!(pairs.iter().all(|(a, b)| *a < 3 && *b < 3));
    }
}
